// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::float_cmp)]


use super::{AppState, build_router};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use jornada::{Clock, FixedClock, ReconcilerConfig};
use jornada_domain::WorkerId;
use jornada_persistence::Persistence;
use serde_json::Value;
use std::sync::Arc;
use time::macros::{date, time};
use tower::ServiceExt;

/// Builds a router over a fresh in-memory database frozen at 2025-03-11 12:00.
///
/// Workers 1, 2, 3 and 42 are registered and active.
pub fn create_test_router() -> Router {
    let persistence: Arc<Persistence> =
        Arc::new(Persistence::new_in_memory().expect("Failed to create in-memory persistence"));
    for id in [1, 2, 3, 42] {
        persistence
            .register_worker(WorkerId::new(id).unwrap(), true)
            .unwrap();
    }
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::at(date!(2025 - 03 - 11), time!(12:00)));
    build_router(AppState::new(persistence, clock, ReconcilerConfig::default()))
}

/// Sends a request and returns the status and decoded JSON body.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request: Request<Body> = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };
    (status, value)
}
