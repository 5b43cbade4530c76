// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::eyre::Context;
use jornada::{
    AttendanceLifecycle, BatchReconciler, Clock, DEFAULT_MAX_PARALLELISM, ReconcilerConfig,
};
use jornada_api::{
    ApiError, AttendanceRecordInfo, BatchPreviewResponse, BatchRequestBody, BatchResponse,
    ListDayResponse, MarkAbsentRequest, MarkAbsentResponse, OpenEntriesResponse, OpenEntryQuery,
    ReactivateRequest, RegisterEntryRequest, RegisterExitRequest, RegisterWorkerRequest,
    RegisterWorkerResponse, StatisticsQuery, UpdateLocationRequest, UpdateNotesRequest,
    UpdateTimeRequest, WorkerAttendanceResponse, WorkerOpenEntryResponse, WorkerRangeQuery,
    WorkerStatisticsResponse,
};
use jornada_domain::ZonedClock;
use jornada_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;

/// Jornada Server - HTTP server for farm attendance records
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// IANA timezone used for "today" and "now" (e.g. `Europe/Madrid`)
    #[arg(short, long, default_value = "UTC")]
    timezone: String,

    /// Maximum number of workers a batch processes concurrently
    #[arg(long, default_value_t = DEFAULT_MAX_PARALLELISM)]
    max_parallelism: usize,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The store, kept for worker directory writes.
    persistence: Arc<Persistence>,
    /// Single-record operations.
    lifecycle: AttendanceLifecycle,
    /// Batch operations.
    reconciler: BatchReconciler,
}

impl AppState {
    fn new(persistence: Arc<Persistence>, clock: Arc<dyn Clock>, config: ReconcilerConfig) -> Self {
        let lifecycle: AttendanceLifecycle =
            AttendanceLifecycle::new(persistence.clone(), persistence.clone(), clock);
        let reconciler: BatchReconciler = BatchReconciler::new(lifecycle.clone(), config);
        Self {
            persistence,
            lifecycle,
            reconciler,
        }
    }
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for HttpError {
    fn from(err: tokio::task::JoinError) -> Self {
        error!(error = %err, "Blocking task failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Internal error: {err}"),
        }
    }
}

/// Runs a store-bound API call on the blocking pool.
async fn run_blocking<T, F>(op: F) -> Result<Json<T>, HttpError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let response: T = tokio::task::spawn_blocking(op).await??;
    Ok(Json(response))
}

/// Handler for POST `/attendance/entry`.
async fn handle_register_entry(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterEntryRequest>,
) -> Result<Json<AttendanceRecordInfo>, HttpError> {
    info!(worker_id = req.worker_id, date = %req.date, "Handling register_entry request");
    run_blocking(move || jornada_api::register_entry(&app_state.lifecycle, &req)).await
}

/// Handler for POST `/attendance/{id}/exit`.
async fn handle_register_exit(
    AxumState(app_state): AxumState<AppState>,
    Path(attendance_id): Path<i64>,
    Json(req): Json<RegisterExitRequest>,
) -> Result<Json<AttendanceRecordInfo>, HttpError> {
    info!(attendance_id, "Handling register_exit request");
    run_blocking(move || jornada_api::register_exit(&app_state.lifecycle, attendance_id, &req))
        .await
}

/// Handler for POST `/attendance/{id}/entry_time`.
async fn handle_update_entry_time(
    AxumState(app_state): AxumState<AppState>,
    Path(attendance_id): Path<i64>,
    Json(req): Json<UpdateTimeRequest>,
) -> Result<Json<AttendanceRecordInfo>, HttpError> {
    run_blocking(move || {
        jornada_api::update_entry_time(&app_state.lifecycle, attendance_id, &req)
    })
    .await
}

/// Handler for POST `/attendance/{id}/exit_time`.
async fn handle_update_exit_time(
    AxumState(app_state): AxumState<AppState>,
    Path(attendance_id): Path<i64>,
    Json(req): Json<UpdateTimeRequest>,
) -> Result<Json<AttendanceRecordInfo>, HttpError> {
    run_blocking(move || jornada_api::update_exit_time(&app_state.lifecycle, attendance_id, &req))
        .await
}

/// Handler for POST `/attendance/{id}/reactivate`.
async fn handle_reactivate(
    AxumState(app_state): AxumState<AppState>,
    Path(attendance_id): Path<i64>,
    Json(req): Json<ReactivateRequest>,
) -> Result<Json<AttendanceRecordInfo>, HttpError> {
    info!(attendance_id, "Handling reactivate request");
    run_blocking(move || jornada_api::reactivate(&app_state.lifecycle, attendance_id, &req)).await
}

/// Handler for POST `/attendance/{id}/notes`.
async fn handle_update_notes(
    AxumState(app_state): AxumState<AppState>,
    Path(attendance_id): Path<i64>,
    Json(req): Json<UpdateNotesRequest>,
) -> Result<Json<AttendanceRecordInfo>, HttpError> {
    run_blocking(move || jornada_api::update_notes(&app_state.lifecycle, attendance_id, &req)).await
}

/// Handler for POST `/attendance/{id}/location`.
async fn handle_update_location(
    AxumState(app_state): AxumState<AppState>,
    Path(attendance_id): Path<i64>,
    Json(req): Json<UpdateLocationRequest>,
) -> Result<Json<AttendanceRecordInfo>, HttpError> {
    run_blocking(move || jornada_api::update_location(&app_state.lifecycle, attendance_id, &req))
        .await
}

/// Handler for POST `/attendance/absent`.
async fn handle_mark_absent(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<MarkAbsentRequest>,
) -> Result<Json<MarkAbsentResponse>, HttpError> {
    info!(worker_id = req.worker_id, date = %req.date, "Handling mark_absent request");
    run_blocking(move || jornada_api::mark_absent(&app_state.lifecycle, &req)).await
}

/// Handler for GET `/attendance/{id}`.
async fn handle_get_record(
    AxumState(app_state): AxumState<AppState>,
    Path(attendance_id): Path<i64>,
) -> Result<Json<AttendanceRecordInfo>, HttpError> {
    run_blocking(move || jornada_api::get_record(&app_state.lifecycle, attendance_id)).await
}

/// Handler for GET `/attendance/day/{date}`.
async fn handle_list_day(
    AxumState(app_state): AxumState<AppState>,
    Path(date): Path<String>,
) -> Result<Json<ListDayResponse>, HttpError> {
    run_blocking(move || jornada_api::list_day(&app_state.lifecycle, &date)).await
}

/// Handler for GET `/attendance/open/{date}`.
async fn handle_open_entries(
    AxumState(app_state): AxumState<AppState>,
    Path(date): Path<String>,
) -> Result<Json<OpenEntriesResponse>, HttpError> {
    run_blocking(move || jornada_api::open_entries(&app_state.lifecycle, &date)).await
}

/// Handler for GET `/workers/{id}/attendance`.
async fn handle_worker_attendance(
    AxumState(app_state): AxumState<AppState>,
    Path(worker_id): Path<i64>,
    Query(query): Query<WorkerRangeQuery>,
) -> Result<Json<WorkerAttendanceResponse>, HttpError> {
    run_blocking(move || jornada_api::worker_attendance(&app_state.lifecycle, worker_id, &query))
        .await
}

/// Handler for GET `/workers/{id}/open`.
async fn handle_worker_open_entry(
    AxumState(app_state): AxumState<AppState>,
    Path(worker_id): Path<i64>,
    Query(query): Query<OpenEntryQuery>,
) -> Result<Json<WorkerOpenEntryResponse>, HttpError> {
    run_blocking(move || jornada_api::worker_open_entry(&app_state.lifecycle, worker_id, &query))
        .await
}

/// Handler for GET `/workers/{id}/statistics`.
async fn handle_worker_statistics(
    AxumState(app_state): AxumState<AppState>,
    Path(worker_id): Path<i64>,
    Query(query): Query<StatisticsQuery>,
) -> Result<Json<WorkerStatisticsResponse>, HttpError> {
    run_blocking(move || jornada_api::worker_statistics(&app_state.lifecycle, worker_id, &query))
        .await
}

/// Handler for POST `/attendance/bulk/preview`.
async fn handle_preview_batch(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<BatchRequestBody>,
) -> Result<Json<BatchPreviewResponse>, HttpError> {
    info!(
        date = %req.date,
        action = %req.action,
        workers = req.worker_ids.len(),
        "Handling batch preview request"
    );
    // The reconciler moves each worker's store calls onto the blocking pool.
    let response: BatchPreviewResponse =
        jornada_api::preview_batch(&app_state.reconciler, &req).await?;
    Ok(Json(response))
}

/// Handler for POST `/attendance/bulk`.
async fn handle_apply_batch(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<BatchRequestBody>,
) -> Result<Json<BatchResponse>, HttpError> {
    info!(
        date = %req.date,
        action = %req.action,
        workers = req.worker_ids.len(),
        "Handling batch request"
    );
    let response: BatchResponse = jornada_api::apply_batch(&app_state.reconciler, &req).await?;
    Ok(Json(response))
}

/// Handler for POST `/workers`.
async fn handle_register_worker(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterWorkerRequest>,
) -> Result<Json<RegisterWorkerResponse>, HttpError> {
    run_blocking(move || jornada_api::register_worker(&app_state.persistence, &req)).await
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/attendance/entry", post(handle_register_entry))
        .route("/attendance/absent", post(handle_mark_absent))
        .route("/attendance/bulk", post(handle_apply_batch))
        .route("/attendance/bulk/preview", post(handle_preview_batch))
        .route("/attendance/day/{date}", get(handle_list_day))
        .route("/attendance/open/{date}", get(handle_open_entries))
        .route("/attendance/{attendance_id}", get(handle_get_record))
        .route("/attendance/{attendance_id}/exit", post(handle_register_exit))
        .route(
            "/attendance/{attendance_id}/entry_time",
            post(handle_update_entry_time),
        )
        .route(
            "/attendance/{attendance_id}/exit_time",
            post(handle_update_exit_time),
        )
        .route(
            "/attendance/{attendance_id}/reactivate",
            post(handle_reactivate),
        )
        .route("/attendance/{attendance_id}/notes", post(handle_update_notes))
        .route(
            "/attendance/{attendance_id}/location",
            post(handle_update_location),
        )
        .route("/workers", post(handle_register_worker))
        .route(
            "/workers/{worker_id}/attendance",
            get(handle_worker_attendance),
        )
        .route("/workers/{worker_id}/open", get(handle_worker_open_entry))
        .route(
            "/workers/{worker_id}/statistics",
            get(handle_worker_statistics),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(args.log_level().into())
                .from_env_lossy(),
        )
        .init();

    info!("Initializing Jornada Server");

    let clock: ZonedClock = ZonedClock::from_name(&args.timezone)
        .wrap_err_with(|| format!("Unusable --timezone '{}'", args.timezone))?;
    info!(timezone = %clock.zone(), "Using civil clock");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let config: ReconcilerConfig = ReconcilerConfig {
        max_parallelism: args.max_parallelism.max(1),
    };
    let app_state: AppState = AppState::new(Arc::new(persistence), Arc::new(clock), config);

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port)
        .parse()
        .wrap_err("Invalid --bind address")?;
    info!("Server listening on {}", addr);

    let listener: tokio::net::TcpListener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
