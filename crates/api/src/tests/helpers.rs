// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use jornada::{AttendanceLifecycle, BatchReconciler, Clock, FixedClock, ReconcilerConfig};
use jornada_domain::WorkerId;
use jornada_persistence::Persistence;
use std::sync::Arc;
use time::macros::{date, time};

/// A lifecycle over a fresh in-memory database, frozen at 2025-03-11 12:00.
///
/// Workers 1, 2, 3 and 42 are active; worker 99 is inactive.
pub struct TestApp {
    pub persistence: Arc<Persistence>,
    pub lifecycle: AttendanceLifecycle,
    pub reconciler: BatchReconciler,
}

pub fn create_test_app() -> TestApp {
    let persistence: Arc<Persistence> = Arc::new(Persistence::new_in_memory().unwrap());
    for id in [1, 2, 3, 42] {
        persistence
            .register_worker(WorkerId::new(id).unwrap(), true)
            .unwrap();
    }
    persistence
        .register_worker(WorkerId::new(99).unwrap(), false)
        .unwrap();

    let clock: Arc<dyn Clock> = Arc::new(FixedClock::at(date!(2025 - 03 - 11), time!(12:00)));
    let lifecycle: AttendanceLifecycle =
        AttendanceLifecycle::new(persistence.clone(), persistence.clone(), clock);
    let reconciler: BatchReconciler =
        BatchReconciler::new(lifecycle.clone(), ReconcilerConfig::default());

    TestApp {
        persistence,
        lifecycle,
        reconciler,
    }
}
