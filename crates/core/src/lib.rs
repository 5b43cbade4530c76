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

mod error;
mod lifecycle;
mod reconciler;
mod store;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use error::{CoreError, StoreError};
pub use jornada_domain::{Clock, FixedClock, ZonedClock};
pub use lifecycle::{AbsenceChange, AbsenceResult, AttendanceLifecycle};
pub use reconciler::{
    BatchAction, BatchReconciler, BatchReport, BatchRequest, BatchSummary, Classification,
    DEFAULT_MAX_PARALLELISM, Outcome, ReconcilerConfig, WorkerOutcome, WorkerPlan,
};
pub use store::{AttendanceStore, WorkerDirectory};
