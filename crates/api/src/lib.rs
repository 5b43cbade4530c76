// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the Jornada attendance system.
//!
//! Handlers take raw request DTOs, parse them into domain values, call the
//! lifecycle or the batch reconciler, and translate every failure into an
//! `ApiError`. Nothing here knows about HTTP.

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

mod error;
mod handlers;
mod input;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{ApiError, InputError, translate_core_error, translate_domain_error};
pub use handlers::{
    apply_batch, get_record, list_day, mark_absent, open_entries, preview_batch, reactivate,
    register_entry, register_exit, register_worker, update_entry_time, update_exit_time,
    update_location, update_notes, worker_attendance, worker_open_entry, worker_statistics,
};
pub use input::{
    parse_action, parse_date, parse_optional_time, parse_range, parse_range_or_today, parse_time,
    parse_worker_id, parse_worker_ids,
};
pub use request_response::{
    AttendanceRecordInfo, BatchPreviewResponse, BatchRequestBody, BatchResponse,
    BatchSummaryInfo, ListDayResponse, MarkAbsentRequest, MarkAbsentResponse,
    OpenEntriesResponse, OpenEntryQuery, ReactivateRequest, RegisterEntryRequest,
    RegisterExitRequest, RegisterWorkerRequest, RegisterWorkerResponse, StatisticsQuery,
    UpdateLocationRequest, UpdateNotesRequest, UpdateTimeRequest, WorkerAttendanceResponse,
    WorkerOpenEntryResponse, WorkerOutcomeInfo, WorkerPlanInfo, WorkerRangeQuery,
    WorkerStatisticsResponse, absence_change_name,
};
