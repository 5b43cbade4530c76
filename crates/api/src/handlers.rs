// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.

use jornada::{
    AbsenceResult, AttendanceLifecycle, AttendanceStore, BatchReconciler, BatchReport,
    BatchRequest, CoreError, WorkerDirectory, WorkerPlan,
};
use jornada_domain::{
    AttendanceId, AttendanceRecord, CivilTime, DayState, WorkedHours, WorkerId, date_to_storage,
};
use jornada_persistence::Persistence;
use time::Date;
use tracing::info;

use crate::error::{ApiError, translate_core_error};
use crate::input::{
    parse_action, parse_date, parse_optional_time, parse_range, parse_range_or_today, parse_time,
    parse_worker_id, parse_worker_ids,
};
use crate::request_response::{
    AttendanceRecordInfo, BatchPreviewResponse, BatchRequestBody, BatchResponse,
    ListDayResponse, MarkAbsentRequest, MarkAbsentResponse, OpenEntriesResponse, OpenEntryQuery,
    ReactivateRequest, RegisterEntryRequest, RegisterExitRequest, RegisterWorkerRequest,
    RegisterWorkerResponse, StatisticsQuery, UpdateLocationRequest, UpdateNotesRequest,
    UpdateTimeRequest, WorkerAttendanceResponse, WorkerOpenEntryResponse, WorkerPlanInfo,
    WorkerRangeQuery, WorkerStatisticsResponse, absence_change_name,
};

// ============================================================================
// Single-record operations
// ============================================================================

/// Clocks a worker in.
///
/// # Errors
///
/// Returns an error if:
/// - The date, time or worker id is malformed
/// - The worker is unknown or inactive
/// - The date is in the future
/// - The worker already has a live record for the day
pub fn register_entry(
    lifecycle: &AttendanceLifecycle,
    request: &RegisterEntryRequest,
) -> Result<AttendanceRecordInfo, ApiError> {
    let worker_id: WorkerId = parse_worker_id(request.worker_id)?;
    let date: Date = parse_date("date", &request.date)?;
    let entry_time: Option<CivilTime> =
        parse_optional_time("entry_time", request.entry_time.as_deref())?;

    let record: AttendanceRecord = lifecycle
        .register_entry(
            worker_id,
            date,
            entry_time,
            request.location.clone(),
            request.notes.clone(),
        )
        .map_err(translate_core_error)?;
    Ok(AttendanceRecordInfo::from(&record))
}

/// Clocks a worker out of an open record.
///
/// # Errors
///
/// Returns an error if:
/// - The time is malformed
/// - The record does not exist, is absent or has no entry
/// - The exit is not later than the entry
pub fn register_exit(
    lifecycle: &AttendanceLifecycle,
    attendance_id: i64,
    request: &RegisterExitRequest,
) -> Result<AttendanceRecordInfo, ApiError> {
    let exit_time: Option<CivilTime> =
        parse_optional_time("exit_time", request.exit_time.as_deref())?;

    let record: AttendanceRecord = lifecycle
        .register_exit(
            AttendanceId::new(attendance_id),
            exit_time,
            request.notes.clone(),
        )
        .map_err(translate_core_error)?;
    Ok(AttendanceRecordInfo::from(&record))
}

/// Corrects a record's entry time.
///
/// # Errors
///
/// Returns an error if the time is malformed, the record is missing or
/// absent, or the new entry is not before an existing exit.
pub fn update_entry_time(
    lifecycle: &AttendanceLifecycle,
    attendance_id: i64,
    request: &UpdateTimeRequest,
) -> Result<AttendanceRecordInfo, ApiError> {
    let entry_time: CivilTime = parse_time("time", &request.time)?;
    let record: AttendanceRecord = lifecycle
        .update_entry_time(AttendanceId::new(attendance_id), entry_time)
        .map_err(translate_core_error)?;
    Ok(AttendanceRecordInfo::from(&record))
}

/// Corrects a record's exit time.
///
/// # Errors
///
/// Returns an error if the time is malformed, the record is missing,
/// absent or has no entry, or the new exit is not after the entry.
pub fn update_exit_time(
    lifecycle: &AttendanceLifecycle,
    attendance_id: i64,
    request: &UpdateTimeRequest,
) -> Result<AttendanceRecordInfo, ApiError> {
    let exit_time: CivilTime = parse_time("time", &request.time)?;
    let record: AttendanceRecord = lifecycle
        .update_exit_time(AttendanceId::new(attendance_id), exit_time)
        .map_err(translate_core_error)?;
    Ok(AttendanceRecordInfo::from(&record))
}

/// Marks a worker absent for a day.
///
/// # Errors
///
/// Returns an error if the input is malformed, the date is in the future,
/// or a new absence record is needed for an unknown worker.
pub fn mark_absent(
    lifecycle: &AttendanceLifecycle,
    request: &MarkAbsentRequest,
) -> Result<MarkAbsentResponse, ApiError> {
    let worker_id: WorkerId = parse_worker_id(request.worker_id)?;
    let date: Date = parse_date("date", &request.date)?;

    let result: AbsenceResult = lifecycle
        .mark_absent(worker_id, date)
        .map_err(translate_core_error)?;
    Ok(MarkAbsentResponse {
        record: AttendanceRecordInfo::from(&result.record),
        change: absence_change_name(result.change).to_string(),
        message: format!("Worker {worker_id} marked absent on {}", request.date),
    })
}

/// Brings an absent record back as a fresh clock-in.
///
/// # Errors
///
/// Returns an error if the time is malformed, the record is missing or
/// live, or another live record occupies the day.
pub fn reactivate(
    lifecycle: &AttendanceLifecycle,
    attendance_id: i64,
    request: &ReactivateRequest,
) -> Result<AttendanceRecordInfo, ApiError> {
    let entry_time: CivilTime = parse_time("entry_time", &request.entry_time)?;
    let record: AttendanceRecord = lifecycle
        .reactivate(
            AttendanceId::new(attendance_id),
            entry_time,
            request.location.clone(),
        )
        .map_err(translate_core_error)?;
    Ok(AttendanceRecordInfo::from(&record))
}

/// Replaces a live record's notes.
///
/// # Errors
///
/// Returns an error if the record is missing or absent.
pub fn update_notes(
    lifecycle: &AttendanceLifecycle,
    attendance_id: i64,
    request: &UpdateNotesRequest,
) -> Result<AttendanceRecordInfo, ApiError> {
    let record: AttendanceRecord = lifecycle
        .update_notes(AttendanceId::new(attendance_id), request.notes.clone())
        .map_err(translate_core_error)?;
    Ok(AttendanceRecordInfo::from(&record))
}

/// Replaces a live record's location.
///
/// # Errors
///
/// Returns an error if the record is missing or absent.
pub fn update_location(
    lifecycle: &AttendanceLifecycle,
    attendance_id: i64,
    request: &UpdateLocationRequest,
) -> Result<AttendanceRecordInfo, ApiError> {
    let record: AttendanceRecord = lifecycle
        .update_location(AttendanceId::new(attendance_id), request.location.clone())
        .map_err(translate_core_error)?;
    Ok(AttendanceRecordInfo::from(&record))
}

/// Returns a record, absent ones included.
///
/// # Errors
///
/// Returns an error if the record does not exist.
pub fn get_record(
    lifecycle: &AttendanceLifecycle,
    attendance_id: i64,
) -> Result<AttendanceRecordInfo, ApiError> {
    let record: AttendanceRecord = lifecycle
        .get_record(AttendanceId::new(attendance_id))
        .map_err(translate_core_error)?;
    Ok(AttendanceRecordInfo::from(&record))
}

// ============================================================================
// Read-side queries
// ============================================================================

/// Lists every record for a day, absent ones included.
///
/// # Errors
///
/// Returns an error if the date is malformed or the store fails.
pub fn list_day(lifecycle: &AttendanceLifecycle, date: &str) -> Result<ListDayResponse, ApiError> {
    let day: Date = parse_date("date", date)?;
    let records: Vec<AttendanceRecord> = lifecycle
        .store()
        .list_by_date(day)
        .map_err(|e| translate_core_error(CoreError::from(e)))?;

    Ok(ListDayResponse {
        date: date_to_storage(day),
        records: records.iter().map(AttendanceRecordInfo::from).collect(),
    })
}

/// Lists workers currently clocked in on a day.
///
/// # Errors
///
/// Returns an error if the date is malformed or the store fails.
pub fn open_entries(
    lifecycle: &AttendanceLifecycle,
    date: &str,
) -> Result<OpenEntriesResponse, ApiError> {
    let day: Date = parse_date("date", date)?;
    let records: Vec<AttendanceRecord> = lifecycle
        .store()
        .list_by_date(day)
        .map_err(|e| translate_core_error(CoreError::from(e)))?;

    Ok(OpenEntriesResponse {
        date: date_to_storage(day),
        records: records
            .iter()
            .filter(|record| record.day_state() == DayState::Incomplete)
            .map(AttendanceRecordInfo::from)
            .collect(),
    })
}

/// Lists a worker's live records over an inclusive date range, most recent
/// day first.
///
/// # Errors
///
/// Returns an error if the input is malformed, the worker is unknown, or
/// the store fails.
pub fn worker_attendance(
    lifecycle: &AttendanceLifecycle,
    worker_id: i64,
    query: &WorkerRangeQuery,
) -> Result<WorkerAttendanceResponse, ApiError> {
    let worker: WorkerId = parse_worker_id(worker_id)?;
    let (from, to): (Date, Date) = parse_range_or_today(
        query.from.as_deref(),
        query.to.as_deref(),
        lifecycle.clock().today(),
    )?;
    ensure_known_worker(lifecycle, worker)?;

    let records: Vec<AttendanceRecord> = lifecycle
        .store()
        .list_for_worker(worker, from, to)
        .map_err(|e| translate_core_error(CoreError::from(e)))?;

    Ok(WorkerAttendanceResponse {
        worker_id,
        from: date_to_storage(from),
        to: date_to_storage(to),
        records: records
            .iter()
            .rev()
            .filter(|record| record.is_live())
            .map(AttendanceRecordInfo::from)
            .collect(),
    })
}

/// Returns a worker's open entry for a day, if the worker is clocked in.
///
/// # Errors
///
/// Returns an error if the input is malformed, the worker is unknown, or
/// the store fails.
pub fn worker_open_entry(
    lifecycle: &AttendanceLifecycle,
    worker_id: i64,
    query: &OpenEntryQuery,
) -> Result<WorkerOpenEntryResponse, ApiError> {
    let worker: WorkerId = parse_worker_id(worker_id)?;
    let day: Date = match query.date.as_deref() {
        Some(date) => parse_date("date", date)?,
        None => lifecycle.clock().today(),
    };
    ensure_known_worker(lifecycle, worker)?;

    let live: Option<AttendanceRecord> = lifecycle
        .store()
        .find_live(worker, day)
        .map_err(|e| translate_core_error(CoreError::from(e)))?;

    Ok(WorkerOpenEntryResponse {
        worker_id,
        date: date_to_storage(day),
        record: live
            .filter(|record| record.day_state() == DayState::Incomplete)
            .as_ref()
            .map(AttendanceRecordInfo::from),
    })
}

/// Summarizes a worker's live records over an inclusive date range.
///
/// The average divides total worked hours by every live record in the
/// range, open ones included.
///
/// # Errors
///
/// Returns an error if the input is malformed, the worker is unknown, or
/// the store fails.
pub fn worker_statistics(
    lifecycle: &AttendanceLifecycle,
    worker_id: i64,
    query: &StatisticsQuery,
) -> Result<WorkerStatisticsResponse, ApiError> {
    let worker: WorkerId = parse_worker_id(worker_id)?;
    let (from, to): (Date, Date) = parse_range(&query.from, &query.to)?;
    ensure_known_worker(lifecycle, worker)?;

    let records: Vec<AttendanceRecord> = lifecycle
        .store()
        .list_for_worker(worker, from, to)
        .map_err(|e| translate_core_error(CoreError::from(e)))?;
    let live: Vec<&AttendanceRecord> = records.iter().filter(|r| r.is_live()).collect();
    let worked: Vec<WorkedHours> = live.iter().filter_map(|r| r.worked_hours).collect();

    let total: WorkedHours = worked.iter().copied().sum();
    let average: WorkedHours = average_hours(total, live.len());

    Ok(WorkerStatisticsResponse {
        worker_id,
        from: date_to_storage(from),
        to: date_to_storage(to),
        record_count: live.len(),
        completed_count: worked.len(),
        total_hours: total.as_f64(),
        average_hours: average.as_f64(),
    })
}

fn ensure_known_worker(lifecycle: &AttendanceLifecycle, worker: WorkerId) -> Result<(), ApiError> {
    let known: bool = lifecycle
        .directory()
        .exists(worker)
        .map_err(|e| translate_core_error(CoreError::from(e)))?;
    if !known {
        return Err(translate_core_error(CoreError::WorkerNotFound(worker)));
    }
    Ok(())
}

/// Mean of `count` records whose worked hours sum to `total`, rounded half-up.
fn average_hours(total: WorkedHours, count: usize) -> WorkedHours {
    let Ok(count) = u32::try_from(count) else {
        return WorkedHours::default();
    };
    if count == 0 {
        return WorkedHours::default();
    }
    WorkedHours::from_hundredths((total.hundredths() + count / 2) / count)
}

// ============================================================================
// Batches
// ============================================================================

fn batch_request(body: &BatchRequestBody) -> Result<BatchRequest, ApiError> {
    Ok(BatchRequest {
        date: parse_date("date", &body.date)?,
        action: parse_action(&body.action)?,
        time: parse_optional_time("time", body.time.as_deref())?,
        worker_ids: parse_worker_ids(&body.worker_ids)?,
    })
}

/// Classifies a batch without writing anything.
///
/// # Errors
///
/// Returns an error if the request is malformed. Per-worker problems are
/// reported in the plans.
pub async fn preview_batch(
    reconciler: &BatchReconciler,
    body: &BatchRequestBody,
) -> Result<BatchPreviewResponse, ApiError> {
    let request: BatchRequest = batch_request(body)?;
    let plans: Vec<WorkerPlan> = reconciler.preview(&request).await;

    Ok(BatchPreviewResponse {
        date: date_to_storage(request.date),
        action: request.action.as_str().to_string(),
        plans: plans.iter().map(WorkerPlanInfo::from).collect(),
    })
}

/// Applies a batch.
///
/// # Errors
///
/// Returns an error only if the request is malformed. Per-worker problems
/// are reported in the outcomes.
pub async fn apply_batch(
    reconciler: &BatchReconciler,
    body: &BatchRequestBody,
) -> Result<BatchResponse, ApiError> {
    let request: BatchRequest = batch_request(body)?;
    let report: BatchReport = reconciler.reconcile(&request).await;
    Ok(BatchResponse::from(&report))
}

// ============================================================================
// Worker directory
// ============================================================================

/// Adds a worker to the directory or changes its active flag.
///
/// # Errors
///
/// Returns an error if the worker id is malformed or the write fails.
pub fn register_worker(
    persistence: &Persistence,
    request: &RegisterWorkerRequest,
) -> Result<RegisterWorkerResponse, ApiError> {
    let worker_id: WorkerId = parse_worker_id(request.worker_id)?;
    let active: bool = request.active.unwrap_or(true);

    persistence.register_worker(worker_id, active)?;
    info!(worker_id = worker_id.value(), active, "Registered worker");

    Ok(RegisterWorkerResponse {
        worker_id: worker_id.value(),
        active,
        message: format!("Worker {worker_id} registered"),
    })
}
