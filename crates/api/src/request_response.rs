// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Requests carry raw strings; they are parsed into domain values by the
//! handlers so malformed input surfaces as `ApiError::InvalidInput`.

use jornada::{
    AbsenceChange, BatchReport, BatchSummary, Classification, Outcome, WorkerOutcome, WorkerPlan,
};
use jornada_domain::{AttendanceRecord, CivilTime, date_to_storage};
use time::OffsetDateTime;

// ============================================================================
// Requests
// ============================================================================

/// API request to clock a worker in.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterEntryRequest {
    /// The worker clocking in.
    pub worker_id: i64,
    /// The civil day (`YYYY-MM-DD`).
    pub date: String,
    /// Entry time (`HH:MM`); now when omitted.
    #[serde(default)]
    pub entry_time: Option<String>,
    /// Optional location.
    #[serde(default)]
    pub location: Option<String>,
    /// Optional notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// API request to clock a worker out.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterExitRequest {
    /// Exit time (`HH:MM`); now when omitted.
    #[serde(default)]
    pub exit_time: Option<String>,
    /// Optional exit notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// API request to correct an entry or exit time.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateTimeRequest {
    /// The corrected time (`HH:MM`).
    pub time: String,
}

/// API request to bring an absent record back.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReactivateRequest {
    /// The new entry time (`HH:MM`).
    pub entry_time: String,
    /// Replacement location, if any.
    #[serde(default)]
    pub location: Option<String>,
}

/// API request to replace a record's notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateNotesRequest {
    /// The new notes; `None` clears them.
    #[serde(default)]
    pub notes: Option<String>,
}

/// API request to replace a record's location.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateLocationRequest {
    /// The new location; `None` clears it.
    #[serde(default)]
    pub location: Option<String>,
}

/// API request to mark a worker absent.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MarkAbsentRequest {
    /// The worker.
    pub worker_id: i64,
    /// The civil day (`YYYY-MM-DD`).
    pub date: String,
}

/// API request for a bulk entry, exit or absence.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BatchRequestBody {
    /// The civil day (`YYYY-MM-DD`).
    pub date: String,
    /// `entry`, `exit` or `absent`.
    pub action: String,
    /// Entry or exit time (`HH:MM`); now when omitted.
    #[serde(default)]
    pub time: Option<String>,
    /// The workers, in the order outcomes should be reported.
    pub worker_ids: Vec<i64>,
}

/// Query parameters for worker statistics.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatisticsQuery {
    /// Range start (`YYYY-MM-DD`, inclusive).
    pub from: String,
    /// Range end (`YYYY-MM-DD`, inclusive).
    pub to: String,
}

/// Query parameters for a worker's attendance listing.
///
/// A missing bound defaults to the clock's current day.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WorkerRangeQuery {
    /// Range start (`YYYY-MM-DD`, inclusive).
    #[serde(default)]
    pub from: Option<String>,
    /// Range end (`YYYY-MM-DD`, inclusive).
    #[serde(default)]
    pub to: Option<String>,
}

/// Query parameters for a worker's open entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OpenEntryQuery {
    /// The civil day (`YYYY-MM-DD`); the clock's current day when absent.
    #[serde(default)]
    pub date: Option<String>,
}

/// API request to add a worker to the directory.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterWorkerRequest {
    /// The worker identifier assigned by the owning system.
    pub worker_id: i64,
    /// Whether the worker may clock in; defaults to active.
    #[serde(default)]
    pub active: Option<bool>,
}

// ============================================================================
// Responses
// ============================================================================

/// Information about a single attendance record.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AttendanceRecordInfo {
    /// The record identifier.
    pub attendance_id: i64,
    /// The worker.
    pub worker_id: i64,
    /// The civil day.
    pub date: String,
    /// Entry time, if recorded.
    pub entry_time: Option<String>,
    /// Exit time, if recorded.
    pub exit_time: Option<String>,
    /// Worked hours, two decimals.
    pub worked_hours: Option<f64>,
    /// Location.
    pub location: Option<String>,
    /// Entry notes.
    pub notes: Option<String>,
    /// Exit notes.
    pub exit_notes: Option<String>,
    /// `incomplete` or `complete`.
    pub status: String,
    /// `incomplete`, `complete` or `absent`.
    pub day_state: String,
    /// When the record was marked absent.
    #[serde(with = "time::serde::rfc3339::option")]
    pub tombstoned_at: Option<OffsetDateTime>,
    /// Creation instant.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Last modification instant.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<&AttendanceRecord> for AttendanceRecordInfo {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            attendance_id: record.id.value(),
            worker_id: record.worker_id.value(),
            date: date_to_storage(record.date),
            entry_time: record.entry_time.map(CivilTime::to_storage),
            exit_time: record.exit_time.map(CivilTime::to_storage),
            worked_hours: record.worked_hours.map(|hours| hours.as_f64()),
            location: record.location.clone(),
            notes: record.notes.clone(),
            exit_notes: record.exit_notes.clone(),
            status: record.status.as_str().to_string(),
            day_state: record.day_state().as_str().to_string(),
            tombstoned_at: record.tombstoned_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// API response for marking a worker absent.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MarkAbsentResponse {
    /// The absent record.
    pub record: AttendanceRecordInfo,
    /// `created`, `tombstoned` or `unchanged`.
    pub change: String,
    /// A success message.
    pub message: String,
}

/// API response listing a day's records.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ListDayResponse {
    /// The civil day.
    pub date: String,
    /// Every record for the day, absent ones included.
    pub records: Vec<AttendanceRecordInfo>,
}

/// API response listing open entries for a day.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OpenEntriesResponse {
    /// The civil day.
    pub date: String,
    /// Live records with an entry and no exit.
    pub records: Vec<AttendanceRecordInfo>,
}

/// API response listing a worker's live records over a date range.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorkerAttendanceResponse {
    /// The worker.
    pub worker_id: i64,
    /// Range start.
    pub from: String,
    /// Range end.
    pub to: String,
    /// Live records, most recent day first.
    pub records: Vec<AttendanceRecordInfo>,
}

/// API response with a worker's open entry for a day, if any.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorkerOpenEntryResponse {
    /// The worker.
    pub worker_id: i64,
    /// The civil day.
    pub date: String,
    /// The live record with an entry and no exit.
    pub record: Option<AttendanceRecordInfo>,
}

/// API response with a worker's totals over a date range.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorkerStatisticsResponse {
    /// The worker.
    pub worker_id: i64,
    /// Range start.
    pub from: String,
    /// Range end.
    pub to: String,
    /// Live records in the range.
    pub record_count: usize,
    /// Live records with worked hours.
    pub completed_count: usize,
    /// Sum of worked hours, two decimals.
    pub total_hours: f64,
    /// Total worked hours divided by `record_count`, two decimals.
    pub average_hours: f64,
}

/// Information about one worker's planned batch operation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WorkerPlanInfo {
    /// The worker.
    pub worker_id: i64,
    /// The worker's day state when classified.
    pub state: String,
    /// The existing record, if any.
    pub record_id: Option<i64>,
    /// `create`, `update`, `reactivate`, `mark_absent`, `reject` or `fail`.
    pub classification: String,
    /// Why the worker would be rejected or failed.
    pub error: Option<String>,
}

impl From<&WorkerPlan> for WorkerPlanInfo {
    fn from(plan: &WorkerPlan) -> Self {
        let (classification, error): (&str, Option<String>) = match &plan.classification {
            Classification::Create => ("create", None),
            Classification::Update => ("update", None),
            Classification::Reactivate => ("reactivate", None),
            Classification::MarkAbsent => ("mark_absent", None),
            Classification::Reject(err) => ("reject", Some(err.to_string())),
            Classification::Fail(err) => ("fail", Some(err.to_string())),
        };
        Self {
            worker_id: plan.worker_id.value(),
            state: plan.state.as_str().to_string(),
            record_id: plan.record_id.map(|id| id.value()),
            classification: classification.to_string(),
            error,
        }
    }
}

/// API response for a batch preview.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BatchPreviewResponse {
    /// The civil day.
    pub date: String,
    /// The operation.
    pub action: String,
    /// Per-worker plans in input order.
    pub plans: Vec<WorkerPlanInfo>,
}

/// Information about one worker's batch outcome.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WorkerOutcomeInfo {
    /// The worker.
    pub worker_id: i64,
    /// `created`, `updated`, `reactivated`, `rejected` or `failed`.
    pub outcome: String,
    /// Why the worker was rejected or failed.
    pub error: Option<String>,
    /// The resulting record, for successful outcomes.
    pub record: Option<AttendanceRecordInfo>,
}

impl From<&WorkerOutcome> for WorkerOutcomeInfo {
    fn from(outcome: &WorkerOutcome) -> Self {
        let (kind, error): (&str, Option<String>) = match &outcome.outcome {
            Outcome::Created => ("created", None),
            Outcome::Updated => ("updated", None),
            Outcome::Reactivated => ("reactivated", None),
            Outcome::Rejected(err) => ("rejected", Some(err.to_string())),
            Outcome::Failed(err) => ("failed", Some(err.to_string())),
        };
        Self {
            worker_id: outcome.worker_id.value(),
            outcome: kind.to_string(),
            error,
            record: outcome.record.as_ref().map(AttendanceRecordInfo::from),
        }
    }
}

/// Outcome counts of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BatchSummaryInfo {
    /// Records created.
    pub created: usize,
    /// Records updated.
    pub updated: usize,
    /// Records reactivated.
    pub reactivated: usize,
    /// Workers rejected.
    pub rejected: usize,
    /// Workers failed.
    pub failed: usize,
    /// Workers processed.
    pub total: usize,
}

impl From<BatchSummary> for BatchSummaryInfo {
    fn from(summary: BatchSummary) -> Self {
        Self {
            created: summary.created,
            updated: summary.updated,
            reactivated: summary.reactivated,
            rejected: summary.rejected,
            failed: summary.failed,
            total: summary.total(),
        }
    }
}

/// API response for an applied batch.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BatchResponse {
    /// The civil day.
    pub date: String,
    /// The operation.
    pub action: String,
    /// The time applied, for entry and exit batches.
    pub time: Option<String>,
    /// Per-worker outcomes in input order.
    pub outcomes: Vec<WorkerOutcomeInfo>,
    /// Outcome counts.
    pub summary: BatchSummaryInfo,
}

impl From<&BatchReport> for BatchResponse {
    fn from(report: &BatchReport) -> Self {
        Self {
            date: date_to_storage(report.date),
            action: report.action.as_str().to_string(),
            time: report.time.map(CivilTime::to_storage),
            outcomes: report.outcomes.iter().map(WorkerOutcomeInfo::from).collect(),
            summary: BatchSummaryInfo::from(report.summary()),
        }
    }
}

/// API response for a worker registration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterWorkerResponse {
    /// The worker.
    pub worker_id: i64,
    /// Whether the worker is active.
    pub active: bool,
    /// A success message.
    pub message: String,
}

/// Converts an absence change into its wire name.
#[must_use]
pub const fn absence_change_name(change: AbsenceChange) -> &'static str {
    match change {
        AbsenceChange::Created => "created",
        AbsenceChange::Tombstoned => "tombstoned",
        AbsenceChange::Unchanged => "unchanged",
    }
}
