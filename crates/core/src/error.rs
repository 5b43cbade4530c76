// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use jornada_domain::{AttendanceId, CivilTime, DomainError, WorkerId};
use time::Date;

/// Errors raised by the attendance lifecycle.
///
/// Every precondition violation has its own variant. None of them are
/// retried; each is terminal for the operation that raised it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The worker is unknown to the directory or is not active.
    WorkerNotFound(WorkerId),
    /// The operation targets a day after today.
    FutureDateRejected {
        /// The requested day.
        date: Date,
        /// The clock's current day.
        today: Date,
    },
    /// A live record already occupies the worker's day.
    ActiveEntryExists {
        /// The worker.
        worker_id: WorkerId,
        /// The occupied day.
        date: Date,
    },
    /// No record has the given identifier.
    AttendanceNotFound(AttendanceId),
    /// The record is not live, or has no entry time to act on.
    NoActiveEntry {
        /// The worker.
        worker_id: WorkerId,
        /// The day without an open entry.
        date: Date,
    },
    /// Exit would not be strictly later than entry.
    InvalidTimeOrder {
        /// The entry time.
        entry: CivilTime,
        /// The rejected exit time.
        exit: CivilTime,
    },
    /// Reactivation was attempted on a live record.
    NotTombstoned(AttendanceId),
    /// A collaborator (store or directory) failed.
    StoreUnavailable(String),
    /// Any other domain rule was violated.
    DomainViolation(DomainError),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WorkerNotFound(worker_id) => {
                write!(f, "Worker {worker_id} not found or inactive")
            }
            Self::FutureDateRejected { date, today } => {
                write!(f, "Date {date} is in the future (today is {today})")
            }
            Self::ActiveEntryExists { worker_id, date } => {
                write!(
                    f,
                    "Worker {worker_id} already has an active record for {date}"
                )
            }
            Self::AttendanceNotFound(id) => write!(f, "Attendance record {id} not found"),
            Self::NoActiveEntry { worker_id, date } => {
                write!(f, "Worker {worker_id} has no active entry for {date}")
            }
            Self::InvalidTimeOrder { entry, exit } => {
                write!(
                    f,
                    "Exit time {exit} must be later than entry time {entry}"
                )
            }
            Self::NotTombstoned(id) => {
                write!(f, "Attendance record {id} is not marked absent")
            }
            Self::StoreUnavailable(msg) => write!(f, "Store unavailable: {msg}"),
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidTimeOrder { entry, exit } => Self::InvalidTimeOrder { entry, exit },
            other => Self::DomainViolation(other),
        }
    }
}

/// Errors surfaced by `AttendanceStore` and `WorkerDirectory` implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not serve the request.
    Unavailable(String),
    /// A write would leave two live records for one worker-day.
    LiveSlotTaken {
        /// The worker.
        worker_id: WorkerId,
        /// The contested day.
        date: Date,
    },
    /// The record to update does not exist.
    RecordNotFound(AttendanceId),
    /// The patched record would have an exit not later than its entry.
    InvalidTimeOrder {
        /// The stored or patched entry time.
        entry: CivilTime,
        /// The stored or patched exit time.
        exit: CivilTime,
    },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "Store unavailable: {msg}"),
            Self::LiveSlotTaken { worker_id, date } => {
                write!(f, "Live record already exists for worker {worker_id} on {date}")
            }
            Self::RecordNotFound(id) => write!(f, "Record {id} not found"),
            Self::InvalidTimeOrder { entry, exit } => {
                write!(f, "Exit time {exit} is not later than entry time {entry}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => Self::StoreUnavailable(msg),
            StoreError::LiveSlotTaken { worker_id, date } => {
                Self::ActiveEntryExists { worker_id, date }
            }
            StoreError::RecordNotFound(id) => Self::AttendanceNotFound(id),
            StoreError::InvalidTimeOrder { entry, exit } => Self::InvalidTimeOrder { entry, exit },
        }
    }
}
