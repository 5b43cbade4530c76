// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use jornada::StoreError;
use jornada_domain::{AttendanceId, CivilTime, DomainError, WorkerId};
use time::Date;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// A stored row could not be decoded into a domain value.
    CorruptRow(String),
    /// The live slot for a worker-day is already occupied.
    LiveSlotTaken {
        /// The worker.
        worker_id: WorkerId,
        /// The day.
        date: Date,
    },
    /// A write would leave a record whose exit is not after its entry.
    InvalidTimeOrder {
        /// The entry time.
        entry: CivilTime,
        /// The exit time.
        exit: CivilTime,
    },
    /// The requested attendance record was not found.
    RecordNotFound(AttendanceId),
    /// The requested resource was not found.
    NotFound(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::CorruptRow(msg) => write!(f, "Corrupt row: {msg}"),
            Self::LiveSlotTaken { worker_id, date } => {
                write!(
                    f,
                    "Live attendance record already exists for worker {worker_id} on {date}"
                )
            }
            Self::InvalidTimeOrder { entry, exit } => {
                write!(f, "Exit time {exit} is not later than entry time {entry}")
            }
            Self::RecordNotFound(id) => write!(f, "Attendance record not found: {id}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidTimeOrder { entry, exit } => Self::InvalidTimeOrder { entry, exit },
            other => Self::CorruptRow(other.to_string()),
        }
    }
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::LiveSlotTaken { worker_id, date } => {
                Self::LiveSlotTaken { worker_id, date }
            }
            PersistenceError::InvalidTimeOrder { entry, exit } => {
                Self::InvalidTimeOrder { entry, exit }
            }
            PersistenceError::RecordNotFound(id) => Self::RecordNotFound(id),
            other => Self::Unavailable(other.to_string()),
        }
    }
}
