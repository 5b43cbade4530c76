// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use jornada::CoreError;
use jornada_domain::DomainError;
use jornada_persistence::PersistenceError;

/// Failures while turning raw request fields into domain values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// A date field is not `YYYY-MM-DD`.
    #[error("invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        /// The field name.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
    /// A time field is not `HH:MM`.
    #[error("invalid time '{value}': expected HH:MM")]
    InvalidTime {
        /// The field name.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
    /// A worker identifier is not positive.
    #[error("worker id must be a positive integer, got {0}")]
    InvalidWorkerId(i64),
    /// A batch action is not one of `entry`, `exit` or `absent`.
    #[error("unknown batch action '{0}': expected entry, exit or absent")]
    UnknownAction(String),
    /// A date range ends before it starts.
    #[error("range end {to} is before range start {from}")]
    InvalidRange {
        /// The range start as given.
        from: String,
        /// The range end as given.
        to: String,
    },
    /// A batch names no workers.
    #[error("at least one worker id is required")]
    EmptyWorkerList,
}

impl InputError {
    /// Returns the request field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidDate { field, .. } | Self::InvalidTime { field, .. } => field,
            Self::InvalidWorkerId(_) => "worker_id",
            Self::UnknownAction(_) => "action",
            Self::InvalidRange { .. } => "to",
            Self::EmptyWorkerList => "worker_ids",
        }
    }
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The request conflicts with the current state of a record.
    Conflict {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { rule, message } => write!(f, "Conflict ({rule}): {message}"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<InputError> for ApiError {
    fn from(err: InputError) -> Self {
        Self::InvalidInput {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidTimeOrder { .. } => ApiError::DomainRuleViolation {
            rule: String::from("exit_after_entry"),
            message: err.to_string(),
        },
        DomainError::InvalidCivilTime(_) => ApiError::InvalidInput {
            field: String::from("time"),
            message: err.to_string(),
        },
        DomainError::InvalidCivilDate(_) => ApiError::InvalidInput {
            field: String::from("date"),
            message: err.to_string(),
        },
        DomainError::InvalidWorkerId(_) => ApiError::InvalidInput {
            field: String::from("worker_id"),
            message: err.to_string(),
        },
        DomainError::InvalidTimezone(_) => ApiError::InvalidInput {
            field: String::from("timezone"),
            message: err.to_string(),
        },
        DomainError::InvalidRecordStatus(_) => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::WorkerNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Worker"),
            message: err.to_string(),
        },
        CoreError::AttendanceNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Attendance record"),
            message: err.to_string(),
        },
        CoreError::FutureDateRejected { .. } => ApiError::DomainRuleViolation {
            rule: String::from("no_future_dates"),
            message: err.to_string(),
        },
        CoreError::InvalidTimeOrder { .. } => ApiError::DomainRuleViolation {
            rule: String::from("exit_after_entry"),
            message: err.to_string(),
        },
        CoreError::ActiveEntryExists { .. } => ApiError::Conflict {
            rule: String::from("one_live_record_per_day"),
            message: err.to_string(),
        },
        CoreError::NoActiveEntry { .. } => ApiError::Conflict {
            rule: String::from("open_entry_required"),
            message: err.to_string(),
        },
        CoreError::NotTombstoned(_) => ApiError::Conflict {
            rule: String::from("reactivate_absent_only"),
            message: err.to_string(),
        },
        CoreError::StoreUnavailable(msg) => ApiError::Internal {
            message: format!("Attendance store unavailable: {msg}"),
        },
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}
