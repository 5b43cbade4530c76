// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::civil::CivilTime;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Exit time is not strictly later than entry time.
    InvalidTimeOrder {
        /// The recorded entry time.
        entry: CivilTime,
        /// The rejected exit time.
        exit: CivilTime,
    },
    /// A wall-clock time string could not be parsed.
    InvalidCivilTime(String),
    /// A calendar date string could not be parsed.
    InvalidCivilDate(String),
    /// A worker identifier is not a positive integer.
    InvalidWorkerId(String),
    /// A stored record status is not recognized.
    InvalidRecordStatus(String),
    /// The configured timezone is not a known IANA zone.
    InvalidTimezone(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimeOrder { entry, exit } => {
                write!(
                    f,
                    "Exit time {exit} must be later than entry time {entry}"
                )
            }
            Self::InvalidCivilTime(value) => {
                write!(f, "Invalid time '{value}': expected HH:MM")
            }
            Self::InvalidCivilDate(value) => {
                write!(f, "Invalid date '{value}': expected YYYY-MM-DD")
            }
            Self::InvalidWorkerId(value) => write!(f, "Invalid worker id: {value}"),
            Self::InvalidRecordStatus(value) => write!(f, "Invalid record status: {value}"),
            Self::InvalidTimezone(value) => write!(f, "Invalid timezone: {value}"),
        }
    }
}

impl std::error::Error for DomainError {}
