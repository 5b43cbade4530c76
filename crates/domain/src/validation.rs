// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::civil::CivilTime;
use crate::error::DomainError;
use crate::types::{RecordStatus, WorkedHours};
use time::Date;

/// Validates that an exit time is strictly later than an entry time.
///
/// Both times belong to the same civil day; shifts crossing midnight are
/// not representable.
///
/// # Arguments
///
/// * `entry` - The entry time
/// * `exit` - The exit time
///
/// # Errors
///
/// Returns `DomainError::InvalidTimeOrder` if `exit <= entry`.
pub fn validate_time_order(entry: CivilTime, exit: CivilTime) -> Result<(), DomainError> {
    if exit <= entry {
        return Err(DomainError::InvalidTimeOrder { entry, exit });
    }
    Ok(())
}

/// Returns whether `date` lies after `today`.
#[must_use]
pub fn is_future_date(date: Date, today: Date) -> bool {
    date > today
}

/// The derived fields that follow from a pair of time values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedTimes {
    /// Worked hours, present only when both times are.
    pub worked_hours: Option<WorkedHours>,
    /// Completion status.
    pub status: RecordStatus,
}

/// Validates a pair of optional times and derives the cached fields.
///
/// # Arguments
///
/// * `entry` - Entry time after the change
/// * `exit` - Exit time after the change
///
/// # Errors
///
/// Returns `DomainError::InvalidTimeOrder` if both are present and out of order.
pub fn derive_times(
    entry: Option<CivilTime>,
    exit: Option<CivilTime>,
) -> Result<DerivedTimes, DomainError> {
    let worked_hours: Option<WorkedHours> = match (entry, exit) {
        (Some(entry), Some(exit)) => {
            validate_time_order(entry, exit)?;
            WorkedHours::between(entry, exit)
        }
        _ => None,
    };

    Ok(DerivedTimes {
        worked_hours,
        status: RecordStatus::for_times(entry, exit),
    })
}
