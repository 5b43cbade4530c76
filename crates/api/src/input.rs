// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Parsing of raw request fields into domain values.

use crate::error::InputError;
use jornada::BatchAction;
use jornada_domain::{CivilTime, WorkerId, date_from_storage, date_to_storage};
use time::Date;

/// Parses a `YYYY-MM-DD` date field.
///
/// # Errors
///
/// Returns an error if the value is not a calendar date.
pub fn parse_date(field: &'static str, value: &str) -> Result<Date, InputError> {
    date_from_storage(value).map_err(|_| InputError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Parses an `HH:MM` time field.
///
/// # Errors
///
/// Returns an error if the value is not a wall-clock time.
pub fn parse_time(field: &'static str, value: &str) -> Result<CivilTime, InputError> {
    CivilTime::parse(value).map_err(|_| InputError::InvalidTime {
        field,
        value: value.to_string(),
    })
}

/// Parses an optional time field; absent means "now" to the caller.
///
/// # Errors
///
/// Returns an error if a value is present and malformed.
pub fn parse_optional_time(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<CivilTime>, InputError> {
    value.map(|raw| parse_time(field, raw)).transpose()
}

/// Validates a raw worker identifier.
///
/// # Errors
///
/// Returns an error if the identifier is not positive.
pub fn parse_worker_id(value: i64) -> Result<WorkerId, InputError> {
    WorkerId::new(value).map_err(|_| InputError::InvalidWorkerId(value))
}

/// Validates a list of worker identifiers, keeping caller order.
///
/// # Errors
///
/// Returns an error if the list is empty or any identifier is invalid.
pub fn parse_worker_ids(values: &[i64]) -> Result<Vec<WorkerId>, InputError> {
    if values.is_empty() {
        return Err(InputError::EmptyWorkerList);
    }
    values.iter().copied().map(parse_worker_id).collect()
}

/// Parses a batch action name.
///
/// # Errors
///
/// Returns an error if the name is not a known action.
pub fn parse_action(value: &str) -> Result<BatchAction, InputError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "entry" => Ok(BatchAction::Entry),
        "exit" => Ok(BatchAction::Exit),
        "absent" => Ok(BatchAction::Absent),
        _ => Err(InputError::UnknownAction(value.to_string())),
    }
}

/// Parses an inclusive date range.
///
/// # Errors
///
/// Returns an error if either bound is malformed or the range is reversed.
pub fn parse_range(from: &str, to: &str) -> Result<(Date, Date), InputError> {
    let start: Date = parse_date("from", from)?;
    let end: Date = parse_date("to", to)?;
    if end < start {
        return Err(InputError::InvalidRange {
            from: from.to_string(),
            to: to.to_string(),
        });
    }
    Ok((start, end))
}

/// Parses an inclusive date range whose missing bounds default to `today`.
///
/// # Errors
///
/// Returns an error if a given bound is malformed or the range is reversed.
pub fn parse_range_or_today(
    from: Option<&str>,
    to: Option<&str>,
    today: Date,
) -> Result<(Date, Date), InputError> {
    let start: Date = from
        .map(|value| parse_date("from", value))
        .transpose()?
        .unwrap_or(today);
    let end: Date = to
        .map(|value| parse_date("to", value))
        .transpose()?
        .unwrap_or(today);
    if end < start {
        return Err(InputError::InvalidRange {
            from: date_to_storage(start),
            to: date_to_storage(end),
        });
    }
    Ok((start, end))
}
