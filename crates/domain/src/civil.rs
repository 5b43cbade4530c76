// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Civil (wall-clock) time and date codec.
//!
//! Every boundary that reads or writes an attendance time or date goes
//! through this module:
//!
//! - `CivilTime::parse` accepts caller input (`HH:MM`, `HH:MM:SS`, or an
//!   ISO 8601 date-time whose clock part is taken verbatim)
//! - `CivilTime::to_storage` / `CivilTime::from_storage` are the only
//!   encode/decode pair used by persistence
//! - `date_to_storage` / `date_from_storage` do the same for calendar days
//!
//! ## Invariants
//!
//! - A stored value reads back with exactly the hour and minute written
//! - No zone offset is ever applied; a `Z` or `±HH:MM` suffix in caller
//!   input is accepted and ignored
//! - Seconds are validated then truncated, never rounded

use crate::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{Date, Month, Time};

/// A wall-clock time of day with minute resolution.
///
/// This is what a person reads off a clock in the deployment's local
/// zone. It carries no offset and is never converted between zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilTime {
    hour: u8,
    minute: u8,
}

impl CivilTime {
    /// Creates a new `CivilTime`.
    ///
    /// # Arguments
    ///
    /// * `hour` - Hour of day (0-23)
    /// * `minute` - Minute of hour (0-59)
    ///
    /// # Errors
    ///
    /// Returns an error if either component is out of range.
    pub fn new(hour: u8, minute: u8) -> Result<Self, DomainError> {
        if hour > 23 || minute > 59 {
            return Err(DomainError::InvalidCivilTime(format!(
                "{hour:02}:{minute:02}"
            )));
        }
        Ok(Self { hour, minute })
    }

    /// Builds a `CivilTime` from a `time::Time`, dropping seconds.
    #[must_use]
    pub const fn from_time(value: Time) -> Self {
        Self {
            hour: value.hour(),
            minute: value.minute(),
        }
    }

    /// Converts to a `time::Time` with zero seconds.
    #[must_use]
    pub const fn to_time(self) -> Time {
        match Time::from_hms(self.hour, self.minute, 0) {
            Ok(value) => value,
            // Components are range-checked at construction.
            Err(_) => Time::MIDNIGHT,
        }
    }

    /// Returns the hour component.
    #[must_use]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the minute component.
    #[must_use]
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    /// Returns the number of minutes elapsed since midnight.
    #[must_use]
    pub fn minutes_since_midnight(&self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }

    /// Parses caller-supplied input into a `CivilTime`.
    ///
    /// Accepted forms:
    /// - `HH:MM` (hour may be a single digit)
    /// - `HH:MM:SS`, optionally with a fractional part
    /// - `YYYY-MM-DDTHH:MM[:SS[.fff]]` (only the clock part is used)
    ///
    /// Any form may end in `Z` or a `±HH[:MM]` offset, which is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if no valid hour and minute can be extracted, or if
    /// anything after the minute is not a valid seconds field or offset.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidCivilTime(input.to_string());

        let trimmed: &str = input.trim();
        let clock_part: &str = trimmed.split_once('T').map_or(trimmed, |(_, t)| t);

        let (hour_str, rest): (&str, &str) = split_digits(clock_part);
        let rest: &str = rest.strip_prefix(':').ok_or_else(invalid)?;
        let (minute_str, mut rest): (&str, &str) = split_digits(rest);

        if hour_str.is_empty() || hour_str.len() > 2 || minute_str.len() != 2 {
            return Err(invalid());
        }

        if let Some(after_colon) = rest.strip_prefix(':') {
            let (second_str, after_seconds): (&str, &str) = split_digits(after_colon);
            let second: u8 = second_str.parse().map_err(|_| invalid())?;
            if second_str.len() != 2 || second > 59 {
                return Err(invalid());
            }
            rest = after_seconds;
            if let Some(fraction) = rest.strip_prefix('.') {
                let (digits, after_fraction): (&str, &str) = split_digits(fraction);
                if digits.is_empty() {
                    return Err(invalid());
                }
                rest = after_fraction;
            }
        }

        if !is_offset_suffix(rest) {
            return Err(invalid());
        }

        let hour: u8 = hour_str.parse().map_err(|_| invalid())?;
        let minute: u8 = minute_str.parse().map_err(|_| invalid())?;

        Self::new(hour, minute).map_err(|_| invalid())
    }

    /// Encodes this time for storage as `HH:MM`.
    #[must_use]
    pub fn to_storage(self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }

    /// Decodes a stored `HH:MM` value.
    ///
    /// Storage decoding is strict: anything other than exactly `HH:MM`
    /// indicates corruption rather than user input.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value is malformed.
    pub fn from_storage(stored: &str) -> Result<Self, DomainError> {
        if stored.len() != 5 || stored.as_bytes().get(2) != Some(&b':') {
            return Err(DomainError::InvalidCivilTime(stored.to_string()));
        }
        Self::parse(stored)
    }
}

impl std::fmt::Display for CivilTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl std::str::FromStr for CivilTime {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CivilTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_storage())
    }
}

impl<'de> Deserialize<'de> for CivilTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: String = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Splits `value` after its leading ASCII digits.
fn split_digits(value: &str) -> (&str, &str) {
    let end: usize = value
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(value.len());
    value.split_at(end)
}

/// Returns whether `value` is empty, `Z`, or a `±HH`, `±HHMM` or `±HH:MM` offset.
fn is_offset_suffix(value: &str) -> bool {
    if value.is_empty() || value.eq_ignore_ascii_case("z") {
        return true;
    }
    let Some(offset) = value.strip_prefix('+').or_else(|| value.strip_prefix('-')) else {
        return false;
    };
    let shape_ok: bool = match offset.len() {
        2 | 4 => !offset.contains(':'),
        5 => offset.as_bytes().get(2) == Some(&b':'),
        _ => false,
    };
    shape_ok
        && offset
            .bytes()
            .filter(|b| *b != b':')
            .all(|b| b.is_ascii_digit())
}

/// Encodes a calendar day for storage as `YYYY-MM-DD`.
#[must_use]
pub fn date_to_storage(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Decodes a `YYYY-MM-DD` calendar day.
///
/// This is used both for stored values and for caller input; an ISO 8601
/// date-time is accepted and its date part taken verbatim.
///
/// # Errors
///
/// Returns an error if the value is not a valid calendar date.
pub fn date_from_storage(stored: &str) -> Result<Date, DomainError> {
    let trimmed: &str = stored.trim();
    let date_part: &str = trimmed.split_once('T').map_or(trimmed, |(d, _)| d);

    let mut components = date_part.splitn(3, '-');
    let (Some(year_str), Some(month_str), Some(day_str)) =
        (components.next(), components.next(), components.next())
    else {
        return Err(DomainError::InvalidCivilDate(stored.to_string()));
    };

    if year_str.len() != 4 || month_str.len() != 2 || day_str.len() != 2 {
        return Err(DomainError::InvalidCivilDate(stored.to_string()));
    }

    let invalid = |_: std::num::ParseIntError| DomainError::InvalidCivilDate(stored.to_string());
    let year: i32 = year_str.parse().map_err(invalid)?;
    let month_number: u8 = month_str.parse().map_err(invalid)?;
    let day: u8 = day_str.parse().map_err(invalid)?;

    let month: Month = Month::try_from(month_number)
        .map_err(|_| DomainError::InvalidCivilDate(stored.to_string()))?;

    Date::from_calendar_date(year, month, day)
        .map_err(|_| DomainError::InvalidCivilDate(stored.to_string()))
}
