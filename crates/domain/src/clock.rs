// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::civil::CivilTime;
use crate::error::DomainError;
use chrono::{Offset, TimeZone};
use chrono_tz::Tz;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

/// Source of "now" for the attendance lifecycle.
///
/// `today` and `current_time` are civil values in the deployment's zone;
/// `now` is an instant used for audit timestamps.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> OffsetDateTime;

    /// The current calendar day in the deployment's zone.
    fn today(&self) -> Date;

    /// The current wall-clock time in the deployment's zone.
    fn current_time(&self) -> CivilTime;
}

/// A clock that reads the system time and projects it into an IANA zone.
#[derive(Debug, Clone, Copy)]
pub struct ZonedClock {
    zone: Tz,
}

impl ZonedClock {
    /// Creates a clock for the given zone.
    #[must_use]
    pub const fn new(zone: Tz) -> Self {
        Self { zone }
    }

    /// Creates a clock from an IANA zone name such as `Europe/Madrid`.
    ///
    /// # Errors
    ///
    /// Returns an error if the zone name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, DomainError> {
        let zone: Tz = name
            .parse()
            .map_err(|_| DomainError::InvalidTimezone(name.to_string()))?;
        Ok(Self { zone })
    }

    /// Returns the configured zone.
    #[must_use]
    pub const fn zone(&self) -> Tz {
        self.zone
    }

    fn local_now(&self) -> OffsetDateTime {
        let utc_now: chrono::DateTime<chrono::Utc> = chrono::Utc::now();
        let offset_seconds: i32 = self
            .zone
            .offset_from_utc_datetime(&utc_now.naive_utc())
            .fix()
            .local_minus_utc();
        let offset: UtcOffset =
            UtcOffset::from_whole_seconds(offset_seconds).unwrap_or(UtcOffset::UTC);
        OffsetDateTime::now_utc().to_offset(offset)
    }
}

impl Clock for ZonedClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    fn today(&self) -> Date {
        self.local_now().date()
    }

    fn current_time(&self) -> CivilTime {
        CivilTime::from_time(self.local_now().time())
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    instant: OffsetDateTime,
}

impl FixedClock {
    /// Creates a clock frozen at the given civil day and time.
    #[must_use]
    pub const fn at(date: Date, time: Time) -> Self {
        Self {
            instant: PrimitiveDateTime::new(date, time).assume_utc(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.instant
    }

    fn today(&self) -> Date {
        self.instant.date()
    }

    fn current_time(&self) -> CivilTime {
        CivilTime::from_time(self.instant.time())
    }
}
