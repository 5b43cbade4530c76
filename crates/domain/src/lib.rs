// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod civil;
mod clock;
mod error;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use civil::{CivilTime, date_from_storage, date_to_storage};
pub use clock::{Clock, FixedClock, ZonedClock};
pub use error::DomainError;
pub use types::{
    AttendanceId, AttendanceRecord, DayState, NewAttendanceRecord, RecordPatch, RecordStatus,
    WorkedHours, WorkerId,
};
pub use validation::{DerivedTimes, derive_times, is_future_date, validate_time_order};
