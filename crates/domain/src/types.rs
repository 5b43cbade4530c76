// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::civil::CivilTime;
use crate::error::DomainError;
use crate::validation::{DerivedTimes, derive_times};
use serde::{Deserialize, Serialize, Serializer};
use std::str::FromStr;
use time::{Date, OffsetDateTime};

/// Identifies a worker owned by the external worker directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(i64);

impl WorkerId {
    /// Creates a new `WorkerId`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not positive.
    pub fn new(value: i64) -> Result<Self, DomainError> {
        if value <= 0 {
            return Err(DomainError::InvalidWorkerId(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies an attendance record.
///
/// Assigned by the store at creation and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendanceId(i64);

impl AttendanceId {
    /// Wraps a store-assigned identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for AttendanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Completion status of an attendance record.
///
/// A record is `Complete` exactly when both entry and exit are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Entry recorded (or no times at all), exit missing.
    #[default]
    Incomplete,
    /// Both entry and exit recorded.
    Complete,
}

impl RecordStatus {
    /// Derives the status from the time fields.
    #[must_use]
    pub const fn for_times(entry: Option<CivilTime>, exit: Option<CivilTime>) -> Self {
        if entry.is_some() && exit.is_some() {
            Self::Complete
        } else {
            Self::Incomplete
        }
    }

    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::Complete => "complete",
        }
    }
}

impl FromStr for RecordStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incomplete" => Ok(Self::Incomplete),
            "complete" => Ok(Self::Complete),
            _ => Err(DomainError::InvalidRecordStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The state of one worker's day, as seen by the lifecycle.
///
/// `NoRecord` is never persisted; it is the absence of any record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayState {
    /// No record exists for the worker and day.
    NoRecord,
    /// A live record with an entry but no exit.
    Incomplete,
    /// A live record with both entry and exit.
    Complete,
    /// The day's record is tombstoned.
    Absent,
}

impl DayState {
    /// Converts this state to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoRecord => "no_record",
            Self::Incomplete => "incomplete",
            Self::Complete => "complete",
            Self::Absent => "absent",
        }
    }
}

impl std::fmt::Display for DayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Hours worked, held as whole hundredths of an hour.
///
/// Rounding happens once, when the value is computed from two civil
/// times, so the cached figure is exact from then on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct WorkedHours {
    hundredths: u32,
}

impl WorkedHours {
    /// Computes the hours between entry and exit, rounded to 2 decimals.
    ///
    /// Returns `None` when exit is not strictly later than entry.
    #[must_use]
    pub fn between(entry: CivilTime, exit: CivilTime) -> Option<Self> {
        let entry_minutes: u32 = u32::from(entry.minutes_since_midnight());
        let exit_minutes: u32 = u32::from(exit.minutes_since_midnight());
        if exit_minutes <= entry_minutes {
            return None;
        }
        let minutes: u32 = exit_minutes - entry_minutes;
        // Half-up rounding of minutes / 60 to two decimals.
        Some(Self {
            hundredths: (minutes * 100 + 30) / 60,
        })
    }

    /// Wraps a stored hundredths value.
    #[must_use]
    pub const fn from_hundredths(hundredths: u32) -> Self {
        Self { hundredths }
    }

    /// Returns the value in hundredths of an hour.
    #[must_use]
    pub const fn hundredths(&self) -> u32 {
        self.hundredths
    }

    /// Returns the value in hours.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        f64::from(self.hundredths) / 100.0
    }
}

impl std::ops::Add for WorkedHours {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            hundredths: self.hundredths.saturating_add(rhs.hundredths),
        }
    }
}

impl std::iter::Sum for WorkedHours {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, h| acc + h)
    }
}

impl std::fmt::Display for WorkedHours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.hundredths / 100, self.hundredths % 100)
    }
}

impl Serialize for WorkedHours {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

/// One worker's attendance for one calendar day.
///
/// At most one live (non-tombstoned) record exists per `(worker_id, date)`.
/// A tombstoned record also means "marked absent" for that day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    /// Store-assigned identifier.
    pub id: AttendanceId,
    /// The worker this record belongs to.
    pub worker_id: WorkerId,
    /// The calendar day this record covers.
    pub date: Date,
    /// Wall-clock entry time, once clocked in.
    pub entry_time: Option<CivilTime>,
    /// Wall-clock exit time, once clocked out.
    pub exit_time: Option<CivilTime>,
    /// Cached `exit_time - entry_time`; not authoritative.
    pub worked_hours: Option<WorkedHours>,
    /// Free-form location recorded with the entry.
    pub location: Option<String>,
    /// Free-form notes recorded with the entry.
    pub notes: Option<String>,
    /// Free-form notes recorded with the exit.
    pub exit_notes: Option<String>,
    /// Completion status.
    pub status: RecordStatus,
    /// When the record was tombstoned (marked absent), if it is.
    pub tombstoned_at: Option<OffsetDateTime>,
    /// Creation timestamp.
    pub created_at: OffsetDateTime,
    /// Last modification timestamp.
    pub updated_at: OffsetDateTime,
}

impl AttendanceRecord {
    /// Returns whether this record is live (not tombstoned).
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.tombstoned_at.is_none()
    }

    /// Returns the day state this record represents.
    #[must_use]
    pub const fn day_state(&self) -> DayState {
        if self.tombstoned_at.is_some() {
            return DayState::Absent;
        }
        match self.status {
            RecordStatus::Incomplete => DayState::Incomplete,
            RecordStatus::Complete => DayState::Complete,
        }
    }
}

/// Field values for a record about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendanceRecord {
    /// The worker this record belongs to.
    pub worker_id: WorkerId,
    /// The calendar day this record covers.
    pub date: Date,
    /// Wall-clock entry time, if any.
    pub entry_time: Option<CivilTime>,
    /// Free-form location.
    pub location: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Set when the record is created already tombstoned (absence shell).
    pub tombstoned_at: Option<OffsetDateTime>,
    /// Creation timestamp; also used as the initial `updated_at`.
    pub created_at: OffsetDateTime,
}

impl NewAttendanceRecord {
    /// Builds a live record opened with an entry time.
    #[must_use]
    pub const fn entry(
        worker_id: WorkerId,
        date: Date,
        entry_time: CivilTime,
        location: Option<String>,
        notes: Option<String>,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            worker_id,
            date,
            entry_time: Some(entry_time),
            location,
            notes,
            tombstoned_at: None,
            created_at,
        }
    }

    /// Builds a tombstoned shell with no times, used to mark absence
    /// on a day that had no record.
    #[must_use]
    pub const fn absence_shell(worker_id: WorkerId, date: Date, created_at: OffsetDateTime) -> Self {
        Self {
            worker_id,
            date,
            entry_time: None,
            location: None,
            notes: None,
            tombstoned_at: Some(created_at),
            created_at,
        }
    }

    /// Materializes the record with its assigned identifier.
    #[must_use]
    pub fn into_record(self, id: AttendanceId) -> AttendanceRecord {
        AttendanceRecord {
            id,
            worker_id: self.worker_id,
            date: self.date,
            entry_time: self.entry_time,
            exit_time: None,
            worked_hours: None,
            location: self.location,
            notes: self.notes,
            exit_notes: None,
            status: RecordStatus::Incomplete,
            tombstoned_at: self.tombstoned_at,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// A partial update to an attendance record.
///
/// Outer `None` leaves a field untouched; `Some(None)` clears it.
/// `updated_at` is always written. Worked hours and status are not part of
/// a patch: they are re-derived from the patched times by `apply_to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPatch {
    /// New entry time.
    pub entry_time: Option<Option<CivilTime>>,
    /// New exit time.
    pub exit_time: Option<Option<CivilTime>>,
    /// New location.
    pub location: Option<Option<String>>,
    /// New entry notes.
    pub notes: Option<Option<String>>,
    /// New exit notes.
    pub exit_notes: Option<Option<String>>,
    /// New tombstone marker.
    pub tombstoned_at: Option<Option<OffsetDateTime>>,
    /// Modification timestamp.
    pub updated_at: OffsetDateTime,
}

impl RecordPatch {
    /// Creates a patch that only touches `updated_at`.
    #[must_use]
    pub const fn touched(updated_at: OffsetDateTime) -> Self {
        Self {
            entry_time: None,
            exit_time: None,
            location: None,
            notes: None,
            exit_notes: None,
            tombstoned_at: None,
            updated_at,
        }
    }

    /// Applies this patch to a record in place and re-derives worked hours
    /// and status from the resulting times.
    ///
    /// Stores call this on the current stored record inside their write
    /// transaction, so the time order is checked against what is actually
    /// persisted rather than against an earlier read.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimeOrder` if the patched record would
    /// have an exit that is not later than its entry. The record is left
    /// unchanged in that case.
    pub fn apply_to(&self, record: &mut AttendanceRecord) -> Result<(), DomainError> {
        let entry_time: Option<CivilTime> = self.entry_time.unwrap_or(record.entry_time);
        let exit_time: Option<CivilTime> = self.exit_time.unwrap_or(record.exit_time);
        let derived: DerivedTimes = derive_times(entry_time, exit_time)?;

        record.entry_time = entry_time;
        record.exit_time = exit_time;
        record.worked_hours = derived.worked_hours;
        record.status = derived.status;
        if let Some(location) = &self.location {
            record.location.clone_from(location);
        }
        if let Some(notes) = &self.notes {
            record.notes.clone_from(notes);
        }
        if let Some(exit_notes) = &self.exit_notes {
            record.exit_notes.clone_from(exit_notes);
        }
        if let Some(tombstoned_at) = self.tombstoned_at {
            record.tombstoned_at = tombstoned_at;
        }
        record.updated_at = self.updated_at;
        Ok(())
    }
}
