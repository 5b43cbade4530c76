// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversion to and from domain records.
//!
//! Every date and time column passes through the civil codec in
//! `jornada_domain`; nothing here formats or parses them ad hoc.

use diesel::prelude::*;
use jornada_domain::{
    AttendanceId, AttendanceRecord, CivilTime, NewAttendanceRecord, RecordStatus, WorkedHours,
    WorkerId, date_from_storage, date_to_storage,
};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::diesel_schema::attendance_records;
use crate::error::PersistenceError;

/// Fixed-width UTC timestamp layout, so stored values sort lexically.
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z");

/// Encodes an instant as a fixed-width UTC timestamp.
///
/// # Errors
///
/// Returns an error if the instant cannot be formatted.
pub fn timestamp_to_storage(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .to_offset(UtcOffset::UTC)
        .format(TIMESTAMP_FORMAT)
        .map_err(|e| PersistenceError::CorruptRow(format!("timestamp: {e}")))
}

/// Decodes a stored UTC timestamp.
///
/// # Errors
///
/// Returns an error if the stored value is malformed.
pub fn timestamp_from_storage(stored: &str) -> Result<OffsetDateTime, PersistenceError> {
    PrimitiveDateTime::parse(stored, TIMESTAMP_FORMAT)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| PersistenceError::CorruptRow(format!("timestamp '{stored}': {e}")))
}

fn hours_to_storage(hours: WorkedHours) -> Result<i32, PersistenceError> {
    i32::try_from(hours.hundredths())
        .map_err(|_| PersistenceError::CorruptRow(format!("worked hours {hours} out of range")))
}

fn hours_from_storage(stored: i32) -> Result<WorkedHours, PersistenceError> {
    u32::try_from(stored)
        .map(WorkedHours::from_hundredths)
        .map_err(|_| PersistenceError::CorruptRow(format!("negative worked hours {stored}")))
}

/// A row of `attendance_records`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = attendance_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AttendanceRow {
    pub attendance_id: i64,
    pub worker_id: i64,
    pub work_date: String,
    pub entry_time: Option<String>,
    pub exit_time: Option<String>,
    pub worked_hours_hundredths: Option<i32>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub exit_notes: Option<String>,
    pub status: String,
    pub tombstoned_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl AttendanceRow {
    /// Decodes this row into a domain record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRow` if any column fails to decode.
    pub fn into_record(self) -> Result<AttendanceRecord, PersistenceError> {
        Ok(AttendanceRecord {
            id: AttendanceId::new(self.attendance_id),
            worker_id: WorkerId::new(self.worker_id)?,
            date: date_from_storage(&self.work_date)?,
            entry_time: self
                .entry_time
                .as_deref()
                .map(CivilTime::from_storage)
                .transpose()?,
            exit_time: self
                .exit_time
                .as_deref()
                .map(CivilTime::from_storage)
                .transpose()?,
            worked_hours: self
                .worked_hours_hundredths
                .map(hours_from_storage)
                .transpose()?,
            location: self.location,
            notes: self.notes,
            exit_notes: self.exit_notes,
            status: self.status.parse::<RecordStatus>()?,
            tombstoned_at: self
                .tombstoned_at
                .as_deref()
                .map(timestamp_from_storage)
                .transpose()?,
            created_at: timestamp_from_storage(&self.created_at)?,
            updated_at: timestamp_from_storage(&self.updated_at)?,
        })
    }
}

/// Values for inserting into `attendance_records`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = attendance_records)]
pub struct NewAttendanceRow {
    pub worker_id: i64,
    pub work_date: String,
    pub entry_time: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub tombstoned_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl NewAttendanceRow {
    /// Encodes a new domain record for insertion.
    ///
    /// # Errors
    ///
    /// Returns an error if a timestamp cannot be encoded.
    pub fn from_new(record: &NewAttendanceRecord) -> Result<Self, PersistenceError> {
        let created_at: String = timestamp_to_storage(record.created_at)?;
        Ok(Self {
            worker_id: record.worker_id.value(),
            work_date: date_to_storage(record.date),
            entry_time: record.entry_time.map(CivilTime::to_storage),
            location: record.location.clone(),
            notes: record.notes.clone(),
            status: RecordStatus::Incomplete.as_str().to_string(),
            tombstoned_at: record
                .tombstoned_at
                .map(timestamp_to_storage)
                .transpose()?,
            updated_at: created_at.clone(),
            created_at,
        })
    }
}

/// The mutable columns of `attendance_records`, written as a whole.
///
/// `None` writes `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = attendance_records)]
#[diesel(treat_none_as_null = true)]
pub struct AttendanceChangeset {
    pub entry_time: Option<String>,
    pub exit_time: Option<String>,
    pub worked_hours_hundredths: Option<i32>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub exit_notes: Option<String>,
    pub status: String,
    pub tombstoned_at: Option<String>,
    pub updated_at: String,
}

impl AttendanceChangeset {
    /// Encodes the mutable state of a domain record.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be encoded.
    pub fn from_record(record: &AttendanceRecord) -> Result<Self, PersistenceError> {
        Ok(Self {
            entry_time: record.entry_time.map(CivilTime::to_storage),
            exit_time: record.exit_time.map(CivilTime::to_storage),
            worked_hours_hundredths: record.worked_hours.map(hours_to_storage).transpose()?,
            location: record.location.clone(),
            notes: record.notes.clone(),
            exit_notes: record.exit_notes.clone(),
            status: record.status.as_str().to_string(),
            tombstoned_at: record
                .tombstoned_at
                .map(timestamp_to_storage)
                .transpose()?,
            updated_at: timestamp_to_storage(record.updated_at)?,
        })
    }
}
