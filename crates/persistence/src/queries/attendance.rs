// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attendance record lookups.

use diesel::SqliteConnection;
use diesel::prelude::*;
use jornada_domain::{AttendanceId, AttendanceRecord, WorkerId, date_to_storage};
use time::Date;
use tracing::debug;

use crate::data_models::AttendanceRow;
use crate::diesel_schema::attendance_records;
use crate::error::PersistenceError;

fn decode_all(rows: Vec<AttendanceRow>) -> Result<Vec<AttendanceRecord>, PersistenceError> {
    rows.into_iter().map(AttendanceRow::into_record).collect()
}

/// Finds the live record for a worker-day.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn find_live(
    conn: &mut SqliteConnection,
    worker_id: WorkerId,
    date: Date,
) -> Result<Option<AttendanceRecord>, PersistenceError> {
    let row: Option<AttendanceRow> = attendance_records::table
        .filter(attendance_records::worker_id.eq(worker_id.value()))
        .filter(attendance_records::work_date.eq(date_to_storage(date)))
        .filter(attendance_records::tombstoned_at.is_null())
        .select(AttendanceRow::as_select())
        .first(conn)
        .optional()?;

    row.map(AttendanceRow::into_record).transpose()
}

/// Finds the most recently updated record for a worker-day, including
/// tombstoned records.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn find_any(
    conn: &mut SqliteConnection,
    worker_id: WorkerId,
    date: Date,
) -> Result<Option<AttendanceRecord>, PersistenceError> {
    let row: Option<AttendanceRow> = attendance_records::table
        .filter(attendance_records::worker_id.eq(worker_id.value()))
        .filter(attendance_records::work_date.eq(date_to_storage(date)))
        .order((
            attendance_records::updated_at.desc(),
            attendance_records::attendance_id.desc(),
        ))
        .select(AttendanceRow::as_select())
        .first(conn)
        .optional()?;

    row.map(AttendanceRow::into_record).transpose()
}

/// Finds a record by identifier.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn find_by_id(
    conn: &mut SqliteConnection,
    id: AttendanceId,
) -> Result<Option<AttendanceRecord>, PersistenceError> {
    debug!(attendance_id = id.value(), "Looking up attendance record");

    let row: Option<AttendanceRow> = attendance_records::table
        .find(id.value())
        .select(AttendanceRow::as_select())
        .first(conn)
        .optional()?;

    row.map(AttendanceRow::into_record).transpose()
}

/// Lists every record for a day ordered by worker, tombstoned included.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_by_date(
    conn: &mut SqliteConnection,
    date: Date,
) -> Result<Vec<AttendanceRecord>, PersistenceError> {
    let rows: Vec<AttendanceRow> = attendance_records::table
        .filter(attendance_records::work_date.eq(date_to_storage(date)))
        .order((
            attendance_records::worker_id.asc(),
            attendance_records::attendance_id.asc(),
        ))
        .select(AttendanceRow::as_select())
        .load(conn)?;

    decode_all(rows)
}

/// Lists a worker's records within an inclusive date range.
///
/// Stored dates are zero-padded `YYYY-MM-DD`, so text comparison matches
/// calendar order.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_for_worker(
    conn: &mut SqliteConnection,
    worker_id: WorkerId,
    from: Date,
    to: Date,
) -> Result<Vec<AttendanceRecord>, PersistenceError> {
    let rows: Vec<AttendanceRow> = attendance_records::table
        .filter(attendance_records::worker_id.eq(worker_id.value()))
        .filter(attendance_records::work_date.ge(date_to_storage(from)))
        .filter(attendance_records::work_date.le(date_to_storage(to)))
        .order((
            attendance_records::work_date.asc(),
            attendance_records::attendance_id.asc(),
        ))
        .select(AttendanceRow::as_select())
        .load(conn)?;

    decode_all(rows)
}
