// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attendance record writes.
//!
//! The partial unique index `idx_attendance_live_slot` is what keeps a
//! worker-day to a single live record. Any write that trips it is reported
//! as `PersistenceError::LiveSlotTaken`, whatever the caller checked first.
//!
//! Updates take the write lock before reading the row, then re-derive worked
//! hours and status from the patched times. A time-order violation is
//! reported as `PersistenceError::InvalidTimeOrder`; the table's `CHECK`
//! constraint backs this up for writers that bypass this module.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use jornada_domain::{AttendanceId, AttendanceRecord, NewAttendanceRecord, RecordPatch, WorkerId};
use time::Date;
use tracing::{debug, warn};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{AttendanceChangeset, NewAttendanceRow};
use crate::diesel_schema::attendance_records;
use crate::error::PersistenceError;
use crate::queries::attendance::find_by_id;

fn map_write_error(err: DieselError, worker_id: WorkerId, date: Date) -> PersistenceError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            warn!(
                worker_id = worker_id.value(),
                %date,
                "Rejected write into occupied live slot"
            );
            PersistenceError::LiveSlotTaken { worker_id, date }
        }
        other => other.into(),
    }
}

/// Inserts a record and returns it as stored.
///
/// # Errors
///
/// Returns `PersistenceError::LiveSlotTaken` if the record is live and the
/// worker-day already has a live record, or another error if the write fails.
pub fn insert_record(
    conn: &mut SqliteConnection,
    record: &NewAttendanceRecord,
) -> Result<AttendanceRecord, PersistenceError> {
    let row: NewAttendanceRow = NewAttendanceRow::from_new(record)?;

    conn.transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(attendance_records::table)
            .values(&row)
            .execute(conn)
            .map_err(|e| map_write_error(e, record.worker_id, record.date))?;

        let id: AttendanceId = AttendanceId::new(get_last_insert_rowid(conn)?);
        debug!(attendance_id = id.value(), "Inserted attendance record");

        find_by_id(conn, id)?.ok_or(PersistenceError::RecordNotFound(id))
    })
}

/// Applies a patch to a record and returns it as stored.
///
/// The current row is read, patched and written back in one immediate
/// transaction, so no other writer can change it in between.
///
/// # Errors
///
/// Returns `PersistenceError::RecordNotFound` if the record does not exist,
/// `PersistenceError::InvalidTimeOrder` if the patched exit would not be
/// after the stored or patched entry, `PersistenceError::LiveSlotTaken` if
/// the patch would revive a record into an occupied worker-day, or another
/// error if the write fails.
pub fn update_record(
    conn: &mut SqliteConnection,
    id: AttendanceId,
    patch: &RecordPatch,
) -> Result<AttendanceRecord, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let mut record: AttendanceRecord =
            find_by_id(conn, id)?.ok_or(PersistenceError::RecordNotFound(id))?;
        patch.apply_to(&mut record).inspect_err(|err| {
            debug!(attendance_id = id.value(), error = %err, "Rejected patch");
        })?;

        let changeset: AttendanceChangeset = AttendanceChangeset::from_record(&record)?;
        diesel::update(attendance_records::table.find(id.value()))
            .set(&changeset)
            .execute(conn)
            .map_err(|e| map_write_error(e, record.worker_id, record.date))?;

        debug!(attendance_id = id.value(), "Updated attendance record");
        find_by_id(conn, id)?.ok_or(PersistenceError::RecordNotFound(id))
    })
}
