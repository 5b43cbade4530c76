// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_persistence, march, stamp, t, worker};
use crate::Persistence;
use jornada::{AttendanceStore, StoreError, WorkerDirectory};
use diesel::RunQueryDsl;
use jornada_domain::{AttendanceId, AttendanceRecord, NewAttendanceRecord, RecordPatch, RecordStatus};
use time::Duration;

fn open_entry(persistence: &Persistence, worker_id: i64, day: u8) -> AttendanceRecord {
    persistence
        .insert(NewAttendanceRecord::entry(
            worker(worker_id),
            march(day),
            t(7, 0),
            Some(String::from("Orchard")),
            Some(String::from("pruning")),
            stamp(),
        ))
        .unwrap()
}

// ============================================================================
// Insert and lookup
// ============================================================================

#[test]
fn test_insert_assigns_identifier_and_defaults() {
    let persistence: Persistence = create_test_persistence();
    let record: AttendanceRecord = open_entry(&persistence, 1, 10);

    assert!(record.id.value() > 0);
    assert_eq!(record.status, RecordStatus::Incomplete);
    assert_eq!(record.location.as_deref(), Some("Orchard"));
    assert_eq!(record.notes.as_deref(), Some("pruning"));
    assert!(record.exit_time.is_none());
    assert!(record.is_live());
    assert_eq!(record.created_at, stamp());
    assert_eq!(record.updated_at, stamp());
}

#[test]
fn test_find_live_ignores_tombstoned() {
    let persistence: Persistence = create_test_persistence();
    persistence
        .insert(NewAttendanceRecord::absence_shell(
            worker(1),
            march(10),
            stamp(),
        ))
        .unwrap();

    assert!(persistence.find_live(worker(1), march(10)).unwrap().is_none());
    assert!(persistence.find_any(worker(1), march(10)).unwrap().is_some());
}

#[test]
fn test_find_by_id_unknown() {
    let persistence: Persistence = create_test_persistence();
    assert!(
        persistence
            .find_by_id(AttendanceId::new(999))
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_find_any_prefers_most_recent() {
    let persistence: Persistence = create_test_persistence();
    let first: AttendanceRecord = open_entry(&persistence, 1, 10);

    let mut tombstone: RecordPatch = RecordPatch::touched(stamp() + Duration::minutes(5));
    tombstone.tombstoned_at = Some(Some(stamp() + Duration::minutes(5)));
    persistence.update(first.id, tombstone).unwrap();

    let second: AttendanceRecord = persistence
        .insert(NewAttendanceRecord::absence_shell(
            worker(1),
            march(10),
            stamp() + Duration::minutes(10),
        ))
        .unwrap();

    let found: AttendanceRecord = persistence.find_any(worker(1), march(10)).unwrap().unwrap();
    assert_eq!(found.id, second.id);
}

// ============================================================================
// Live slot constraint
// ============================================================================

#[test]
fn test_second_live_insert_is_rejected() {
    let persistence: Persistence = create_test_persistence();
    open_entry(&persistence, 1, 10);

    let result: Result<AttendanceRecord, StoreError> =
        persistence.insert(NewAttendanceRecord::entry(
            worker(1),
            march(10),
            t(8, 0),
            None,
            None,
            stamp(),
        ));
    assert_eq!(
        result,
        Err(StoreError::LiveSlotTaken {
            worker_id: worker(1),
            date: march(10),
        })
    );
}

#[test]
fn test_live_slot_is_per_worker_and_day() {
    let persistence: Persistence = create_test_persistence();
    open_entry(&persistence, 1, 10);
    open_entry(&persistence, 2, 10);
    open_entry(&persistence, 1, 11);

    assert_eq!(persistence.list_by_date(march(10)).unwrap().len(), 2);
}

#[test]
fn test_tombstoned_records_do_not_occupy_slot() {
    let persistence: Persistence = create_test_persistence();
    persistence
        .insert(NewAttendanceRecord::absence_shell(
            worker(1),
            march(10),
            stamp(),
        ))
        .unwrap();
    persistence
        .insert(NewAttendanceRecord::absence_shell(
            worker(1),
            march(10),
            stamp(),
        ))
        .unwrap();

    let live: AttendanceRecord = open_entry(&persistence, 1, 10);
    assert!(live.is_live());
}

#[test]
fn test_reviving_into_occupied_slot_is_rejected() {
    let persistence: Persistence = create_test_persistence();
    let shell: AttendanceRecord = persistence
        .insert(NewAttendanceRecord::absence_shell(
            worker(1),
            march(10),
            stamp(),
        ))
        .unwrap();
    open_entry(&persistence, 1, 10);

    let mut revive: RecordPatch = RecordPatch::touched(stamp());
    revive.tombstoned_at = Some(None);
    let result: Result<AttendanceRecord, StoreError> = persistence.update(shell.id, revive);

    assert!(matches!(result, Err(StoreError::LiveSlotTaken { .. })));
    let unchanged: AttendanceRecord = persistence.find_by_id(shell.id).unwrap().unwrap();
    assert!(!unchanged.is_live());
}

#[test]
fn test_insert_for_unregistered_worker_fails() {
    let persistence: Persistence = create_test_persistence();
    let result: Result<AttendanceRecord, StoreError> =
        persistence.insert(NewAttendanceRecord::entry(
            worker(404),
            march(10),
            t(7, 0),
            None,
            None,
            stamp(),
        ));
    assert!(matches!(result, Err(StoreError::Unavailable(_))));
}

// ============================================================================
// Updates
// ============================================================================

#[test]
fn test_update_writes_and_clears_columns() {
    let persistence: Persistence = create_test_persistence();
    let record: AttendanceRecord = open_entry(&persistence, 3, 10);

    let mut complete: RecordPatch = RecordPatch::touched(stamp() + Duration::hours(9));
    complete.exit_time = Some(Some(t(16, 0)));
    complete.exit_notes = Some(Some(String::from("done")));
    let updated: AttendanceRecord = persistence.update(record.id, complete).unwrap();

    assert_eq!(updated.exit_time, Some(t(16, 0)));
    assert_eq!(updated.worked_hours.unwrap().hundredths(), 900);
    assert_eq!(updated.status, RecordStatus::Complete);
    assert_eq!(updated.exit_notes.as_deref(), Some("done"));
    assert_eq!(updated.updated_at, stamp() + Duration::hours(9));
    assert_eq!(updated.created_at, stamp());

    let mut clear: RecordPatch = RecordPatch::touched(stamp() + Duration::hours(10));
    clear.exit_time = Some(None);
    clear.exit_notes = Some(None);
    clear.location = Some(None);
    let cleared: AttendanceRecord = persistence.update(record.id, clear).unwrap();

    assert!(cleared.exit_time.is_none());
    assert!(cleared.worked_hours.is_none());
    assert_eq!(cleared.status, RecordStatus::Incomplete);
    assert!(cleared.exit_notes.is_none());
    assert!(cleared.location.is_none());
    assert_eq!(cleared.notes.as_deref(), Some("pruning"));
}

#[test]
fn test_update_rechecks_time_order_against_stored_row() {
    let persistence: Persistence = create_test_persistence();
    let record: AttendanceRecord = open_entry(&persistence, 3, 10);

    let mut exit: RecordPatch = RecordPatch::touched(stamp() + Duration::hours(5));
    exit.exit_time = Some(Some(t(12, 0)));
    let complete: AttendanceRecord = persistence.update(record.id, exit).unwrap();

    let mut late_entry: RecordPatch = RecordPatch::touched(stamp() + Duration::hours(6));
    late_entry.entry_time = Some(Some(t(12, 0)));
    late_entry.notes = Some(Some(String::from("moved")));
    let result: Result<AttendanceRecord, StoreError> = persistence.update(record.id, late_entry);

    assert_eq!(
        result,
        Err(StoreError::InvalidTimeOrder {
            entry: t(12, 0),
            exit: t(12, 0),
        })
    );
    let stored: AttendanceRecord = persistence.find_by_id(record.id).unwrap().unwrap();
    assert_eq!(stored, complete);
}

#[test]
fn test_table_rejects_exit_before_entry() {
    let persistence: Persistence = create_test_persistence();
    let record: AttendanceRecord = open_entry(&persistence, 3, 10);

    let result: Result<usize, diesel::result::Error> = persistence
        .with_conn(|conn| {
            Ok(diesel::sql_query(
                "UPDATE attendance_records SET exit_time = '06:30' WHERE attendance_id = ?",
            )
            .bind::<diesel::sql_types::BigInt, _>(record.id.value())
            .execute(conn))
        })
        .unwrap();

    assert!(result.is_err());
    let stored: AttendanceRecord = persistence.find_by_id(record.id).unwrap().unwrap();
    assert!(stored.exit_time.is_none());
}

#[test]
fn test_update_unknown_record() {
    let persistence: Persistence = create_test_persistence();
    let result: Result<AttendanceRecord, StoreError> =
        persistence.update(AttendanceId::new(12), RecordPatch::touched(stamp()));
    assert_eq!(result, Err(StoreError::RecordNotFound(AttendanceId::new(12))));
}

// ============================================================================
// Listings
// ============================================================================

#[test]
fn test_list_for_worker_range_is_inclusive_and_ordered() {
    let persistence: Persistence = create_test_persistence();
    for day in [12, 3, 10, 11, 20] {
        open_entry(&persistence, 4, day);
    }
    open_entry(&persistence, 5, 11);

    let records: Vec<AttendanceRecord> = persistence
        .list_for_worker(worker(4), march(10), march(12))
        .unwrap();
    let days: Vec<u8> = records.iter().map(|r| r.date.day()).collect();
    assert_eq!(days, vec![10, 11, 12]);
}

// ============================================================================
// Worker directory
// ============================================================================

#[test]
fn test_worker_directory() {
    let persistence: Persistence = create_test_persistence();
    persistence.register_worker(worker(9), false).unwrap();

    assert!(persistence.exists(worker(1)).unwrap());
    assert!(persistence.is_active(worker(1)).unwrap());
    assert!(persistence.exists(worker(9)).unwrap());
    assert!(!persistence.is_active(worker(9)).unwrap());
    assert!(!persistence.exists(worker(10)).unwrap());
    assert!(!persistence.is_active(worker(10)).unwrap());

    persistence.register_worker(worker(9), true).unwrap();
    assert!(persistence.is_active(worker(9)).unwrap());
}
