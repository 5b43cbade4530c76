// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{TestApp, create_test_app};
use crate::{
    ApiError, AttendanceRecordInfo, MarkAbsentRequest, MarkAbsentResponse, ReactivateRequest,
    RegisterEntryRequest, RegisterExitRequest, RegisterWorkerRequest, RegisterWorkerResponse,
    UpdateLocationRequest, UpdateNotesRequest, UpdateTimeRequest, get_record, mark_absent,
    reactivate, register_entry, register_exit, register_worker, update_entry_time,
    update_exit_time, update_location, update_notes,
};

fn entry_request(worker_id: i64, date: &str, time: Option<&str>) -> RegisterEntryRequest {
    RegisterEntryRequest {
        worker_id,
        date: date.to_string(),
        entry_time: time.map(str::to_string),
        location: None,
        notes: None,
    }
}

fn exit_at(time: &str) -> RegisterExitRequest {
    RegisterExitRequest {
        exit_time: Some(time.to_string()),
        notes: None,
    }
}

// ============================================================================
// Worker-day lifecycle
// ============================================================================

#[test]
fn test_worker_day_lifecycle_through_api() {
    let app: TestApp = create_test_app();

    let entry: AttendanceRecordInfo = register_entry(
        &app.lifecycle,
        &entry_request(42, "2025-03-10", Some("08:00")),
    )
    .unwrap();
    assert_eq!(entry.status, "incomplete");
    assert_eq!(entry.entry_time.as_deref(), Some("08:00"));
    assert_eq!(entry.date, "2025-03-10");

    let exit: AttendanceRecordInfo =
        register_exit(&app.lifecycle, entry.attendance_id, &exit_at("12:00")).unwrap();
    assert_eq!(exit.status, "complete");
    assert_eq!(exit.worked_hours, Some(4.0));

    let absent: MarkAbsentResponse = mark_absent(
        &app.lifecycle,
        &MarkAbsentRequest {
            worker_id: 42,
            date: String::from("2025-03-10"),
        },
    )
    .unwrap();
    assert_eq!(absent.change, "tombstoned");
    assert_eq!(absent.record.day_state, "absent");
    assert_eq!(absent.record.entry_time.as_deref(), Some("08:00"));
    assert_eq!(absent.record.exit_time.as_deref(), Some("12:00"));
    assert!(absent.record.tombstoned_at.is_some());

    let revived: AttendanceRecordInfo = reactivate(
        &app.lifecycle,
        entry.attendance_id,
        &ReactivateRequest {
            entry_time: String::from("09:00"),
            location: None,
        },
    )
    .unwrap();
    assert_eq!(revived.status, "incomplete");
    assert_eq!(revived.entry_time.as_deref(), Some("09:00"));
    assert_eq!(revived.exit_time, None);
    assert_eq!(revived.worked_hours, None);
    assert_eq!(revived.tombstoned_at, None);
}

#[test]
fn test_entry_defaults_to_clock_time() {
    let app: TestApp = create_test_app();
    let entry: AttendanceRecordInfo =
        register_entry(&app.lifecycle, &entry_request(1, "2025-03-11", None)).unwrap();
    assert_eq!(entry.entry_time.as_deref(), Some("12:00"));
}

#[test]
fn test_corrections_recompute_hours() {
    let app: TestApp = create_test_app();
    let entry: AttendanceRecordInfo = register_entry(
        &app.lifecycle,
        &entry_request(2, "2025-03-10", Some("07:15")),
    )
    .unwrap();
    register_exit(&app.lifecycle, entry.attendance_id, &exit_at("15:15")).unwrap();

    let corrected: AttendanceRecordInfo = update_entry_time(
        &app.lifecycle,
        entry.attendance_id,
        &UpdateTimeRequest {
            time: String::from("07:45"),
        },
    )
    .unwrap();
    assert_eq!(corrected.worked_hours, Some(7.5));

    let corrected: AttendanceRecordInfo = update_exit_time(
        &app.lifecycle,
        entry.attendance_id,
        &UpdateTimeRequest {
            time: String::from("16:05"),
        },
    )
    .unwrap();
    assert_eq!(corrected.exit_time.as_deref(), Some("16:05"));
    assert_eq!(corrected.worked_hours, Some(8.33));
}

#[test]
fn test_notes_and_location() {
    let app: TestApp = create_test_app();
    let entry: AttendanceRecordInfo = register_entry(
        &app.lifecycle,
        &entry_request(3, "2025-03-10", Some("06:00")),
    )
    .unwrap();

    let updated: AttendanceRecordInfo = update_notes(
        &app.lifecycle,
        entry.attendance_id,
        &UpdateNotesRequest {
            notes: Some(String::from("late tractor")),
        },
    )
    .unwrap();
    assert_eq!(updated.notes.as_deref(), Some("late tractor"));

    let updated: AttendanceRecordInfo = update_location(
        &app.lifecycle,
        entry.attendance_id,
        &UpdateLocationRequest {
            location: Some(String::from("North field")),
        },
    )
    .unwrap();
    assert_eq!(updated.location.as_deref(), Some("North field"));

    let fetched: AttendanceRecordInfo = get_record(&app.lifecycle, entry.attendance_id).unwrap();
    assert_eq!(fetched, updated);
}

// ============================================================================
// Error translation at the boundary
// ============================================================================

#[test]
fn test_malformed_input_is_rejected_before_core() {
    let app: TestApp = create_test_app();

    let err: ApiError = register_entry(
        &app.lifecycle,
        &entry_request(1, "10/03/2025", Some("08:00")),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "date"));

    let err: ApiError = register_entry(
        &app.lifecycle,
        &entry_request(1, "2025-03-10", Some("8h")),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "entry_time"));

    let err: ApiError = register_entry(
        &app.lifecycle,
        &entry_request(0, "2025-03-10", Some("08:00")),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "worker_id"));
}

#[test]
fn test_core_errors_translate() {
    let app: TestApp = create_test_app();

    let err: ApiError = register_entry(
        &app.lifecycle,
        &entry_request(99, "2025-03-10", Some("08:00")),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));

    let err: ApiError = register_entry(
        &app.lifecycle,
        &entry_request(1, "2025-03-12", Some("08:00")),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::DomainRuleViolation { ref rule, .. } if rule == "no_future_dates"));

    let entry: AttendanceRecordInfo = register_entry(
        &app.lifecycle,
        &entry_request(1, "2025-03-10", Some("08:00")),
    )
    .unwrap();
    let err: ApiError = register_entry(
        &app.lifecycle,
        &entry_request(1, "2025-03-10", Some("09:00")),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Conflict { .. }));

    let err: ApiError =
        register_exit(&app.lifecycle, entry.attendance_id, &exit_at("07:00")).unwrap_err();
    assert!(matches!(err, ApiError::DomainRuleViolation { ref rule, .. } if rule == "exit_after_entry"));

    let err: ApiError = get_record(&app.lifecycle, 9_999).unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

// ============================================================================
// Worker directory
// ============================================================================

#[test]
fn test_register_worker_enables_entries() {
    let app: TestApp = create_test_app();

    let response: RegisterWorkerResponse = register_worker(
        &app.persistence,
        &RegisterWorkerRequest {
            worker_id: 7,
            active: None,
        },
    )
    .unwrap();
    assert!(response.active);

    register_entry(&app.lifecycle, &entry_request(7, "2025-03-10", Some("08:00"))).unwrap();

    register_worker(
        &app.persistence,
        &RegisterWorkerRequest {
            worker_id: 7,
            active: Some(false),
        },
    )
    .unwrap();
    let err: ApiError = register_entry(
        &app.lifecycle,
        &entry_request(7, "2025-03-11", Some("08:00")),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

#[test]
fn test_record_json_shape() {
    let app: TestApp = create_test_app();
    let entry: AttendanceRecordInfo = register_entry(
        &app.lifecycle,
        &entry_request(1, "2025-03-10", Some("14:05")),
    )
    .unwrap();

    let json: serde_json::Value = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["date"], "2025-03-10");
    assert_eq!(json["entry_time"], "14:05");
    assert_eq!(json["exit_time"], serde_json::Value::Null);
    assert_eq!(json["status"], "incomplete");
    assert_eq!(json["created_at"], "2025-03-11T12:00:00Z");

    let parsed: AttendanceRecordInfo = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, entry);
}
