// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ApiError, InputError, parse_action, parse_range, translate_core_error};
use jornada::{BatchAction, CoreError};
use jornada_domain::{AttendanceId, CivilTime, DomainError, WorkerId};
use jornada_persistence::PersistenceError;
use time::macros::date;

#[test]
fn test_input_error_carries_field() {
    let err: ApiError = InputError::InvalidTime {
        field: "exit_time",
        value: String::from("noon"),
    }
    .into();
    assert_eq!(
        err,
        ApiError::InvalidInput {
            field: String::from("exit_time"),
            message: String::from("invalid time 'noon': expected HH:MM"),
        }
    );
}

#[test]
fn test_parse_action_is_case_insensitive() {
    assert_eq!(parse_action("ABSENT"), Ok(BatchAction::Absent));
    assert_eq!(parse_action(" exit "), Ok(BatchAction::Exit));
    assert_eq!(
        parse_action("lunch"),
        Err(InputError::UnknownAction(String::from("lunch")))
    );
}

#[test]
fn test_single_day_range_is_valid() {
    assert_eq!(
        parse_range("2025-03-10", "2025-03-10"),
        Ok((date!(2025 - 03 - 10), date!(2025 - 03 - 10)))
    );
}

#[test]
fn test_core_error_translation() {
    let worker: WorkerId = WorkerId::new(5).unwrap();

    assert!(matches!(
        translate_core_error(CoreError::NoActiveEntry {
            worker_id: worker,
            date: date!(2025 - 03 - 10),
        }),
        ApiError::Conflict { ref rule, .. } if rule == "open_entry_required"
    ));
    assert!(matches!(
        translate_core_error(CoreError::NotTombstoned(AttendanceId::new(1))),
        ApiError::Conflict { ref rule, .. } if rule == "reactivate_absent_only"
    ));
    assert!(matches!(
        translate_core_error(CoreError::StoreUnavailable(String::from("locked"))),
        ApiError::Internal { .. }
    ));
    assert!(matches!(
        translate_core_error(CoreError::DomainViolation(DomainError::InvalidCivilTime(
            String::from("x")
        ))),
        ApiError::InvalidInput { ref field, .. } if field == "time"
    ));
    assert!(matches!(
        translate_core_error(CoreError::InvalidTimeOrder {
            entry: CivilTime::new(9, 0).unwrap(),
            exit: CivilTime::new(8, 0).unwrap(),
        }),
        ApiError::DomainRuleViolation { .. }
    ));
}

#[test]
fn test_persistence_errors_are_internal() {
    let err: ApiError = PersistenceError::QueryFailed(String::from("boom")).into();
    assert!(matches!(err, ApiError::Internal { .. }));
    assert_eq!(format!("{err}"), "Internal error: Query failed: boom");
}
