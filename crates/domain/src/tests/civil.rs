// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CivilTime, DomainError, date_from_storage, date_to_storage};
use time::{Date, Month};

#[test]
fn test_parse_accepts_hh_mm() {
    let parsed: CivilTime = CivilTime::parse("07:30").unwrap();
    assert_eq!(parsed.hour(), 7);
    assert_eq!(parsed.minute(), 30);
}

#[test]
fn test_parse_accepts_single_digit_hour() {
    let parsed: CivilTime = CivilTime::parse("7:05").unwrap();
    assert_eq!(parsed, CivilTime::new(7, 5).unwrap());
}

#[test]
fn test_parse_truncates_seconds() {
    let parsed: CivilTime = CivilTime::parse("16:45:59").unwrap();
    assert_eq!(parsed, CivilTime::new(16, 45).unwrap());
}

#[test]
fn test_parse_takes_clock_part_of_datetime_verbatim() {
    // The offset suffix must not shift the wall-clock reading.
    let parsed: CivilTime = CivilTime::parse("2024-03-10T07:30:00-05:00").unwrap();
    assert_eq!(parsed, CivilTime::new(7, 30).unwrap());

    let parsed: CivilTime = CivilTime::parse("2024-03-10T23:15:00Z").unwrap();
    assert_eq!(parsed, CivilTime::new(23, 15).unwrap());
}

#[test]
fn test_parse_ignores_offset_right_after_minutes() {
    let cases: [(&str, CivilTime); 5] = [
        ("2025-03-10T14:05Z", CivilTime::new(14, 5).unwrap()),
        ("14:05+02:00", CivilTime::new(14, 5).unwrap()),
        ("14:05-0330", CivilTime::new(14, 5).unwrap()),
        ("2025-03-10T06:40:12.250+01:00", CivilTime::new(6, 40).unwrap()),
        ("06:40:12Z", CivilTime::new(6, 40).unwrap()),
    ];
    for (input, expected) in cases {
        assert_eq!(CivilTime::parse(input).unwrap(), expected, "input {input:?}");
    }
}

#[test]
fn test_parse_rejects_trailing_junk_after_minutes() {
    for input in [
        "14:05:garbage",
        "14:05:61",
        "14:05:7",
        "14:05:",
        "14:05:00.",
        "14:05x",
        "14:05+2",
        "14:05+02:00:00",
        "14:05 pm",
    ] {
        let result: Result<CivilTime, DomainError> = CivilTime::parse(input);
        assert!(
            matches!(result, Err(DomainError::InvalidCivilTime(_))),
            "expected rejection for {input:?}"
        );
    }
}

#[test]
fn test_parse_rejects_garbage() {
    for input in ["", "7", "7:5", "24:00", "12:60", "ab:cd", "12-30", "123:00"] {
        let result: Result<CivilTime, DomainError> = CivilTime::parse(input);
        assert!(
            matches!(result, Err(DomainError::InvalidCivilTime(_))),
            "expected rejection for {input:?}"
        );
    }
}

#[test]
fn test_storage_round_trip_every_minute() {
    for hour in 0..24_u8 {
        for minute in 0..60_u8 {
            let original: CivilTime = CivilTime::new(hour, minute).unwrap();
            let stored: String = original.to_storage();
            let restored: CivilTime = CivilTime::from_storage(&stored).unwrap();
            assert_eq!(original, restored);
        }
    }
}

#[test]
fn test_from_storage_is_strict() {
    assert!(CivilTime::from_storage("7:30").is_err());
    assert!(CivilTime::from_storage("07:30:00").is_err());
    assert!(CivilTime::from_storage("0730").is_err());
}

#[test]
fn test_display_is_zero_padded() {
    let value: CivilTime = CivilTime::new(6, 4).unwrap();
    assert_eq!(value.to_string(), "06:04");
}

#[test]
fn test_serde_uses_hh_mm_string() {
    let value: CivilTime = CivilTime::new(16, 0).unwrap();
    let json: String = serde_json::to_string(&value).unwrap();
    assert_eq!(json, "\"16:00\"");

    let decoded: CivilTime = serde_json::from_str("\"2024-03-10T16:00:00+02:00\"").unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn test_minutes_since_midnight() {
    assert_eq!(CivilTime::new(0, 0).unwrap().minutes_since_midnight(), 0);
    assert_eq!(CivilTime::new(23, 59).unwrap().minutes_since_midnight(), 1439);
}

#[test]
fn test_date_round_trip() {
    let date: Date = Date::from_calendar_date(2024, Month::March, 10).unwrap();
    let stored: String = date_to_storage(date);
    assert_eq!(stored, "2024-03-10");
    assert_eq!(date_from_storage(&stored).unwrap(), date);
}

#[test]
fn test_date_from_datetime_takes_date_part() {
    let date: Date = date_from_storage("2024-03-10T23:30:00-08:00").unwrap();
    assert_eq!(date, Date::from_calendar_date(2024, Month::March, 10).unwrap());
}

#[test]
fn test_date_rejects_invalid_calendar_days() {
    for input in ["2024-02-30", "2024-13-01", "24-03-10", "2024/03/10", "", "2024-3-10"] {
        let result: Result<Date, DomainError> = date_from_storage(input);
        assert!(
            matches!(result, Err(DomainError::InvalidCivilDate(_))),
            "expected rejection for {input:?}"
        );
    }
}
