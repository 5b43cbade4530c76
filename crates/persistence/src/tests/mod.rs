// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod store_tests;

use crate::Persistence;
use jornada_domain::{CivilTime, WorkerId};
use time::macros::datetime;
use time::{Date, Month, OffsetDateTime};

/// Opens an in-memory store with workers 1 through 5 registered and active.
pub fn create_test_persistence() -> Persistence {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    for id in 1..=5 {
        persistence.register_worker(worker(id), true).unwrap();
    }
    persistence
}

pub fn worker(id: i64) -> WorkerId {
    WorkerId::new(id).unwrap()
}

pub fn t(hour: u8, minute: u8) -> CivilTime {
    CivilTime::new(hour, minute).unwrap()
}

pub fn march(day: u8) -> Date {
    Date::from_calendar_date(2025, Month::March, day).unwrap()
}

pub fn stamp() -> OffsetDateTime {
    datetime!(2025-03-10 06:30:15.25 UTC)
}
