// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Worker directory lookups.

use diesel::SqliteConnection;
use diesel::prelude::*;
use jornada_domain::WorkerId;

use crate::diesel_schema::workers;
use crate::error::PersistenceError;

/// Returns the worker's active flag, or `None` if the worker is unknown.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn worker_active_flag(
    conn: &mut SqliteConnection,
    worker_id: WorkerId,
) -> Result<Option<bool>, PersistenceError> {
    let flag: Option<i32> = workers::table
        .find(worker_id.value())
        .select(workers::is_active)
        .first(conn)
        .optional()?;

    Ok(flag.map(|value| value != 0))
}
