// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Worker directory writes.

use diesel::SqliteConnection;
use diesel::prelude::*;
use jornada_domain::WorkerId;
use tracing::info;

use crate::diesel_schema::workers;
use crate::error::PersistenceError;

/// Registers a worker, or updates the active flag of a known worker.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_worker(
    conn: &mut SqliteConnection,
    worker_id: WorkerId,
    active: bool,
) -> Result<(), PersistenceError> {
    let is_active: i32 = i32::from(active);

    diesel::insert_into(workers::table)
        .values((
            workers::worker_id.eq(worker_id.value()),
            workers::is_active.eq(is_active),
        ))
        .on_conflict(workers::worker_id)
        .do_update()
        .set(workers::is_active.eq(is_active))
        .execute(conn)?;

    info!(worker_id = worker_id.value(), active, "Registered worker");
    Ok(())
}
