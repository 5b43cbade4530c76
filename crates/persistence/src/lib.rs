// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Jornada attendance system.
//!
//! This crate stores attendance records and the worker directory in
//! `SQLite` through Diesel, and implements the `AttendanceStore` and
//! `WorkerDirectory` contracts of the core crate.
//!
//! ## Storage Format
//!
//! - Calendar days are `YYYY-MM-DD` text
//! - Wall-clock times are `HH:MM` text
//! - Worked hours are integer hundredths of an hour
//! - Audit timestamps are fixed-width UTC text
//!
//! All date and time columns are encoded and decoded by the civil codec in
//! `jornada_domain`, so the stored value is exactly what was written.
//!
//! ## Live Slot Constraint
//!
//! A partial unique index on `(worker_id, work_date) WHERE tombstoned_at IS NULL`
//! rejects a second live record for a worker-day atomically. Violations
//! surface as `StoreError::LiveSlotTaken`.
//!
//! ## Testing
//!
//! Each `new_in_memory()` call opens a separately named shared-cache
//! in-memory database, so tests never see each other's data.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use jornada::{AttendanceStore, StoreError, WorkerDirectory};
use jornada_domain::{AttendanceId, AttendanceRecord, NewAttendanceRecord, RecordPatch, WorkerId};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use time::Date;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

/// `SQLite`-backed attendance store and worker directory.
///
/// The connection sits behind a mutex so the adapter can be shared across
/// threads; each call holds the lock for its whole read or transaction.
pub struct Persistence {
    conn: Mutex<SqliteConnection>,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a distinct database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:jornada_mem_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::configure_file_database(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(
        &self,
        op: impl FnOnce(&mut SqliteConnection) -> Result<T, PersistenceError>,
    ) -> Result<T, PersistenceError> {
        let mut guard: MutexGuard<'_, SqliteConnection> =
            self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        op(&mut guard)
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&self) -> Result<(), PersistenceError> {
        self.with_conn(backend::sqlite::verify_foreign_key_enforcement)
    }

    // ========================================================================
    // Worker Directory
    // ========================================================================

    /// Registers a worker in the directory, or updates its active flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn register_worker(&self, worker_id: WorkerId, active: bool) -> Result<(), PersistenceError> {
        self.with_conn(|conn| mutations::workers::upsert_worker(conn, worker_id, active))
    }

    /// Returns the worker's active flag, or `None` if unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn worker_active_flag(&self, worker_id: WorkerId) -> Result<Option<bool>, PersistenceError> {
        self.with_conn(|conn| queries::workers::worker_active_flag(conn, worker_id))
    }
}

impl AttendanceStore for Persistence {
    fn find_live(
        &self,
        worker_id: WorkerId,
        date: Date,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        Ok(self.with_conn(|conn| queries::attendance::find_live(conn, worker_id, date))?)
    }

    fn find_any(
        &self,
        worker_id: WorkerId,
        date: Date,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        Ok(self.with_conn(|conn| queries::attendance::find_any(conn, worker_id, date))?)
    }

    fn find_by_id(&self, id: AttendanceId) -> Result<Option<AttendanceRecord>, StoreError> {
        Ok(self.with_conn(|conn| queries::attendance::find_by_id(conn, id))?)
    }

    fn insert(&self, record: NewAttendanceRecord) -> Result<AttendanceRecord, StoreError> {
        Ok(self.with_conn(|conn| mutations::attendance::insert_record(conn, &record))?)
    }

    fn update(&self, id: AttendanceId, patch: RecordPatch) -> Result<AttendanceRecord, StoreError> {
        Ok(self.with_conn(|conn| mutations::attendance::update_record(conn, id, &patch))?)
    }

    fn list_by_date(&self, date: Date) -> Result<Vec<AttendanceRecord>, StoreError> {
        Ok(self.with_conn(|conn| queries::attendance::list_by_date(conn, date))?)
    }

    fn list_for_worker(
        &self,
        worker_id: WorkerId,
        from: Date,
        to: Date,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        Ok(self.with_conn(|conn| queries::attendance::list_for_worker(conn, worker_id, from, to))?)
    }
}

impl WorkerDirectory for Persistence {
    fn exists(&self, worker_id: WorkerId) -> Result<bool, StoreError> {
        Ok(self.worker_active_flag(worker_id)?.is_some())
    }

    fn is_active(&self, worker_id: WorkerId) -> Result<bool, StoreError> {
        Ok(self.worker_active_flag(worker_id)?.unwrap_or(false))
    }
}
