// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::StoreError;
use jornada_domain::{AttendanceId, AttendanceRecord, NewAttendanceRecord, RecordPatch, WorkerId};
use time::Date;

/// Persistent storage for attendance records.
///
/// Implementations must enforce "at most one live record per worker-day"
/// atomically: an `insert` or `update` that would create a second live
/// record fails with `StoreError::LiveSlotTaken`, regardless of any check
/// the caller made beforehand.
pub trait AttendanceStore: Send + Sync {
    /// Finds the live record for a worker-day.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_live(
        &self,
        worker_id: WorkerId,
        date: Date,
    ) -> Result<Option<AttendanceRecord>, StoreError>;

    /// Finds the most recently updated record for a worker-day, tombstoned
    /// records included.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_any(
        &self,
        worker_id: WorkerId,
        date: Date,
    ) -> Result<Option<AttendanceRecord>, StoreError>;

    /// Finds a record by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_by_id(&self, id: AttendanceId) -> Result<Option<AttendanceRecord>, StoreError>;

    /// Inserts a new record and returns it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::LiveSlotTaken` if the record is live and the
    /// worker-day already has a live record.
    fn insert(&self, record: NewAttendanceRecord) -> Result<AttendanceRecord, StoreError>;

    /// Applies a patch to an existing record and returns the result.
    ///
    /// The patch is applied to the record as currently stored, with worked
    /// hours and status re-derived, in the same atomic step as the write.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::RecordNotFound` if the record does not exist,
    /// `StoreError::InvalidTimeOrder` if the patched record would have an
    /// exit not later than its entry, or `StoreError::LiveSlotTaken` if the
    /// patch would revive a record into an occupied worker-day.
    fn update(&self, id: AttendanceId, patch: RecordPatch) -> Result<AttendanceRecord, StoreError>;

    /// Lists every record for a day, tombstoned records included.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_by_date(&self, date: Date) -> Result<Vec<AttendanceRecord>, StoreError>;

    /// Lists a worker's records in an inclusive date range, ordered by date.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_for_worker(
        &self,
        worker_id: WorkerId,
        from: Date,
        to: Date,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;
}

/// Read-only view of the externally owned worker registry.
pub trait WorkerDirectory: Send + Sync {
    /// Returns whether the worker is known.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn exists(&self, worker_id: WorkerId) -> Result<bool, StoreError>;

    /// Returns whether the worker is currently active.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn is_active(&self, worker_id: WorkerId) -> Result<bool, StoreError>;
}
