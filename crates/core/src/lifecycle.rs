// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::store::{AttendanceStore, WorkerDirectory};
use jornada_domain::{
    AttendanceId, AttendanceRecord, CivilTime, Clock, NewAttendanceRecord, RecordPatch, WorkerId,
    is_future_date, validate_time_order,
};
use std::sync::Arc;
use time::{Date, OffsetDateTime};
use tracing::{debug, info};

/// What `mark_absent` did to the worker's day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsenceChange {
    /// No record existed; a tombstoned shell was created.
    Created,
    /// A live record was tombstoned in place.
    Tombstoned,
    /// The day was already marked absent.
    Unchanged,
}

/// The result of `mark_absent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsenceResult {
    /// The tombstoned record for the day.
    pub record: AttendanceRecord,
    /// What changed.
    pub change: AbsenceChange,
}

/// The single-record attendance state machine.
///
/// States per worker-day: no record, incomplete (clocked in), complete
/// (clocked out) and absent (tombstoned). Every operation reads through
/// the injected store and writes back a single patch or insert.
#[derive(Clone)]
pub struct AttendanceLifecycle {
    store: Arc<dyn AttendanceStore>,
    directory: Arc<dyn WorkerDirectory>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for AttendanceLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttendanceLifecycle").finish_non_exhaustive()
    }
}

impl AttendanceLifecycle {
    /// Creates a lifecycle over the given collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn AttendanceStore>,
        directory: Arc<dyn WorkerDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            directory,
            clock,
        }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &dyn AttendanceStore {
        self.store.as_ref()
    }

    /// Returns the worker directory.
    #[must_use]
    pub fn directory(&self) -> &dyn WorkerDirectory {
        self.directory.as_ref()
    }

    /// Returns the clock.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Clocks a worker in for a day.
    ///
    /// # Arguments
    ///
    /// * `worker_id` - The worker clocking in
    /// * `date` - The civil day
    /// * `entry_time` - Entry time; the clock's current time when `None`
    /// * `location` - Optional location text
    /// * `notes` - Optional notes
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The worker is unknown or inactive
    /// - The day is in the future
    /// - A live record already exists for the worker-day
    pub fn register_entry(
        &self,
        worker_id: WorkerId,
        date: Date,
        entry_time: Option<CivilTime>,
        location: Option<String>,
        notes: Option<String>,
    ) -> Result<AttendanceRecord, CoreError> {
        self.ensure_worker(worker_id)?;
        self.ensure_not_future(date)?;

        if self.store.find_live(worker_id, date)?.is_some() {
            return Err(CoreError::ActiveEntryExists { worker_id, date });
        }

        let entry_time: CivilTime = entry_time.unwrap_or_else(|| self.clock.current_time());
        let new_record: NewAttendanceRecord = NewAttendanceRecord::entry(
            worker_id,
            date,
            entry_time,
            location,
            notes,
            self.clock.now(),
        );

        // The store re-checks the live slot atomically.
        let record: AttendanceRecord = self.store.insert(new_record)?;
        info!(
            record_id = record.id.value(),
            worker_id = worker_id.value(),
            %date,
            %entry_time,
            "Registered entry"
        );
        Ok(record)
    }

    /// Clocks a worker out, completing the record.
    ///
    /// Calling this on a complete record replaces the exit time.
    ///
    /// # Arguments
    ///
    /// * `id` - The record to complete
    /// * `exit_time` - Exit time; the clock's current time when `None`
    /// * `notes` - Optional exit notes
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The record does not exist
    /// - The record is tombstoned or has no entry time
    /// - The exit is not later than the entry
    pub fn register_exit(
        &self,
        id: AttendanceId,
        exit_time: Option<CivilTime>,
        notes: Option<String>,
    ) -> Result<AttendanceRecord, CoreError> {
        let record: AttendanceRecord = self.load(id)?;
        let entry_time: CivilTime = Self::open_entry(&record)?;

        let exit_time: CivilTime = exit_time.unwrap_or_else(|| self.clock.current_time());
        validate_time_order(entry_time, exit_time)?;

        // The store re-checks the order against the stored entry.
        let mut patch: RecordPatch = RecordPatch::touched(self.clock.now());
        patch.exit_time = Some(Some(exit_time));
        if notes.is_some() {
            patch.exit_notes = Some(notes);
        }

        let updated: AttendanceRecord = self.store.update(id, patch)?;
        info!(
            record_id = id.value(),
            worker_id = updated.worker_id.value(),
            %exit_time,
            overwrite = record.exit_time.is_some(),
            "Registered exit"
        );
        Ok(updated)
    }

    /// Corrects the entry time of a live record.
    ///
    /// A complete record stays complete; worked hours are recomputed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The record does not exist or is tombstoned
    /// - The new entry is not earlier than an existing exit
    pub fn update_entry_time(
        &self,
        id: AttendanceId,
        entry_time: CivilTime,
    ) -> Result<AttendanceRecord, CoreError> {
        let record: AttendanceRecord = self.load(id)?;
        Self::ensure_live(&record)?;

        if let Some(exit_time) = record.exit_time {
            validate_time_order(entry_time, exit_time)?;
        }

        let mut patch: RecordPatch = RecordPatch::touched(self.clock.now());
        patch.entry_time = Some(Some(entry_time));

        let updated: AttendanceRecord = self.store.update(id, patch)?;
        debug!(record_id = id.value(), %entry_time, "Updated entry time");
        Ok(updated)
    }

    /// Corrects the exit time of a live record that has an entry.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The record does not exist
    /// - The record is tombstoned or has no entry time
    /// - The new exit is not later than the entry
    pub fn update_exit_time(
        &self,
        id: AttendanceId,
        exit_time: CivilTime,
    ) -> Result<AttendanceRecord, CoreError> {
        let record: AttendanceRecord = self.load(id)?;
        let entry_time: CivilTime = Self::open_entry(&record)?;

        validate_time_order(entry_time, exit_time)?;

        let mut patch: RecordPatch = RecordPatch::touched(self.clock.now());
        patch.exit_time = Some(Some(exit_time));

        let updated: AttendanceRecord = self.store.update(id, patch)?;
        debug!(record_id = id.value(), %exit_time, "Updated exit time");
        Ok(updated)
    }

    /// Marks a worker absent for a day.
    ///
    /// A live record is tombstoned in place with its times left readable.
    /// A day that is already absent is left as is. A day with no record
    /// gets a tombstoned shell.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The day is in the future
    /// - A shell is needed and the worker is unknown or inactive
    pub fn mark_absent(&self, worker_id: WorkerId, date: Date) -> Result<AbsenceResult, CoreError> {
        self.ensure_not_future(date)?;

        if let Some(live) = self.store.find_live(worker_id, date)? {
            let now: OffsetDateTime = self.clock.now();
            let mut patch: RecordPatch = RecordPatch::touched(now);
            patch.tombstoned_at = Some(Some(now));
            let record: AttendanceRecord = self.store.update(live.id, patch)?;
            info!(
                record_id = record.id.value(),
                worker_id = worker_id.value(),
                %date,
                "Marked live record absent"
            );
            return Ok(AbsenceResult {
                record,
                change: AbsenceChange::Tombstoned,
            });
        }

        if let Some(existing) = self.store.find_any(worker_id, date)? {
            debug!(
                record_id = existing.id.value(),
                worker_id = worker_id.value(),
                %date,
                "Day already marked absent"
            );
            return Ok(AbsenceResult {
                record: existing,
                change: AbsenceChange::Unchanged,
            });
        }

        self.ensure_worker(worker_id)?;
        let shell: NewAttendanceRecord =
            NewAttendanceRecord::absence_shell(worker_id, date, self.clock.now());
        let record: AttendanceRecord = self.store.insert(shell)?;
        info!(
            record_id = record.id.value(),
            worker_id = worker_id.value(),
            %date,
            "Created absence record"
        );
        Ok(AbsenceResult {
            record,
            change: AbsenceChange::Created,
        })
    }

    /// Brings a tombstoned record back as a fresh clock-in.
    ///
    /// Exit time, worked hours and exit notes are cleared so an earlier
    /// completion is never resurrected.
    ///
    /// # Arguments
    ///
    /// * `id` - The tombstoned record
    /// * `entry_time` - The new entry time
    /// * `location` - Replaces the stored location when given
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The record does not exist
    /// - The record is live
    /// - Another live record already occupies the worker-day
    pub fn reactivate(
        &self,
        id: AttendanceId,
        entry_time: CivilTime,
        location: Option<String>,
    ) -> Result<AttendanceRecord, CoreError> {
        let record: AttendanceRecord = self.load(id)?;
        if record.is_live() {
            return Err(CoreError::NotTombstoned(id));
        }

        let mut patch: RecordPatch = RecordPatch::touched(self.clock.now());
        patch.tombstoned_at = Some(None);
        patch.entry_time = Some(Some(entry_time));
        patch.exit_time = Some(None);
        patch.exit_notes = Some(None);
        if location.is_some() {
            patch.location = Some(location);
        }

        let updated: AttendanceRecord = self.store.update(id, patch)?;
        info!(
            record_id = id.value(),
            worker_id = updated.worker_id.value(),
            %entry_time,
            "Reactivated record"
        );
        Ok(updated)
    }

    /// Returns a record by identifier, tombstoned records included.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not exist.
    pub fn get_record(&self, id: AttendanceId) -> Result<AttendanceRecord, CoreError> {
        self.load(id)
    }

    /// Replaces the entry notes of a live record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not exist or is tombstoned.
    pub fn update_notes(
        &self,
        id: AttendanceId,
        notes: Option<String>,
    ) -> Result<AttendanceRecord, CoreError> {
        let record: AttendanceRecord = self.load(id)?;
        Self::ensure_live(&record)?;

        let mut patch: RecordPatch = RecordPatch::touched(self.clock.now());
        patch.notes = Some(notes);
        Ok(self.store.update(id, patch)?)
    }

    /// Replaces the location of a live record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not exist or is tombstoned.
    pub fn update_location(
        &self,
        id: AttendanceId,
        location: Option<String>,
    ) -> Result<AttendanceRecord, CoreError> {
        let record: AttendanceRecord = self.load(id)?;
        Self::ensure_live(&record)?;

        let mut patch: RecordPatch = RecordPatch::touched(self.clock.now());
        patch.location = Some(location);
        Ok(self.store.update(id, patch)?)
    }

    pub(crate) fn ensure_worker(&self, worker_id: WorkerId) -> Result<(), CoreError> {
        if self.directory.exists(worker_id)? && self.directory.is_active(worker_id)? {
            return Ok(());
        }
        Err(CoreError::WorkerNotFound(worker_id))
    }

    pub(crate) fn ensure_not_future(&self, date: Date) -> Result<(), CoreError> {
        let today: Date = self.clock.today();
        if is_future_date(date, today) {
            return Err(CoreError::FutureDateRejected { date, today });
        }
        Ok(())
    }

    fn load(&self, id: AttendanceId) -> Result<AttendanceRecord, CoreError> {
        self.store
            .find_by_id(id)?
            .ok_or(CoreError::AttendanceNotFound(id))
    }

    const fn ensure_live(record: &AttendanceRecord) -> Result<(), CoreError> {
        if record.is_live() {
            return Ok(());
        }
        Err(CoreError::NoActiveEntry {
            worker_id: record.worker_id,
            date: record.date,
        })
    }

    /// Returns the entry time of a live record, or `NoActiveEntry`.
    const fn open_entry(record: &AttendanceRecord) -> Result<CivilTime, CoreError> {
        match (record.is_live(), record.entry_time) {
            (true, Some(entry_time)) => Ok(entry_time),
            _ => Err(CoreError::NoActiveEntry {
                worker_id: record.worker_id,
                date: record.date,
            }),
        }
    }
}
