// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AttendanceLifecycle, AttendanceStore, StoreError, WorkerDirectory};
use jornada_domain::{
    AttendanceId, AttendanceRecord, CivilTime, DomainError, FixedClock, NewAttendanceRecord, RecordPatch,
    WorkerId,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use time::{Date, Month, Time};

/// In-memory store that checks the live slot under a single lock.
///
/// Writes for workers listed in `failing_writes` fail with
/// `StoreError::Unavailable`; reads for workers in `failing_reads` do too.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<AttendanceRecord>>,
    failing_writes: Mutex<HashSet<WorkerId>>,
    failing_reads: Mutex<HashSet<WorkerId>>,
}

impl MemoryStore {
    pub fn fail_writes_for(&self, worker_id: WorkerId) {
        self.failing_writes.lock().unwrap().insert(worker_id);
    }

    pub fn fail_reads_for(&self, worker_id: WorkerId) {
        self.failing_reads.lock().unwrap().insert(worker_id);
    }

    pub fn all(&self) -> Vec<AttendanceRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn live_count(&self, worker_id: WorkerId, date: Date) -> usize {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.worker_id == worker_id && r.date == date && r.is_live())
            .count()
    }

    fn check_write(&self, worker_id: WorkerId) -> Result<(), StoreError> {
        if self.failing_writes.lock().unwrap().contains(&worker_id) {
            return Err(StoreError::Unavailable(String::from("injected write failure")));
        }
        Ok(())
    }

    fn check_read(&self, worker_id: WorkerId) -> Result<(), StoreError> {
        if self.failing_reads.lock().unwrap().contains(&worker_id) {
            return Err(StoreError::Unavailable(String::from("injected read failure")));
        }
        Ok(())
    }
}

impl AttendanceStore for MemoryStore {
    fn find_live(
        &self,
        worker_id: WorkerId,
        date: Date,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        self.check_read(worker_id)?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.worker_id == worker_id && r.date == date && r.is_live())
            .cloned())
    }

    fn find_any(
        &self,
        worker_id: WorkerId,
        date: Date,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        self.check_read(worker_id)?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.worker_id == worker_id && r.date == date)
            .max_by_key(|r| (r.updated_at, r.id))
            .cloned())
    }

    fn find_by_id(&self, id: AttendanceId) -> Result<Option<AttendanceRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    fn insert(&self, record: NewAttendanceRecord) -> Result<AttendanceRecord, StoreError> {
        self.check_write(record.worker_id)?;
        let mut records = self.records.lock().unwrap();
        if record.tombstoned_at.is_none()
            && records
                .iter()
                .any(|r| r.worker_id == record.worker_id && r.date == record.date && r.is_live())
        {
            return Err(StoreError::LiveSlotTaken {
                worker_id: record.worker_id,
                date: record.date,
            });
        }
        let id: AttendanceId = AttendanceId::new(i64::try_from(records.len()).unwrap() + 1);
        let stored: AttendanceRecord = record.into_record(id);
        records.push(stored.clone());
        Ok(stored)
    }

    fn update(&self, id: AttendanceId, patch: RecordPatch) -> Result<AttendanceRecord, StoreError> {
        let mut records = self.records.lock().unwrap();
        let index: usize = records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::RecordNotFound(id))?;
        let mut updated: AttendanceRecord = records[index].clone();
        self.check_write(updated.worker_id)?;
        patch.apply_to(&mut updated).map_err(|err| match err {
            DomainError::InvalidTimeOrder { entry, exit } => {
                StoreError::InvalidTimeOrder { entry, exit }
            }
            other => StoreError::Unavailable(other.to_string()),
        })?;

        if updated.is_live()
            && records.iter().any(|r| {
                r.id != id && r.worker_id == updated.worker_id && r.date == updated.date && r.is_live()
            })
        {
            return Err(StoreError::LiveSlotTaken {
                worker_id: updated.worker_id,
                date: updated.date,
            });
        }

        records[index] = updated.clone();
        Ok(updated)
    }

    fn list_by_date(&self, date: Date) -> Result<Vec<AttendanceRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.date == date)
            .cloned()
            .collect())
    }

    fn list_for_worker(
        &self,
        worker_id: WorkerId,
        from: Date,
        to: Date,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let mut found: Vec<AttendanceRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.worker_id == worker_id && r.date >= from && r.date <= to)
            .cloned()
            .collect();
        found.sort_by_key(|r| (r.date, r.id));
        Ok(found)
    }
}

/// Store that records how many `find_live` reads overlap.
///
/// Each read sleeps briefly so concurrent callers actually overlap.
#[derive(Default)]
pub struct TrackingStore {
    inner: MemoryStore,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl TrackingStore {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl AttendanceStore for TrackingStore {
    fn find_live(
        &self,
        worker_id: WorkerId,
        date: Date,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let now: usize = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(5));
        let found: Result<Option<AttendanceRecord>, StoreError> =
            self.inner.find_live(worker_id, date);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        found
    }

    fn find_any(
        &self,
        worker_id: WorkerId,
        date: Date,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        self.inner.find_any(worker_id, date)
    }

    fn find_by_id(&self, id: AttendanceId) -> Result<Option<AttendanceRecord>, StoreError> {
        self.inner.find_by_id(id)
    }

    fn insert(&self, record: NewAttendanceRecord) -> Result<AttendanceRecord, StoreError> {
        self.inner.insert(record)
    }

    fn update(&self, id: AttendanceId, patch: RecordPatch) -> Result<AttendanceRecord, StoreError> {
        self.inner.update(id, patch)
    }

    fn list_by_date(&self, date: Date) -> Result<Vec<AttendanceRecord>, StoreError> {
        self.inner.list_by_date(date)
    }

    fn list_for_worker(
        &self,
        worker_id: WorkerId,
        from: Date,
        to: Date,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        self.inner.list_for_worker(worker_id, from, to)
    }
}

/// Directory backed by a map of worker id to active flag.
#[derive(Default)]
pub struct MemoryDirectory {
    workers: Mutex<HashMap<WorkerId, bool>>,
}

impl MemoryDirectory {
    pub fn add(&self, worker_id: WorkerId, active: bool) {
        self.workers.lock().unwrap().insert(worker_id, active);
    }
}

impl WorkerDirectory for MemoryDirectory {
    fn exists(&self, worker_id: WorkerId) -> Result<bool, StoreError> {
        Ok(self.workers.lock().unwrap().contains_key(&worker_id))
    }

    fn is_active(&self, worker_id: WorkerId) -> Result<bool, StoreError> {
        Ok(self
            .workers
            .lock()
            .unwrap()
            .get(&worker_id)
            .copied()
            .unwrap_or(false))
    }
}

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub directory: Arc<MemoryDirectory>,
    pub lifecycle: AttendanceLifecycle,
}

/// Builds a lifecycle whose clock is frozen at `date` `hour`:`minute`.
///
/// Workers 1, 2, 3 and 42 are active; worker 99 exists but is inactive.
pub fn fixture_at(date: Date, hour: u8, minute: u8) -> Fixture {
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::default());
    let directory: Arc<MemoryDirectory> = Arc::new(MemoryDirectory::default());
    for id in [1, 2, 3, 42] {
        directory.add(worker(id), true);
    }
    directory.add(worker(99), false);

    let clock: FixedClock = FixedClock::at(date, Time::from_hms(hour, minute, 0).unwrap());
    let lifecycle: AttendanceLifecycle =
        AttendanceLifecycle::new(store.clone(), directory.clone(), Arc::new(clock));

    Fixture {
        store,
        directory,
        lifecycle,
    }
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
