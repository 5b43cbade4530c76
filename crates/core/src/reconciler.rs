// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk entry, exit and absence for many workers on one day.
//!
//! Each worker is classified against its current state before anything
//! is written, then acted on independently. A failure for one worker is
//! recorded in that worker's outcome and never aborts the batch.
//!
//! Workers fan out as tasks on a `JoinSet`, gated by a `Semaphore` with
//! `max_parallelism` permits. Store calls are blocking, so each permitted
//! worker runs its read-then-act sequence on the blocking pool. Both
//! `preview` and `reconcile` must be awaited inside a Tokio runtime.

use crate::error::CoreError;
use crate::lifecycle::{AbsenceChange, AbsenceResult, AttendanceLifecycle};
use crate::store::AttendanceStore;
use jornada_domain::{AttendanceId, AttendanceRecord, CivilTime, DayState, WorkerId, is_future_date};
use std::collections::HashSet;
use std::sync::Arc;
use time::Date;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

/// Default upper bound on workers processed at once.
pub const DEFAULT_MAX_PARALLELISM: usize = 8;

/// The operation a batch applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchAction {
    /// Clock workers in.
    Entry,
    /// Clock workers out.
    Exit,
    /// Mark workers absent.
    Absent,
}

impl BatchAction {
    /// Converts this action to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Exit => "exit",
            Self::Absent => "absent",
        }
    }
}

impl std::fmt::Display for BatchAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bulk operation over a set of workers for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    /// The civil day.
    pub date: Date,
    /// The operation.
    pub action: BatchAction,
    /// Entry or exit time; the clock's current time when `None`.
    /// Ignored for `Absent`.
    pub time: Option<CivilTime>,
    /// The workers, in caller order. Duplicates are ignored after the first.
    pub worker_ids: Vec<WorkerId>,
}

/// Tuning for the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilerConfig {
    /// Maximum number of workers read and acted on concurrently.
    pub max_parallelism: usize,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            max_parallelism: DEFAULT_MAX_PARALLELISM,
        }
    }
}

/// The single-record operation a worker needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Entry on an empty day, or first exit on an open record.
    Create,
    /// Entry time correction on a live record, or exit overwrite.
    Update,
    /// Entry on an absent day.
    Reactivate,
    /// Absence marker, whatever the current state.
    MarkAbsent,
    /// The operation is not legal for the current state.
    Reject(CoreError),
    /// The current state could not be read.
    Fail(CoreError),
}

/// The classification of one worker, computed before any write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerPlan {
    /// The worker.
    pub worker_id: WorkerId,
    /// The worker's day state when classified.
    pub state: DayState,
    /// The existing record, if any.
    pub record_id: Option<AttendanceId>,
    /// What will be done.
    pub classification: Classification,
}

/// How one worker's part of the batch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A record was created, or an open record was first completed.
    Created,
    /// An existing record was updated.
    Updated,
    /// A tombstoned record was brought back.
    Reactivated,
    /// The operation was not legal for the worker's state.
    Rejected(CoreError),
    /// The operation was legal but could not be carried out.
    Failed(CoreError),
}

impl Outcome {
    /// Returns whether the worker's operation was committed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Created | Self::Updated | Self::Reactivated)
    }
}

/// One worker's result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerOutcome {
    /// The worker.
    pub worker_id: WorkerId,
    /// How it ended.
    pub outcome: Outcome,
    /// The resulting record, for successful outcomes.
    pub record: Option<AttendanceRecord>,
}

/// Outcome counts per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    /// Number of `Created` outcomes.
    pub created: usize,
    /// Number of `Updated` outcomes.
    pub updated: usize,
    /// Number of `Reactivated` outcomes.
    pub reactivated: usize,
    /// Number of `Rejected` outcomes.
    pub rejected: usize,
    /// Number of `Failed` outcomes.
    pub failed: usize,
}

impl BatchSummary {
    /// Total number of workers.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.created + self.updated + self.reactivated + self.rejected + self.failed
    }
}

/// The result of a batch, one outcome per distinct worker in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// The civil day.
    pub date: Date,
    /// The operation.
    pub action: BatchAction,
    /// The time applied, for entry and exit batches.
    pub time: Option<CivilTime>,
    /// Per-worker outcomes.
    pub outcomes: Vec<WorkerOutcome>,
}

impl BatchReport {
    /// Counts outcomes per kind.
    #[must_use]
    pub fn summary(&self) -> BatchSummary {
        self.outcomes
            .iter()
            .fold(BatchSummary::default(), |mut summary, worker| {
                match worker.outcome {
                    Outcome::Created => summary.created += 1,
                    Outcome::Updated => summary.updated += 1,
                    Outcome::Reactivated => summary.reactivated += 1,
                    Outcome::Rejected(_) => summary.rejected += 1,
                    Outcome::Failed(_) => summary.failed += 1,
                }
                summary
            })
    }
}

/// Per-batch values shared by every worker task.
#[derive(Debug)]
struct BatchContext {
    request: BatchRequest,
    time: Option<CivilTime>,
    future: Option<CoreError>,
}

/// Current state of one worker-day as read from the store.
struct CurrentState {
    state: DayState,
    record: Option<AttendanceRecord>,
}

/// Classifies and applies batch operations through the lifecycle.
#[derive(Debug, Clone)]
pub struct BatchReconciler {
    lifecycle: AttendanceLifecycle,
    config: ReconcilerConfig,
}

impl BatchReconciler {
    /// Creates a reconciler.
    #[must_use]
    pub const fn new(lifecycle: AttendanceLifecycle, config: ReconcilerConfig) -> Self {
        Self { lifecycle, config }
    }

    /// Returns the lifecycle batches are applied through.
    #[must_use]
    pub const fn lifecycle(&self) -> &AttendanceLifecycle {
        &self.lifecycle
    }

    /// Classifies every worker without writing anything.
    ///
    /// Plans are returned in input order with duplicates removed.
    pub async fn preview(&self, request: &BatchRequest) -> Vec<WorkerPlan> {
        let worker_ids: Vec<WorkerId> = distinct_workers(&request.worker_ids);
        let context: Arc<BatchContext> = Arc::new(self.context(request));

        self.run_bounded(
            worker_ids,
            move |reconciler, worker_id| reconciler.classify(worker_id, &context).0,
            unreadable_plan,
        )
        .await
    }

    /// Classifies and applies the batch.
    ///
    /// Each worker is read then acted on sequentially; distinct workers run
    /// concurrently up to `max_parallelism`. This never fails as a whole:
    /// every problem is reported in the affected worker's outcome.
    pub async fn reconcile(&self, request: &BatchRequest) -> BatchReport {
        let worker_ids: Vec<WorkerId> = distinct_workers(&request.worker_ids);
        let context: Arc<BatchContext> = Arc::new(self.context(request));
        let time: Option<CivilTime> = context.time;

        info!(
            date = %request.date,
            action = %request.action,
            workers = worker_ids.len(),
            max_parallelism = self.config.max_parallelism,
            "Reconciling batch"
        );

        let outcomes: Vec<WorkerOutcome> = self
            .run_bounded(
                worker_ids,
                move |reconciler, worker_id| {
                    let (plan, current) = reconciler.classify(worker_id, &context);
                    reconciler.act(plan, current, &context)
                },
                |worker_id| WorkerOutcome {
                    worker_id,
                    outcome: Outcome::Failed(CoreError::StoreUnavailable(String::from(
                        "worker task aborted",
                    ))),
                    record: None,
                },
            )
            .await;

        let report: BatchReport = BatchReport {
            date: request.date,
            action: request.action,
            time,
            outcomes,
        };
        let summary: BatchSummary = report.summary();
        info!(
            date = %request.date,
            action = %request.action,
            created = summary.created,
            updated = summary.updated,
            reactivated = summary.reactivated,
            rejected = summary.rejected,
            failed = summary.failed,
            "Batch reconciled"
        );
        report
    }

    fn context(&self, request: &BatchRequest) -> BatchContext {
        BatchContext {
            request: request.clone(),
            time: self.effective_time(request),
            future: self.future_rejection(request.date),
        }
    }

    fn effective_time(&self, request: &BatchRequest) -> Option<CivilTime> {
        match request.action {
            BatchAction::Absent => None,
            BatchAction::Entry | BatchAction::Exit => Some(
                request
                    .time
                    .unwrap_or_else(|| self.lifecycle.clock().current_time()),
            ),
        }
    }

    fn future_rejection(&self, date: Date) -> Option<CoreError> {
        let today: Date = self.lifecycle.clock().today();
        is_future_date(date, today).then_some(CoreError::FutureDateRejected { date, today })
    }

    fn read_state(&self, worker_id: WorkerId, date: Date) -> Result<CurrentState, CoreError> {
        let store: &dyn AttendanceStore = self.lifecycle.store();
        if let Some(live) = store.find_live(worker_id, date)? {
            return Ok(CurrentState {
                state: live.day_state(),
                record: Some(live),
            });
        }
        Ok(store.find_any(worker_id, date)?.map_or(
            CurrentState {
                state: DayState::NoRecord,
                record: None,
            },
            |tombstoned| CurrentState {
                state: DayState::Absent,
                record: Some(tombstoned),
            },
        ))
    }

    fn classify(
        &self,
        worker_id: WorkerId,
        context: &BatchContext,
    ) -> (WorkerPlan, Option<AttendanceRecord>) {
        let request: &BatchRequest = &context.request;
        let plan = |state: DayState,
                    record_id: Option<AttendanceId>,
                    classification: Classification| WorkerPlan {
            worker_id,
            state,
            record_id,
            classification,
        };

        if let Some(rejection) = &context.future {
            return (
                plan(DayState::NoRecord, None, Classification::Reject(rejection.clone())),
                None,
            );
        }

        let current: CurrentState = match self.read_state(worker_id, request.date) {
            Ok(current) => current,
            Err(err) => {
                warn!(worker_id = worker_id.value(), error = %err, "Could not read worker state");
                return (plan(DayState::NoRecord, None, Classification::Fail(err)), None);
            }
        };
        let record_id: Option<AttendanceId> = current.record.as_ref().map(|r| r.id);

        let classification: Classification = match (request.action, context.time) {
            (BatchAction::Entry, Some(time)) => {
                self.classify_entry(worker_id, current.state, current.record.as_ref(), time)
            }
            (BatchAction::Exit, Some(time)) => {
                Self::classify_exit(worker_id, request.date, current.record.as_ref(), time)
            }
            (BatchAction::Absent, _) => {
                if current.state == DayState::NoRecord {
                    self.classify_worker(worker_id, Classification::MarkAbsent)
                } else {
                    Classification::MarkAbsent
                }
            }
            // Entry and exit always carry an effective time.
            (BatchAction::Entry | BatchAction::Exit, None) => {
                Classification::Reject(CoreError::NoActiveEntry {
                    worker_id,
                    date: request.date,
                })
            }
        };

        debug!(
            worker_id = worker_id.value(),
            state = %current.state,
            classification = ?classification,
            "Classified worker"
        );
        (
            plan(current.state, record_id, classification),
            current.record,
        )
    }

    fn classify_entry(
        &self,
        worker_id: WorkerId,
        state: DayState,
        record: Option<&AttendanceRecord>,
        time: CivilTime,
    ) -> Classification {
        match (state, record) {
            (DayState::NoRecord, _) | (_, None) => {
                self.classify_worker(worker_id, Classification::Create)
            }
            (DayState::Absent, Some(_)) => Classification::Reactivate,
            (DayState::Incomplete | DayState::Complete, Some(record)) => match record.exit_time {
                Some(exit) if exit <= time => Classification::Reject(CoreError::InvalidTimeOrder {
                    entry: time,
                    exit,
                }),
                _ => Classification::Update,
            },
        }
    }

    fn classify_exit(
        worker_id: WorkerId,
        date: Date,
        record: Option<&AttendanceRecord>,
        time: CivilTime,
    ) -> Classification {
        let Some(entry) = record.filter(|r| r.is_live()).and_then(|r| r.entry_time) else {
            return Classification::Reject(CoreError::NoActiveEntry { worker_id, date });
        };
        if time <= entry {
            return Classification::Reject(CoreError::InvalidTimeOrder { entry, exit: time });
        }
        if record.is_some_and(|r| r.exit_time.is_some()) {
            Classification::Update
        } else {
            Classification::Create
        }
    }

    /// Checks the directory before a classification that creates a record.
    fn classify_worker(&self, worker_id: WorkerId, on_success: Classification) -> Classification {
        match self.lifecycle.ensure_worker(worker_id) {
            Ok(()) => on_success,
            Err(err @ CoreError::WorkerNotFound(_)) => Classification::Reject(err),
            Err(err) => Classification::Fail(err),
        }
    }

    fn act(
        &self,
        plan: WorkerPlan,
        current: Option<AttendanceRecord>,
        context: &BatchContext,
    ) -> WorkerOutcome {
        let worker_id: WorkerId = plan.worker_id;
        let request: &BatchRequest = &context.request;
        let time: Option<CivilTime> = context.time;
        let applied: Result<(Outcome, AttendanceRecord), CoreError> =
            match (plan.classification, current, time) {
                (Classification::Reject(reason), _, _) => {
                    return WorkerOutcome {
                        worker_id,
                        outcome: Outcome::Rejected(reason),
                        record: None,
                    };
                }
                (Classification::Fail(err), _, _) => Err(err),
                (Classification::MarkAbsent, _, _) => self
                    .lifecycle
                    .mark_absent(worker_id, request.date)
                    .map(|result: AbsenceResult| match result.change {
                        AbsenceChange::Created => (Outcome::Created, result.record),
                        AbsenceChange::Tombstoned | AbsenceChange::Unchanged => {
                            (Outcome::Updated, result.record)
                        }
                    }),
                (Classification::Create, None, Some(time)) => self
                    .lifecycle
                    .register_entry(worker_id, request.date, Some(time), None, None)
                    .map(|record| (Outcome::Created, record)),
                (Classification::Create, Some(record), Some(time)) => self
                    .lifecycle
                    .register_exit(record.id, Some(time), None)
                    .map(|record| (Outcome::Created, record)),
                (Classification::Update, Some(record), Some(time)) => {
                    let updated: Result<AttendanceRecord, CoreError> = match request.action {
                        BatchAction::Exit => self.lifecycle.register_exit(record.id, Some(time), None),
                        BatchAction::Entry | BatchAction::Absent => {
                            self.lifecycle.update_entry_time(record.id, time)
                        }
                    };
                    updated.map(|record| (Outcome::Updated, record))
                }
                (Classification::Reactivate, Some(record), Some(time)) => self
                    .lifecycle
                    .reactivate(record.id, time, None)
                    .map(|record| (Outcome::Reactivated, record)),
                (classification, _, _) => Err(CoreError::StoreUnavailable(format!(
                    "inconsistent plan {classification:?} for worker {worker_id}"
                ))),
            };

        match applied {
            Ok((outcome, record)) => {
                debug!(worker_id = worker_id.value(), outcome = ?outcome, "Applied");
                WorkerOutcome {
                    worker_id,
                    outcome,
                    record: Some(record),
                }
            }
            Err(err) => {
                warn!(worker_id = worker_id.value(), error = %err, "Batch operation failed");
                WorkerOutcome {
                    worker_id,
                    outcome: Outcome::Failed(err),
                    record: None,
                }
            }
        }
    }

    /// Runs `task` for every worker, at most `max_parallelism` at once, and
    /// returns results in input order.
    ///
    /// A worker whose task panicked or was cancelled gets `fallback` instead.
    async fn run_bounded<T, F, G>(&self, worker_ids: Vec<WorkerId>, task: F, fallback: G) -> Vec<T>
    where
        T: Send + 'static,
        F: Fn(&Self, WorkerId) -> T + Send + Sync + 'static,
        G: Fn(WorkerId) -> T,
    {
        let permits: Arc<Semaphore> = Arc::new(Semaphore::new(self.config.max_parallelism.max(1)));
        let task: Arc<F> = Arc::new(task);
        let mut tasks: JoinSet<(usize, Option<T>)> = JoinSet::new();

        for (index, worker_id) in worker_ids.iter().copied().enumerate() {
            let permits: Arc<Semaphore> = Arc::clone(&permits);
            let task: Arc<F> = Arc::clone(&task);
            let reconciler: Self = self.clone();
            tasks.spawn(async move {
                let Ok(_permit): Result<OwnedSemaphorePermit, _> = permits.acquire_owned().await
                else {
                    return (index, None);
                };
                let result: Result<T, JoinError> =
                    tokio::task::spawn_blocking(move || task(&reconciler, worker_id)).await;
                match result {
                    Ok(value) => (index, Some(value)),
                    Err(err) => {
                        warn!(worker_id = worker_id.value(), error = %err, "Batch worker task failed");
                        (index, None)
                    }
                }
            });
        }

        let mut slots: Vec<Option<T>> = worker_ids.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, value)) => {
                    if let Some(slot) = slots.get_mut(index) {
                        *slot = value;
                    }
                }
                Err(err) => warn!(error = %err, "Batch worker task failed"),
            }
        }

        slots
            .into_iter()
            .zip(worker_ids)
            .map(|(slot, worker_id)| slot.unwrap_or_else(|| fallback(worker_id)))
            .collect()
    }
}

fn distinct_workers(worker_ids: &[WorkerId]) -> Vec<WorkerId> {
    let mut seen: HashSet<WorkerId> = HashSet::with_capacity(worker_ids.len());
    worker_ids
        .iter()
        .copied()
        .filter(|worker_id| seen.insert(*worker_id))
        .collect()
}

fn unreadable_plan(worker_id: WorkerId) -> WorkerPlan {
    WorkerPlan {
        worker_id,
        state: DayState::NoRecord,
        record_id: None,
        classification: Classification::Fail(CoreError::StoreUnavailable(String::from(
            "worker task aborted",
        ))),
    }
}
