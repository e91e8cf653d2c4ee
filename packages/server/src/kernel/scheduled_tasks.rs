//! Scheduled status polling.
//!
//! The [`Poller`] loads a full snapshot of the watched database once, then
//! re-reads it on a fixed interval and reports every status change exactly
//! once.
//!
//! # Architecture
//!
//! ```text
//! initialize()                      UNINITIALIZED → READY
//!     └─► fetch_tasks() → SnapshotStore::seed()
//!
//! spawn() (every poll_interval)     READY → CYCLE_RUNNING → READY
//!     └─► run_cycle()
//!             ├─► fetch_tasks()
//!             ├─► diff_tasks(&mut SnapshotStore)
//!             └─► for each change: SnapshotStore::set() → BaseChangeSink::notify()
//! ```
//!
//! The snapshot sits behind an async mutex that a cycle holds from fetch to
//! notify. A cycle triggered while another one holds it is skipped, so two
//! cycles never interleave on the same snapshot.
//!
//! Each cycle runs on its own task. Dropping the future returned by
//! [`Poller::run_cycle`] (a disconnected HTTP client, a timeout) does not
//! stop it between applying a change and delivering it.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use notion_client::NotionError;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::{BaseChangeSink, BaseRecordStore};
use crate::config::WatchConfig;
use crate::domains::tasks::{diff_tasks, fetch_tasks, SnapshotStore, StatusChange};

/// Lifecycle of a [`Poller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollerState {
    /// No snapshot loaded yet
    Uninitialized,
    /// Snapshot loaded, waiting for the next cycle
    Ready,
    /// A cycle currently holds the snapshot
    CycleRunning,
}

/// Result of one [`Poller::run_cycle`] call.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The cycle ran to completion. `changes` were applied and delivered.
    Completed { changes: Vec<StatusChange> },
    /// Another cycle was still running.
    Skipped,
    /// `initialize` has not succeeded yet.
    NotReady,
    /// Fetching failed, or the cycle task died. The snapshot is unchanged.
    Failed(anyhow::Error),
}

/// Counters exposed on the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PollerStats {
    pub state: PollerState,
    pub tracked_records: usize,
    pub cycles_completed: u64,
    pub cycles_failed: u64,
    pub cycles_skipped: u64,
    pub changes_detected: u64,
}

pub struct Poller {
    records: Arc<dyn BaseRecordStore>,
    sink: Arc<dyn BaseChangeSink>,
    config: WatchConfig,
    snapshot: Mutex<SnapshotStore>,
    initialized: AtomicBool,
    cycle_running: AtomicBool,
    tracked_records: AtomicUsize,
    cycles_completed: AtomicU64,
    cycles_failed: AtomicU64,
    cycles_skipped: AtomicU64,
    changes_detected: AtomicU64,
}

impl Poller {
    pub fn new(
        records: Arc<dyn BaseRecordStore>,
        sink: Arc<dyn BaseChangeSink>,
        config: WatchConfig,
    ) -> Self {
        Self {
            records,
            sink,
            config,
            snapshot: Mutex::new(SnapshotStore::new()),
            initialized: AtomicBool::new(false),
            cycle_running: AtomicBool::new(false),
            tracked_records: AtomicUsize::new(0),
            cycles_completed: AtomicU64::new(0),
            cycles_failed: AtomicU64::new(0),
            cycles_skipped: AtomicU64::new(0),
            changes_detected: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    pub fn state(&self) -> PollerState {
        if !self.initialized.load(Ordering::SeqCst) {
            PollerState::Uninitialized
        } else if self.cycle_running.load(Ordering::SeqCst) {
            PollerState::CycleRunning
        } else {
            PollerState::Ready
        }
    }

    pub fn stats(&self) -> PollerStats {
        PollerStats {
            state: self.state(),
            tracked_records: self.tracked_records.load(Ordering::SeqCst),
            cycles_completed: self.cycles_completed.load(Ordering::SeqCst),
            cycles_failed: self.cycles_failed.load(Ordering::SeqCst),
            cycles_skipped: self.cycles_skipped.load(Ordering::SeqCst),
            changes_detected: self.changes_detected.load(Ordering::SeqCst),
        }
    }

    /// Last-known status of a record.
    pub async fn snapshot_status(&self, record_id: &str) -> Option<String> {
        self.snapshot
            .lock()
            .await
            .get(record_id)
            .map(str::to_string)
    }

    /// Load the initial snapshot. Every record's status is stored as-is and
    /// nothing is reported.
    ///
    /// Returns the number of records loaded.
    pub async fn initialize(&self) -> Result<usize> {
        if self.initialized.load(Ordering::SeqCst) {
            anyhow::bail!("Poller is already initialized");
        }

        let mut snapshot = self.snapshot.lock().await;
        let tasks = fetch_tasks(self.records.as_ref(), &self.config)
            .await
            .context("Failed to load initial snapshot")?;

        snapshot.seed(&tasks);
        if snapshot.is_empty() {
            warn!(collection_id = %self.config.collection_id, "Watched database has no records");
        }
        self.tracked_records.store(snapshot.len(), Ordering::SeqCst);
        self.initialized.store(true, Ordering::SeqCst);

        info!(
            collection_id = %self.config.collection_id,
            count = snapshot.len(),
            "Initial snapshot loaded"
        );
        Ok(snapshot.len())
    }

    /// Run one fetch → diff → apply → notify pass on a task of its own and
    /// wait for its outcome.
    pub async fn run_cycle(self: &Arc<Self>) -> CycleOutcome {
        let poller = Arc::clone(self);
        match tokio::spawn(async move { poller.cycle().await }).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let failed = self.cycles_failed.fetch_add(1, Ordering::SeqCst) + 1;
                error!(failed, "Poll cycle task died: {}", e);
                CycleOutcome::Failed(anyhow!("Poll cycle task died: {e}"))
            }
        }
    }

    async fn cycle(&self) -> CycleOutcome {
        if !self.initialized.load(Ordering::SeqCst) {
            warn!("Poll cycle requested before initial snapshot was loaded");
            return CycleOutcome::NotReady;
        }

        let Ok(mut snapshot) = self.snapshot.try_lock() else {
            let skipped = self.cycles_skipped.fetch_add(1, Ordering::SeqCst) + 1;
            warn!(skipped, "Previous poll cycle still running, skipping");
            return CycleOutcome::Skipped;
        };
        let _running = RunningFlag::raise(&self.cycle_running);

        let tasks = match fetch_tasks(self.records.as_ref(), &self.config).await {
            Ok(tasks) => tasks,
            Err(e) => {
                let failed = self.cycles_failed.fetch_add(1, Ordering::SeqCst) + 1;
                error!(failed, transient = is_transient(&e), "Poll cycle failed: {:#}", e);
                return CycleOutcome::Failed(e);
            }
        };

        let fetched = tasks.len();
        let changes = diff_tasks(tasks, &mut snapshot);

        for change in &changes {
            snapshot.set(&change.record_id, &change.current);
            if let Err(e) = self.sink.notify(change).await {
                error!(record_id = %change.record_id, "Failed to deliver status change: {:#}", e);
            }
        }

        self.tracked_records.store(snapshot.len(), Ordering::SeqCst);
        self.cycles_completed.fetch_add(1, Ordering::SeqCst);
        self.changes_detected
            .fetch_add(changes.len() as u64, Ordering::SeqCst);

        debug!(fetched, changed = changes.len(), "Poll cycle complete");
        CycleOutcome::Completed { changes }
    }

    /// Run cycles every `poll_interval` until `shutdown` is cancelled.
    ///
    /// The first cycle fires one interval after the call. Ticks missed while
    /// a cycle runs long are dropped rather than bunched up. Cancellation is
    /// only observed between cycles.
    pub fn spawn(self: Arc<Self>, shutdown: CancellationToken) -> PollerHandle {
        let token = shutdown.clone();
        let period = self.config.poll_interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker.tick().await;

            info!(interval_secs = period.as_secs_f64(), "Status poller started");

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                self.run_cycle().await;
            }

            info!("Status poller stopped");
        });

        PollerHandle { shutdown, task }
    }
}

/// Handle to a running poll loop.
pub struct PollerHandle {
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop scheduling cycles. A cycle in flight still runs to completion.
    pub fn cancel(&self) {
        self.shutdown.cancel();
    }

    /// Wait for the loop to exit.
    pub async fn join(self) -> Result<()> {
        self.task.await.context("Poller task panicked")
    }

    /// Cancel and wait.
    pub async fn shutdown(self) -> Result<()> {
        self.cancel();
        self.join().await
    }
}

/// Set while a cycle holds the snapshot. Cleared on drop so a panicking
/// cycle does not leave the poller reporting `CycleRunning`.
struct RunningFlag<'a>(&'a AtomicBool);

impl<'a> RunningFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for RunningFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Whether the Notion error behind a failed cycle is worth retrying.
fn is_transient(e: &anyhow::Error) -> bool {
    e.chain()
        .find_map(|cause| cause.downcast_ref::<NotionError>())
        .is_some_and(NotionError::is_transient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::{MockRecord, MockRecordStore};

    fn poller() -> Poller {
        let deps = crate::kernel::TestDependencies::new(
            MockRecordStore::new().with_record(MockRecord::new("r1", Some("Todo"), "Plan")),
        );
        Poller::new(
            deps.records.clone(),
            deps.sink.clone(),
            WatchConfig::new("db"),
        )
    }

    #[tokio::test]
    async fn test_snapshot_reader_is_not_reported_as_running_cycle() {
        let poller = poller();
        poller.initialize().await.unwrap();

        let _reader = poller.snapshot.lock().await;

        assert_eq!(poller.state(), PollerState::Ready);
    }

    #[test]
    fn test_running_flag_clears_on_drop() {
        let flag = AtomicBool::new(false);
        {
            let _running = RunningFlag::raise(&flag);
            assert!(flag.load(Ordering::SeqCst));
        }
        assert!(!flag.load(Ordering::SeqCst));
    }

    #[test]
    fn test_transient_classification_sees_through_context() {
        let unavailable = anyhow::Error::from(NotionError::Api {
            status: 503,
            message: "service unavailable".into(),
        })
        .context("Failed to retrieve property title of r1")
        .context("Failed to resolve Name of r1");
        let not_found = anyhow::Error::from(NotionError::Api {
            status: 404,
            message: "object_not_found".into(),
        })
        .context("Failed to query collection");

        assert!(is_transient(&unavailable));
        assert!(!is_transient(&not_found));
        assert!(!is_transient(&anyhow!("Invalid cursor")));
    }
}
