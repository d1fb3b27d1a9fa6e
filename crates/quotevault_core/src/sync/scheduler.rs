//! Periodic fetch-and-merge scheduler.
//!
//! # Responsibility
//! - Run one sync tick (fetch, reconcile, notify) on a fixed period.
//! - Expose start/stop so the embedder owns the worker lifecycle.
//!
//! # Invariants
//! - One worker thread runs ticks strictly one after another; ticks never
//!   overlap. A tick that outlasts the period delays the next one, and missed
//!   ticks are dropped rather than queued.
//! - The fetch runs without holding the repository lock.
//! - A failed fetch skips the merge; the next scheduled tick is the retry.
//! - `stop` interrupts the wait between ticks and joins the worker.

use crate::repo::quote_repo::QuoteRepository;
use crate::store::KeyValueStore;
use crate::sync::config::SyncConfig;
use crate::sync::notifier::{failure_message, Notifier, SYNC_SUCCESS_MESSAGE};
use crate::sync::reconcile::MergeReport;
use crate::sync::remote::{NetworkError, RemoteSource};
use log::{error, info, warn};
use parking_lot::Mutex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Repository handle shared between callers and the scheduler worker.
pub type SharedRepository<S> = Arc<Mutex<QuoteRepository<S>>>;

/// Scheduler lifecycle errors.
#[derive(Debug)]
pub enum SchedulerError {
    AlreadyRunning,
    Spawn(std::io::Error),
}

impl Display for SchedulerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyRunning => write!(f, "sync scheduler is already running"),
            Self::Spawn(err) => write!(f, "failed to spawn sync worker: {err}"),
        }
    }
}

impl Error for SchedulerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AlreadyRunning => None,
            Self::Spawn(err) => Some(err),
        }
    }
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Merged(MergeReport),
    FetchFailed(NetworkError),
    /// Fetch succeeded but the merged collection could not be persisted.
    PersistFailed(String),
}

impl TickOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Merged(_))
    }
}

/// Running totals, readable while the worker is active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub total_ticks: u64,
    pub successful_ticks: u64,
    pub failed_ticks: u64,
    pub last_report: Option<MergeReport>,
    pub last_error: Option<String>,
}

impl SyncStats {
    fn record(&mut self, outcome: &TickOutcome) {
        self.total_ticks += 1;
        match outcome {
            TickOutcome::Merged(report) => {
                self.successful_ticks += 1;
                self.last_report = Some(*report);
            }
            TickOutcome::FetchFailed(err) => {
                self.failed_ticks += 1;
                self.last_error = Some(err.to_string());
            }
            TickOutcome::PersistFailed(message) => {
                self.failed_ticks += 1;
                self.last_error = Some(message.clone());
            }
        }
    }
}

/// Runs one fetch-and-merge cycle.
///
/// Also used for manual "sync now" requests, with the same semantics as a
/// scheduled tick.
pub fn run_sync_tick<S: KeyValueStore>(
    repo: &Mutex<QuoteRepository<S>>,
    remote: &dyn RemoteSource,
    notifier: &dyn Notifier,
) -> TickOutcome {
    let started_at = Instant::now();

    let fetched = match remote.fetch() {
        Ok(quotes) => quotes,
        Err(err) => {
            warn!(
                "event=sync_tick module=sync status=error stage=fetch duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            notifier.notify(&failure_message(&err));
            return TickOutcome::FetchFailed(err);
        }
    };

    let merged = repo.lock().reconcile(&fetched);
    match merged {
        Ok(report) => {
            info!(
                "event=sync_tick module=sync status=ok fetched={} added={} overwritten={} duration_ms={}",
                fetched.len(),
                report.added,
                report.overwritten,
                started_at.elapsed().as_millis()
            );
            notifier.notify(SYNC_SUCCESS_MESSAGE);
            TickOutcome::Merged(report)
        }
        Err(err) => {
            error!(
                "event=sync_tick module=sync status=error stage=persist duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            notifier.notify(&failure_message(&err));
            TickOutcome::PersistFailed(err.to_string())
        }
    }
}

/// Cancellable repeating sync task.
pub struct SyncScheduler {
    interval: Duration,
    sync_on_start: bool,
    stats: Arc<Mutex<SyncStats>>,
    stop_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl SyncScheduler {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            interval: config.interval(),
            sync_on_start: config.sync_on_start,
            stats: Arc::new(Mutex::new(SyncStats::default())),
            stop_tx: None,
            worker: None,
        }
    }

    /// Spawns the worker thread.
    ///
    /// # Errors
    /// - `AlreadyRunning` when a worker is active.
    /// - `Spawn` when the OS refuses a new thread.
    pub fn start<S>(
        &mut self,
        repo: SharedRepository<S>,
        remote: Arc<dyn RemoteSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<(), SchedulerError>
    where
        S: KeyValueStore + Send + 'static,
    {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }
        // Reap a worker that exited on its own.
        self.stop();

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let interval = self.interval;
        let sync_on_start = self.sync_on_start;
        let stats = Arc::clone(&self.stats);

        let worker = std::thread::Builder::new()
            .name("quote-sync".to_string())
            .spawn(move || {
                info!(
                    "event=sync_scheduler module=sync status=started interval_ms={}",
                    interval.as_millis()
                );
                let mut wait = if sync_on_start {
                    Duration::ZERO
                } else {
                    interval
                };
                loop {
                    match stop_rx.recv_timeout(wait) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }

                    let tick_started = Instant::now();
                    let outcome = run_sync_tick(repo.as_ref(), remote.as_ref(), notifier.as_ref());
                    stats.lock().record(&outcome);
                    wait = interval.saturating_sub(tick_started.elapsed());
                }
                info!("event=sync_scheduler module=sync status=stopped");
            })
            .map_err(SchedulerError::Spawn)?;

        self.stop_tx = Some(stop_tx);
        self.worker = Some(worker);
        Ok(())
    }

    /// Signals the worker and waits for it to exit.
    ///
    /// A tick already in progress finishes first. Calling `stop` on an idle
    /// scheduler is a no-op.
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("event=sync_scheduler module=sync status=error error_code=worker_panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns a snapshot of tick counters.
    pub fn stats(&self) -> SyncStats {
        self.stats.lock().clone()
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
