//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::engine::{EngineError, TaskSegment, Tracker};
use crate::store::{PersistedState, Store};
use crate::utils::Clock;

use super::{TaskView, TimerSnapshot};

/// Failure of a tracker command.
///
/// `Engine` rejections are expected and leave state untouched; `Internal`
/// covers plumbing failures (a poisoned lock) that clients see as 500.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Application state: the tracker behind one mutex, the write-through
/// store, the clock, and the channels the ticker and presentation watch.
pub struct AppState {
    /// Timer and ledger as a unit; `cut` needs both under one lock.
    tracker: Mutex<Tracker>,
    store: Store,
    clock: Arc<dyn Clock>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Arms the ticker while the timer runs, cancels it when paused
    pub run_signal_tx: watch::Sender<bool>,
    /// Snapshot feed the ticker publishes on
    pub snapshot_tx: watch::Sender<TimerSnapshot>,
    /// Keep receivers alive to prevent channel closure
    _run_signal_rx: watch::Receiver<bool>,
    _snapshot_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    /// Wrap an already-reconciled tracker. The run signal starts in the
    /// tracker's run state so a timer that was running across the restart
    /// re-arms the ticker immediately.
    pub fn new(
        tracker: Tracker,
        store: Store,
        clock: Arc<dyn Clock>,
        port: u16,
        host: String,
    ) -> Self {
        let running = tracker.timer.running;
        let initial = TimerSnapshot::of(&tracker, clock.now());
        let (run_signal_tx, run_signal_rx) = watch::channel(running);
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);

        Self {
            tracker: Mutex::new(tracker),
            store,
            clock,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            run_signal_tx,
            snapshot_tx,
            _run_signal_rx: run_signal_rx,
            _snapshot_rx: snapshot_rx,
        }
    }

    /// Run one command against the tracker.
    ///
    /// On success the new snapshot is written through to the store before
    /// anything observes it, last-action tracking is updated and the run
    /// signal refreshed. A rejected command changes nothing, on purpose.
    fn command<T, F>(&self, action: &str, apply: F) -> Result<T, CommandError>
    where
        F: FnOnce(&mut Tracker, u64) -> Result<T, EngineError>,
    {
        let now = self.clock.now();
        let mut tracker = self
            .tracker
            .lock()
            .map_err(|e| CommandError::Internal(format!("Failed to lock tracker: {}", e)))?;

        let result = apply(&mut *tracker, now)?;

        // Write-through: persistence failures are logged, never surfaced,
        // but the write is ordered before the lock is released.
        if let Err(e) = self.store.save(&PersistedState::capture(&tracker)) {
            warn!("Failed to persist state after '{}': {}", action, e);
        }
        let running = tracker.timer.running;
        let snapshot = TimerSnapshot::of(&tracker, now);
        drop(tracker);

        self.record_action(action);
        if let Err(e) = self.snapshot_tx.send(snapshot) {
            warn!("Failed to send snapshot update: {}", e);
        }
        if let Err(e) = self.run_signal_tx.send(running) {
            warn!("Failed to send run signal: {}", e);
        }
        Ok(result)
    }

    /// Begin a run segment.
    pub fn start(&self) -> Result<TimerSnapshot, CommandError> {
        info!("Starting timer");
        self.command("start", |tracker, now| {
            tracker.timer.start(now)?;
            Ok(())
        })?;
        self.snapshot()
    }

    /// End the current run segment, freezing elapsed time.
    pub fn pause(&self) -> Result<TimerSnapshot, CommandError> {
        info!("Pausing timer");
        self.command("pause", |tracker, now| {
            tracker.timer.pause(now)?;
            Ok(())
        })?;
        self.snapshot()
    }

    /// Zero the timer, empty the ledger and purge every persisted key.
    pub fn reset(&self) -> Result<TimerSnapshot, CommandError> {
        info!("Resetting timer and ledger");
        let mut tracker = self
            .tracker
            .lock()
            .map_err(|e| CommandError::Internal(format!("Failed to lock tracker: {}", e)))?;
        tracker.reset();
        if let Err(e) = self.store.purge() {
            warn!("Failed to purge persisted state: {}", e);
        }
        let snapshot = TimerSnapshot::of(&tracker, self.clock.now());
        drop(tracker);

        self.record_action("reset");
        if let Err(e) = self.snapshot_tx.send(snapshot.clone()) {
            warn!("Failed to send snapshot update: {}", e);
        }
        if let Err(e) = self.run_signal_tx.send(false) {
            warn!("Failed to send run signal: {}", e);
        }
        Ok(snapshot)
    }

    /// Close the current task segment, optionally named.
    pub fn cut(&self, name: Option<String>) -> Result<TaskView, CommandError> {
        info!("Cutting task segment");
        let segment: TaskSegment =
            self.command("cut", |tracker, now| tracker.cut(now, name))?;
        Ok(TaskView::from(&segment))
    }

    /// Rename the task with id `id`.
    pub fn rename_task(&self, id: u64, new_name: String) -> Result<TaskView, CommandError> {
        info!("Renaming task {}", id);
        let segment = self.command("rename", |tracker, _now| {
            tracker.ledger.rename(id, new_name).map(|s| s.clone())
        })?;
        Ok(TaskView::from(&segment))
    }

    /// Remove the task with id `id`.
    pub fn remove_task(&self, id: u64) -> Result<TaskView, CommandError> {
        info!("Removing task {}", id);
        let segment = self.command("remove", |tracker, _now| tracker.ledger.remove(id))?;
        Ok(TaskView::from(&segment))
    }

    /// Current timer snapshot. Pure read at the current clock instant.
    pub fn snapshot(&self) -> Result<TimerSnapshot, CommandError> {
        let tracker = self
            .tracker
            .lock()
            .map_err(|e| CommandError::Internal(format!("Failed to lock tracker: {}", e)))?;
        Ok(TimerSnapshot::of(&tracker, self.clock.now()))
    }

    /// Current ledger contents as rendered views.
    pub fn tasks(&self) -> Result<Vec<TaskView>, CommandError> {
        let tracker = self
            .tracker
            .lock()
            .map_err(|e| CommandError::Internal(format!("Failed to lock tracker: {}", e)))?;
        Ok(tracker.ledger.segments().iter().map(TaskView::from).collect())
    }

    /// Recompute and publish the current snapshot; the ticker's only job.
    pub fn publish_tick(&self) {
        match self.snapshot() {
            Ok(snapshot) => {
                if let Err(e) = self.snapshot_tx.send(snapshot) {
                    warn!("Failed to send tick snapshot: {}", e);
                }
            }
            Err(e) => warn!("Failed to read snapshot on tick: {}", e),
        }
    }

    /// Persist the current snapshot explicitly (shutdown path).
    pub fn persist(&self) -> Result<(), CommandError> {
        let tracker = self
            .tracker
            .lock()
            .map_err(|e| CommandError::Internal(format!("Failed to lock tracker: {}", e)))?;
        self.store
            .save(&PersistedState::capture(&tracker))
            .map_err(|e| CommandError::Internal(format!("Failed to persist state: {}", e)))
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
