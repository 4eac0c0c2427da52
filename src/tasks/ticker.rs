//! Periodic tick background task
//!
//! The tick never counts: each firing re-reads `current_elapsed` through
//! [`AppState::publish_tick`], so a delayed or coalesced tick publishes
//! the correct value instead of drifting. The interval exists only while
//! the timer runs; pausing cancels it and starting re-arms it.

use std::{sync::Arc, time::Duration};

use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::state::AppState;

/// Drive snapshot publication while the timer is running.
///
/// Watches the run signal: parked while paused, ticking every `period`
/// while running. Returns only when the application state is dropped.
pub async fn ticker_task(state: Arc<AppState>, period: Duration) {
    info!("Starting ticker task ({}s period)", period.as_secs());

    let mut run_rx = state.run_signal_tx.subscribe();

    loop {
        // Park until the timer starts running.
        while !*run_rx.borrow_and_update() {
            if run_rx.changed().await.is_err() {
                debug!("Run signal channel closed, stopping ticker");
                return;
            }
        }

        debug!("Timer running, arming tick interval");
        let mut interval = tokio::time::interval(period);
        // A missed tick is simply skipped; the next read self-corrects.
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    state.publish_tick();
                }
                changed = run_rx.changed() => {
                    if changed.is_err() {
                        debug!("Run signal channel closed, stopping ticker");
                        return;
                    }
                    if !*run_rx.borrow_and_update() {
                        debug!("Timer paused, cancelling tick interval");
                        break;
                    }
                    // Still running (a cut or rename fired the signal);
                    // keep the current interval.
                }
            }
        }
    }
}
