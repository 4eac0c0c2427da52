//! Time Tally - A state-managed HTTP server for elapsed-time tracking
//!
//! This is the main entry point for the time-tally application.

use std::{sync::Arc, time::Duration};

use tokio::net::TcpListener;
use tracing::{info, warn};

use time_tally::{
    api::create_router,
    config::Config,
    engine::Tracker,
    state::AppState,
    store::Store,
    tasks::ticker_task,
    utils::{shutdown_signal, Clock, SystemClock},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("time_tally={},tower_http=info", config.log_level()))
        .init();

    info!("Starting time-tally server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, db={:?}, tick={}s",
        config.host, config.port, config.db, config.tick
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Open the store and reconcile persisted state against the clock:
    // a timer persisted as running is credited all wall-clock time since
    // its start instant, including time this process was not alive.
    let store = Store::open(&config.db)?;
    let tracker = match store.load()? {
        Some(persisted) => {
            let tracker = persisted.reconcile(clock.now());
            info!(
                "Reconciled persisted state: elapsed={}s, running={}, {} task(s)",
                tracker.timer.current_elapsed(clock.now()),
                tracker.timer.running,
                tracker.ledger.len()
            );
            tracker
        }
        None => {
            info!("No persisted state found, starting fresh");
            Tracker::new()
        }
    };

    // Create application state
    let state = Arc::new(AppState::new(
        tracker,
        store,
        clock,
        config.port,
        config.host.clone(),
    ));

    // Start the ticker background task; it arms itself if the reconciled
    // timer is already running
    let ticker_state = Arc::clone(&state);
    let tick_period = Duration::from_secs(config.tick.max(1));
    tokio::spawn(async move {
        ticker_task(ticker_state, tick_period).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start            - Begin a run segment");
    info!("  POST /pause            - Freeze elapsed time");
    info!("  POST /reset            - Zero the timer and purge persisted state");
    info!("  POST /task             - Cut the current task segment");
    info!("  POST /task/:id/rename  - Rename a task segment");
    info!("  POST /task/:id/remove  - Remove a task segment");
    info!("  GET  /status           - Timer, ledger and server metadata");
    info!("  GET  /health           - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Commands write through as they happen; this final save only matters
    // if the very last one failed
    if let Err(e) = state.persist() {
        warn!("Failed to persist state on shutdown: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
