//! SQLite-backed key-value store
//!
//! One table, one row per logical key. Values are stored as text:
//! integers in decimal, booleans as `true`/`false`, the task list as JSON.
//! A malformed value is corruption, not a fatal error: the affected key
//! falls back to its default and the rest of the snapshot survives.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection};
use tracing::{info, warn};

use super::PersistedState;
use crate::engine::{EngineError, TaskSegment};

const KEY_ELAPSED: &str = "elapsed_seconds";
const KEY_RUNNING: &str = "is_running";
const KEY_START_EPOCH: &str = "start_epoch";
const KEY_CUTOFF: &str = "cutoff_elapsed";
const KEY_TASKS: &str = "tasks";

/// Durable store for the tracker snapshot.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (creating if needed) the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .with_context(|| format!("Failed to open database at {:?}", path.as_ref()))?;
        Self::init(conn)
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS tracker_kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create tracker_kv table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Write a full snapshot. All keys go in one transaction so a crash
    /// mid-write never leaves a half-updated snapshot.
    pub fn save(&self, state: &PersistedState) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut upsert = tx.prepare(
                "INSERT INTO tracker_kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            )?;
            upsert.execute(params![KEY_ELAPSED, state.elapsed_seconds.to_string()])?;
            upsert.execute(params![KEY_RUNNING, state.is_running.to_string()])?;
            upsert.execute(params![KEY_CUTOFF, state.cutoff_elapsed.to_string()])?;
            upsert.execute(params![KEY_TASKS, serde_json::to_string(&state.tasks)?])?;
        }
        // start_epoch is present iff running; delete rather than store a
        // sentinel so a stale instant can never be reconciled against.
        match state.start_epoch {
            Some(epoch) => {
                tx.execute(
                    "INSERT INTO tracker_kv (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    params![KEY_START_EPOCH, epoch.to_string()],
                )?;
            }
            None => {
                tx.execute(
                    "DELETE FROM tracker_kv WHERE key = ?1",
                    params![KEY_START_EPOCH],
                )?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Load the persisted snapshot, or `None` if nothing was ever saved.
    ///
    /// Corrupt values are logged and replaced by per-key defaults; load
    /// only fails on an actual database error.
    pub fn load(&self) -> Result<Option<PersistedState>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT key, value FROM tracker_kv")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut values: HashMap<String, String> = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            values.insert(key, value);
        }
        if values.is_empty() {
            return Ok(None);
        }

        let state = PersistedState {
            elapsed_seconds: parse_or_default(&values, KEY_ELAPSED, parse_u64, 0),
            is_running: parse_or_default(&values, KEY_RUNNING, parse_bool, false),
            start_epoch: optional_u64(&values, KEY_START_EPOCH),
            cutoff_elapsed: parse_or_default(&values, KEY_CUTOFF, parse_u64, 0),
            tasks: parse_or_default(&values, KEY_TASKS, parse_tasks, Vec::new()),
        };
        info!(
            "Loaded persisted state: elapsed={}s, running={}, {} task(s)",
            state.elapsed_seconds,
            state.is_running,
            state.tasks.len()
        );
        Ok(Some(state))
    }

    /// Delete every key this store owns. Invoked by reset.
    pub fn purge(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM tracker_kv", [])?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| anyhow!("Store mutex poisoned: {}", e))
    }
}

fn parse_u64(key: &'static str, raw: &str) -> Result<u64, EngineError> {
    raw.trim()
        .parse()
        .map_err(|e| EngineError::CorruptPersistence {
            key,
            detail: format!("{}", e),
        })
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, EngineError> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(EngineError::CorruptPersistence {
            key,
            detail: format!("expected true/false, got {:?}", other),
        }),
    }
}

fn parse_tasks(key: &'static str, raw: &str) -> Result<Vec<TaskSegment>, EngineError> {
    serde_json::from_str(raw).map_err(|e| EngineError::CorruptPersistence {
        key,
        detail: format!("{}", e),
    })
}

/// Parse `key` out of the loaded rows, falling back to `default` (with a
/// warning) when the key is absent or its value is corrupt.
fn parse_or_default<T, F>(
    values: &HashMap<String, String>,
    key: &'static str,
    parse: F,
    default: T,
) -> T
where
    F: Fn(&'static str, &str) -> Result<T, EngineError>,
{
    match values.get(key) {
        None => default,
        Some(raw) => match parse(key, raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("{}, falling back to default", e);
                default
            }
        },
    }
}

/// `start_epoch` is optional: absent means paused, corrupt means the
/// instant is unusable and must read as absent (the reconciler then
/// degrades a running flag to paused instead of inventing a baseline).
fn optional_u64(values: &HashMap<String, String>, key: &'static str) -> Option<u64> {
    let raw = values.get(key)?;
    match parse_u64(key, raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{}, treating as absent", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Tracker;

    fn running_snapshot() -> PersistedState {
        let mut tracker = Tracker::new();
        tracker.timer.start(1_000).unwrap();
        tracker.cut(1_010, Some("warmup".to_string())).unwrap();
        PersistedState::capture(&tracker)
    }

    #[test]
    fn test_empty_store_loads_none() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_load_round_trip() {
        let store = Store::open_in_memory().unwrap();
        let snapshot = running_snapshot();
        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap(), Some(snapshot));
    }

    #[test]
    fn test_snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.db");
        let snapshot = running_snapshot();

        let store = Store::open(&path).unwrap();
        store.save(&snapshot).unwrap();
        drop(store);

        let store = Store::open(&path).unwrap();
        assert_eq!(store.load().unwrap(), Some(snapshot));
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let store = Store::open_in_memory().unwrap();
        store.save(&running_snapshot()).unwrap();

        let mut tracker = running_snapshot().reconcile(1_020);
        tracker.timer.pause(1_020).unwrap();
        let paused = PersistedState::capture(&tracker);
        store.save(&paused).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert!(!loaded.is_running);
        // Pausing removes the start_epoch row entirely.
        assert_eq!(loaded.start_epoch, None);
    }

    #[test]
    fn test_purge_removes_every_key() {
        let store = Store::open_in_memory().unwrap();
        store.save(&running_snapshot()).unwrap();
        store.purge().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_corrupt_value_falls_back_per_key() {
        let store = Store::open_in_memory().unwrap();
        store.save(&running_snapshot()).unwrap();
        {
            let conn = store.conn.lock().unwrap();
            conn.execute(
                "UPDATE tracker_kv SET value = 'garbage' WHERE key = ?1",
                params![KEY_ELAPSED],
            )
            .unwrap();
        }
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.elapsed_seconds, 0);
        // Unrelated keys keep their values.
        assert_eq!(loaded.tasks.len(), 1);
        assert!(loaded.is_running);
    }

    #[test]
    fn test_corrupt_start_epoch_reads_as_absent() {
        let store = Store::open_in_memory().unwrap();
        store.save(&running_snapshot()).unwrap();
        {
            let conn = store.conn.lock().unwrap();
            conn.execute(
                "UPDATE tracker_kv SET value = 'not-a-number' WHERE key = ?1",
                params![KEY_START_EPOCH],
            )
            .unwrap();
        }
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.start_epoch, None);
        assert!(loaded.is_running);
        // Reconciliation then degrades to paused instead of guessing.
        let tracker = loaded.reconcile(2_000);
        assert!(!tracker.timer.running);
    }
}
