//! Durable state store: key/value channel persistence plus the bounded
//! experience log.
//!
//! The contract is last-writer-wins: `save` is a total overwrite of every
//! channel and meta-attribute, never a merge. `recent_experiences` returns
//! records **newest first**. The log is capped at [`EXPERIENCE_LOG_CAP`]
//! entries with the oldest evicted first.

use std::collections::VecDeque;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection};

use crate::error::StoreError;
use crate::state::{Channel, EmotionalState, ExperienceRecord};

/// Maximum number of retained experience records.
pub const EXPERIENCE_LOG_CAP: usize = 100;

/// Persisted meta keys alongside the channel values.
const KEY_MATURITY: &str = "maturity";
const KEY_TEMPERAMENT: &str = "temperament_bias_guilt";
const KEY_LAST_UPDATE: &str = "last_update";

/// Durable state persistence contract.
pub trait StateStore: Send + Sync {
    /// Load the persisted state, or the canonical default on first-ever use.
    fn load(&self) -> Result<EmotionalState, StoreError>;

    /// Persist the full state. Total overwrite, last-writer-wins.
    fn save(&self, state: &EmotionalState) -> Result<(), StoreError>;

    /// Append one record, evicting the oldest beyond [`EXPERIENCE_LOG_CAP`].
    fn append_experience(&self, record: &ExperienceRecord) -> Result<(), StoreError>;

    /// Up to `n` records, newest first.
    fn recent_experiences(&self, n: usize) -> Result<Vec<ExperienceRecord>, StoreError>;
}

// ---------------------------------------------------------------------------
// SQLite store
// ---------------------------------------------------------------------------

/// SQLite-backed store: one key/value table for the state, one append-only
/// table for the experience log. A fresh connection is opened per call.
pub struct SqliteStateStore {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
}

impl SqliteStateStore {
    /// Open (creating if needed) the database at `db_path`.
    pub fn new(db_path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let store = Self { db_path };
        store.initialize_db()?;
        Ok(store)
    }

    fn initialize_db(&self) -> Result<(), StoreError> {
        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS affective_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS experience_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recorded_at TEXT NOT NULL,
                record TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Parse one persisted key into the state, defaulting that single entry
    /// on a malformed value instead of aborting the load.
    fn absorb_entry(state: &mut EmotionalState, key: &str, value: &str) {
        if let Some(channel) = Channel::from_name(key) {
            match value.parse::<f64>() {
                Ok(v) if v.is_finite() => state.set(channel, v),
                _ => log::warn!(
                    "stored value for channel '{}' is not numeric ({:?}); using default",
                    key,
                    value
                ),
            }
            return;
        }
        match key {
            KEY_MATURITY => match value.parse::<f64>() {
                // maturity never drops below 1.0
                Ok(v) if v.is_finite() => state.maturity = v.max(1.0),
                _ => log::warn!("stored maturity is not numeric ({:?}); using default", value),
            },
            KEY_TEMPERAMENT => match value.parse::<f64>() {
                Ok(v) if v.is_finite() && v > 0.0 => state.temperament_bias_guilt = v,
                _ => log::warn!(
                    "stored temperament bias is invalid ({:?}); using default",
                    value
                ),
            },
            KEY_LAST_UPDATE => match DateTime::parse_from_rfc3339(value) {
                Ok(ts) => state.last_update = ts.with_timezone(&Utc),
                Err(e) => log::warn!("stored last_update is malformed ({e}); using default"),
            },
            other => log::debug!("ignoring unknown persisted key '{other}'"),
        }
    }
}

impl StateStore for SqliteStateStore {
    fn load(&self) -> Result<EmotionalState, StoreError> {
        let conn = Connection::open(&self.db_path)?;
        let mut state = EmotionalState::new(Utc::now());

        let mut stmt = conn.prepare("SELECT key, value FROM affective_state")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (key, value) = row?;
            Self::absorb_entry(&mut state, &key, &value);
        }
        Ok(state)
    }

    fn save(&self, state: &EmotionalState) -> Result<(), StoreError> {
        let mut conn = Connection::open(&self.db_path)?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM affective_state", [])?;
        {
            let mut insert =
                tx.prepare("INSERT INTO affective_state (key, value) VALUES (?1, ?2)")?;
            for channel in Channel::ALL {
                insert.execute(params![channel.name(), state.get(channel).to_string()])?;
            }
            insert.execute(params![KEY_MATURITY, state.maturity.to_string()])?;
            insert.execute(params![
                KEY_TEMPERAMENT,
                state.temperament_bias_guilt.to_string()
            ])?;
            insert.execute(params![KEY_LAST_UPDATE, state.last_update.to_rfc3339()])?;
        }
        tx.commit()?;
        Ok(())
    }

    fn append_experience(&self, record: &ExperienceRecord) -> Result<(), StoreError> {
        let record_json = serde_json::to_string(record)?;
        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "INSERT INTO experience_log (recorded_at, record) VALUES (?1, ?2)",
            params![record.timestamp.to_rfc3339(), record_json],
        )?;
        // Evict the oldest entries beyond the cap.
        conn.execute(
            "DELETE FROM experience_log WHERE id NOT IN (
                SELECT id FROM experience_log ORDER BY id DESC LIMIT ?1
            )",
            params![EXPERIENCE_LOG_CAP as i64],
        )?;
        Ok(())
    }

    fn recent_experiences(&self, n: usize) -> Result<Vec<ExperienceRecord>, StoreError> {
        let conn = Connection::open(&self.db_path)?;
        let mut stmt =
            conn.prepare("SELECT record FROM experience_log ORDER BY id DESC LIMIT ?1")?;
        let rows = stmt.query_map(params![n as i64], |row| row.get::<_, String>(0))?;

        let mut records = Vec::new();
        for row in rows {
            let json = row?;
            match serde_json::from_str::<ExperienceRecord>(&json) {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("skipping malformed experience record: {e}"),
            }
        }
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryInner {
    state: Option<EmotionalState>,
    log: VecDeque<ExperienceRecord>,
}

/// In-memory store with the same contract, for tests and ephemeral agents.
#[derive(Default)]
pub struct MemoryStateStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<EmotionalState, StoreError> {
        Ok(self
            .inner
            .lock()
            .state
            .clone()
            .unwrap_or_else(|| EmotionalState::new(Utc::now())))
    }

    fn save(&self, state: &EmotionalState) -> Result<(), StoreError> {
        self.inner.lock().state = Some(state.clone());
        Ok(())
    }

    fn append_experience(&self, record: &ExperienceRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.log.push_back(record.clone());
        while inner.log.len() > EXPERIENCE_LOG_CAP {
            inner.log.pop_front();
        }
        Ok(())
    }

    fn recent_experiences(&self, n: usize) -> Result<Vec<ExperienceRecord>, StoreError> {
        Ok(self.inner.lock().log.iter().rev().take(n).cloned().collect())
    }
}

// ============================================================================
// Tests
// ============================================================================
