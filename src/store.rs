//! Local snapshot store: the durable fallback used when the remote
//! service is unreachable. One human-readable JSON blob holding the
//! authenticated-user snapshot and the per-user event list; written
//! wholesale on every mutation, read wholesale to seed state at startup.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{AppError, AppResult};
use crate::models::event::AttendanceEvent;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserSnapshot {
    pub id: String,
    pub name: String,
    pub role: String,
}

/// Whole persisted state. Exclusively owned by `SnapshotStore`; other
/// components go through its read/write contract and never hold onto a
/// shared copy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LocalSnapshot {
    pub authenticated_user: Option<UserSnapshot>,
    pub events_by_user: HashMap<String, Vec<AttendanceEvent>>,
}

impl LocalSnapshot {
    pub fn events_for(&self, user_id: &str) -> &[AttendanceEvent] {
        self.events_by_user
            .get(user_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn push_event(&mut self, event: AttendanceEvent) {
        self.events_by_user
            .entry(event.user_id.clone())
            .or_default()
            .push(event);
    }

    /// All events across users, preserving per-user insertion order.
    pub fn all_events(&self) -> Vec<AttendanceEvent> {
        let mut out = Vec::new();
        for events in self.events_by_user.values() {
            out.extend(events.iter().cloned());
        }
        out
    }
}

pub struct SnapshotStore {
    path: PathBuf,
    /// The blob is shared by every actor, so the whole read-modify-write
    /// must hold this lock; the engine's per-actor locks only cover the
    /// logical single-writer rule for one event stream.
    lock: Mutex<()>,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Standard location under the platform config dir.
    pub fn default_path() -> PathBuf {
        crate::config::Config::config_dir().join("attendance_snapshot.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted snapshot. An absent file is a fresh install; a
    /// corrupt blob is recovered transparently by resetting to the empty
    /// default (logged, never surfaced).
    pub fn read(&self) -> LocalSnapshot {
        let _guard = self.hold();
        self.read_unlocked()
    }

    /// Persist the whole snapshot, last-write-wins.
    pub fn write(&self, snapshot: &LocalSnapshot) -> AppResult<()> {
        let _guard = self.hold();
        self.write_unlocked(snapshot)
    }

    /// Atomic read-modify-write: `apply` mutates the current snapshot and
    /// the result is persisted under one store-wide critical section, so
    /// concurrent mutations for different actors cannot erase each other.
    /// Nothing is written when `apply` errors.
    pub fn update<T>(&self, apply: impl FnOnce(&mut LocalSnapshot) -> AppResult<T>) -> AppResult<T> {
        let _guard = self.hold();
        let mut snapshot = self.read_unlocked();
        let out = apply(&mut snapshot)?;
        self.write_unlocked(&snapshot)?;
        Ok(out)
    }

    fn hold(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_unlocked(&self) -> LocalSnapshot {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return LocalSnapshot::default(),
        };

        match serde_json::from_str(&content) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt snapshot, resetting to default");
                LocalSnapshot::default()
            }
        }
    }

    fn write_unlocked(&self, snapshot: &LocalSnapshot) -> AppResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| AppError::SnapshotWrite(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
