#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use serde_json::{Value, json};
use tempfile::TempDir;

use attendance_engine::{
    ActorScope, AppError, AppResult, AttendanceEngine, AttendanceEvent, EventKind, RemoteSource,
    ShiftBoundaries, SnapshotStore,
};

/// Scripted stand-in for the HTTP adapter. The engine owns one handle,
/// the test keeps a clone for failure injection and call inspection.
#[derive(Clone, Default)]
pub struct FakeRemote {
    state: Arc<FakeState>,
}

#[derive(Default)]
struct FakeState {
    history: Mutex<Vec<Value>>,
    clock_response: Mutex<Option<Value>>,
    review_response: Mutex<Option<Value>>,
    clock_calls: Mutex<Vec<Value>>,
    review_calls: Mutex<Vec<(String, String)>>,
    history_down: AtomicBool,
    clock_down: AtomicBool,
    review_down: AtomicBool,
    auth_expired: AtomicBool,
}

impl FakeRemote {
    pub fn set_history(&self, records: Vec<Value>) {
        *self.state.history.lock().unwrap() = records;
    }

    pub fn set_clock_response(&self, record: Value) {
        *self.state.clock_response.lock().unwrap() = Some(record);
    }

    pub fn set_review_response(&self, record: Value) {
        *self.state.review_response.lock().unwrap() = Some(record);
    }

    pub fn set_history_down(&self, down: bool) {
        self.state.history_down.store(down, Ordering::SeqCst);
    }

    pub fn set_clock_down(&self, down: bool) {
        self.state.clock_down.store(down, Ordering::SeqCst);
    }

    pub fn set_review_down(&self, down: bool) {
        self.state.review_down.store(down, Ordering::SeqCst);
    }

    pub fn set_auth_expired(&self, expired: bool) {
        self.state.auth_expired.store(expired, Ordering::SeqCst);
    }

    pub fn clock_calls(&self) -> Vec<Value> {
        self.state.clock_calls.lock().unwrap().clone()
    }

    pub fn review_calls(&self) -> Vec<(String, String)> {
        self.state.review_calls.lock().unwrap().clone()
    }
}

impl RemoteSource for FakeRemote {
    fn fetch_history(&self, _scope: ActorScope) -> AppResult<Vec<Value>> {
        if self.state.auth_expired.load(Ordering::SeqCst) {
            return Err(AppError::AuthRequired);
        }
        if self.state.history_down.load(Ordering::SeqCst) {
            return Err(AppError::RemoteUnavailable("connection refused".into()));
        }
        Ok(self.state.history.lock().unwrap().clone())
    }

    fn clock(&self, payload: &Value) -> AppResult<Value> {
        self.state.clock_calls.lock().unwrap().push(payload.clone());
        if self.state.auth_expired.load(Ordering::SeqCst) {
            return Err(AppError::AuthRequired);
        }
        if self.state.clock_down.load(Ordering::SeqCst) {
            return Err(AppError::RemoteUnavailable("timeout".into()));
        }
        let scripted = self.state.clock_response.lock().unwrap().clone();
        Ok(scripted.unwrap_or_else(|| json!({ "id": "srv-1" })))
    }

    fn review(&self, event_id: &str, status: &str) -> AppResult<Value> {
        self.state
            .review_calls
            .lock()
            .unwrap()
            .push((event_id.to_string(), status.to_string()));
        if self.state.auth_expired.load(Ordering::SeqCst) {
            return Err(AppError::AuthRequired);
        }
        if self.state.review_down.load(Ordering::SeqCst) {
            return Err(AppError::RemoteUnavailable("connection refused".into()));
        }
        let scripted = self.state.review_response.lock().unwrap().clone();
        Ok(scripted.unwrap_or_else(|| json!({ "success": true, "data": {} })))
    }
}

/// Snapshot path inside a per-test temp dir.
pub fn snapshot_path(dir: &TempDir) -> PathBuf {
    dir.path().join("attendance_snapshot.json")
}

/// Engine over a fake remote and a temp-dir snapshot store. Returns the
/// remote handle for scripting alongside the engine.
pub fn test_engine(dir: &TempDir) -> (AttendanceEngine, FakeRemote) {
    let remote = FakeRemote::default();
    let store = SnapshotStore::new(snapshot_path(dir));
    let engine = AttendanceEngine::new(Box::new(remote.clone()), store);
    (engine, remote)
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn time(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").unwrap()
}

pub fn shift(start: &str, end: &str) -> ShiftBoundaries {
    ShiftBoundaries {
        start: time(start),
        end: time(end),
    }
}

/// Bare canonical event for aggregator and store tests.
pub fn event(id: &str, user: &str, d: &str, t: &str, kind: EventKind) -> AttendanceEvent {
    AttendanceEvent::new(id.to_string(), user.to_string(), date(d), time(t), kind)
}
