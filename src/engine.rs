//! Engine facade: the single entry point the presentation layer talks to.
//! Composes the normalizer, the remote adapter (with local snapshot
//! fallback) and the day aggregator. Mutation is serialized per actor,
//! and every snapshot write goes through the store's atomic
//! read-modify-write.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Value, json};
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::core::aggregate::aggregate;
use crate::core::approval::{Decision, apply_decision};
use crate::core::clock::{ClockOutcome, ClockRequest, ShiftBoundaries, build_event};
use crate::core::normalize::normalize_event;
use crate::errors::{AppError, AppResult};
use crate::models::day_record::DayRecord;
use crate::models::event::AttendanceEvent;
use crate::remote::{ActorScope, HttpRemote, RemoteSource};
use crate::store::{LocalSnapshot, SnapshotStore, UserSnapshot};
use crate::utils::date::{now_naive, today};

pub struct AttendanceEngine {
    remote: Box<dyn RemoteSource>,
    store: SnapshotStore,
    /// One mutex per actor: clock actions and approval decisions for the
    /// same event stream are serialized, cross-actor work runs in
    /// parallel.
    actor_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    local_seq: AtomicU64,
    fetch_epoch: AtomicU64,
}

impl AttendanceEngine {
    pub fn new(remote: Box<dyn RemoteSource>, store: SnapshotStore) -> Self {
        Self {
            remote,
            store,
            actor_locks: Mutex::new(HashMap::new()),
            local_seq: AtomicU64::new(0),
            fetch_epoch: AtomicU64::new(0),
        }
    }

    /// Wire up the HTTP adapter and the standard snapshot location from
    /// the configuration file.
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let remote = HttpRemote::new(
            &cfg.remote_base_url,
            cfg.auth_token.clone(),
            cfg.request_timeout_secs,
        )?;
        let store = SnapshotStore::new(&cfg.snapshot_file);
        Ok(Self::new(Box::new(remote), store))
    }

    // -----------------------------
    // History
    // -----------------------------

    /// Fetch the event history for `actor` (or the whole team), falling
    /// back to the local snapshot when the remote source is unreachable.
    /// Locally-queued events the remote does not know about yet are
    /// retained, not silently dropped.
    pub fn fetch_history(&self, actor: &str, scope: ActorScope) -> AppResult<Vec<AttendanceEvent>> {
        match self.remote.fetch_history(scope) {
            Ok(raw) => {
                let mut events: Vec<AttendanceEvent> = raw.iter().map(normalize_event).collect();
                debug!(count = events.len(), "normalized remote history");

                let snapshot = self.store.read();
                let queued = match scope {
                    ActorScope::Current => snapshot.events_for(actor).to_vec(),
                    ActorScope::Team => snapshot.all_events(),
                };
                events.extend(queued.into_iter().filter(AttendanceEvent::is_local_only));
                Ok(events)
            }
            Err(AppError::RemoteUnavailable(e)) => {
                warn!(error = %e, "remote history unavailable, seeding from snapshot");
                let snapshot = self.store.read();
                Ok(match scope {
                    ActorScope::Current => snapshot.events_for(actor).to_vec(),
                    ActorScope::Team => snapshot.all_events(),
                })
            }
            Err(other) => Err(other),
        }
    }

    /// Last-request-wins variant for view refreshes: when another fetch
    /// for the same view starts while this one is in flight, the stale
    /// result is discarded (`Ok(None)`) instead of being applied.
    pub fn fetch_history_latest(
        &self,
        actor: &str,
        scope: ActorScope,
    ) -> AppResult<Option<Vec<AttendanceEvent>>> {
        let ticket = self.fetch_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let events = self.fetch_history(actor, scope)?;

        if self.fetch_epoch.load(Ordering::SeqCst) != ticket {
            debug!("history fetch superseded by a newer request");
            return Ok(None);
        }
        Ok(Some(events))
    }

    // -----------------------------
    // Clock actions
    // -----------------------------

    /// Record one clock-in/out. Exactly one durable write happens per
    /// call: the remote store when reachable, the local snapshot
    /// otherwise. Only a double failure surfaces to the caller.
    pub fn clock(
        &self,
        actor: &str,
        request: &ClockRequest,
        shift: &ShiftBoundaries,
    ) -> AppResult<ClockOutcome> {
        let lock = self.actor_lock(actor);
        let _guard = hold(&lock);

        let outcome = build_event(self.next_local_id(), actor, now_naive(), shift, request)?;
        let payload = clock_payload(&outcome.event, request);

        match self.remote.clock(&payload) {
            Ok(raw) => {
                let confirmed = normalize_event(&raw);
                let mut outcome = outcome;
                // Adopt the id the remote store assigned; everything else
                // was computed at creation time against the caller's
                // shift boundaries and stays authoritative.
                if !confirmed.id.is_empty() {
                    outcome.event.id = confirmed.id;
                    let id = outcome.event.id.clone();
                    if let Some(p) = outcome.event.permission.as_mut() {
                        p.event_id = id;
                    }
                }
                Ok(outcome)
            }
            Err(e @ (AppError::RemoteUnavailable(_) | AppError::AuthRequired)) => {
                warn!(error = %e, "remote clock write failed, queueing locally");
                let queued = self.store.update(|snapshot| {
                    snapshot.push_event(outcome.event.clone());
                    Ok(())
                });
                if let Err(write_err) = queued {
                    error!(error = %write_err, "both remote and local write paths failed");
                    return Err(write_err);
                }
                Ok(outcome)
            }
            Err(other) => Err(other),
        }
    }

    // -----------------------------
    // Approval decisions
    // -----------------------------

    /// Apply a reviewer decision to a pending event and return the
    /// recomputed owning day record. The remote review is attempted
    /// first; a transient failure falls through to the local copy.
    pub fn decide(
        &self,
        event_id: &str,
        decision: Decision,
        decided_by: &str,
    ) -> AppResult<DayRecord> {
        let remote_result = match self.remote.review(event_id, decision.as_str()) {
            Err(AppError::AuthRequired) => return Err(AppError::AuthRequired),
            Err(AppError::RemoteUnavailable(e)) => {
                warn!(error = %e, "remote review unavailable, deciding on local copy");
                None
            }
            Err(other) => return Err(other),
            Ok(raw) => Some(raw),
        };

        if let Some(owner) = self.owner_of(event_id) {
            let lock = self.actor_lock(&owner);
            let _guard = hold(&lock);

            // Nothing is persisted when the transition is rejected.
            let record = self.store.update(|snapshot| {
                let events = snapshot
                    .events_by_user
                    .get_mut(&owner)
                    .ok_or_else(|| AppError::EventNotFound(event_id.to_string()))?;
                let event = events
                    .iter_mut()
                    .find(|e| e.id == event_id)
                    .ok_or_else(|| AppError::EventNotFound(event_id.to_string()))?;

                apply_decision(event, decision, decided_by, now_naive())?;
                let date = event.date;

                Ok(aggregate(events, today())
                    .into_iter()
                    .find(|r| r.date == date))
            })?;

            return record.ok_or_else(|| AppError::EventNotFound(event_id.to_string()));
        }

        // No local copy: the event lives only remotely. Derive the owning
        // day record from the updated record the review returned.
        match remote_result {
            Some(raw) => {
                let event = normalize_event(&raw);
                let date = event.date;
                aggregate(&[event], today())
                    .into_iter()
                    .find(|r| r.date == date)
                    .ok_or_else(|| AppError::EventNotFound(event_id.to_string()))
            }
            None => Err(AppError::EventNotFound(event_id.to_string())),
        }
    }

    // -----------------------------
    // Aggregation / identity
    // -----------------------------

    /// Derive day records from an event list, newest date first.
    pub fn aggregate(&self, events: &[AttendanceEvent]) -> Vec<DayRecord> {
        aggregate(events, today())
    }

    /// Persist the authenticated-user identity so the offline path can
    /// seed it after a restart.
    pub fn remember_user(&self, user: UserSnapshot) -> AppResult<()> {
        let lock = self.actor_lock(&user.id);
        let _guard = hold(&lock);

        self.store.update(|snapshot| {
            snapshot.authenticated_user = Some(user);
            Ok(())
        })
    }

    /// Forced session reset (401-class failures): drop the remembered
    /// identity but keep the queued events.
    pub fn reset_session(&self) -> AppResult<()> {
        self.store.update(|snapshot| {
            snapshot.authenticated_user = None;
            Ok(())
        })
    }

    pub fn snapshot(&self) -> LocalSnapshot {
        self.store.read()
    }

    // -----------------------------
    // Internals
    // -----------------------------

    fn actor_lock(&self, actor: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .actor_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.entry(actor.to_string()).or_default().clone()
    }

    fn owner_of(&self, event_id: &str) -> Option<String> {
        let snapshot = self.store.read();
        snapshot
            .events_by_user
            .iter()
            .find(|(_, events)| events.iter().any(|e| e.id == event_id))
            .map(|(user, _)| user.clone())
    }

    /// Ids for locally-queued events; replaced by the remote-assigned id
    /// when the write is confirmed.
    fn next_local_id(&self) -> String {
        let seq = self.local_seq.fetch_add(1, Ordering::Relaxed);
        format!(
            "local-{}-{}",
            chrono::Utc::now().timestamp_millis(),
            seq
        )
    }
}

fn hold(lock: &Arc<Mutex<()>>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Wire payload for the remote clock endpoint.
fn clock_payload(event: &AttendanceEvent, request: &ClockRequest) -> Value {
    let mut payload = json!({
        "kind": event.kind.as_str(),
        "photoRef": request.photo_ref,
        "location": event.location,
        "coordinates": event.coordinates,
        "date": event.date_str(),
        "time": event.time_str(),
    });

    if let Some(p) = &event.permission {
        payload["permission"] = json!({
            "type": p.kind.as_str(),
            "note": p.note,
            "attachment": p.attachment,
        });
    }

    payload
}
