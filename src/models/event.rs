use super::event_kind::EventKind;
use super::permission::{ApprovalStatus, PermissionRequest};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Canonical attendance event, immutable once created (the only exception
/// is the approval transition applied by the state machine in
/// `core::approval`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttendanceEvent {
    /// Opaque identifier, unique within the owning user's event stream.
    /// Locally-queued events carry a `local-` prefix until the remote
    /// store assigns one.
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate, // workplace-local calendar date
    pub time: NaiveTime, // wall clock, minute resolution
    pub kind: EventKind,
    pub location: String,
    pub coordinates: Option<String>,
    pub is_late: bool,
    pub is_early_leave: bool,
    /// Meaningful only when `is_late` is true.
    pub late_minutes: i64,
    pub permission: Option<PermissionRequest>,
    pub approval_status: ApprovalStatus,
}

impl AttendanceEvent {
    /// High-level constructor for events created by the orchestrator.
    /// Flags default to false and the status to `Completed`; the caller
    /// fills them in before the event leaves the builder.
    pub fn new(id: String, user_id: String, date: NaiveDate, time: NaiveTime, kind: EventKind) -> Self {
        Self {
            id,
            user_id,
            date,
            time: truncate_to_minute(time),
            kind,
            location: String::new(),
            coordinates: None,
            is_late: false,
            is_early_leave: false,
            late_minutes: 0,
            permission: None,
            approval_status: ApprovalStatus::Completed,
        }
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn time_str(&self) -> String {
        self.time.format("%H:%M").to_string()
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn needs_approval(&self) -> bool {
        self.approval_status.is_pending()
    }

    /// True for events queued by the local fallback path and never
    /// confirmed by the remote store.
    pub fn is_local_only(&self) -> bool {
        self.id.starts_with("local-")
    }
}

/// Events carry minute resolution; seconds from a combined timestamp are
/// dropped rather than rounded.
pub fn truncate_to_minute(t: NaiveTime) -> NaiveTime {
    use chrono::Timelike;
    NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).unwrap_or(t)
}
