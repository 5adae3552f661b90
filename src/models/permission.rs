use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApprovalStatus {
    /// No reviewer decision needed (regular on-time event).
    Completed,
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Completed => "completed",
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }

    /// Convert wire string → enum.
    pub fn from_wire_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "completed" | "complete" | "none" => Some(ApprovalStatus::Completed),
            "pending" | "waiting" => Some(ApprovalStatus::Pending),
            "approved" | "accepted" => Some(ApprovalStatus::Approved),
            "rejected" | "denied" => Some(ApprovalStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ApprovalStatus::Pending)
    }

    /// Terminal states: a decision was taken, or none was ever required.
    pub fn is_decided(&self) -> bool {
        !self.is_pending()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PermissionKind {
    Late,
    EarlyLeave,
}

impl PermissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionKind::Late => "late",
            PermissionKind::EarlyLeave => "early_leave",
        }
    }

    pub fn from_wire_str(s: &str) -> Option<Self> {
        match s {
            "late" => Some(PermissionKind::Late),
            "early_leave" => Some(PermissionKind::EarlyLeave),
            _ => None,
        }
    }
}

/// Justification attached to an irregular clock action, awaiting (or
/// carrying) a reviewer decision. Created atomically with its event;
/// immutable once decided.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PermissionRequest {
    pub id: String,
    /// Back-reference to the owning event (non-owning).
    pub event_id: String,
    pub kind: PermissionKind,
    pub note: String,
    /// Opaque reference to an uploaded supporting document, if any.
    pub attachment: Option<String>,
    pub status: ApprovalStatus,
    pub decided_by: Option<String>,
    pub decided_at: Option<NaiveDateTime>,
}

impl PermissionRequest {
    pub fn new(id: String, event_id: String, kind: PermissionKind, note: String) -> Self {
        Self {
            id,
            event_id,
            kind,
            note,
            attachment: None,
            status: ApprovalStatus::Pending,
            decided_by: None,
            decided_at: None,
        }
    }
}
