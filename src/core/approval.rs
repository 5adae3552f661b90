//! Approval state machine: `pending → approved | rejected`, terminal once
//! decided.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::models::event::AttendanceEvent;
use crate::models::permission::ApprovalStatus;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approved => "approved",
            Decision::Rejected => "rejected",
        }
    }

    pub fn from_wire_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "approved" | "approve" => Some(Decision::Approved),
            "rejected" | "reject" => Some(Decision::Rejected),
            _ => None,
        }
    }

    pub fn as_status(&self) -> ApprovalStatus {
        match self {
            Decision::Approved => ApprovalStatus::Approved,
            Decision::Rejected => ApprovalStatus::Rejected,
        }
    }
}

/// Apply a reviewer decision to a pending event. Updates the event status
/// and its embedded permission request in one step; anything other than a
/// pending event is `AlreadyDecided`.
pub fn apply_decision(
    event: &mut AttendanceEvent,
    decision: Decision,
    decided_by: &str,
    decided_at: NaiveDateTime,
) -> AppResult<()> {
    if !event.approval_status.is_pending() {
        return Err(AppError::AlreadyDecided(event.id.clone()));
    }

    event.approval_status = decision.as_status();
    if let Some(p) = event.permission.as_mut() {
        p.status = decision.as_status();
        p.decided_by = Some(decided_by.to_string());
        p.decided_at = Some(decided_at);
    }

    Ok(())
}
