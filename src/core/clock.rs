//! Clock action builder: turns a clock-in/out request into a canonical
//! event with lateness/early-leave flags computed against the applicable
//! shift boundaries.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::models::event::AttendanceEvent;
use crate::models::event_kind::EventKind;
use crate::models::permission::{ApprovalStatus, PermissionKind, PermissionRequest};
use crate::utils::time::minutes_between;

/// Configured start/end wall-clock times defining "on time".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShiftBoundaries {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Free-form justification attached to an irregular clock action.
#[derive(Debug, Clone, Default)]
pub struct Justification {
    pub note: String,
    pub attachment: Option<String>,
}

/// One clock action as submitted by the caller layer.
#[derive(Debug, Clone)]
pub struct ClockRequest {
    pub kind: EventKind,
    pub location: String,
    pub coordinates: Option<String>,
    pub photo_ref: Option<String>,
    pub justification: Option<Justification>,
}

impl ClockRequest {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            location: String::new(),
            coordinates: None,
            photo_ref: None,
            justification: None,
        }
    }
}

/// What the caller gets back from a clock action.
#[derive(Debug, Clone)]
pub struct ClockOutcome {
    pub event: AttendanceEvent,
    pub is_late: bool,
    pub is_early_leave: bool,
    pub late_minutes: i64,
}

/// Build the canonical event for one clock action. No same-kind
/// uniqueness is enforced here: duplicate clock-ins are tolerated and
/// resolved by the aggregator's last-write-wins tie-break.
pub fn build_event(
    id: String,
    actor: &str,
    now: NaiveDateTime,
    shift: &ShiftBoundaries,
    request: &ClockRequest,
) -> AppResult<ClockOutcome> {
    if let Some(j) = &request.justification
        && j.note.trim().is_empty()
    {
        return Err(AppError::Validation(
            "justification note must not be empty".into(),
        ));
    }

    let mut ev = AttendanceEvent::new(id, actor.to_string(), now.date(), now.time(), request.kind);
    ev.location = request.location.clone();
    ev.coordinates = request.coordinates.clone();

    let is_late = request.kind.is_in() && ev.time > shift.start;
    let late_minutes = if is_late {
        minutes_between(shift.start, ev.time).max(0)
    } else {
        0
    };
    let is_early_leave = request.kind.is_out() && ev.time < shift.end;

    ev.is_late = is_late;
    ev.late_minutes = late_minutes;
    ev.is_early_leave = is_early_leave;

    if request.justification.is_some() || is_late || is_early_leave {
        ev.approval_status = ApprovalStatus::Pending;

        // Lateness wins when both flags are set; a justification on an
        // otherwise regular event follows the event kind.
        let kind = if is_late {
            PermissionKind::Late
        } else if is_early_leave {
            PermissionKind::EarlyLeave
        } else if request.kind.is_in() {
            PermissionKind::Late
        } else {
            PermissionKind::EarlyLeave
        };
        let note = request
            .justification
            .as_ref()
            .map(|j| j.note.clone())
            .unwrap_or_default();
        let mut perm = PermissionRequest::new(format!("perm-{}", ev.id), ev.id.clone(), kind, note);
        perm.attachment = request.justification.as_ref().and_then(|j| j.attachment.clone());
        ev.permission = Some(perm);
    }

    Ok(ClockOutcome {
        is_late,
        is_early_leave,
        late_minutes,
        event: ev,
    })
}
