//! Field normalizer: maps raw event records of unknown shape (different
//! backend versions, the local fallback writer) into the canonical
//! `AttendanceEvent`. Total over arbitrary JSON — missing fields degrade
//! to safe defaults instead of failing.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::models::event::AttendanceEvent;
use crate::models::event_kind::EventKind;
use crate::models::permission::{ApprovalStatus, PermissionKind, PermissionRequest};
use crate::utils::date::{parse_date, parse_datetime, today};
use crate::utils::time::parse_time;

// Ordered candidate names per canonical field; first present, non-null
// value wins.
const ID_FIELDS: &[&str] = &["id", "event_id", "eventId", "attendance_id"];
const USER_FIELDS: &[&str] = &["user_id", "userId", "employee_id", "employeeId"];
const DATE_FIELDS: &[&str] = &["date", "attendance_date", "work_date", "day"];
const TIME_FIELDS: &[&str] = &["time", "clock_time", "attendance_time"];
const TIMESTAMP_FIELDS: &[&str] = &["timestamp", "datetime", "created_at", "createdAt"];
const KIND_FIELDS: &[&str] = &["kind", "type", "event_type", "label"];
const LOCATION_FIELDS: &[&str] = &["location", "place", "site"];
const COORD_FIELDS: &[&str] = &["coordinates", "coords", "geo"];
const LATE_FIELDS: &[&str] = &["is_late", "isLate", "late"];
const EARLY_FIELDS: &[&str] = &["is_early_leave", "isEarlyLeave", "early_leave", "earlyLeave"];
const LATE_MINUTES_FIELDS: &[&str] = &["late_minutes", "lateMinutes", "minutes_late"];
const REASON_FIELDS: &[&str] = &["reason", "reason_type", "reasonType"];
const STATUS_FIELDS: &[&str] = &["approval_status", "approvalStatus", "status"];
const PERMISSION_FIELDS: &[&str] = &["permission", "permission_request", "permissionRequest"];
const NOTE_FIELDS: &[&str] = &["note", "permission_note", "permissionNote", "message"];
const FILE_FIELDS: &[&str] = &["attachment", "file", "permission_file", "permissionFile"];

static LATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(late|lateness|tardy)\b").expect("valid regex literal"));
static EARLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bearly\b|\bleave\s+early\b").expect("valid regex literal"));

/// Normalize one raw record. Never errors: upstream shapes are not
/// contractually guaranteed, so every field has a defaulting path.
pub fn normalize_event(raw: &Value) -> AttendanceEvent {
    let (date, time) = resolve_date_time(raw);

    let kind = pick_str(raw, KIND_FIELDS)
        .map(|label| EventKind::from_label(&label))
        .unwrap_or(EventKind::ClockIn);

    let id = pick_str(raw, ID_FIELDS).unwrap_or_default();
    let user_id = pick_str(raw, USER_FIELDS).unwrap_or_default();

    let mut ev = AttendanceEvent::new(id, user_id, date, time, kind);
    ev.location = pick_str(raw, LOCATION_FIELDS).unwrap_or_default();
    ev.coordinates = pick_str(raw, COORD_FIELDS);

    // Irregularity flags: boolean-like fields first, then the free-text
    // reason classifier, else false.
    let reason = pick_str(raw, REASON_FIELDS).unwrap_or_default();
    ev.is_late = pick_bool(raw, LATE_FIELDS).unwrap_or_else(|| LATE_RE.is_match(&reason));
    ev.is_early_leave = pick_bool(raw, EARLY_FIELDS).unwrap_or_else(|| EARLY_RE.is_match(&reason));

    ev.late_minutes = pick_i64(raw, LATE_MINUTES_FIELDS).unwrap_or(0).max(0);
    if ev.late_minutes > 0 {
        ev.is_late = true;
    }

    let permission = resolve_permission(raw, &ev, &reason);
    let permission_status = permission.as_ref().map(|p| p.status);
    ev.permission = permission;

    ev.approval_status = pick_str(raw, STATUS_FIELDS)
        .and_then(|s| ApprovalStatus::from_wire_str(&s))
        .or(permission_status)
        .unwrap_or(if ev.is_late || ev.is_early_leave {
            ApprovalStatus::Pending
        } else {
            ApprovalStatus::Completed
        });

    ev
}

/// Explicit date/time fields win; a combined timestamp field covers both
/// halves when either is absent; the current clock is the last resort.
fn resolve_date_time(raw: &Value) -> (chrono::NaiveDate, chrono::NaiveTime) {
    let explicit_date = pick_str(raw, DATE_FIELDS).and_then(|s| parse_date(&s));
    let explicit_time = pick_str(raw, TIME_FIELDS).and_then(|s| parse_time(&s));

    if let (Some(d), Some(t)) = (explicit_date, explicit_time) {
        return (d, t);
    }

    let stamp = pick_str(raw, TIMESTAMP_FIELDS).and_then(|s| parse_datetime(&s));
    let now = crate::utils::date::now_naive();

    let date = explicit_date
        .or_else(|| stamp.map(|dt| dt.date()))
        .unwrap_or_else(today);
    let time = explicit_time
        .or_else(|| stamp.map(|dt| dt.time()))
        .unwrap_or_else(|| now.time());

    (date, time)
}

fn resolve_permission(raw: &Value, ev: &AttendanceEvent, reason: &str) -> Option<PermissionRequest> {
    let kind_from_flags = || {
        if ev.is_late {
            PermissionKind::Late
        } else {
            PermissionKind::EarlyLeave
        }
    };

    // Preferred shape: a nested permission object.
    if let Some(obj) = first_present(raw, PERMISSION_FIELDS) {
        let kind = pick_str(obj, &["kind", "type"])
            .and_then(|s| classify_permission_kind(&s))
            .unwrap_or_else(kind_from_flags);
        let mut req = PermissionRequest::new(
            pick_str(obj, ID_FIELDS).unwrap_or_default(),
            ev.id.clone(),
            kind,
            pick_str(obj, NOTE_FIELDS).unwrap_or_default(),
        );
        req.attachment = pick_str(obj, FILE_FIELDS);
        if let Some(status) = pick_str(obj, STATUS_FIELDS).and_then(|s| ApprovalStatus::from_wire_str(&s)) {
            req.status = status;
        }
        return Some(req);
    }

    // Flat shape: older producers inline the note next to the event.
    let note = pick_str(raw, NOTE_FIELDS);
    if (ev.is_late || ev.is_early_leave) && note.is_some() {
        let kind = classify_permission_kind(reason).unwrap_or_else(kind_from_flags);
        let mut req = PermissionRequest::new(String::new(), ev.id.clone(), kind, note.unwrap_or_default());
        req.attachment = pick_str(raw, FILE_FIELDS);
        return Some(req);
    }

    None
}

fn classify_permission_kind(label: &str) -> Option<PermissionKind> {
    if label.is_empty() {
        return None;
    }
    if LATE_RE.is_match(label) {
        Some(PermissionKind::Late)
    } else if EARLY_RE.is_match(label) {
        Some(PermissionKind::EarlyLeave)
    } else {
        PermissionKind::from_wire_str(label)
    }
}

// -----------------------------
// Candidate-list field access
// -----------------------------

fn first_present<'a>(raw: &'a Value, names: &[&str]) -> Option<&'a Value> {
    let obj = raw.as_object()?;
    names
        .iter()
        .filter_map(|n| obj.get(*n))
        .find(|v| !v.is_null())
}

/// String view of a field: strings pass through, numbers are rendered
/// (numeric ids are common), everything else is treated as absent.
fn pick_str(raw: &Value, names: &[&str]) -> Option<String> {
    match first_present(raw, names)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Boolean view of a field: accepts JSON booleans, 0/1 numerics, and the
/// usual textual spellings.
fn pick_bool(raw: &Value, names: &[&str]) -> Option<bool> {
    match first_present(raw, names)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_i64().unwrap_or(0) != 0),
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn pick_i64(raw: &Value, names: &[&str]) -> Option<i64> {
    match first_present(raw, names)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
