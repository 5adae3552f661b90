use chrono::NaiveDate;

use attendance_engine::core::approval::{Decision, apply_decision};
use attendance_engine::{ApprovalStatus, AppError, EventKind, PermissionKind, PermissionRequest, aggregate};

mod common;
use common::{date, event};

fn pending_event() -> attendance_engine::AttendanceEvent {
    let mut ev = event("e1", "u1", "2024-03-10", "09:20", EventKind::ClockIn);
    ev.is_late = true;
    ev.late_minutes = 20;
    ev.approval_status = ApprovalStatus::Pending;
    ev.permission = Some(PermissionRequest::new(
        "p1".into(),
        "e1".into(),
        PermissionKind::Late,
        "traffic".into(),
    ));
    ev
}

fn decided_at() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 11)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

#[test]
fn approving_a_pending_event_is_terminal() {
    let mut ev = pending_event();

    apply_decision(&mut ev, Decision::Approved, "mgr-1", decided_at()).unwrap();

    assert_eq!(ev.approval_status, ApprovalStatus::Approved);
    let p = ev.permission.as_ref().unwrap();
    assert_eq!(p.status, ApprovalStatus::Approved);
    assert_eq!(p.decided_by.as_deref(), Some("mgr-1"));
    assert_eq!(p.decided_at, Some(decided_at()));
}

#[test]
fn rejecting_a_pending_event_is_terminal() {
    let mut ev = pending_event();
    apply_decision(&mut ev, Decision::Rejected, "mgr-1", decided_at()).unwrap();
    assert_eq!(ev.approval_status, ApprovalStatus::Rejected);
}

#[test]
fn second_decision_is_a_conflict_and_leaves_state_unchanged() {
    let mut ev = pending_event();
    apply_decision(&mut ev, Decision::Approved, "mgr-1", decided_at()).unwrap();
    let before = ev.clone();

    let err = apply_decision(&mut ev, Decision::Rejected, "mgr-2", decided_at()).unwrap_err();
    assert!(matches!(err, AppError::AlreadyDecided(id) if id == "e1"));
    assert_eq!(ev, before);
}

#[test]
fn completed_events_are_not_eligible() {
    let mut ev = event("e2", "u1", "2024-03-10", "08:55", EventKind::ClockIn);
    assert_eq!(ev.approval_status, ApprovalStatus::Completed);

    let err = apply_decision(&mut ev, Decision::Approved, "mgr-1", decided_at()).unwrap_err();
    assert!(matches!(err, AppError::AlreadyDecided(_)));
}

#[test]
fn decision_flips_the_owning_day_record() {
    let today = date("2024-03-12");
    let mut ev = pending_event();

    let before = aggregate(std::slice::from_ref(&ev), today);
    let day = before.iter().find(|r| r.date == ev.date).unwrap();
    assert!(day.needs_approval);

    apply_decision(&mut ev, Decision::Approved, "mgr-1", decided_at()).unwrap();

    let after = aggregate(std::slice::from_ref(&ev), today);
    let day = after.iter().find(|r| r.date == ev.date).unwrap();
    assert!(!day.needs_approval);
}

#[test]
fn decision_round_trips_through_wire_strings() {
    assert_eq!(Decision::from_wire_str("approved"), Some(Decision::Approved));
    assert_eq!(Decision::from_wire_str("REJECTED"), Some(Decision::Rejected));
    assert_eq!(Decision::from_wire_str("maybe"), None);
    assert_eq!(Decision::Approved.as_str(), "approved");
}
