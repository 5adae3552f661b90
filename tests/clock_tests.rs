use attendance_engine::core::clock::build_event;
use attendance_engine::{AppError, ApprovalStatus, ClockRequest, EventKind, Justification, PermissionKind};

mod common;
use common::{date, shift, time};

fn at(d: &str, t: &str) -> chrono::NaiveDateTime {
    date(d).and_time(time(t))
}

#[test]
fn late_clock_in_scenario() {
    // 09:20 against a 09:00 shift start
    let outcome = build_event(
        "e1".into(),
        "u1",
        at("2024-03-10", "09:20"),
        &shift("09:00", "17:00"),
        &ClockRequest::new(EventKind::ClockIn),
    )
    .unwrap();

    assert!(outcome.is_late);
    assert_eq!(outcome.late_minutes, 20);
    assert!(!outcome.is_early_leave);
    assert_eq!(outcome.event.approval_status, ApprovalStatus::Pending);
    let p = outcome.event.permission.as_ref().unwrap();
    assert_eq!(p.kind, PermissionKind::Late);
    assert_eq!(p.event_id, "e1");
}

#[test]
fn on_time_clock_in_completes() {
    let outcome = build_event(
        "e1".into(),
        "u1",
        at("2024-03-10", "08:55"),
        &shift("09:00", "17:00"),
        &ClockRequest::new(EventKind::ClockIn),
    )
    .unwrap();

    assert!(!outcome.is_late);
    assert_eq!(outcome.late_minutes, 0);
    assert_eq!(outcome.event.approval_status, ApprovalStatus::Completed);
    assert!(outcome.event.permission.is_none());
}

#[test]
fn early_clock_out_goes_pending() {
    let outcome = build_event(
        "e2".into(),
        "u1",
        at("2024-03-10", "16:40"),
        &shift("09:00", "17:00"),
        &ClockRequest::new(EventKind::ClockOut),
    )
    .unwrap();

    assert!(outcome.is_early_leave);
    assert!(!outcome.is_late);
    assert_eq!(outcome.event.approval_status, ApprovalStatus::Pending);
    assert_eq!(
        outcome.event.permission.as_ref().unwrap().kind,
        PermissionKind::EarlyLeave
    );
}

#[test]
fn clock_out_at_shift_end_is_regular() {
    let outcome = build_event(
        "e2".into(),
        "u1",
        at("2024-03-10", "17:00"),
        &shift("09:00", "17:00"),
        &ClockRequest::new(EventKind::ClockOut),
    )
    .unwrap();

    assert!(!outcome.is_early_leave);
    assert_eq!(outcome.event.approval_status, ApprovalStatus::Completed);
}

#[test]
fn lateness_is_not_computed_for_clock_outs() {
    // leaving after shift start is not "late"
    let outcome = build_event(
        "e2".into(),
        "u1",
        at("2024-03-10", "18:00"),
        &shift("09:00", "17:00"),
        &ClockRequest::new(EventKind::ClockOut),
    )
    .unwrap();

    assert!(!outcome.is_late);
    assert_eq!(outcome.late_minutes, 0);
}

#[test]
fn justification_forces_review_even_when_on_time() {
    let mut request = ClockRequest::new(EventKind::ClockIn);
    request.justification = Some(Justification {
        note: "medical appointment later today".into(),
        attachment: Some("uploads/note.pdf".into()),
    });

    let outcome = build_event(
        "e3".into(),
        "u1",
        at("2024-03-10", "08:55"),
        &shift("09:00", "17:00"),
        &request,
    )
    .unwrap();

    assert_eq!(outcome.event.approval_status, ApprovalStatus::Pending);
    let p = outcome.event.permission.as_ref().unwrap();
    assert_eq!(p.note, "medical appointment later today");
    assert_eq!(p.attachment.as_deref(), Some("uploads/note.pdf"));
}

#[test]
fn empty_justification_note_is_rejected_before_any_write() {
    let mut request = ClockRequest::new(EventKind::ClockIn);
    request.justification = Some(Justification {
        note: "   ".into(),
        attachment: None,
    });

    let err = build_event(
        "e4".into(),
        "u1",
        at("2024-03-10", "09:20"),
        &shift("09:00", "17:00"),
        &request,
    )
    .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn capture_metadata_is_carried_onto_the_event() {
    let mut request = ClockRequest::new(EventKind::ClockIn);
    request.location = "HQ lobby".into();
    request.coordinates = Some("59.33,18.06".into());

    let outcome = build_event(
        "e5".into(),
        "u1",
        at("2024-03-10", "08:55"),
        &shift("09:00", "17:00"),
        &request,
    )
    .unwrap();

    assert_eq!(outcome.event.location, "HQ lobby");
    assert_eq!(outcome.event.coordinates.as_deref(), Some("59.33,18.06"));
}
