//! Day aggregator: groups canonical events by calendar date and derives
//! one `DayRecord` per date, newest first. Pure and idempotent — the
//! orchestrator recomputes affected records after every mutation.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::day_record::{DayRecord, DayStatus};
use crate::models::event::AttendanceEvent;
use crate::models::event_kind::EventKind;

/// Group `events` by date and derive the per-day status relative to
/// `today`. Future-dated events are not aggregated; a record for `today`
/// is always emitted even when no event exists yet.
pub fn aggregate(events: &[AttendanceEvent], today: NaiveDate) -> Vec<DayRecord> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&AttendanceEvent>> = BTreeMap::new();

    for ev in events {
        if ev.date <= today {
            by_date.entry(ev.date).or_default().push(ev);
        }
    }
    by_date.entry(today).or_default();

    // Newest date first.
    by_date
        .iter()
        .rev()
        .map(|(date, evs)| build_day(*date, evs, today))
        .collect()
}

fn build_day(date: NaiveDate, events: &[&AttendanceEvent], today: NaiveDate) -> DayRecord {
    // Duplicate same-kind events are tolerated: the last-seen one in
    // iteration order is authoritative for the clock fields.
    let mut clock_in: Option<&AttendanceEvent> = None;
    let mut clock_out: Option<&AttendanceEvent> = None;
    for ev in events {
        match ev.kind {
            EventKind::ClockIn => clock_in = Some(ev),
            EventKind::ClockOut => clock_out = Some(ev),
        }
    }

    let is_late = clock_in.is_some_and(|e| e.is_late);
    let is_early_leave = clock_out.is_some_and(|e| e.is_early_leave);
    let is_missing_clock_out = date < today && clock_in.is_some() && clock_out.is_none();

    let status = if date < today {
        if clock_in.is_some() && clock_out.is_none() {
            DayStatus::MissingClockOut
        } else {
            flagged_status(is_late, is_early_leave)
        }
    } else {
        match (clock_in, clock_out) {
            (Some(_), None) => DayStatus::NotYetClockedOut,
            (None, None) => DayStatus::NotYetClockedIn,
            _ => flagged_status(is_late, is_early_leave),
        }
    };

    // Any pending same-date event keeps the day flagged for review, even
    // when it lost the clock-field tie-break.
    let needs_approval = events.iter().any(|e| e.needs_approval());
    let (permission_note, permission_file) = permission_display(clock_in, clock_out);

    DayRecord {
        date,
        clock_in: clock_in.map(|e| e.time),
        clock_out: clock_out.map(|e| e.time),
        is_late,
        is_early_leave,
        is_missing_clock_out,
        status,
        permission_note,
        permission_file,
        needs_approval,
    }
}

fn flagged_status(is_late: bool, is_early_leave: bool) -> DayStatus {
    if is_late {
        DayStatus::Late
    } else if is_early_leave {
        DayStatus::LeftEarly
    } else {
        DayStatus::OnTime
    }
}

/// Note/attachment shown for the day come from whichever event carries
/// them; the clock-in permission takes precedence when both do.
fn permission_display(
    clock_in: Option<&AttendanceEvent>,
    clock_out: Option<&AttendanceEvent>,
) -> (Option<String>, Option<String>) {
    for ev in [clock_in, clock_out].into_iter().flatten() {
        if let Some(p) = &ev.permission {
            let note = (!p.note.is_empty()).then(|| p.note.clone());
            return (note, p.attachment.clone());
        }
    }
    (None, None)
}
