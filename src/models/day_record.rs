use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DayStatus {
    OnTime,
    Late,
    LeftEarly,
    /// Past day with a clock-in but no matching clock-out.
    MissingClockOut,
    /// Today, clocked in, still at work.
    NotYetClockedOut,
    /// Today, no events yet.
    NotYetClockedIn,
}

impl DayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayStatus::OnTime => "on_time",
            DayStatus::Late => "late",
            DayStatus::LeftEarly => "left_early",
            DayStatus::MissingClockOut => "missing_clock_out",
            DayStatus::NotYetClockedOut => "not_yet_clocked_out",
            DayStatus::NotYetClockedIn => "not_yet_clocked_in",
        }
    }
}

/// Derived attendance status for one actor on one calendar date.
/// A pure function of the events sharing its date — recomputed by the
/// aggregator, never independently mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub clock_in: Option<NaiveTime>,
    pub clock_out: Option<NaiveTime>,
    pub is_late: bool,
    pub is_early_leave: bool,
    pub is_missing_clock_out: bool,
    pub status: DayStatus,
    pub permission_note: Option<String>,
    pub permission_file: Option<String>,
    pub needs_approval: bool,
}
