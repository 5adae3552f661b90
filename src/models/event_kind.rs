use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventKind {
    ClockIn,
    ClockOut,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ClockIn => "clock_in",
            EventKind::ClockOut => "clock_out",
        }
    }

    /// Convert wire string → enum (exact match on the canonical encoding).
    pub fn from_wire_str(s: &str) -> Option<Self> {
        match s {
            "clock_in" => Some(EventKind::ClockIn),
            "clock_out" => Some(EventKind::ClockOut),
            _ => None,
        }
    }

    /// Classify a free-form type/label field coming from an arbitrary
    /// producer. Any label containing the token "out" (case-insensitive)
    /// is a clock-out; everything else, including an absent label, is a
    /// clock-in.
    pub fn from_label(label: &str) -> Self {
        if label.to_lowercase().contains("out") {
            EventKind::ClockOut
        } else {
            EventKind::ClockIn
        }
    }

    pub fn is_in(&self) -> bool {
        matches!(self, EventKind::ClockIn)
    }

    pub fn is_out(&self) -> bool {
        matches!(self, EventKind::ClockOut)
    }
}
