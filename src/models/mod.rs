pub mod day_record;
pub mod event;
pub mod event_kind;
pub mod permission;
