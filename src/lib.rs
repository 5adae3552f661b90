//! Attendance event reconciliation engine.
//!
//! Ingests heterogeneous raw clock-in/out records (from a remote service
//! or, when unreachable, from a local fallback snapshot), normalizes them
//! into one canonical shape, derives per-day attendance status, and
//! manages the lifecycle of permission requests attached to irregular
//! events. The presentation layer of the surrounding HR application is an
//! external caller of [`AttendanceEngine`].

pub mod config;
pub mod core;
pub mod engine;
pub mod errors;
pub mod models;
pub mod remote;
pub mod store;
pub mod utils;

pub use crate::core::aggregate::aggregate;
pub use crate::core::approval::Decision;
pub use crate::core::clock::{ClockOutcome, ClockRequest, Justification, ShiftBoundaries};
pub use crate::core::normalize::normalize_event;
pub use config::Config;
pub use engine::AttendanceEngine;
pub use errors::{AppError, AppResult};
pub use models::day_record::{DayRecord, DayStatus};
pub use models::event::AttendanceEvent;
pub use models::event_kind::EventKind;
pub use models::permission::{ApprovalStatus, PermissionKind, PermissionRequest};
pub use remote::{ActorScope, HttpRemote, RemoteSource};
pub use store::{LocalSnapshot, SnapshotStore, UserSnapshot};
