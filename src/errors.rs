//! Unified engine error type.
//! All modules (core, store, remote, config) return AppError to keep the
//! error handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Remote source
    // ---------------------------
    #[error("remote service unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("authentication required")]
    AuthRequired,

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    // ---------------------------
    // Logic errors
    // ---------------------------
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("request already decided: {0}")]
    AlreadyDecided(String),

    #[error("no event with id {0}")]
    EventNotFound(String),

    #[error("could not record attendance: {0}")]
    SnapshotWrite(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type AppResult<T> = Result<T, AppError>;
