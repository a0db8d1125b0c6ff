//! Error types for the phase timer and the application around it

use thiserror::Error;

/// Errors raised by timer operations. None of them are fatal; a rejected
/// operation leaves the timer exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// A phase duration was zero, negative, or not a whole number of seconds
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The operation is not allowed in the timer's current state
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),
}

/// Errors surfaced by the shared application state.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Timer(#[from] TimerError),

    #[error("failed to lock timer state: {0}")]
    StateLock(String),
}
