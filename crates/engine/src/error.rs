//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidFrequency`] thrown when a stored or requested frequency is unknown.
//! - [`MissingNextOccurrence`] thrown when an active rule has no cursor.
//! - [`Persistence`] thrown when the store cannot read or commit a unit of work.
//!
//!  [`InvalidFrequency`]: EngineError::InvalidFrequency
//!  [`MissingNextOccurrence`]: EngineError::MissingNextOccurrence
//!  [`Persistence`]: EngineError::Persistence
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),
    #[error("Missing next occurrence for rule {0}")]
    MissingNextOccurrence(String),
    #[error("Date out of range: {0}")]
    DateOutOfRange(String),
    #[error("Invalid rule: {0}")]
    InvalidRule(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Persistence failure: {0}")]
    Persistence(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidFrequency(a), Self::InvalidFrequency(b)) => a == b,
            (Self::MissingNextOccurrence(a), Self::MissingNextOccurrence(b)) => a == b,
            (Self::DateOutOfRange(a), Self::DateOutOfRange(b)) => a == b,
            (Self::InvalidRule(a), Self::InvalidRule(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Persistence(a), Self::Persistence(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
