//! Error types for availability-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid rule: {0}")]
    InvalidRule(String),
}

pub type Result<T> = std::result::Result<T, AvailabilityError>;
