//! Error types for the core crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid matcher: {0}")]
    InvalidMatcher(String),

    #[error("Invalid contact point: {0}")]
    InvalidContactPoint(String),
}
