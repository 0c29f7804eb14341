//! Unified error types for the domain layer
//!
//! `DomainError` covers value-object parsing and catalog lookups.
//! `GameError` is the taxonomy surfaced by the session state machine.

use thiserror::Error;

use crate::entities::GameAttemptResult;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// # Example
    /// ```ignore
    /// if time_limit_seconds <= 0 {
    ///     return Err(DomainError::validation("Time limit must be positive"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

/// Errors raised by `GameSession` operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GameError {
    /// Bad configuration, rejected before any state mutation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unknown personality or session.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation invoked in the wrong state. Caller bug, never retried.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The time limit elapsed. The session has already been moved to its
    /// terminal state and the failed result is attached.
    #[error("Time limit expired after {}ms", .result.elapsed_ms)]
    TimeExpired { result: Box<GameAttemptResult> },
}

impl GameError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }
}

impl From<DomainError> for GameError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::Parse(msg) => Self::Validation(msg),
            DomainError::NotFound { entity_type, id } => {
                Self::NotFound(format!("{entity_type} {id}"))
            }
        }
    }
}
