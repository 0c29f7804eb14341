//! Game use case errors.

use vaultbreak_domain::{DomainError, GameError, SessionId};

use super::chat::ChatError;
use crate::infrastructure::ports::SettlementError;

/// Errors surfaced by the game use cases.
///
/// Time expiry is not among them: an expired turn comes back as a normal
/// terminal output with `success = false`.
#[derive(Debug, thiserror::Error)]
pub enum GameUseCaseError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),
    /// Another turn holds the session lock. Retry once it finishes.
    #[error("A turn is already in progress for session {0}")]
    TurnInProgress(SessionId),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error(transparent)]
    Settlement(#[from] SettlementError),
}

impl From<DomainError> for GameUseCaseError {
    fn from(err: DomainError) -> Self {
        Self::Game(err.into())
    }
}

impl GameUseCaseError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether the caller can simply try the same call again later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::TurnInProgress(_) | Self::Chat(ChatError::Backend(_) | ChatError::EmptyReply)
        )
    }
}
