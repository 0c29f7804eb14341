//! Error types for port operations.

#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors from the settlement collaborator.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettlementError {
    #[error("Settlement rejected: {0}")]
    Rejected(String),
    #[error("Settlement service unavailable: {0}")]
    Unavailable(String),
}
