//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - LLM calls (could swap Ollama -> any OpenAI-compatible backend)
//! - Settlement (could swap the logging adapter -> an on-chain contract)
//! - Clock/Random (for testing)

mod error;
mod external;
mod testing;

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{
    ChatMessage, FinishReason, LlmPort, LlmRequest, LlmResponse, MessageRole, SettlementPort,
    SettlementReceipt, SettlementRequest, TokenUsage, WalletCapability,
};

#[cfg(test)]
pub use external::{MockLlmPort, MockSettlementPort};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

#[cfg(test)]
pub use testing::{MockClockPort, MockRandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{LlmError, SettlementError};
