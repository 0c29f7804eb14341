//! External service port traits (LLM backend, settlement) and the wallet
//! capability the engine consumes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vaultbreak_domain::{GameAttemptResult, PayoutMultiplier, SessionId, StakeAmount};

use super::error::{LlmError, SettlementError};

// =============================================================================
// LLM Types
// =============================================================================

/// LLM request/response types
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    /// The conversation history, oldest first
    pub messages: Vec<ChatMessage>,
    /// System prompt / persona
    pub system_prompt: Option<String>,
    /// Temperature for response generation (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

impl LlmRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            system_prompt: None,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
}

/// Response from the LLM
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// The generated text content
    pub content: String,
    /// Finish reason
    pub finish_reason: FinishReason,
    /// Token usage
    pub usage: Option<TokenUsage>,
}

/// Reason the generation finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    #[serde(other)]
    Unknown,
}

/// Token usage information
#[derive(Debug, Clone)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The language-model backend. Stateless: every call carries the full
/// conversation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmPort: Send + Sync {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;
}

// =============================================================================
// Settlement
// =============================================================================

/// What the settlement contract needs to release or forfeit a stake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRequest {
    pub session_id: SessionId,
    pub player_address: String,
    pub success: bool,
    pub stake_amount: StakeAmount,
    pub payout_multiplier: PayoutMultiplier,
}

impl SettlementRequest {
    /// Build from a terminal result. `None` when nothing was staked.
    pub fn from_result(result: &GameAttemptResult, player_address: impl Into<String>) -> Option<Self> {
        let stake_amount = result.stake_amount.clone()?;
        Some(Self {
            session_id: result.session_id,
            player_address: player_address.into(),
            success: result.success,
            stake_amount,
            payout_multiplier: result.payout_multiplier.unwrap_or(PayoutMultiplier::ZERO),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReceipt {
    /// Opaque reference from the settlement layer (e.g. a transaction hash)
    pub reference: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettlementPort: Send + Sync {
    async fn settle(&self, request: SettlementRequest) -> Result<SettlementReceipt, SettlementError>;
}

// =============================================================================
// Wallet
// =============================================================================

/// Opaque wallet capability supplied by the signing layer. Only gates
/// stake-bearing sessions; the engine does not manage identities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletCapability {
    pub address: Option<String>,
    pub is_connected: bool,
}

impl WalletCapability {
    pub fn connected(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            is_connected: true,
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Address usable for settlement, if the wallet is connected.
    pub fn settlement_address(&self) -> Option<&str> {
        if self.is_connected {
            self.address.as_deref().filter(|a| !a.trim().is_empty())
        } else {
            None
        }
    }
}
