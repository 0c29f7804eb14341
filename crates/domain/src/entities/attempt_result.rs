//! Terminal outcome of a session.

use serde::{Deserialize, Serialize};

use crate::ids::SessionId;
use crate::types::{DifficultyLevel, GameType};
use crate::value_objects::{PayoutMultiplier, StakeAmount, TranscriptEntry};

/// Why a session reached its terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The latest AI reply satisfied the mode's win rule
    WinConditionMet,
    /// The time limit elapsed (including a backend call cut off by it)
    TimeExpired,
    /// The player walked away
    Abandoned,
    /// The player's connection dropped
    Disconnected,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::WinConditionMet => "win_condition_met",
            EndReason::TimeExpired => "time_expired",
            EndReason::Abandoned => "abandoned",
            EndReason::Disconnected => "disconnected",
        }
    }
}

impl std::fmt::Display for EndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable projection of a terminal session, handed to settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameAttemptResult {
    pub session_id: SessionId,
    pub game_type: GameType,
    pub difficulty: DifficultyLevel,
    pub success: bool,
    pub end_reason: EndReason,
    pub transcript: Vec<TranscriptEntry>,
    pub elapsed_ms: i64,
    pub stake_amount: Option<StakeAmount>,
    /// Present whenever a stake was placed; zero on failure.
    pub payout_multiplier: Option<PayoutMultiplier>,
    pub mock_mode: bool,
}
