//! Per-persona win-condition configuration.
//!
//! Phrase sets and thresholds are persona configuration, not hard-coded
//! literals in the evaluator.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::types::GameType;

/// One step of a RAID. The stage clears when the AI reply contains any of
/// its unlock phrases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaidStage {
    pub name: String,
    pub unlock_phrases: Vec<String>,
}

impl RaidStage {
    pub fn new(name: impl Into<String>, unlock_phrases: Vec<String>) -> Self {
        Self {
            name: name.into(),
            unlock_phrases,
        }
    }
}

/// Everything the win rules need to know about one persona.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinConditions {
    /// BATTLE: admission-of-breach phrases
    #[serde(default)]
    pub breach_phrases: Vec<String>,
    /// LOVE: first-person declarations addressed to the player
    #[serde(default)]
    pub affection_phrases: Vec<String>,
    /// MYSTERY: clue phrases, each counted once
    #[serde(default)]
    pub clues: Vec<String>,
    /// MYSTERY: distinct clues needed to solve without the code
    #[serde(default)]
    pub clue_threshold: usize,
    /// RAID: ordered stages
    #[serde(default)]
    pub raid_stages: Vec<RaidStage>,
}

impl WinConditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_breach_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.breach_phrases = phrases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_affection_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.affection_phrases = phrases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_clues<I, S>(mut self, clues: I, threshold: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clues = clues.into_iter().map(Into::into).collect();
        self.clue_threshold = threshold;
        self
    }

    pub fn with_raid_stages(mut self, stages: Vec<RaidStage>) -> Self {
        self.raid_stages = stages;
        self
    }

    /// Check that the configuration can actually be won in `game_type`.
    pub fn validate_for(&self, game_type: GameType) -> Result<(), DomainError> {
        match game_type {
            GameType::Battle => Ok(()),
            GameType::Love => {
                if self.affection_phrases.is_empty() {
                    Err(DomainError::validation(
                        "LOVE personas need at least one affection phrase",
                    ))
                } else {
                    Ok(())
                }
            }
            GameType::Mystery => {
                if self.clue_threshold > self.clues.len() {
                    Err(DomainError::validation(format!(
                        "Clue threshold {} exceeds the {} configured clues",
                        self.clue_threshold,
                        self.clues.len()
                    )))
                } else {
                    Ok(())
                }
            }
            GameType::Raid => {
                if self.raid_stages.is_empty() {
                    Err(DomainError::validation("RAID personas need at least one stage"))
                } else if self.raid_stages.iter().any(|s| s.unlock_phrases.is_empty()) {
                    Err(DomainError::validation("Every RAID stage needs an unlock phrase"))
                } else {
                    Ok(())
                }
            }
        }
    }
}
