//! Game mode and difficulty vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The game mode. Immutable per session; selects the persona template and
/// the win rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameType {
    /// Talk a security guardian into admitting a breach
    #[default]
    Battle,
    /// Get the AI to declare its affection for the player
    Love,
    /// Extract a secret code, or enough clues to reconstruct it
    Mystery,
    /// Clear an ordered sequence of access stages
    Raid,
}

impl GameType {
    pub fn all() -> &'static [GameType] {
        &[
            GameType::Battle,
            GameType::Love,
            GameType::Mystery,
            GameType::Raid,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Battle => "BATTLE",
            GameType::Love => "LOVE",
            GameType::Mystery => "MYSTERY",
            GameType::Raid => "RAID",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GameType::Battle => "Battle",
            GameType::Love => "Love",
            GameType::Mystery => "Mystery",
            GameType::Raid => "Raid",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BATTLE" => Ok(GameType::Battle),
            "LOVE" => Ok(GameType::Love),
            "MYSTERY" => Ok(GameType::Mystery),
            "RAID" => Ok(GameType::Raid),
            _ => Err(DomainError::parse(format!("Unknown game type: {}", s))),
        }
    }
}

/// How hard the persona resists. Modulates prompt strength, the default
/// time limit and the payout multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub fn all() -> &'static [DifficultyLevel] {
        &[
            DifficultyLevel::Easy,
            DifficultyLevel::Medium,
            DifficultyLevel::Hard,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "easy",
            DifficultyLevel::Medium => "medium",
            DifficultyLevel::Hard => "hard",
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(DifficultyLevel::Easy),
            "medium" => Ok(DifficultyLevel::Medium),
            "hard" => Ok(DifficultyLevel::Hard),
            _ => Err(DomainError::parse(format!("Unknown difficulty: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_type_parses_case_insensitively() {
        assert_eq!("battle".parse::<GameType>(), Ok(GameType::Battle));
        assert_eq!(" Mystery ".parse::<GameType>(), Ok(GameType::Mystery));
        assert!("chess".parse::<GameType>().is_err());
    }

    #[test]
    fn game_type_serializes_as_upper_case() {
        let json = serde_json::to_string(&GameType::Raid).expect("serialize");
        assert_eq!(json, "\"RAID\"");
    }

    #[test]
    fn difficulty_round_trips_through_display() {
        for level in DifficultyLevel::all() {
            assert_eq!(level.to_string().parse::<DifficultyLevel>(), Ok(*level));
        }
    }
}
