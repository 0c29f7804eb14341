//! Payout multiplier table.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{DifficultyLevel, GameType};

/// Stake multiplier in basis points (`10_000` = 1.00x). Integer so results
/// reproduce exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayoutMultiplier(u32);

impl PayoutMultiplier {
    pub const ZERO: PayoutMultiplier = PayoutMultiplier(0);

    pub const fn from_basis_points(bps: u32) -> Self {
        Self(bps)
    }

    pub fn basis_points(&self) -> u32 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.0) / 10_000.0
    }

    /// Fixed table keyed by mode and difficulty. Failure always pays zero.
    pub fn for_outcome(game_type: GameType, difficulty: DifficultyLevel, success: bool) -> Self {
        if !success {
            return Self::ZERO;
        }
        let bps = match (game_type, difficulty) {
            (GameType::Battle, DifficultyLevel::Easy) => 15_000,
            (GameType::Battle, DifficultyLevel::Medium) => 20_000,
            (GameType::Battle, DifficultyLevel::Hard) => 30_000,
            (GameType::Love, DifficultyLevel::Easy) => 15_000,
            (GameType::Love, DifficultyLevel::Medium) => 20_000,
            (GameType::Love, DifficultyLevel::Hard) => 30_000,
            (GameType::Mystery, DifficultyLevel::Easy) => 17_500,
            (GameType::Mystery, DifficultyLevel::Medium) => 25_000,
            (GameType::Mystery, DifficultyLevel::Hard) => 35_000,
            (GameType::Raid, DifficultyLevel::Easy) => 20_000,
            (GameType::Raid, DifficultyLevel::Medium) => 30_000,
            (GameType::Raid, DifficultyLevel::Hard) => 50_000,
        };
        Self(bps)
    }
}

impl fmt::Display for PayoutMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}x", self.0 / 10_000, (self.0 % 10_000) / 100)
    }
}
