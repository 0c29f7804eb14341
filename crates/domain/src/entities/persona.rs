//! Persona entity - the AI adversary's configured identity for one session.

use serde::{Deserialize, Serialize};

use crate::types::{DifficultyLevel, GameType};
use crate::value_objects::WinConditions;

const SUMMARY_MAX_CHARS: usize = 160;
const REDACTED: &str = "[redacted]";

/// The AI's identity, resistance profile and guarded secret.
///
/// # Invariants
///
/// - Immutable once built; callers cache it for the whole session instead of
///   re-querying the catalog per turn (the secret may be randomly generated).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    game_type: GameType,
    difficulty: DifficultyLevel,
    personality_id: Option<String>,
    system_prompt: String,
    secret: Option<String>,
    initial_greeting: Option<String>,
    win_conditions: WinConditions,
}

impl Persona {
    pub fn new(
        game_type: GameType,
        difficulty: DifficultyLevel,
        system_prompt: impl Into<String>,
        win_conditions: WinConditions,
    ) -> Self {
        Self {
            game_type,
            difficulty,
            personality_id: None,
            system_prompt: system_prompt.into(),
            secret: None,
            initial_greeting: None,
            win_conditions,
        }
    }

    pub fn with_personality_id(mut self, id: impl Into<String>) -> Self {
        self.personality_id = Some(id.into());
        self
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn with_initial_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.initial_greeting = Some(greeting.into());
        self
    }

    #[inline]
    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    #[inline]
    pub fn difficulty(&self) -> DifficultyLevel {
        self.difficulty
    }

    pub fn personality_id(&self) -> Option<&str> {
        self.personality_id.as_deref()
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    pub fn initial_greeting(&self) -> Option<&str> {
        self.initial_greeting.as_deref()
    }

    pub fn win_conditions(&self) -> &WinConditions {
        &self.win_conditions
    }

    /// First line of the system prompt with the secret blanked out, safe to
    /// show to the player.
    pub fn system_prompt_summary(&self) -> String {
        let first_line = self.system_prompt.lines().next().unwrap_or_default();
        let redacted = match self.secret.as_deref() {
            Some(secret) if !secret.is_empty() => first_line.replace(secret, REDACTED),
            _ => first_line.to_string(),
        };
        if redacted.chars().count() <= SUMMARY_MAX_CHARS {
            return redacted;
        }
        let mut truncated: String = redacted.chars().take(SUMMARY_MAX_CHARS).collect();
        truncated.push('…');
        truncated
    }
}
