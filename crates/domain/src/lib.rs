//! Vaultbreak domain: game modes, personas, win rules and the session state
//! machine. No I/O, no async, no logging.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod game_rules;
pub mod ids;
pub mod types;
pub mod value_objects;

pub use aggregates::{GameConfig, GameSession, SessionState};
pub use entities::{EndReason, GameAttemptResult, Persona};
pub use error::{DomainError, GameError};
pub use game_rules::{evaluate, EvaluationInput, SessionProgress, Verdict};
pub use ids::SessionId;
pub use types::{DifficultyLevel, GameType};
pub use value_objects::{
    PayoutMultiplier, RaidStage, Speaker, StakeAmount, Transcript, TranscriptEntry,
    WinConditions,
};
