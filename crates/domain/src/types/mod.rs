//! # Vaultbreak Domain Types
//!
//! Shared vocabulary: game modes and difficulty levels.
//!
//! 1. **Pure data types** - No I/O, no async, no side effects
//! 2. **Serializable** - All types derive Serialize/Deserialize

mod game_mode;
pub use game_mode::{DifficultyLevel, GameType};
