//! Value objects - immutable types defined by their attributes

mod payout;
mod stake;
mod transcript;
mod win_conditions;

pub use payout::PayoutMultiplier;
pub use stake::StakeAmount;
pub use transcript::{Speaker, Transcript, TranscriptEntry};
pub use win_conditions::{RaidStage, WinConditions};
