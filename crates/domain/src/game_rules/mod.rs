//! Game rules - pure decision logic shared by every session.

pub mod win_condition;

pub use win_condition::{evaluate, EvaluationInput, SessionProgress, Verdict};
