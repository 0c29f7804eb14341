//! Entities - domain objects with identity or a lifecycle of their own

mod attempt_result;
mod persona;

pub use attempt_result::{EndReason, GameAttemptResult};
pub use persona::Persona;
