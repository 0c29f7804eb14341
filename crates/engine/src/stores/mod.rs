//! In-memory runtime state.
//!
//! - `SessionStore` - live game sessions and their per-session turn locks

pub mod session;

pub use session::{SessionSlot, SessionStore};
