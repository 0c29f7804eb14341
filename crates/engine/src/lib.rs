//! Vaultbreak Engine library.
//!
//! Runs game sessions against an AI persona: persona lookup, the per-turn
//! backend round trip, win evaluation and result settlement.
//!
//! ## Structure
//!
//! - `persona_catalog` - Built-in personas per game mode
//! - `stores/` - Live session slots
//! - `use_cases/` - Start, turn, force-end and settle orchestration
//! - `infrastructure/` - Ports and adapters (LLM backends, settlement, clock, settings)
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod persona_catalog;
pub mod stores;
pub mod use_cases;

pub use app::App;
