//! Infrastructure implementations.
//!
//! Port traits for collaborators and the adapters that implement them.

pub mod clock;
pub mod ollama;
pub mod ports;
pub mod resilient_llm;
pub mod scripted_llm;
pub mod settings;
pub mod settlement;
