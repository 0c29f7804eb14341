//! Use cases - user story orchestration.

pub mod game;

pub use game::GameUseCases;
