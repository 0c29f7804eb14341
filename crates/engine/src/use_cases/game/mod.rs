//! Game session use cases.
//!
//! The flow is:
//! 1. Player starts a session (StartGame); the persona is resolved and cached
//! 2. Each message is one turn (PlayTurn): backend round trip, then the win rule
//! 3. A turn that wins or runs out of time returns the terminal result
//! 4. Abandon / disconnect ends the session early (ForceEndGame)
//! 5. Every terminal result goes through SettleResult; mock sessions skip it
//! 6. Sessions left idle past their deadline are swept (ExpireIdleSessions)

use std::sync::Arc;

mod chat;
mod end;
mod error;
mod expire_idle;
mod play_turn;
mod settle;
mod start;

pub use chat::{ChatError, ChatOrchestrator};
pub use end::ForceEndGame;
pub use error::GameUseCaseError;
pub use expire_idle::ExpireIdleSessions;
pub use play_turn::{PlayTurn, TurnInput, TurnOutput};
pub use settle::{SettleResult, SettlementOutcome};
pub use start::{SessionDefaults, StartGame, StartGameInput, StartGameOutput};

/// Container for game use cases.
pub struct GameUseCases {
    pub start: Arc<StartGame>,
    pub play_turn: Arc<PlayTurn>,
    pub end: Arc<ForceEndGame>,
    pub settle: Arc<SettleResult>,
    pub expire_idle: Arc<ExpireIdleSessions>,
}

impl GameUseCases {
    pub fn new(
        start: Arc<StartGame>,
        play_turn: Arc<PlayTurn>,
        end: Arc<ForceEndGame>,
        settle: Arc<SettleResult>,
        expire_idle: Arc<ExpireIdleSessions>,
    ) -> Self {
        Self {
            start,
            play_turn,
            end,
            settle,
            expire_idle,
        }
    }
}
