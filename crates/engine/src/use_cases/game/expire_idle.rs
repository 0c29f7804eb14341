//! Expire sessions whose time ran out without another turn.
//!
//! A player who starts a game and walks away never triggers `PlayTurn`, so
//! the deadline would otherwise go unnoticed. A background worker runs this
//! periodically.

use std::sync::Arc;

use super::play_turn::TurnOutput;
use super::settle::SettleResult;
use crate::infrastructure::ports::ClockPort;
use crate::stores::SessionStore;

pub struct ExpireIdleSessions {
    sessions: Arc<SessionStore>,
    settle: Arc<SettleResult>,
    clock: Arc<dyn ClockPort>,
}

impl ExpireIdleSessions {
    pub fn new(
        sessions: Arc<SessionStore>,
        settle: Arc<SettleResult>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            sessions,
            settle,
            clock,
        }
    }

    /// One sweep. Returns the terminal outputs of the sessions it ended.
    ///
    /// Slots with a turn in flight are skipped; that turn's own deadline
    /// handles them.
    pub async fn execute(&self) -> Vec<TurnOutput> {
        let now = self.clock.now();
        let mut ended = Vec::new();

        for slot in self.sessions.slots() {
            let Ok(mut session) = slot.try_lock() else {
                continue;
            };
            if session.is_terminal() {
                self.sessions.remove(slot.id());
                continue;
            }
            if !session.is_expired(now) {
                continue;
            }

            let result = match session.expire(now) {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(
                        session_id = %slot.id(),
                        error = %e,
                        "Failed to expire idle session"
                    );
                    continue;
                }
            };
            tracing::info!(
                session_id = %result.session_id,
                game_type = %result.game_type,
                elapsed_ms = result.elapsed_ms,
                "Idle session expired"
            );

            let settlement = self.settle.settle_terminal(&result, slot.wallet()).await;
            self.sessions.remove(slot.id());
            ended.push(TurnOutput {
                reply: None,
                state: session.state(),
                result: Some(result),
                settlement: Some(settlement),
            });
        }

        ended
    }
}
