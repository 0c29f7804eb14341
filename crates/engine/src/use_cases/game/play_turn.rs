//! Play turn use case.
//!
//! One player message, one AI reply. The session lock is taken without
//! waiting and held across the backend call, so a second message for the
//! same session fails fast with `TurnInProgress` instead of queuing.
//!
//! The player message is only recorded once the backend has produced a
//! usable reply; a failed round trip leaves the transcript untouched.

use std::sync::Arc;

use serde::Serialize;
use vaultbreak_domain::{GameAttemptResult, GameError, SessionId, SessionState};

use super::chat::{ChatError, ChatOrchestrator};
use super::settle::{SettleResult, SettlementOutcome};
use super::GameUseCaseError;
use crate::infrastructure::ports::{ClockPort, WalletCapability};
use crate::stores::SessionStore;

#[derive(Debug, Clone)]
pub struct TurnInput {
    pub session_id: SessionId,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnOutput {
    /// `None` when the turn ended by time expiry before a reply arrived
    pub reply: Option<String>,
    pub state: SessionState,
    /// Present only once `state` is terminal
    pub result: Option<GameAttemptResult>,
    pub settlement: Option<SettlementOutcome>,
}

pub struct PlayTurn {
    sessions: Arc<SessionStore>,
    chat: Arc<ChatOrchestrator>,
    settle: Arc<SettleResult>,
    clock: Arc<dyn ClockPort>,
}

impl PlayTurn {
    pub fn new(
        sessions: Arc<SessionStore>,
        chat: Arc<ChatOrchestrator>,
        settle: Arc<SettleResult>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            sessions,
            chat,
            settle,
            clock,
        }
    }

    pub async fn execute(&self, input: TurnInput) -> Result<TurnOutput, GameUseCaseError> {
        let session_id = input.session_id;
        let slot = self
            .sessions
            .get(session_id)
            .ok_or(GameUseCaseError::SessionNotFound(session_id))?;
        let mut session = slot
            .try_lock()
            .map_err(|_| GameUseCaseError::TurnInProgress(session_id))?;

        if input.message.trim().is_empty() {
            return Err(GameUseCaseError::validation("Message cannot be empty"));
        }

        let accepted_at = self.clock.now();
        match session.ensure_accepting_turn(accepted_at) {
            Ok(()) => {}
            Err(GameError::TimeExpired { result }) => {
                tracing::info!(
                    %session_id,
                    elapsed_ms = result.elapsed_ms,
                    "Turn rejected, time expired"
                );
                return Ok(self.finish(*result, None, slot.wallet()).await);
            }
            Err(e) => return Err(e.into()),
        }

        let budget = session.remaining_time(accepted_at).unwrap_or_default();
        let reply = match self
            .chat
            .send_turn(&session, slot.persona(), &input.message, budget)
            .await
        {
            Ok(reply) => reply,
            Err(ChatError::Cancelled { budget }) => {
                tracing::info!(
                    %session_id,
                    budget_ms = budget.as_millis() as u64,
                    "Backend call outlived the time limit"
                );
                let result = session.expire(self.clock.now())?;
                return Ok(self.finish(result, None, slot.wallet()).await);
            }
            Err(e) => {
                tracing::warn!(%session_id, error = %e, "Turn failed, transcript unchanged");
                return Err(e.into());
            }
        };

        // The message was accepted before the deadline check, so it carries
        // that timestamp; the reply is judged at arrival time.
        session.submit_player_message(input.message, accepted_at)?;
        let outcome = session.apply_ai_reply(reply.clone(), self.clock.now())?;

        match outcome {
            Some(result) => Ok(self.finish(result, Some(reply), slot.wallet()).await),
            None => {
                tracing::debug!(
                    %session_id,
                    turns = session.transcript().len() / 2,
                    "Turn complete"
                );
                Ok(TurnOutput {
                    reply: Some(reply),
                    state: session.state(),
                    result: None,
                    settlement: None,
                })
            }
        }
    }

    /// Settle a terminal result and drop the session; the caller now owns
    /// the result.
    async fn finish(
        &self,
        result: GameAttemptResult,
        reply: Option<String>,
        wallet: &WalletCapability,
    ) -> TurnOutput {
        tracing::info!(
            session_id = %result.session_id,
            game_type = %result.game_type,
            success = result.success,
            end_reason = %result.end_reason,
            elapsed_ms = result.elapsed_ms,
            "Game session ended"
        );
        let settlement = self.settle.settle_terminal(&result, wallet).await;
        self.sessions.remove(result.session_id);
        TurnOutput {
            reply,
            state: SessionState::Result,
            result: Some(result),
            settlement: Some(settlement),
        }
    }
}
