//! Force end use case: abandon or disconnect.

use std::sync::Arc;

use vaultbreak_domain::{EndReason, SessionId};

use super::play_turn::TurnOutput;
use super::settle::SettleResult;
use super::GameUseCaseError;
use crate::infrastructure::ports::ClockPort;
use crate::stores::SessionStore;

pub struct ForceEndGame {
    sessions: Arc<SessionStore>,
    settle: Arc<SettleResult>,
    clock: Arc<dyn ClockPort>,
}

impl ForceEndGame {
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

    /// End a live session as a loss.
    ///
    /// Waits for an in-flight turn to finish first. If that turn already
    /// ended the session, this fails with `SessionNotFound`.
    pub async fn execute(
        &self,
        session_id: SessionId,
        reason: EndReason,
    ) -> Result<TurnOutput, GameUseCaseError> {
        if !matches!(reason, EndReason::Abandoned | EndReason::Disconnected) {
            return Err(GameUseCaseError::validation(format!(
                "A session cannot be force-ended with reason {reason}"
            )));
        }

        let slot = self
            .sessions
            .get(session_id)
            .ok_or(GameUseCaseError::SessionNotFound(session_id))?;
        let mut session = slot.lock().await;
        if session.is_terminal() {
            return Err(GameUseCaseError::SessionNotFound(session_id));
        }

        let result = session.force_end(reason, self.clock.now())?;
        tracing::info!(
            %session_id,
            %reason,
            elapsed_ms = result.elapsed_ms,
            turns = result.transcript.len() / 2,
            "Game session force-ended"
        );

        let settlement = self.settle.settle_terminal(&result, slot.wallet()).await;
        self.sessions.remove(session_id);
        Ok(TurnOutput {
            reply: None,
            state: session.state(),
            result: Some(result),
            settlement: Some(settlement),
        })
    }
}
