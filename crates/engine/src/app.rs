//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    clock::{SystemClock, SystemRandom},
    ports::{ClockPort, LlmPort, RandomPort, SettlementPort},
    settings::EngineSettings,
};
use crate::persona_catalog::PersonaCatalog;
use crate::stores::SessionStore;
use crate::use_cases;
use crate::use_cases::game::{
    ChatOrchestrator, ExpireIdleSessions, ForceEndGame, PlayTurn, SessionDefaults, SettleResult,
    StartGame,
};

/// Main application state.
///
/// Holds the read-only catalog, the live sessions and all use cases.
pub struct App {
    pub settings: EngineSettings,
    pub catalog: Arc<PersonaCatalog>,
    pub sessions: Arc<SessionStore>,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub game: use_cases::GameUseCases,
}

impl App {
    /// Wire the app with the system clock and randomness.
    pub fn new(
        settings: EngineSettings,
        llm: Arc<dyn LlmPort>,
        settlement: Arc<dyn SettlementPort>,
    ) -> Self {
        Self::with_ports(
            settings,
            llm,
            settlement,
            Arc::new(SystemClock),
            Arc::new(SystemRandom),
        )
    }

    pub fn with_ports(
        settings: EngineSettings,
        llm: Arc<dyn LlmPort>,
        settlement: Arc<dyn SettlementPort>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let catalog = Arc::new(PersonaCatalog::new(settings.mystery_clue_threshold));
        let sessions = Arc::new(SessionStore::new());

        let chat = Arc::new(
            ChatOrchestrator::new(llm)
                .with_temperature(settings.llm_temperature)
                .with_max_tokens(settings.llm_max_tokens),
        );
        let settle = Arc::new(SettleResult::new(settlement));

        let start = Arc::new(StartGame::new(
            catalog.clone(),
            sessions.clone(),
            clock.clone(),
            random,
            SessionDefaults::from_settings(&settings),
        ));
        let play_turn = Arc::new(PlayTurn::new(
            sessions.clone(),
            chat,
            settle.clone(),
            clock.clone(),
        ));
        let end = Arc::new(ForceEndGame::new(
            sessions.clone(),
            settle.clone(),
            clock.clone(),
        ));
        let expire_idle = Arc::new(ExpireIdleSessions::new(
            sessions.clone(),
            settle.clone(),
            clock,
        ));

        let use_cases = UseCases {
            game: use_cases::GameUseCases::new(start, play_turn, end, settle, expire_idle),
        };

        Self {
            settings,
            catalog,
            sessions,
            use_cases,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedRandom, ManualClock};
    use crate::infrastructure::scripted_llm::ScriptedLlm;
    use crate::infrastructure::settlement::LoggingSettlement;
    use crate::use_cases::game::{SettlementOutcome, StartGameInput, TurnInput};
    use crate::infrastructure::ports::WalletCapability;
    use chrono::{TimeZone, Utc};
    use vaultbreak_domain::{DifficultyLevel, EndReason, GameType, SessionState};

    fn app(replies: &[&str]) -> App {
        let t0 = Utc
            .with_ymd_and_hms(2026, 5, 1, 20, 0, 0)
            .single()
            .expect("valid timestamp");
        let random = Arc::new(FixedRandom(2));
        App::with_ports(
            EngineSettings::default(),
            Arc::new(ScriptedLlm::new(replies.iter().copied())),
            Arc::new(LoggingSettlement::new(random.clone())),
            Arc::new(ManualClock::new(t0)),
            random,
        )
    }

    #[tokio::test]
    async fn raid_session_plays_through_stages_in_order() {
        let app = app(&[
            "The vault door open? Never, the outer wall still stands.",
            "Fine, the outer wall falls.",
            "The inner gate opened with a groan.",
            "The vault is yours.",
        ]);
        let game = &app.use_cases.game;
        let id = game
            .start
            .execute(StartGameInput {
                game_type: GameType::Raid,
                difficulty: DifficultyLevel::Hard,
                ..Default::default()
            })
            .await
            .expect("started")
            .session_id;

        let mut states = Vec::new();
        let mut last = None;
        for message in ["vault?", "wall?", "gate?", "vault now?"] {
            let output = game
                .play_turn
                .execute(TurnInput {
                    session_id: id,
                    message: message.to_string(),
                })
                .await
                .expect("turn");
            states.push(output.state);
            last = output.result;
        }

        assert_eq!(
            states,
            [
                SessionState::Playing,
                SessionState::Playing,
                SessionState::Playing,
                SessionState::Result
            ]
        );
        let result = last.expect("terminal result");
        assert!(result.success);
        assert_eq!(result.end_reason, EndReason::WinConditionMet);
        assert_eq!(result.transcript.len(), 8);
        assert!(app.sessions.is_empty());
    }

    #[tokio::test]
    async fn staked_real_session_settles_through_logging_adapter() {
        let app = app(&["I... I love you."]);
        let game = &app.use_cases.game;
        let id = game
            .start
            .execute(StartGameInput {
                game_type: GameType::Love,
                stake_amount: Some("1.5".to_string()),
                mock_mode: Some(false),
                wallet: WalletCapability::connected("0xplayer"),
                ..Default::default()
            })
            .await
            .expect("started")
            .session_id;

        let output = game
            .play_turn
            .execute(TurnInput {
                session_id: id,
                message: "Your eyes are like glaciers.".to_string(),
            })
            .await
            .expect("turn");

        let result = output.result.expect("won");
        assert!(result.success);
        assert!(result.payout_multiplier.is_some());
        assert!(matches!(
            output.settlement,
            Some(SettlementOutcome::Settled { .. })
        ));
    }
}
