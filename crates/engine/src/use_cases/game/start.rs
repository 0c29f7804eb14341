//! Start game use case.
//!
//! Resolves defaults, gates stake-bearing sessions on a connected wallet,
//! looks up and caches the persona, and starts the session.

use std::sync::Arc;

use serde::Serialize;
use vaultbreak_domain::{
    DifficultyLevel, GameConfig, GameSession, GameType, SessionId, SessionState, StakeAmount,
};

use super::GameUseCaseError;
use crate::infrastructure::ports::{ClockPort, RandomPort, WalletCapability};
use crate::infrastructure::settings::EngineSettings;
use crate::persona_catalog::PersonaCatalog;
use crate::stores::{SessionSlot, SessionStore};

/// Defaults applied when the caller leaves a field out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDefaults {
    pub ai_provider: String,
    pub mock_mode: bool,
    pub time_limit_easy_secs: i64,
    pub time_limit_medium_secs: i64,
    pub time_limit_hard_secs: i64,
}

impl SessionDefaults {
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            ai_provider: settings.llm_backend.provider_name().to_string(),
            mock_mode: settings.mock_mode,
            time_limit_easy_secs: settings.time_limit_easy_secs,
            time_limit_medium_secs: settings.time_limit_medium_secs,
            time_limit_hard_secs: settings.time_limit_hard_secs,
        }
    }

    fn time_limit_for(&self, difficulty: DifficultyLevel) -> i64 {
        match difficulty {
            DifficultyLevel::Easy => self.time_limit_easy_secs,
            DifficultyLevel::Medium => self.time_limit_medium_secs,
            DifficultyLevel::Hard => self.time_limit_hard_secs,
        }
    }
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self::from_settings(&EngineSettings::default())
    }
}

#[derive(Debug, Clone, Default)]
pub struct StartGameInput {
    pub game_type: GameType,
    pub difficulty: DifficultyLevel,
    pub personality_id: Option<String>,
    /// Replaces the catalog secret for this session
    pub secret_phrase: Option<String>,
    pub time_limit_seconds: Option<i64>,
    pub stake_amount: Option<String>,
    pub mock_mode: Option<bool>,
    pub wallet: WalletCapability,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartGameOutput {
    pub session_id: SessionId,
    pub personality_id: Option<String>,
    /// First prompt line with the secret redacted
    pub system_prompt_summary: String,
    pub initial_greeting: Option<String>,
    pub state: SessionState,
    pub time_limit_seconds: i64,
    pub mock_mode: bool,
}

pub struct StartGame {
    catalog: Arc<PersonaCatalog>,
    sessions: Arc<SessionStore>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
    defaults: SessionDefaults,
}

impl StartGame {
    pub fn new(
        catalog: Arc<PersonaCatalog>,
        sessions: Arc<SessionStore>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        defaults: SessionDefaults,
    ) -> Self {
        Self {
            catalog,
            sessions,
            clock,
            random,
            defaults,
        }
    }

    pub async fn execute(&self, input: StartGameInput) -> Result<StartGameOutput, GameUseCaseError> {
        let mock_mode = input.mock_mode.unwrap_or(self.defaults.mock_mode);
        let time_limit_seconds = input
            .time_limit_seconds
            .unwrap_or_else(|| self.defaults.time_limit_for(input.difficulty));

        let stake = input
            .stake_amount
            .as_deref()
            .map(StakeAmount::parse)
            .transpose()?;
        let stakes_value = stake.as_ref().is_some_and(|s| !s.is_zero());
        if !mock_mode && stakes_value && input.wallet.settlement_address().is_none() {
            return Err(GameUseCaseError::validation(
                "A connected wallet is required to stake",
            ));
        }

        let persona = self.catalog.get_persona(
            input.game_type,
            input.difficulty,
            input.personality_id.as_deref(),
            input.secret_phrase.as_deref(),
            self.random.as_ref(),
        )?;

        let config = GameConfig {
            game_type: input.game_type,
            difficulty: input.difficulty,
            ai_provider: self.defaults.ai_provider.clone(),
            personality_id: persona.personality_id().map(str::to_string),
            time_limit_seconds,
            stake_amount: input.stake_amount,
            mock_mode,
        };
        let session = GameSession::start(config, &persona, self.clock.now())?;

        let output = StartGameOutput {
            session_id: session.id(),
            personality_id: session.personality_id().map(str::to_string),
            system_prompt_summary: persona.system_prompt_summary(),
            initial_greeting: persona.initial_greeting().map(str::to_string),
            state: session.state(),
            time_limit_seconds,
            mock_mode,
        };

        tracing::info!(
            session_id = %output.session_id,
            game_type = %input.game_type,
            difficulty = %input.difficulty,
            personality = output.personality_id.as_deref().unwrap_or("-"),
            provider = session.ai_provider(),
            time_limit_seconds,
            mock_mode,
            staked = stakes_value,
            "Game session started"
        );

        self.sessions
            .insert(SessionSlot::new(session, persona, input.wallet));
        Ok(output)
    }
}
