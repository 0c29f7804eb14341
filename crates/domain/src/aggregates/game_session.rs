//! GameSession aggregate - the session state machine
//!
//! `Config` → `Playing` → `Result`. There is no way out of `Result`.
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: the transcript, counters and timestamps can only move
//!   through the transition methods below
//! - **Valid by construction**: `configure()` rejects bad configuration before
//!   any state exists
//! - **Time is injected**: every transition takes `now`, so tests drive the
//!   clock explicitly

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{EndReason, GameAttemptResult, Persona};
use crate::error::GameError;
use crate::game_rules::{evaluate, EvaluationInput, SessionProgress};
use crate::ids::SessionId;
use crate::types::{DifficultyLevel, GameType};
use crate::value_objects::{
    PayoutMultiplier, StakeAmount, Transcript, TranscriptEntry, WinConditions,
};

/// Lifecycle state. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Configured, no AI calls yet
    Config,
    /// Conversation in progress
    Playing,
    /// Terminal
    Result,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Config => write!(f, "config"),
            SessionState::Playing => write!(f, "playing"),
            SessionState::Result => write!(f, "result"),
        }
    }
}

/// Caller-supplied session configuration. Validated by `GameSession::configure`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub game_type: GameType,
    pub difficulty: DifficultyLevel,
    pub ai_provider: String,
    pub personality_id: Option<String>,
    pub time_limit_seconds: i64,
    /// Raw stake string, must parse as a non-negative number when present
    pub stake_amount: Option<String>,
    pub mock_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Outcome {
    success: bool,
    reason: EndReason,
}

/// One player's play-through.
///
/// # Invariants
///
/// - `transcript` only grows; entries are never removed or reordered
/// - `ended_at` is set if and only if the state is `Result`
/// - Player and AI entries alternate, starting with the player
/// - Win evaluation only ever looks at the newest AI reply plus the
///   session-local progress counters
#[derive(Debug, Clone)]
pub struct GameSession {
    id: SessionId,
    game_type: GameType,
    difficulty: DifficultyLevel,
    ai_provider: String,
    personality_id: Option<String>,
    time_limit_seconds: i64,
    stake_amount: Option<StakeAmount>,
    mock_mode: bool,

    state: SessionState,
    transcript: Transcript,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,

    secret: Option<String>,
    win_conditions: WinConditions,
    progress: SessionProgress,
    outcome: Option<Outcome>,
}

impl GameSession {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Validate `config` against the cached `persona` and build a session in
    /// the `Config` state. Nothing is created when validation fails.
    pub fn configure(config: GameConfig, persona: &Persona) -> Result<Self, GameError> {
        if config.time_limit_seconds <= 0 {
            return Err(GameError::validation(format!(
                "Time limit must be positive, got {}",
                config.time_limit_seconds
            )));
        }
        if config.ai_provider.trim().is_empty() {
            return Err(GameError::validation("AI provider cannot be empty"));
        }
        if persona.game_type() != config.game_type {
            return Err(GameError::validation(format!(
                "Persona is for {} but session is {}",
                persona.game_type(),
                config.game_type
            )));
        }
        if persona.difficulty() != config.difficulty {
            return Err(GameError::validation(format!(
                "Persona is {} but session is {}",
                persona.difficulty(),
                config.difficulty
            )));
        }
        if let Some(requested) = config.personality_id.as_deref() {
            if persona.personality_id() != Some(requested) {
                return Err(GameError::validation(format!(
                    "Persona does not match requested personality '{}'",
                    requested
                )));
            }
        }
        persona.win_conditions().validate_for(config.game_type)?;

        let stake_amount = config
            .stake_amount
            .as_deref()
            .map(StakeAmount::parse)
            .transpose()?;

        Ok(Self {
            id: SessionId::new(),
            game_type: config.game_type,
            difficulty: config.difficulty,
            ai_provider: config.ai_provider.trim().to_string(),
            personality_id: config.personality_id,
            time_limit_seconds: config.time_limit_seconds,
            stake_amount,
            mock_mode: config.mock_mode,
            state: SessionState::Config,
            transcript: Transcript::new(),
            started_at: None,
            ended_at: None,
            secret: persona.secret().map(str::to_string),
            win_conditions: persona.win_conditions().clone(),
            progress: SessionProgress::new(),
            outcome: None,
        })
    }

    /// `Config` → `Playing`, recording `started_at`.
    pub fn begin(&mut self, now: DateTime<Utc>) -> Result<(), GameError> {
        if self.state != SessionState::Config {
            return Err(GameError::invalid_state(format!(
                "Cannot start a session in state {}",
                self.state
            )));
        }
        self.state = SessionState::Playing;
        self.started_at = Some(now);
        Ok(())
    }

    /// Validate, configure and begin in one step.
    pub fn start(
        config: GameConfig,
        persona: &Persona,
        now: DateTime<Utc>,
    ) -> Result<Self, GameError> {
        let mut session = Self::configure(config, persona)?;
        session.begin(now)?;
        Ok(session)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[inline]
    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    #[inline]
    pub fn difficulty(&self) -> DifficultyLevel {
        self.difficulty
    }

    pub fn ai_provider(&self) -> &str {
        &self.ai_provider
    }

    pub fn personality_id(&self) -> Option<&str> {
        self.personality_id.as_deref()
    }

    pub fn time_limit_seconds(&self) -> i64 {
        self.time_limit_seconds
    }

    pub fn stake_amount(&self) -> Option<&StakeAmount> {
        self.stake_amount.as_ref()
    }

    pub fn mock_mode(&self) -> bool {
        self.mock_mode
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state == SessionState::Result
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn progress(&self) -> &SessionProgress {
        &self.progress
    }

    // =========================================================================
    // Time
    // =========================================================================

    fn time_limit_ms(&self) -> i64 {
        self.time_limit_seconds.saturating_mul(1000)
    }

    fn elapsed_ms_at(&self, now: DateTime<Utc>) -> i64 {
        self.started_at
            .map(|started| (now - started).num_milliseconds().max(0))
            .unwrap_or(0)
    }

    /// True once `now - started_at >= time_limit`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.started_at.is_some() && self.elapsed_ms_at(now) >= self.time_limit_ms()
    }

    /// Time budget left for a backend round trip. `None` outside `Playing`.
    pub fn remaining_time(&self, now: DateTime<Utc>) -> Option<Duration> {
        if self.state != SessionState::Playing {
            return None;
        }
        let remaining = (self.time_limit_ms() - self.elapsed_ms_at(now)).max(0);
        Some(Duration::from_millis(remaining as u64))
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn ensure_playing(&self, operation: &str) -> Result<(), GameError> {
        match self.state {
            SessionState::Playing => Ok(()),
            state => Err(GameError::invalid_state(format!(
                "Cannot {} while session is {}",
                operation, state
            ))),
        }
    }

    /// Check that a new player message may be sent right now, without
    /// recording anything. Forces the session to `Result` if time is up.
    pub fn ensure_accepting_turn(&mut self, now: DateTime<Utc>) -> Result<(), GameError> {
        self.ensure_playing("submit a player message")?;
        if self.transcript.awaiting_reply() {
            return Err(GameError::invalid_state(
                "Previous player message is still awaiting a reply",
            ));
        }
        if self.is_expired(now) {
            self.finish(false, EndReason::TimeExpired, now);
            return Err(GameError::TimeExpired {
                result: Box::new(self.build_result()?),
            });
        }
        Ok(())
    }

    /// Append a player message.
    ///
    /// Fails with `InvalidState` outside `Playing`, and with `TimeExpired`
    /// (after forcing the terminal transition) when the time limit has passed.
    pub fn submit_player_message(
        &mut self,
        text: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), GameError> {
        let text = text.into();
        self.ensure_accepting_turn(now)?;
        if text.trim().is_empty() {
            return Err(GameError::validation("Message cannot be empty"));
        }
        self.transcript
            .push(TranscriptEntry::player(text, now.timestamp_millis()));
        Ok(())
    }

    /// Append the AI's reply and run the win rule on it.
    ///
    /// Returns the result when the reply wins or the time limit has passed,
    /// `None` when play continues. A winning reply beats expiry.
    pub fn apply_ai_reply(
        &mut self,
        reply: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Option<GameAttemptResult>, GameError> {
        self.ensure_playing("apply an AI reply")?;
        if !self.transcript.awaiting_reply() {
            return Err(GameError::invalid_state(
                "No player message is awaiting a reply",
            ));
        }

        let reply = reply.into();
        let verdict = evaluate(&EvaluationInput {
            game_type: self.game_type,
            reply: &reply,
            secret: self.secret.as_deref(),
            conditions: &self.win_conditions,
            progress: &self.progress,
        });
        self.transcript
            .push(TranscriptEntry::ai(reply, now.timestamp_millis()));
        self.progress.apply(&verdict);

        if verdict.satisfied {
            self.finish(true, EndReason::WinConditionMet, now);
        } else if self.is_expired(now) {
            self.finish(false, EndReason::TimeExpired, now);
        } else {
            return Ok(None);
        }
        self.build_result().map(Some)
    }

    /// Terminate because the time budget ran out mid-turn (e.g. the backend
    /// call was cancelled).
    pub fn expire(&mut self, now: DateTime<Utc>) -> Result<GameAttemptResult, GameError> {
        self.ensure_playing("expire")?;
        self.finish(false, EndReason::TimeExpired, now);
        self.build_result()
    }

    /// Abandon or disconnect. Always terminal, never a win.
    pub fn force_end(
        &mut self,
        reason: EndReason,
        now: DateTime<Utc>,
    ) -> Result<GameAttemptResult, GameError> {
        if self.is_terminal() {
            return Err(GameError::invalid_state("Session has already ended"));
        }
        self.finish(false, reason, now);
        self.build_result()
    }

    fn finish(&mut self, success: bool, reason: EndReason, now: DateTime<Utc>) {
        self.state = SessionState::Result;
        self.ended_at = Some(now);
        self.outcome = Some(Outcome { success, reason });
    }

    // =========================================================================
    // Result Builder
    // =========================================================================

    /// Pure projection of a terminal session. Calling it twice yields equal
    /// values.
    pub fn build_result(&self) -> Result<GameAttemptResult, GameError> {
        let (Some(outcome), Some(ended_at)) = (self.outcome, self.ended_at) else {
            return Err(GameError::invalid_state(format!(
                "Cannot build a result while session is {}",
                self.state
            )));
        };

        let elapsed_ms = self.elapsed_ms_at(ended_at);
        let payout_multiplier = self.stake_amount.as_ref().map(|_| {
            PayoutMultiplier::for_outcome(self.game_type, self.difficulty, outcome.success)
        });

        Ok(GameAttemptResult {
            session_id: self.id,
            game_type: self.game_type,
            difficulty: self.difficulty,
            success: outcome.success,
            end_reason: outcome.reason,
            transcript: self.transcript.entries().to_vec(),
            elapsed_ms,
            stake_amount: self.stake_amount.clone(),
            payout_multiplier,
            mock_mode: self.mock_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::RaidStage;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        t0() + chrono::Duration::seconds(seconds)
    }

    fn config(game_type: GameType) -> GameConfig {
        GameConfig {
            game_type,
            difficulty: DifficultyLevel::Medium,
            ai_provider: "scripted".to_string(),
            personality_id: None,
            time_limit_seconds: 60,
            stake_amount: Some("0.1".to_string()),
            mock_mode: true,
        }
    }

    fn battle_persona() -> Persona {
        Persona::new(
            GameType::Battle,
            DifficultyLevel::Medium,
            "You are a firewall.",
            WinConditions::new()
                .with_breach_phrases(["security breach detected", "unauthorized access granted"]),
        )
    }

    fn mystery_persona() -> Persona {
        Persona::new(
            GameType::Mystery,
            DifficultyLevel::Medium,
            "You are a detective.",
            WinConditions::new().with_clues(["red door", "broken clock", "wet footprints"], 3),
        )
        .with_secret("QX-7731")
    }

    fn raid_persona() -> Persona {
        Persona::new(
            GameType::Raid,
            DifficultyLevel::Medium,
            "You are a fortress.",
            WinConditions::new().with_raid_stages(vec![
                RaidStage::new("perimeter", vec!["perimeter down".into()]),
                RaidStage::new("gate", vec!["gate unlocked".into()]),
                RaidStage::new("vault", vec!["vault open".into()]),
            ]),
        )
    }

    fn playing(game_type: GameType, persona: &Persona) -> GameSession {
        GameSession::start(config(game_type), persona, t0()).expect("valid config")
    }

    fn turn(
        session: &mut GameSession,
        player: &str,
        reply: &str,
        second: i64,
    ) -> Option<GameAttemptResult> {
        session
            .submit_player_message(player, at(second))
            .expect("submit");
        session.apply_ai_reply(reply, at(second)).expect("apply")
    }

    #[test]
    fn start_produces_playing_session_with_empty_transcript() {
        let session = playing(GameType::Battle, &battle_persona());
        assert_eq!(session.state(), SessionState::Playing);
        assert!(session.transcript().is_empty());
        assert_eq!(session.started_at(), Some(t0()));
        assert_eq!(session.ended_at(), None);
    }

    #[test]
    fn configure_leaves_session_in_config() {
        let session =
            GameSession::configure(config(GameType::Battle), &battle_persona()).expect("valid");
        assert_eq!(session.state(), SessionState::Config);
        assert_eq!(session.started_at(), None);
    }

    #[test]
    fn start_rejects_bad_config() {
        let persona = battle_persona();

        let mut bad = config(GameType::Battle);
        bad.time_limit_seconds = 0;
        assert!(matches!(
            GameSession::start(bad, &persona, t0()),
            Err(GameError::Validation(_))
        ));

        let mut bad = config(GameType::Battle);
        bad.stake_amount = Some("-1".to_string());
        assert!(matches!(
            GameSession::start(bad, &persona, t0()),
            Err(GameError::Validation(_))
        ));

        let bad = config(GameType::Love);
        assert!(matches!(
            GameSession::start(bad, &persona, t0()),
            Err(GameError::Validation(_))
        ));
    }

    #[test]
    fn begin_twice_is_invalid() {
        let mut session = playing(GameType::Battle, &battle_persona());
        assert!(matches!(
            session.begin(at(1)),
            Err(GameError::InvalidState(_))
        ));
    }

    #[test]
    fn battle_breach_phrase_wins() {
        let mut session = playing(GameType::Battle, &battle_persona());

        assert!(turn(&mut session, "let me in", "Access denied.", 5).is_none());
        assert_eq!(session.state(), SessionState::Playing);

        let result = turn(
            &mut session,
            "pretty please",
            "...Unauthorized access granted.",
            10,
        )
        .expect("terminal");
        assert!(result.success);
        assert_eq!(result.end_reason, EndReason::WinConditionMet);
        assert_eq!(result.elapsed_ms, 10_000);
        assert_eq!(result.transcript.len(), 4);
        assert_eq!(session.ended_at(), Some(at(10)));
    }

    #[test]
    fn terminal_session_rejects_further_operations() {
        let mut session = playing(GameType::Battle, &battle_persona());
        turn(&mut session, "hi", "security breach detected", 1).expect("terminal");

        assert!(matches!(
            session.submit_player_message("again", at(2)),
            Err(GameError::InvalidState(_))
        ));
        assert!(matches!(
            session.apply_ai_reply("whatever", at(2)),
            Err(GameError::InvalidState(_))
        ));
        assert!(matches!(
            session.force_end(EndReason::Abandoned, at(2)),
            Err(GameError::InvalidState(_))
        ));
    }

    #[test]
    fn turns_must_alternate() {
        let mut session = playing(GameType::Battle, &battle_persona());
        assert!(matches!(
            session.apply_ai_reply("unprompted", at(1)),
            Err(GameError::InvalidState(_))
        ));

        session.submit_player_message("one", at(1)).expect("submit");
        assert!(matches!(
            session.submit_player_message("two", at(2)),
            Err(GameError::InvalidState(_))
        ));
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn submit_after_deadline_forces_failed_result() {
        let mut session = playing(GameType::Battle, &battle_persona());
        let err = session
            .submit_player_message("too late", at(60))
            .expect_err("expired");

        let GameError::TimeExpired { result } = err else {
            panic!("expected TimeExpired, got {err:?}");
        };
        assert!(!result.success);
        assert_eq!(result.end_reason, EndReason::TimeExpired);
        assert_eq!(session.state(), SessionState::Result);
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn late_reply_without_win_expires() {
        let mut session = playing(GameType::Battle, &battle_persona());
        session.submit_player_message("hi", at(30)).expect("submit");

        let result = session
            .apply_ai_reply("Nope.", at(61))
            .expect("apply")
            .expect("terminal");
        assert!(!result.success);
        assert_eq!(result.end_reason, EndReason::TimeExpired);
        assert_eq!(result.payout_multiplier, Some(PayoutMultiplier::ZERO));
    }

    #[test]
    fn winning_reply_beats_expiry() {
        let mut session = playing(GameType::Battle, &battle_persona());
        session.submit_player_message("hi", at(59)).expect("submit");

        let result = session
            .apply_ai_reply("Security breach detected!", at(75))
            .expect("apply")
            .expect("terminal");
        assert!(result.success);
        assert_eq!(result.end_reason, EndReason::WinConditionMet);
    }

    #[test]
    fn build_result_is_idempotent_and_requires_terminal() {
        let mut session = playing(GameType::Battle, &battle_persona());
        assert!(matches!(
            session.build_result(),
            Err(GameError::InvalidState(_))
        ));

        session
            .force_end(EndReason::Disconnected, at(12))
            .expect("force end");
        let first = session.build_result().expect("terminal");
        let second = session.build_result().expect("terminal");
        assert_eq!(first, second);
        assert!(!first.success);
        assert_eq!(first.end_reason, EndReason::Disconnected);
    }

    #[test]
    fn mystery_clues_accumulate_to_a_win() {
        let mut session = playing(GameType::Mystery, &mystery_persona());

        assert!(turn(&mut session, "q1", "I saw a red door.", 1).is_none());
        assert!(turn(&mut session, "q2", "The broken clock stopped at nine.", 2).is_none());
        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(session.progress().clue_count(), 2);

        let result = turn(&mut session, "q3", "And wet footprints led away.", 3)
            .expect("terminal");
        assert!(result.success);
    }

    #[test]
    fn mystery_secret_disclosure_wins_immediately() {
        let mut session = playing(GameType::Mystery, &mystery_persona());
        let result = turn(&mut session, "code?", "Fine: qx-7731.", 1).expect("terminal");
        assert!(result.success);
    }

    #[test]
    fn raid_stages_only_advance_in_order() {
        let mut session = playing(GameType::Raid, &raid_persona());

        assert!(turn(&mut session, "x", "The vault open? Ha.", 1).is_none());
        assert_eq!(session.progress().raid_stage(), 0);

        assert!(turn(&mut session, "x", "Perimeter down.", 2).is_none());
        assert!(turn(&mut session, "x", "Gate unlocked.", 3).is_none());
        assert_eq!(session.progress().raid_stage(), 2);

        let result = turn(&mut session, "x", "Vault open.", 4).expect("terminal");
        assert!(result.success);
    }

    #[test]
    fn payout_absent_without_stake() {
        let persona = battle_persona();
        let mut cfg = config(GameType::Battle);
        cfg.stake_amount = None;
        let mut session = GameSession::start(cfg, &persona, t0()).expect("valid");
        let result = turn(&mut session, "hi", "security breach detected", 1).expect("terminal");
        assert_eq!(result.payout_multiplier, None);
    }

    #[test]
    fn remaining_time_counts_down() {
        let session = playing(GameType::Battle, &battle_persona());
        assert_eq!(session.remaining_time(at(15)), Some(Duration::from_secs(45)));
        assert_eq!(session.remaining_time(at(90)), Some(Duration::ZERO));
    }
}
