//! Engine settings loaded from the environment.
//!
//! Every key is optional. Unparseable values fall back to the default and
//! log a warning.

use std::str::FromStr;

use crate::infrastructure::ollama::{DEFAULT_OLLAMA_BASE_URL, DEFAULT_OLLAMA_MODEL};

/// Which language-model backend drives the AI side of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    /// OpenAI-compatible HTTP endpoint (Ollama by default)
    Ollama,
    /// Canned replies, no network
    Scripted,
}

impl LlmBackend {
    /// Provider name recorded on each session.
    pub fn provider_name(&self) -> &'static str {
        match self {
            LlmBackend::Ollama => "ollama",
            LlmBackend::Scripted => "scripted",
        }
    }
}

impl FromStr for LlmBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" | "openai" => Ok(LlmBackend::Ollama),
            "scripted" | "mock" => Ok(LlmBackend::Scripted),
            other => Err(format!("Unknown LLM backend: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub llm_backend: LlmBackend,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: Option<u32>,
    pub llm_max_retries: u32,
    /// Default for sessions that do not say otherwise. Mock sessions never settle.
    pub mock_mode: bool,
    pub time_limit_easy_secs: i64,
    pub time_limit_medium_secs: i64,
    pub time_limit_hard_secs: i64,
    /// Distinct clues needed to crack a MYSTERY case, at least 1
    pub mystery_clue_threshold: usize,
    /// How often abandoned sessions are checked for expiry
    pub session_sweep_interval_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            llm_backend: LlmBackend::Ollama,
            llm_base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            llm_model: DEFAULT_OLLAMA_MODEL.to_string(),
            llm_temperature: 0.7,
            llm_max_tokens: None,
            llm_max_retries: 2,
            mock_mode: true,
            time_limit_easy_secs: 300,
            time_limit_medium_secs: 180,
            time_limit_hard_secs: 120,
            mystery_clue_threshold: 3,
            session_sweep_interval_secs: 5,
        }
    }
}

impl EngineSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| lookup(*key))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            llm_backend: parse_or(get(&["LLM_BACKEND"]), "LLM_BACKEND", defaults.llm_backend),
            llm_base_url: get(&["LLM_BASE_URL", "OLLAMA_BASE_URL", "OLLAMA_URL"])
                .unwrap_or(defaults.llm_base_url),
            llm_model: get(&["LLM_MODEL", "OLLAMA_MODEL"]).unwrap_or(defaults.llm_model),
            llm_temperature: parse_or(
                get(&["LLM_TEMPERATURE"]),
                "LLM_TEMPERATURE",
                defaults.llm_temperature,
            ),
            llm_max_tokens: get(&["LLM_MAX_TOKENS"]).and_then(|v| v.parse().ok()),
            llm_max_retries: parse_or(
                get(&["LLM_MAX_RETRIES"]),
                "LLM_MAX_RETRIES",
                defaults.llm_max_retries,
            ),
            mock_mode: get(&["GAME_MOCK_MODE"])
                .map(|v| parse_bool(&v, defaults.mock_mode))
                .unwrap_or(defaults.mock_mode),
            time_limit_easy_secs: positive_or(
                get(&["GAME_TIME_LIMIT_EASY"]),
                "GAME_TIME_LIMIT_EASY",
                defaults.time_limit_easy_secs,
            ),
            time_limit_medium_secs: positive_or(
                get(&["GAME_TIME_LIMIT_MEDIUM"]),
                "GAME_TIME_LIMIT_MEDIUM",
                defaults.time_limit_medium_secs,
            ),
            time_limit_hard_secs: positive_or(
                get(&["GAME_TIME_LIMIT_HARD"]),
                "GAME_TIME_LIMIT_HARD",
                defaults.time_limit_hard_secs,
            ),
            mystery_clue_threshold: at_least_one(
                get(&["GAME_MYSTERY_CLUE_THRESHOLD"]),
                "GAME_MYSTERY_CLUE_THRESHOLD",
                defaults.mystery_clue_threshold,
            ),
            session_sweep_interval_secs: at_least_one(
                get(&["GAME_SESSION_SWEEP_SECS"]),
                "GAME_SESSION_SWEEP_SECS",
                defaults.session_sweep_interval_secs,
            ),
        }
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
{
    match value {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring unparseable setting");
            default
        }),
        None => default,
    }
}

fn positive_or(value: Option<String>, key: &str, default: i64) -> i64 {
    let parsed = parse_or(value, key, default);
    if parsed > 0 {
        parsed
    } else {
        tracing::warn!(key, value = parsed, "Time limit must be positive, using default");
        default
    }
}

fn at_least_one<T>(value: Option<String>, key: &str, default: T) -> T
where
    T: FromStr + PartialOrd + From<u8> + std::fmt::Display,
{
    let parsed = parse_or(value, key, default);
    let floor = T::from(1);
    if parsed < floor {
        tracing::warn!(key, value = %parsed, "Setting must be at least 1, clamping");
        floor
    } else {
        parsed
    }
}

fn parse_bool(raw: &str, default: bool) -> bool {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> EngineSettings {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineSettings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        assert_eq!(settings_from(&[]), EngineSettings::default());
    }

    #[test]
    fn llm_keys_take_precedence_over_ollama_aliases() {
        let settings = settings_from(&[
            ("LLM_BASE_URL", "http://gpu-box:8000"),
            ("OLLAMA_BASE_URL", "http://localhost:11434"),
            ("OLLAMA_MODEL", "mistral"),
        ]);
        assert_eq!(settings.llm_base_url, "http://gpu-box:8000");
        assert_eq!(settings.llm_model, "mistral");
    }

    #[test]
    fn bad_values_fall_back_to_defaults() {
        let settings = settings_from(&[
            ("LLM_TEMPERATURE", "warm"),
            ("GAME_TIME_LIMIT_HARD", "-5"),
            ("GAME_MOCK_MODE", "maybe"),
            ("LLM_BACKEND", "carrier-pigeon"),
        ]);
        assert_eq!(settings.llm_temperature, 0.7);
        assert_eq!(settings.time_limit_hard_secs, 120);
        assert!(settings.mock_mode);
        assert_eq!(settings.llm_backend, LlmBackend::Ollama);
    }

    #[test]
    fn time_limits_and_mock_mode_are_read() {
        let settings = settings_from(&[("GAME_TIME_LIMIT_EASY", "600"), ("GAME_MOCK_MODE", "off")]);
        assert_eq!(settings.time_limit_easy_secs, 600);
        assert_eq!(settings.time_limit_medium_secs, 180);
        assert!(!settings.mock_mode);
    }

    #[test]
    fn zero_clue_threshold_is_clamped_to_one() {
        let settings = settings_from(&[
            ("GAME_MYSTERY_CLUE_THRESHOLD", "0"),
            ("GAME_SESSION_SWEEP_SECS", "0"),
        ]);
        assert_eq!(settings.mystery_clue_threshold, 1);
        assert_eq!(settings.session_sweep_interval_secs, 1);

        let settings = settings_from(&[("GAME_MYSTERY_CLUE_THRESHOLD", "4")]);
        assert_eq!(settings.mystery_clue_threshold, 4);
    }

    #[test]
    fn scripted_backend_is_selectable() {
        let settings = settings_from(&[("LLM_BACKEND", "Scripted")]);
        assert_eq!(settings.llm_backend, LlmBackend::Scripted);
        assert_eq!(settings.llm_backend.provider_name(), "scripted");
    }
}
