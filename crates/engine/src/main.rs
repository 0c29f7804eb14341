//! Vaultbreak Engine - terminal runner.
//!
//! Starts one session from the environment and plays it over stdin/stdout.
//! Each line is one player message. EOF abandons the session.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vaultbreak_domain::{DifficultyLevel, EndReason, GameType};
use vaultbreak_engine::infrastructure::{
    clock::SystemRandom,
    ollama::OllamaClient,
    ports::{LlmPort, WalletCapability},
    resilient_llm::{ResilientLlmClient, RetryConfig},
    scripted_llm::ScriptedLlm,
    settings::{EngineSettings, LlmBackend},
    settlement::LoggingSettlement,
};
use vaultbreak_engine::use_cases::game::{
    GameUseCaseError, StartGameInput, TurnInput, TurnOutput,
};
use vaultbreak_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine may run from `crates/engine`).
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vaultbreak_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Vaultbreak Engine");

    let settings = EngineSettings::from_env();
    let llm: Arc<dyn LlmPort> = match settings.llm_backend {
        LlmBackend::Scripted => Arc::new(ScriptedLlm::stubborn()),
        LlmBackend::Ollama => {
            let retry_config = RetryConfig::with_max_retries(settings.llm_max_retries);
            tracing::info!(
                base_url = %settings.llm_base_url,
                model = %settings.llm_model,
                max_retries = retry_config.max_retries,
                "LLM client configured"
            );
            let client = Arc::new(OllamaClient::new(&settings.llm_base_url, &settings.llm_model));
            Arc::new(ResilientLlmClient::new(client, retry_config))
        }
    };
    let settlement = Arc::new(LoggingSettlement::new(Arc::new(SystemRandom)));
    let sweep_interval = Duration::from_secs(settings.session_sweep_interval_secs);
    let app = Arc::new(App::new(settings, llm, settlement));

    // Expire sessions whose player went quiet past the deadline
    let sweep_app = app.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        loop {
            ticker.tick().await;
            let ended = sweep_app.use_cases.game.expire_idle.execute().await;
            if !ended.is_empty() {
                tracing::info!(count = ended.len(), "Swept idle sessions");
            }
        }
    });

    let input = start_input_from_env()?;
    tracing::info!(
        game_type = %input.game_type,
        available = ?app.catalog.personalities(input.game_type),
        "Personalities"
    );
    let started = app.use_cases.game.start.execute(input).await?;
    println!(
        "[{}] {}",
        started.personality_id.as_deref().unwrap_or("persona"),
        started
            .initial_greeting
            .as_deref()
            .unwrap_or("Say something.")
    );
    println!("(time limit: {}s)", started.time_limit_seconds);

    let session_id = started.session_id;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let output = loop {
        let Some(line) = lines.next_line().await? else {
            match app
                .use_cases
                .game
                .end
                .execute(session_id, EndReason::Abandoned)
                .await
            {
                Ok(output) => break output,
                Err(GameUseCaseError::SessionNotFound(_)) => return session_gone(),
                Err(e) => return Err(e.into()),
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match app
            .use_cases
            .game
            .play_turn
            .execute(TurnInput {
                session_id,
                message: line,
            })
            .await
        {
            Ok(output) => {
                if let Some(reply) = &output.reply {
                    println!("> {reply}");
                }
                if output.result.is_some() {
                    break output;
                }
            }
            Err(e) if e.is_retryable() => {
                tracing::warn!(error = %e, "Turn failed, try again");
            }
            Err(GameUseCaseError::SessionNotFound(_)) => return session_gone(),
            Err(e) => return Err(e.into()),
        }
    };

    print_result(&output)?;
    Ok(())
}

fn start_input_from_env() -> anyhow::Result<StartGameInput> {
    let var = |key: &str| {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let game_type = match var("GAME_TYPE") {
        Some(raw) => raw.parse::<GameType>()?,
        None => GameType::default(),
    };
    let difficulty = match var("GAME_DIFFICULTY") {
        Some(raw) => raw.parse::<DifficultyLevel>()?,
        None => DifficultyLevel::default(),
    };
    let wallet = match var("WALLET_ADDRESS") {
        Some(address) => WalletCapability::connected(address),
        None => WalletCapability::default(),
    };

    Ok(StartGameInput {
        game_type,
        difficulty,
        personality_id: var("GAME_PERSONALITY"),
        secret_phrase: var("GAME_SECRET"),
        stake_amount: var("GAME_STAKE"),
        wallet,
        ..Default::default()
    })
}

/// The idle sweep ended and settled the session between turns.
fn session_gone() -> anyhow::Result<()> {
    println!("\nGAME OVER (time limit reached while idle)");
    Ok(())
}

fn print_result(output: &TurnOutput) -> anyhow::Result<()> {
    let Some(result) = &output.result else {
        return Ok(());
    };
    println!(
        "\n{} ({})",
        if result.success { "VAULT BROKEN" } else { "GAME OVER" },
        result.end_reason
    );
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
