mod cli;
mod console;
mod host;
mod setup;

use std::process::ExitCode;

use parley_common::ParleyError;
use parley_config::ParleyConfig;
use parley_dialog::{DialogError, RestClient, TurnDriver};
use tracing_subscriber::EnvFilter;

use crate::console::ConsoleSpeech;

/// Load environment variables from a .env file (KEY=VALUE lines).
fn load_dotenv() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        // Workspace root, two levels up from crates/parley-app/
        manifest_dir.join("..").join("..").join(".env"),
        std::path::PathBuf::from(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for (key, value) in parse_dotenv(&contents) {
                if std::env::var(key).is_err() {
                    std::env::set_var(key, value);
                }
            }
            return;
        }
    }
}

fn parse_dotenv(contents: &str) -> Vec<(&str, &str)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            (
                key.trim(),
                value.trim().trim_matches('"').trim_matches('\''),
            )
        })
        .collect()
}

/// Filter directive: the CLI flag wins, then `[logging] level`.
fn log_directive(cli_level: Option<&str>, config: Option<&ParleyConfig>) -> String {
    match (cli_level, config) {
        (Some(level), _) => level.to_string(),
        (None, Some(config)) => format!("parley={}", config.logging.level.as_directive()),
        (None, None) => "parley=info".to_string(),
    }
}

/// File, then `PARLEY_BACKEND_URL`, then `--endpoint`; validated once.
fn load_config(args: &cli::Args) -> Result<ParleyConfig, ParleyError> {
    let mut config = parley_config::load_with_env(args.config.as_deref())?;
    if let Some(endpoint) = &args.endpoint {
        config.backend.endpoint = endpoint.clone();
    }
    parley_config::validation::validate(&config)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file before anything else
    load_dotenv();

    let args = cli::parse();
    let loaded = load_config(&args);

    let directive = log_directive(args.log_level.as_deref(), loaded.as_ref().ok());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| "parley=info".parse().expect("static directive")),
            ),
        )
        .init();

    tracing::info!("Parley v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok(config) => config,
        Err(e) if args.config.is_some() || args.endpoint.is_some() => {
            tracing::error!("Config error: {e}");
            return ExitCode::from(2);
        }
        Err(e) => {
            tracing::warn!("Config load failed, using defaults: {e}");
            ParleyConfig::default()
        }
    };
    tracing::info!("Backend endpoint: {}", config.backend.endpoint);

    match run(&args, &config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &cli::Args, config: &ParleyConfig) -> Result<(), ParleyError> {
    let client = RestClient::new(setup::rest_config(config)).map_err(dialog_error)?;

    let speech = ConsoleSpeech::stdio(setup::listen_timeout(config))
        .with_tts(setup::tts_command(config));
    let mut driver = TurnDriver::new(client, speech)
        .with_policy(setup::turn_policy(config))
        .with_markup(setup::speech_markup(config))
        .with_intents(setup::intent_matcher(&config.triggers));

    host::run(&mut driver, args.once)
        .await
        .map_err(dialog_error)
}

fn dialog_error(e: DialogError) -> ParleyError {
    if e.is_backend_failure() {
        ParleyError::Dialog(e.to_string())
    } else {
        ParleyError::Speech(e.to_string())
    }
}
