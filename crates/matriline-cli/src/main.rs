//! Command-line driver for the Matriline life simulation.
//!
//! Plays a number of lives back to back inside one session, choosing each
//! action with a scripted [`DecisionPolicy`] and printing every notification
//! to stdout. Structured logs go to stderr.
//!
//! # Environment
//!
//! - `MATRILINE_CONFIG` -- YAML engine configuration (defaults when unset)
//! - `MATRILINE_TEXT` -- YAML text table (fallback templates when unset)
//! - `MATRILINE_SEED` -- seed for a reproducible session (entropy when unset)
//! - `MATRILINE_LIVES` -- number of lives to play (default: 3)
//! - `RUST_LOG` -- overrides the configured log filter

mod error;
mod policy;
mod sink;

use std::path::Path;
use std::str::FromStr;

use matriline_core::config::LoggingConfig;
use matriline_core::{EngineConfig, LifeEngine, SeededSource, TextTable};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;
use crate::policy::{DecisionPolicy, ScriptedPolicy};
use crate::sink::StdoutSink;

/// Lives played when `MATRILINE_LIVES` is unset.
const DEFAULT_LIVES: u32 = 3;

/// A subject still alive at this age is retired and the next life begins.
const AGE_LIMIT: f64 = 120.0;

/// Upper bound on decisions per life.
const MAX_TURNS: u32 = 1_000;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration, the text table or an environment
/// variable cannot be loaded.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration; logging depends on it.
    let config = load_config()?;
    init_logging(&config.logging);
    info!("matriline starting");

    // 2. Read the run parameters.
    let seed: Option<u64> = env_value("MATRILINE_SEED")?;
    let lives: u32 = env_value("MATRILINE_LIVES")?.unwrap_or(DEFAULT_LIVES);
    let text = load_text()?;
    info!(
        seed = ?seed,
        lives,
        text_entries = text.as_ref().map_or(0, TextTable::len),
        "Run parameters loaded"
    );

    // 3. Build the engine.
    let mut builder = LifeEngine::builder(config).sink(StdoutSink);
    builder = match seed {
        Some(seed) => builder.seed(seed),
        None => builder.random(SeededSource::from_entropy()),
    };
    if let Some(table) = text {
        builder = builder.text(table);
    }
    let mut engine = builder.build();

    // 4. Play.
    for round in 1..=lives {
        let life_number = engine.subject().life_number;
        let mut policy = ScriptedPolicy::for_life(life_number);
        info!(life = life_number, policy = policy.name(), "Playing life");
        let turns = play_life(&mut engine, &mut policy);
        if engine.is_alive() {
            info!(
                life = life_number,
                age = engine.subject().age,
                turns,
                "Subject retired at the age limit"
            );
        }
        if round < lives {
            engine.reset();
        }
    }

    // 5. Log results.
    for summary in engine.session().archive() {
        info!(
            life = summary.life_number,
            final_age = summary.final_age,
            cause = ?summary.cause,
            deployments = summary.deployments,
            daughters_total = summary.daughters_total,
            daughters_proven = summary.daughters_proven,
            infamy = summary.infamy,
            union_peak = summary.union_peak,
            league_peak = summary.league_peak,
            "Life archived"
        );
    }
    info!(
        modifier_stacks = engine.session().modifier_stacks(),
        lives_archived = engine.session().lives_archived(),
        "matriline shutdown complete"
    );

    Ok(())
}

/// Play the current subject until death, the age limit or the turn cap.
///
/// Returns the number of decisions taken.
fn play_life(engine: &mut LifeEngine, policy: &mut dyn DecisionPolicy) -> u32 {
    let mut turns: u32 = 0;
    while engine.is_alive() && engine.subject().age < AGE_LIMIT && turns < MAX_TURNS {
        let available = engine.available_actions();
        let action = policy.decide(engine.subject(), &available);
        engine.perform(action);
        turns = turns.saturating_add(1);
    }
    turns
}

/// Install the tracing subscriber on stderr.
///
/// `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Load the engine configuration from `MATRILINE_CONFIG`, or defaults.
fn load_config() -> Result<EngineConfig, CliError> {
    match std::env::var("MATRILINE_CONFIG") {
        Ok(path) => Ok(EngineConfig::from_file(Path::new(&path))?),
        Err(_) => Ok(EngineConfig::default()),
    }
}

/// Load the text table from `MATRILINE_TEXT`, if set.
fn load_text() -> Result<Option<TextTable>, CliError> {
    let Ok(path) = std::env::var("MATRILINE_TEXT") else {
        return Ok(None);
    };
    let table = TextTable::from_file(Path::new(&path))?;
    if table.is_empty() {
        warn!(path = %path, "Text table is empty, fallback templates will be used");
    }
    Ok(Some(table))
}

/// Parse an optional environment variable.
fn env_value<T: FromStr>(name: &'static str) -> Result<Option<T>, CliError> {
    let Ok(raw) = std::env::var(name) else {
        return Ok(None);
    };
    match raw.trim().parse::<T>() {
        Ok(value) => Ok(Some(value)),
        Err(_) => Err(CliError::InvalidEnv { name, value: raw }),
    }
}
