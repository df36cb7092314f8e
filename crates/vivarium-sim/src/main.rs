//! Headless simulation binary for Vivarium.
//!
//! This is the entry point that wires configuration, the decision provider,
//! and the tick loop together. It loads `vivarium.yaml` when present,
//! selects the remote LLM provider if the `VIVARIUM_AI_*` environment
//! enables one (the local rule ladder otherwise), bootstraps the world, and
//! advances it on a fixed cadence until the configured tick limit.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `vivarium.yaml`
//! 3. Select the decision provider
//! 4. Bootstrap the world
//! 5. Run the tick loop

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use vivarium_ai::{DecisionProvider, RuleProvider};
use vivarium_core::{ConfigError, SimConfig, Simulation};
use vivarium_llm::{ProviderConfig, RemoteProvider};

/// Directory the remote provider loads its prompt templates from.
const TEMPLATES_DIR: &str = "templates";

/// Ticks between periodic census lines at `info!` level.
const CENSUS_EVERY: u64 = 100;

/// Application entry point for the Vivarium simulation.
///
/// Initializes logging, loads configuration, wires a decision provider,
/// and runs the tick loop. Returns an error if configuration loading
/// fails; everything past startup is infallible.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("vivarium-sim starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        seed = config.world.seed,
        width = config.world.width,
        height = config.world.height,
        initial_population = config.population.initial,
        max_ticks = config.run.max_ticks,
        tick_interval_ms = config.run.tick_interval_ms,
        "Configuration loaded"
    );

    // 3. Select the decision provider.
    let provider = select_provider();

    // 4. Bootstrap the world.
    let max_ticks = config.run.max_ticks;
    let interval_ms = config.run.tick_interval_ms;
    let dt = config.run.dt;
    let mut sim = Simulation::new(config, provider);
    sim.bootstrap();

    // 5. Run the tick loop. A zero tick limit means run until interrupted.
    // tokio's interval rejects a zero period, so floor it at one.
    let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));
    let mut ticks: u64 = 0;
    loop {
        if max_ticks > 0 && ticks >= max_ticks {
            info!(ticks, "tick limit reached");
            break;
        }
        ticker.tick().await;
        let report = sim.advance(dt);
        ticks = ticks.saturating_add(1);
        debug!(
            ticks,
            entities = report.entities,
            decisions = report.decisions,
            overrides = report.overrides_applied,
            discarded = report.replies_discarded,
            completed = report.tasks_completed,
            births = report.births,
            deaths = report.deaths,
            events = report.events,
            "tick report"
        );
        if ticks.is_multiple_of(CENSUS_EVERY) {
            info!(
                ticks,
                population = report.entities,
                generation = report.generation,
                buildings = sim.world().buildings.len(),
                resources = sim.world().resources.len(),
                season = %sim.world().season,
                weather = %sim.world().weather,
                "census"
            );
        }
    }

    info!(
        ticks,
        population = sim.world().population(),
        generation = sim.world().generation,
        events = sim.world().events.len(),
        "vivarium-sim shutdown complete"
    );
    Ok(())
}

/// Load the simulation configuration from `vivarium.yaml`.
///
/// Looks for the config file relative to the current working directory and
/// falls back to defaults when it is absent.
fn load_config() -> Result<SimConfig, ConfigError> {
    let config_path = Path::new("vivarium.yaml");
    if config_path.exists() {
        SimConfig::from_file(config_path)
    } else {
        info!("Config file not found, using defaults");
        Ok(SimConfig::default())
    }
}

/// Choose the decision provider from the environment.
///
/// Remote decisions are opt-in: without `VIVARIUM_AI_PROVIDER` (or with a
/// provider that fails to initialize) the local rule ladder runs the world.
fn select_provider() -> Box<dyn DecisionProvider> {
    match ProviderConfig::from_env() {
        Ok(config) if config.enabled => match RemoteProvider::new(&config, TEMPLATES_DIR) {
            Ok(remote) => {
                info!(kind = %config.kind, model = config.model, "remote decision provider enabled");
                Box::new(remote)
            }
            Err(e) => {
                warn!(error = %e, "remote provider unavailable, falling back to rule ladder");
                Box::new(RuleProvider::new())
            }
        },
        Ok(_) => {
            info!("remote decisions disabled, using rule ladder");
            Box::new(RuleProvider::new())
        }
        Err(e) => {
            warn!(error = %e, "provider configuration invalid, using rule ladder");
            Box::new(RuleProvider::new())
        }
    }
}
