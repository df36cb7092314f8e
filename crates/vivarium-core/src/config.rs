//! Configuration loading and typed config structures for the Vivarium
//! simulation.
//!
//! The canonical configuration lives in `vivarium.yaml` at the project root.
//! This module defines strongly-typed structs that mirror the YAML structure
//! and provides a loader that reads the file. Every field has a default, so
//! a missing file or an empty document yields a fully usable config.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `vivarium.yaml`. Section defaults match the
/// constants the world and AI crates were tuned around.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimConfig {
    /// World identity: seed and plane dimensions.
    #[serde(default)]
    pub world: WorldSection,

    /// Population sizes and the age cap.
    #[serde(default)]
    pub population: PopulationSection,

    /// Decision cadence and provider gating.
    #[serde(default)]
    pub decisions: DecisionSection,

    /// Per-time-unit probabilities and metabolic rates.
    #[serde(default)]
    pub rates: RateSection,

    /// Counts for initial world generation.
    #[serde(default)]
    pub bootstrap: BootstrapSection,

    /// Run boundaries and tick pacing for the host loop.
    #[serde(default)]
    pub run: RunSection,
}

impl SimConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `VIVARIUM_SEED` environment variable overrides `world.seed`
    /// when set to a parseable integer, so batch runs can sweep seeds
    /// without editing the file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.world.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.world.apply_env_overrides();
        Ok(config)
    }
}

/// World identity configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldSection {
    /// Random seed for reproducible runs.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// World plane width in world units.
    #[serde(default = "default_plane_side")]
    pub width: f64,

    /// World plane height in world units.
    #[serde(default = "default_plane_side")]
    pub height: f64,
}

impl WorldSection {
    /// Override the seed with `VIVARIUM_SEED` when set and parseable.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("VIVARIUM_SEED")
            && let Ok(seed) = val.parse::<u64>()
        {
            self.seed = seed;
        }
    }
}

impl Default for WorldSection {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            width: default_plane_side(),
            height: default_plane_side(),
        }
    }
}

/// Population configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PopulationSection {
    /// Entities spawned at bootstrap.
    #[serde(default = "default_initial_population")]
    pub initial: usize,

    /// Entities reseeded after a population collapse.
    #[serde(default = "default_reseed_population")]
    pub reseed: usize,

    /// Living entities above which offspring are blocked.
    #[serde(default = "default_population_cap")]
    pub cap: usize,

    /// Age in world time units past which an entity dies.
    #[serde(default = "default_max_age")]
    pub max_age: f64,
}

impl Default for PopulationSection {
    fn default() -> Self {
        Self {
            initial: default_initial_population(),
            reseed: default_reseed_population(),
            cap: default_population_cap(),
            max_age: default_max_age(),
        }
    }
}

/// Decision cadence configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecisionSection {
    /// Ticks an entity waits between decisions.
    #[serde(default = "default_decision_cooldown")]
    pub cooldown: u32,

    /// Minimum confidence a provider reply needs to land.
    #[serde(default = "default_confidence_floor")]
    pub confidence_floor: f64,

    /// Radius within which other entities count as neighbors.
    #[serde(default = "default_neighbor_radius")]
    pub neighbor_radius: f64,
}

impl Default for DecisionSection {
    fn default() -> Self {
        Self {
            cooldown: default_decision_cooldown(),
            confidence_floor: default_confidence_floor(),
            neighbor_radius: default_neighbor_radius(),
        }
    }
}

/// Per-time-unit rates: metabolism and world event probabilities.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RateSection {
    /// Food drained per time unit just by existing.
    #[serde(default = "default_food_decay")]
    pub food_decay: f64,

    /// Health drained per time unit while starving.
    #[serde(default = "default_health_decay")]
    pub health_decay: f64,

    /// Health recovered per time unit while fed.
    #[serde(default = "default_health_regen")]
    pub health_regen: f64,

    /// Offspring spawn probability per time unit.
    #[serde(default = "default_offspring_chance")]
    pub offspring: f64,

    /// Weather change probability per time unit.
    #[serde(default = "default_weather_chance")]
    pub weather: f64,

    /// Random world event probability per time unit.
    #[serde(default = "default_event_chance")]
    pub event: f64,

    /// Ambient particle emission probability per time unit.
    #[serde(default = "default_ambient_particle_chance")]
    pub ambient_particle: f64,

    /// Building decay probability per time unit.
    #[serde(default = "default_building_decay_chance")]
    pub building_decay: f64,
}

impl Default for RateSection {
    fn default() -> Self {
        Self {
            food_decay: default_food_decay(),
            health_decay: default_health_decay(),
            health_regen: default_health_regen(),
            offspring: default_offspring_chance(),
            weather: default_weather_chance(),
            event: default_event_chance(),
            ambient_particle: default_ambient_particle_chance(),
            building_decay: default_building_decay_chance(),
        }
    }
}

/// Initial world generation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BootstrapSection {
    /// Resource nodes scattered at bootstrap.
    #[serde(default = "default_resource_count")]
    pub resource_count: usize,
}

impl Default for BootstrapSection {
    fn default() -> Self {
        Self {
            resource_count: default_resource_count(),
        }
    }
}

/// Run boundary configuration for the host loop.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunSection {
    /// Ticks before the run ends (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,

    /// Real-time milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// World time units advanced per tick.
    #[serde(default = "default_dt")]
    pub dt: f64,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            max_ticks: 0,
            tick_interval_ms: default_tick_interval_ms(),
            dt: default_dt(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_seed() -> u64 {
    42
}

const fn default_plane_side() -> f64 {
    800.0
}

const fn default_initial_population() -> usize {
    15
}

const fn default_reseed_population() -> usize {
    10
}

const fn default_population_cap() -> usize {
    30
}

const fn default_max_age() -> f64 {
    1000.0
}

const fn default_decision_cooldown() -> u32 {
    30
}

const fn default_confidence_floor() -> f64 {
    0.4
}

const fn default_neighbor_radius() -> f64 {
    100.0
}

const fn default_food_decay() -> f64 {
    0.02
}

const fn default_health_decay() -> f64 {
    0.05
}

const fn default_health_regen() -> f64 {
    0.01
}

const fn default_offspring_chance() -> f64 {
    0.001
}

const fn default_weather_chance() -> f64 {
    0.001
}

const fn default_event_chance() -> f64 {
    0.0005
}

const fn default_ambient_particle_chance() -> f64 {
    0.01
}

const fn default_building_decay_chance() -> f64 {
    0.0001
}

const fn default_resource_count() -> usize {
    40
}

const fn default_tick_interval_ms() -> u64 {
    100
}

const fn default_dt() -> f64 {
    1.0
}
