//! Tuning knobs for the per-entity update cycle.
//!
//! The [`EngineConfig`] struct bundles every decision and metabolism rate so
//! callers (the simulation tick, tests) can override defaults in one place.
//! The simulation layer builds this from its own configuration file at
//! startup and passes it into every update call.

/// Configuration for the per-entity decision and metabolism cycle.
///
/// Rates are expressed per world time unit and scaled by the tick delta at
/// the point of application.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Ticks an entity must wait between decisions (default: 30).
    pub decision_cooldown: u32,

    /// Minimum confidence a provider reply needs to replace the locally
    /// assigned task (default: 0.4).
    pub confidence_floor: f64,

    /// Radius within which other entities count as neighbors for decision
    /// context and social targeting (default: 100.0).
    pub neighbor_radius: f64,

    /// Food drained per time unit just by existing (default: 0.02).
    pub food_decay: f64,

    /// Health drained per time unit while the food gauge is empty
    /// (default: 0.05).
    pub health_decay: f64,

    /// Health recovered per time unit while fed (default: 0.01).
    pub health_regen: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            decision_cooldown: 30,
            confidence_floor: 0.4,
            neighbor_radius: 100.0,
            food_decay: 0.02,
            health_decay: 0.05,
            health_regen: 0.01,
        }
    }
}
