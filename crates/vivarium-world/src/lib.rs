//! World plane systems for the Vivarium simulation.
//!
//! This crate models everything physical: resource nodes with regrowth,
//! buildings with production and decay, particles with simple ballistics,
//! the season/weather/day cycles, and the spawn recipes for entities and
//! nodes. All randomness flows through an injected [`rand::Rng`] so seeded
//! runs stay reproducible.
//!
//! # Modules
//!
//! - [`building`] -- Production batching and structural weathering
//! - [`environment`] -- Season rotation, day/night phase, weather rolls
//! - [`particle`] -- Particle physics plus the fixed spawn recipes
//! - [`query`] -- Read-only world queries (neighbors, nodes, census)
//! - [`resource`] -- Node regrowth and level-scaled harvesting
//! - [`spawn`] -- Entity, offspring, and node creation

pub mod building;
pub mod environment;
pub mod particle;
pub mod query;
pub mod resource;
pub mod spawn;

// Re-export the tick-path entry points at crate root.
pub use building::{PRODUCTION_BATCH, accumulate_production, weather_decay};
pub use environment::{SEASON_DURATION, roll_weather, season_for, time_of_day_for};
pub use particle::{ambient_magic, birth_spark, death_smoke, step_all};
pub use query::{
    NEARBY_RADIUS, hostile_neighbor, nearby_entity_count, nearest_entity, nearest_node,
    resource_summary,
};
pub use resource::{harvest, harvest_yield, regenerate};
pub use spawn::{gold_strike, offspring_of, random_entity, random_node};
