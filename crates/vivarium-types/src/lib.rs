//! Shared type definitions for the Vivarium simulation.
//!
//! This crate is the single source of truth for all types used across the
//! Vivarium workspace: identifiers, world data, the event log, and the
//! decision contract spoken between the AI engine and its providers.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all entity identifiers
//! - [`enums`] -- Enumeration types (tasks, buildings, resources, environment)
//! - [`structs`] -- Core world structs (entities, buildings, nodes, particles)
//! - [`events`] -- The bounded world event log
//! - [`decision`] -- Snapshot/context/decision types for decision providers
//! - [`world`] -- The [`WorldState`] aggregate root

pub mod decision;
pub mod enums;
pub mod events;
pub mod ids;
pub mod structs;
pub mod world;

// Re-export all public types at crate root for convenience.
pub use decision::{Decision, DecisionReply, DecisionRequest, EntitySnapshot, WorldContext};
pub use enums::{
    BuildingKind, EventKind, ParticleKind, ResourceKind, Season, TaskKind, TimeOfDay, Weather,
};
pub use events::{EventImpact, EventLog, WorldEvent};
pub use ids::{BuildingId, EntityId, EventId, ResourceId};
pub use structs::{
    Building, BuildingProduction, Entity, MAX_HEALTH, MAX_RELATIONSHIP, Particle, Personality,
    Position, ResourceNode, SECTOR_SIZE, Task,
};
pub use world::WorldState;
