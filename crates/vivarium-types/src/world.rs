//! The world aggregate root.
//!
//! [`WorldState`] owns every entity, building, resource node, particle, and
//! event. The simulation engine holds it exclusively; other components only
//! ever receive a reference scoped to one tick.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::{EventKind, Season, Weather};
use crate::events::{EventImpact, EventLog, WorldEvent};
use crate::ids::{BuildingId, EntityId, ResourceId};
use crate::structs::{Building, Entity, Particle, ResourceNode};

/// Complete state of one simulated world.
///
/// Ordered maps keep iteration deterministic for a given insertion history,
/// which keeps seeded runs reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    /// Living entities by id.
    pub entities: BTreeMap<EntityId, Entity>,
    /// Standing buildings by id.
    pub buildings: BTreeMap<BuildingId, Building>,
    /// Harvestable resource nodes by id.
    pub resources: BTreeMap<ResourceId, ResourceNode>,
    /// Active visual particles, in spawn order.
    pub particles: Vec<Particle>,
    /// Recent world events, oldest first.
    pub events: EventLog,
    /// Generation counter, starting at 1 and bumped on population collapse.
    pub generation: u32,
    /// Elapsed world time in time units.
    pub time: f64,
    /// Current weather.
    pub weather: Weather,
    /// Current season.
    pub season: Season,
}

impl WorldState {
    /// An empty world at time zero, generation 1, under sunny spring skies.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            buildings: BTreeMap::new(),
            resources: BTreeMap::new(),
            particles: Vec::new(),
            events: EventLog::new(),
            generation: 1,
            time: 0.0,
            weather: Weather::Sunny,
            season: Season::Spring,
        }
    }

    /// Number of living entities.
    #[must_use]
    pub fn population(&self) -> usize {
        self.entities.len()
    }

    /// Append an event stamped with the current world time.
    pub fn record_event(
        &mut self,
        kind: EventKind,
        entities: Vec<EntityId>,
        message: impl Into<String>,
        impact: EventImpact,
    ) {
        self.events
            .push(WorldEvent::new(kind, self.time, entities, message, impact));
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new()
    }
}
