//! Assembly of the decision contract inputs.
//!
//! Providers see exactly one [`EntitySnapshot`] and one [`WorldContext`] per
//! request, both built here. The subject entity may be checked out of the
//! world's entity map while these run (the update cycle works that way), so
//! all lookups go through the position-based queries.

use vivarium_types::{Entity, EntitySnapshot, WorldContext, WorldState};
use vivarium_world::environment::time_of_day_for;
use vivarium_world::query;

/// Capture the provider-visible view of one entity.
#[must_use]
pub fn snapshot_of(entity: &Entity) -> EntitySnapshot {
    EntitySnapshot {
        id: entity.id,
        position: entity.position,
        health: entity.health,
        food: entity.food,
        wood: entity.wood,
        stone: entity.stone,
        level: entity.level,
        age: entity.age,
        personality: entity.personality,
        building_count: entity.buildings.len(),
        explored_count: entity.explored_areas.len(),
    }
}

/// Capture the provider-visible view of the world around one entity.
#[must_use]
pub fn context_for(world: &WorldState, entity: &Entity, neighbor_radius: f64) -> WorldContext {
    let checked_out = usize::from(!world.entities.contains_key(&entity.id));
    WorldContext {
        weather: world.weather,
        season: world.season,
        time_of_day: time_of_day_for(world.time),
        nearby_entity_count: query::nearby_entity_count(
            world,
            entity.position,
            entity.id,
            neighbor_radius,
        ),
        available_resources: query::resource_summary(world),
        generation: world.generation,
        total_entities: world.population().saturating_add(checked_out),
    }
}
