//! Scored candidate selection for self-directed decisions.
//!
//! When an entity needs a new task and no provider reply is in yet, the
//! engine picks one locally: build a small candidate list from current
//! needs, score each against the entity's personality, add a little jitter
//! so identical twins do not move in lockstep, and take the maximum.

use std::cmp::Ordering;

use rand::Rng;

use vivarium_types::{BuildingKind, Entity, ResourceKind, TaskKind, WorldState};
use vivarium_world::query;

/// Jitter magnitude added to every candidate score.
const SCORE_JITTER: f64 = 0.1;

/// Food gauge level that starts to feel uncomfortable.
const FOOD_WANT: f64 = 50.0;

/// Wood stock an entity likes to keep on hand.
const WOOD_WANT: f64 = 30.0;

/// Stone stock an entity likes to keep on hand.
const STONE_WANT: f64 = 30.0;

/// Building kinds ordered from most to least expensive.
const BY_PRICE: [BuildingKind; 5] = [
    BuildingKind::Tower,
    BuildingKind::Workshop,
    BuildingKind::House,
    BuildingKind::Wall,
    BuildingKind::Farm,
];

/// Pick the next action for an entity with an empty task slot.
///
/// Deterministic given the rng: candidates are generated and jittered in a
/// fixed order. `Explore` is always a candidate, so this cannot fail.
pub fn choose_action(
    world: &WorldState,
    entity: &Entity,
    neighbor_radius: f64,
    rng: &mut impl Rng,
) -> TaskKind {
    let mut candidates: Vec<(TaskKind, f64)> = Vec::with_capacity(5);

    let deficit = worst_deficit(entity);
    if deficit > 0.0 {
        candidates.push((TaskKind::Gather, 0.5 + 0.5 * deficit));
    }

    if entity.buildings.is_empty() && most_expensive_affordable(entity).is_some() {
        candidates.push((TaskKind::Build, 0.6));
    }

    candidates.push((TaskKind::Explore, 0.3 + 0.5 * entity.personality.exploration));

    if query::nearby_entity_count(world, entity.position, entity.id, neighbor_radius) > 0 {
        candidates.push((
            TaskKind::Communicate,
            0.2 + 0.6 * entity.personality.cooperation,
        ));
    }

    if query::hostile_neighbor(world, entity.position, entity.id, neighbor_radius).is_some() {
        candidates.push((TaskKind::Defend, 0.2 + 0.6 * entity.personality.aggression));
    }

    candidates
        .into_iter()
        .map(|(kind, score)| (kind, score + rng.random::<f64>() * SCORE_JITTER))
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
        .map_or(TaskKind::Explore, |(kind, _)| kind)
}

/// The gauge an entity is most short on, as a harvestable kind.
///
/// Falls back to food when nothing is short; food is never wasted.
pub(crate) fn scarcest_resource(entity: &Entity) -> ResourceKind {
    let needs = [
        (ResourceKind::Food, relative_deficit(entity.food, FOOD_WANT)),
        (ResourceKind::Wood, relative_deficit(entity.wood, WOOD_WANT)),
        (
            ResourceKind::Stone,
            relative_deficit(entity.stone, STONE_WANT),
        ),
    ];
    let mut scarcest = ResourceKind::Food;
    let mut worst = 0.0;
    for (kind, deficit) in needs {
        if deficit > worst {
            scarcest = kind;
            worst = deficit;
        }
    }
    scarcest
}

/// The priciest building the entity can pay for right now, if any.
pub(crate) fn most_expensive_affordable(entity: &Entity) -> Option<BuildingKind> {
    BY_PRICE.into_iter().find(|kind| {
        let (wood, stone) = kind.cost();
        entity.wood >= wood && entity.stone >= stone
    })
}

fn worst_deficit(entity: &Entity) -> f64 {
    relative_deficit(entity.food, FOOD_WANT)
        .max(relative_deficit(entity.wood, WOOD_WANT))
        .max(relative_deficit(entity.stone, STONE_WANT))
}

/// How far below `want` the gauge sits, as a fraction of `want` in `[0, 1]`.
fn relative_deficit(value: f64, want: f64) -> f64 {
    ((want - value) / want).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use vivarium_types::{BuildingId, EntityId, Personality, Position};

    use super::*;

    fn test_entity() -> Entity {
        Entity {
            id: EntityId::new(),
            position: Position::ORIGIN,
            target: Position::ORIGIN,
            health: 100.0,
            food: 100.0,
            wood: 50.0,
            stone: 50.0,
            level: 1,
            experience: 0.0,
            age: 0.0,
            color: "#96CEB4".to_owned(),
            size: 10.0,
            speed: 1.0,
            is_moving: false,
            current_task: None,
            buildings: vec![BuildingId::new()],
            relationships: BTreeMap::new(),
            explored_areas: BTreeSet::new(),
            personality: Personality::default(),
            decision_cooldown: 0,
            decision_serial: 0,
        }
    }

    fn neighbor_at(x: f64, y: f64, aggression: f64) -> Entity {
        let mut other = test_entity();
        other.position = Position::new(x, y);
        other.personality.aggression = aggression;
        other
    }

    #[test]
    fn starving_entity_always_gathers() {
        let world = WorldState::new();
        let mut entity = test_entity();
        entity.food = 2.0;
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(
                choose_action(&world, &entity, 100.0, &mut rng),
                TaskKind::Gather
            );
        }
    }

    #[test]
    fn contented_loner_explores() {
        let world = WorldState::new();
        let entity = test_entity();
        let mut rng = SmallRng::seed_from_u64(11);
        // Full gauges, owns a building, nobody around: explore is the only
        // candidate left.
        assert_eq!(
            choose_action(&world, &entity, 100.0, &mut rng),
            TaskKind::Explore
        );
    }

    #[test]
    fn sociable_entity_seeks_company() {
        let mut world = WorldState::new();
        let friend = neighbor_at(20.0, 0.0, 0.2);
        world.entities.insert(friend.id, friend);

        let mut entity = test_entity();
        entity.personality.cooperation = 0.9;
        let mut rng = SmallRng::seed_from_u64(13);
        // 0.2 + 0.6 * 0.9 beats every other candidate by more than the
        // jitter can make up.
        assert_eq!(
            choose_action(&world, &entity, 100.0, &mut rng),
            TaskKind::Communicate
        );
    }

    #[test]
    fn aggressive_entity_answers_hostility() {
        let mut world = WorldState::new();
        let bully = neighbor_at(30.0, 0.0, 0.9);
        world.entities.insert(bully.id, bully);

        let mut entity = test_entity();
        entity.personality.aggression = 0.9;
        entity.personality.cooperation = 0.1;
        let mut rng = SmallRng::seed_from_u64(17);
        assert_eq!(
            choose_action(&world, &entity, 100.0, &mut rng),
            TaskKind::Defend
        );
    }

    #[test]
    fn scarcest_resource_tracks_worst_gauge() {
        let mut entity = test_entity();
        entity.food = 60.0;
        entity.wood = 0.0;
        entity.stone = 40.0;
        assert_eq!(scarcest_resource(&entity), ResourceKind::Wood);

        entity.food = 10.0;
        entity.wood = 20.0;
        entity.stone = 25.0;
        assert_eq!(scarcest_resource(&entity), ResourceKind::Food);
    }

    #[test]
    fn scarcest_resource_defaults_to_food_when_flush() {
        let entity = test_entity();
        assert_eq!(scarcest_resource(&entity), ResourceKind::Food);
    }

    #[test]
    fn affordability_prefers_the_priciest_kind() {
        let mut entity = test_entity();
        entity.wood = 80.0;
        entity.stone = 100.0;
        assert_eq!(
            most_expensive_affordable(&entity),
            Some(BuildingKind::Tower)
        );

        entity.wood = 35.0;
        entity.stone = 25.0;
        assert_eq!(most_expensive_affordable(&entity), Some(BuildingKind::Farm));

        entity.wood = 0.0;
        entity.stone = 0.0;
        assert_eq!(most_expensive_affordable(&entity), None);
    }
}
