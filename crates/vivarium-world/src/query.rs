//! Read-only proximity and census queries over the world state.
//!
//! Decision making and task translation both need these lookups while the
//! subject entity is checked out of the entity map, so every query takes the
//! subject's position plus an id to exclude instead of looking the subject
//! up by id.

use std::cmp::Ordering;

use vivarium_types::{EntityId, Position, ResourceKind, ResourceNode, WorldState};

/// Radius within which another entity counts as a neighbor.
pub const NEARBY_RADIUS: f64 = 100.0;

/// Count entities within `radius` of `around`, excluding the subject.
#[must_use]
pub fn nearby_entity_count(
    world: &WorldState,
    around: Position,
    excluding: EntityId,
    radius: f64,
) -> usize {
    world
        .entities
        .values()
        .filter(|other| other.id != excluding && other.position.distance_to(around) <= radius)
        .count()
}

/// The entity nearest to `from` and its distance, excluding the subject.
#[must_use]
pub fn nearest_entity(
    world: &WorldState,
    from: Position,
    excluding: EntityId,
) -> Option<(EntityId, f64)> {
    world
        .entities
        .values()
        .filter(|other| other.id != excluding)
        .map(|other| (other.id, other.position.distance_to(from)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
}

/// The nearest hostile entity within `radius` of `from`, excluding the
/// subject. Hostility is a personality trait, not a behavior flag.
#[must_use]
pub fn hostile_neighbor(
    world: &WorldState,
    from: Position,
    excluding: EntityId,
    radius: f64,
) -> Option<EntityId> {
    world
        .entities
        .values()
        .filter(|other| {
            other.id != excluding
                && other.personality.is_hostile()
                && other.position.distance_to(from) <= radius
        })
        .map(|other| (other.id, other.position.distance_to(from)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
        .map(|(id, _)| id)
}

/// The nearest node of `kind` that still has anything left to harvest.
#[must_use]
pub fn nearest_node(
    world: &WorldState,
    from: Position,
    kind: ResourceKind,
) -> Option<&ResourceNode> {
    world
        .resources
        .values()
        .filter(|node| node.kind == kind && node.amount > 0.0)
        .min_by(|a, b| {
            a.position
                .distance_to(from)
                .partial_cmp(&b.position.distance_to(from))
                .unwrap_or(Ordering::Equal)
        })
}

/// One-line census of harvestable amounts per kind, in a fixed kind order.
///
/// Kinds with nothing left are omitted; a fully depleted world reads
/// `"none"`. Used verbatim in decision contexts and prompts.
#[must_use]
pub fn resource_summary(world: &WorldState) -> String {
    let mut parts = Vec::new();
    for kind in ResourceKind::ALL {
        let total: f64 = world
            .resources
            .values()
            .filter(|node| node.kind == kind)
            .map(|node| node.amount)
            .sum();
        if total > 0.0 {
            parts.push(format!("{kind}: {total:.0}"));
        }
    }
    if parts.is_empty() {
        "none".to_owned()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use vivarium_types::{Entity, Personality, ResourceId};

    use super::*;

    fn test_entity(x: f64, y: f64, aggression: f64) -> Entity {
        Entity {
            id: EntityId::new(),
            position: Position::new(x, y),
            target: Position::ORIGIN,
            health: 100.0,
            food: 50.0,
            wood: 0.0,
            stone: 0.0,
            level: 1,
            experience: 0.0,
            age: 0.0,
            color: "#4ECDC4".to_owned(),
            size: 10.0,
            speed: 1.0,
            is_moving: false,
            current_task: None,
            buildings: Vec::new(),
            relationships: BTreeMap::new(),
            explored_areas: BTreeSet::new(),
            personality: Personality {
                aggression,
                ..Personality::default()
            },
            decision_cooldown: 0,
            decision_serial: 0,
        }
    }

    fn test_node(kind: ResourceKind, x: f64, y: f64, amount: f64) -> ResourceNode {
        ResourceNode {
            id: ResourceId::new(),
            kind,
            position: Position::new(x, y),
            amount,
            max_amount: amount.max(1.0),
            respawn_rate: 1.0,
        }
    }

    fn world_with(entities: Vec<Entity>) -> WorldState {
        let mut world = WorldState::new();
        for entity in entities {
            world.entities.insert(entity.id, entity);
        }
        world
    }

    #[test]
    fn nearby_count_excludes_subject_and_respects_radius() {
        let subject = test_entity(0.0, 0.0, 0.2);
        let subject_id = subject.id;
        let near = test_entity(30.0, 40.0, 0.2);
        let far = test_entity(300.0, 0.0, 0.2);
        let world = world_with(vec![subject, near, far]);

        let count = nearby_entity_count(&world, Position::ORIGIN, subject_id, NEARBY_RADIUS);
        assert_eq!(count, 1);
    }

    #[test]
    fn nearby_count_works_with_subject_checked_out() {
        let mut world = world_with(vec![test_entity(10.0, 0.0, 0.2)]);
        let subject = test_entity(0.0, 0.0, 0.2);
        // Subject never inserted, as during an update step.
        let count = nearby_entity_count(&world, subject.position, subject.id, NEARBY_RADIUS);
        assert_eq!(count, 1);
        world.entities.clear();
        assert_eq!(
            nearby_entity_count(&world, subject.position, subject.id, NEARBY_RADIUS),
            0
        );
    }

    #[test]
    fn nearest_entity_orders_by_distance() {
        let subject = test_entity(0.0, 0.0, 0.2);
        let subject_id = subject.id;
        let close = test_entity(5.0, 0.0, 0.2);
        let close_id = close.id;
        let distant = test_entity(50.0, 0.0, 0.2);
        let world = world_with(vec![subject, close, distant]);

        let found = nearest_entity(&world, Position::ORIGIN, subject_id);
        assert_eq!(found.map(|(id, _)| id), Some(close_id));
    }

    #[test]
    fn nearest_entity_none_when_alone() {
        let subject = test_entity(0.0, 0.0, 0.2);
        let subject_id = subject.id;
        let world = world_with(vec![subject]);
        assert!(nearest_entity(&world, Position::ORIGIN, subject_id).is_none());
    }

    #[test]
    fn hostile_neighbor_requires_aggression_and_range() {
        let subject = test_entity(0.0, 0.0, 0.2);
        let subject_id = subject.id;
        let gentle = test_entity(10.0, 0.0, 0.3);
        let hostile_far = test_entity(500.0, 0.0, 0.9);
        let hostile_near = test_entity(20.0, 0.0, 0.9);
        let hostile_id = hostile_near.id;
        let world = world_with(vec![subject, gentle, hostile_far, hostile_near]);

        let found = hostile_neighbor(&world, Position::ORIGIN, subject_id, NEARBY_RADIUS);
        assert_eq!(found, Some(hostile_id));
    }

    #[test]
    fn nearest_node_skips_depleted() {
        let mut world = WorldState::new();
        let empty = test_node(ResourceKind::Food, 1.0, 0.0, 0.0);
        let stocked = test_node(ResourceKind::Food, 90.0, 0.0, 40.0);
        let stocked_id = stocked.id;
        world.resources.insert(empty.id, empty);
        world.resources.insert(stocked.id, stocked);

        let found = nearest_node(&world, Position::ORIGIN, ResourceKind::Food);
        assert_eq!(found.map(|node| node.id), Some(stocked_id));
    }

    #[test]
    fn summary_lists_only_present_kinds_in_order() {
        let mut world = WorldState::new();
        let wood = test_node(ResourceKind::Wood, 0.0, 0.0, 12.0);
        let food = test_node(ResourceKind::Food, 0.0, 0.0, 30.0);
        let gold = test_node(ResourceKind::Gold, 0.0, 0.0, 0.0);
        world.resources.insert(wood.id, wood);
        world.resources.insert(food.id, food);
        world.resources.insert(gold.id, gold);

        assert_eq!(resource_summary(&world), "food: 30, wood: 12");
    }

    #[test]
    fn summary_reads_none_when_everything_is_depleted() {
        let world = WorldState::new();
        assert_eq!(resource_summary(&world), "none");
    }
}
