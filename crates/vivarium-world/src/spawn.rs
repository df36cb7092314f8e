//! Creation recipes for entities and resource nodes.
//!
//! Bootstrap entities appear near the middle of the plane with randomized
//! gauges and personalities; offspring are spawned beside a parent with a
//! mutated copy of its traits. Resource nodes scatter across the inner
//! 80% of the plane with kind-specific richness and regrowth.

use rand::Rng;
use vivarium_types::{Entity, EntityId, Personality, Position, ResourceId, ResourceKind, ResourceNode};

/// Half-extent of the world plane.
pub const PLANE_EXTENT: f64 = 400.0;

/// Half-extent of the region bootstrap entities spawn in.
pub const ENTITY_SPAWN_EXTENT: f64 = 200.0;

/// Half-extent of the region bootstrap resource nodes scatter across.
pub const NODE_SPAWN_EXTENT: f64 = 320.0;

/// Hard cap on entity speed, enforced on offspring inheritance.
pub const MAX_SPEED: f64 = 1.5;

/// Half-amplitude of the personality jitter applied to offspring traits.
pub const PERSONALITY_JITTER: f64 = 0.2;

/// Palette entities draw their display color from.
pub const ENTITY_COLORS: &[&str] = &[
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8",
];

/// Create a fresh entity with randomized position, gauges, and traits.
pub fn random_entity(rng: &mut impl Rng) -> Entity {
    Entity {
        id: EntityId::new(),
        position: Position::new(
            (rng.random::<f64>() - 0.5) * ENTITY_SPAWN_EXTENT * 2.0,
            (rng.random::<f64>() - 0.5) * ENTITY_SPAWN_EXTENT * 2.0,
        ),
        target: Position::ORIGIN,
        health: 100.0,
        food: rng.random::<f64>() * 80.0 + 20.0,
        wood: rng.random::<f64>() * 20.0,
        stone: rng.random::<f64>() * 20.0,
        level: 1,
        experience: 0.0,
        age: rng.random::<f64>() * 10.0,
        color: random_color(rng),
        size: 8.0 + rng.random::<f64>() * 4.0,
        speed: 0.5 + rng.random::<f64>() * 0.5,
        is_moving: false,
        current_task: None,
        buildings: Vec::new(),
        relationships: std::collections::BTreeMap::new(),
        explored_areas: std::collections::BTreeSet::new(),
        personality: Personality {
            aggression: rng.random::<f64>(),
            cooperation: rng.random::<f64>(),
            exploration: rng.random::<f64>(),
            efficiency: rng.random::<f64>(),
        },
        decision_cooldown: 0,
        decision_serial: 0,
    }
}

/// Create an offspring beside `parent`, inheriting a mutated personality
/// and a speed close to the parent's.
pub fn offspring_of(parent: &Entity, rng: &mut impl Rng) -> Entity {
    let mut child = random_entity(rng);
    child.position = Position::new(
        parent.position.x + (rng.random::<f64>() - 0.5) * 20.0,
        parent.position.y + (rng.random::<f64>() - 0.5) * 20.0,
    );
    child.target = child.position;
    child.personality = Personality {
        aggression: mutate_trait(parent.personality.aggression, rng),
        cooperation: mutate_trait(parent.personality.cooperation, rng),
        exploration: mutate_trait(parent.personality.exploration, rng),
        efficiency: mutate_trait(parent.personality.efficiency, rng),
    };
    child.speed = (parent.speed + (rng.random::<f64>() - 0.5) * 0.1).min(MAX_SPEED);
    child
}

/// Scatter one resource node of a random kind on the inner plane.
pub fn random_node(rng: &mut impl Rng) -> ResourceNode {
    let idx = rng.random_range(0..ResourceKind::ALL.len());
    let kind = ResourceKind::ALL.get(idx).copied().unwrap_or(ResourceKind::Food);
    let amount = initial_amount(kind, rng);
    ResourceNode {
        id: ResourceId::new(),
        kind,
        position: Position::new(
            (rng.random::<f64>() - 0.5) * NODE_SPAWN_EXTENT * 2.0,
            (rng.random::<f64>() - 0.5) * NODE_SPAWN_EXTENT * 2.0,
        ),
        amount,
        max_amount: amount,
        respawn_rate: respawn_rate(kind),
    }
}

/// A rich gold deposit revealed by a discovery event. Unlike bootstrap
/// nodes it can appear anywhere on the plane and regrows toward a fixed
/// 300-unit ceiling.
pub fn gold_strike(rng: &mut impl Rng) -> ResourceNode {
    ResourceNode {
        id: ResourceId::new(),
        kind: ResourceKind::Gold,
        position: Position::new(
            (rng.random::<f64>() - 0.5) * PLANE_EXTENT * 2.0,
            (rng.random::<f64>() - 0.5) * PLANE_EXTENT * 2.0,
        ),
        amount: 100.0 + rng.random::<f64>() * 200.0,
        max_amount: 300.0,
        respawn_rate: 0.1,
    }
}

/// Starting units for a bootstrap node of the given kind.
pub fn initial_amount(kind: ResourceKind, rng: &mut impl Rng) -> f64 {
    match kind {
        ResourceKind::Food => 50.0 + rng.random::<f64>() * 100.0,
        ResourceKind::Wood => 80.0 + rng.random::<f64>() * 120.0,
        ResourceKind::Stone => 60.0 + rng.random::<f64>() * 90.0,
        ResourceKind::Water => 200.0 + rng.random::<f64>() * 300.0,
        ResourceKind::Gold => 20.0 + rng.random::<f64>() * 50.0,
    }
}

/// Regrowth rate for each resource kind, in units per world time unit.
#[must_use]
pub const fn respawn_rate(kind: ResourceKind) -> f64 {
    match kind {
        ResourceKind::Food => 2.0,
        ResourceKind::Wood => 1.0,
        ResourceKind::Stone => 0.5,
        ResourceKind::Water => 5.0,
        ResourceKind::Gold => 0.1,
    }
}

/// Pick a display color from the palette.
fn random_color(rng: &mut impl Rng) -> String {
    let idx = rng.random_range(0..ENTITY_COLORS.len());
    ENTITY_COLORS
        .get(idx)
        .map_or_else(|| String::from("#FF6B6B"), |c| String::from(*c))
}

/// Jitter one personality trait and clamp it back into range.
fn mutate_trait(value: f64, rng: &mut impl Rng) -> f64 {
    (value + (rng.random::<f64>() - 0.5) * 2.0 * PERSONALITY_JITTER).clamp(0.0, 1.0)
}
