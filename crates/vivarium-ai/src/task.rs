//! Task translation and completion effects.
//!
//! An action kind is just a word; this module turns it into a [`Task`] with
//! a concrete target, and later applies the one-shot world effect when that
//! task finishes. Both the locally scored fallback and applied provider
//! replies go through the same translation, so a remote decision lands
//! exactly the way a local one would.

use std::cmp::Ordering;

use rand::Rng;
use tracing::{debug, info};

use vivarium_types::{Building, Entity, Position, ResourceKind, Task, TaskKind, WorldState};
use vivarium_world::{query, resource};

use crate::scoring;

/// Box half-extent for self-directed exploration targets.
const EXPLORE_RANGE: f64 = 120.0;

/// Build sites land within this offset of the builder.
const SITE_RANGE: f64 = 20.0;

/// How close a conversation partner must be to the meeting point.
const PARTNER_RADIUS: f64 = 50.0;

/// Relationship gained by both sides of a completed conversation.
const BOND_INCREMENT: f64 = 10.0;

/// Work time each task kind represents at neutral efficiency.
#[must_use]
pub const fn duration_for(kind: TaskKind) -> f64 {
    match kind {
        TaskKind::Gather => 60.0,
        TaskKind::Build => 120.0,
        TaskKind::Explore => 80.0,
        TaskKind::Communicate => 40.0,
        TaskKind::Defend => 50.0,
    }
}

/// Turn a chosen action into a concrete task with fresh targets.
///
/// Actions whose referent is missing right now (no harvestable node, no
/// neighbor to visit, nothing affordable to build) degrade to exploration
/// instead of producing a task that could never finish sensibly.
pub fn task_for(
    action: TaskKind,
    entity: &Entity,
    world: &WorldState,
    neighbor_radius: f64,
    rng: &mut impl Rng,
) -> Task {
    let translated = match action {
        TaskKind::Gather => gather_task(entity, world),
        TaskKind::Build => build_task(entity, rng),
        TaskKind::Explore => Some(explore_task(entity, rng)),
        TaskKind::Communicate => communicate_task(entity, world),
        TaskKind::Defend => defend_task(entity, world, neighbor_radius),
    };
    translated.unwrap_or_else(|| explore_task(entity, rng))
}

/// Apply the one-shot world effect of a finished task.
///
/// The entity is checked out of the world's entity map while this runs;
/// `world` is used for nodes, buildings, and conversation partners.
pub fn complete(world: &mut WorldState, entity: &mut Entity, task: &Task) {
    match task.kind {
        TaskKind::Gather => complete_gather(world, entity, task),
        TaskKind::Build => complete_build(world, entity, task),
        TaskKind::Explore => {
            let sector = entity.position.sector_key();
            entity.explored_areas.insert(sector);
        }
        TaskKind::Communicate => complete_communicate(world, entity, task),
        // The threat was answered by walking out to it; no lasting effect.
        TaskKind::Defend => {}
    }
}

fn gather_task(entity: &Entity, world: &WorldState) -> Option<Task> {
    let gauge = scoring::scarcest_resource(entity);
    let node = harvest_kinds(gauge)
        .iter()
        .filter_map(|kind| query::nearest_node(world, entity.position, *kind))
        .min_by(|a, b| {
            a.position
                .distance_to(entity.position)
                .partial_cmp(&b.position.distance_to(entity.position))
                .unwrap_or(Ordering::Equal)
        })?;
    Some(Task::gather(
        node.kind,
        node.position,
        duration_for(TaskKind::Gather),
    ))
}

/// Node kinds that refill the given gauge, primary kind first.
const fn harvest_kinds(gauge: ResourceKind) -> &'static [ResourceKind] {
    match gauge {
        ResourceKind::Food | ResourceKind::Water => &[ResourceKind::Food, ResourceKind::Water],
        ResourceKind::Wood => &[ResourceKind::Wood],
        ResourceKind::Stone | ResourceKind::Gold => &[ResourceKind::Stone, ResourceKind::Gold],
    }
}

fn build_task(entity: &Entity, rng: &mut impl Rng) -> Option<Task> {
    let kind = scoring::most_expensive_affordable(entity)?;
    let site = Position::new(
        entity.position.x + (rng.random::<f64>() - 0.5) * 2.0 * SITE_RANGE,
        entity.position.y + (rng.random::<f64>() - 0.5) * 2.0 * SITE_RANGE,
    );
    Some(Task::build(kind, site, duration_for(TaskKind::Build)))
}

fn explore_task(entity: &Entity, rng: &mut impl Rng) -> Task {
    let target = Position::new(
        entity.position.x + (rng.random::<f64>() - 0.5) * 2.0 * EXPLORE_RANGE,
        entity.position.y + (rng.random::<f64>() - 0.5) * 2.0 * EXPLORE_RANGE,
    );
    Task::explore(target, duration_for(TaskKind::Explore))
}

fn communicate_task(entity: &Entity, world: &WorldState) -> Option<Task> {
    let (neighbor, _) = query::nearest_entity(world, entity.position, entity.id)?;
    let meeting_point = world.entities.get(&neighbor)?.position;
    Some(Task::communicate(
        meeting_point,
        duration_for(TaskKind::Communicate),
    ))
}

fn defend_task(entity: &Entity, world: &WorldState, neighbor_radius: f64) -> Option<Task> {
    let hostile = query::hostile_neighbor(world, entity.position, entity.id, neighbor_radius)?;
    let threat_position = world.entities.get(&hostile)?.position;
    Some(Task::defend(
        threat_position,
        duration_for(TaskKind::Defend),
    ))
}

fn complete_gather(world: &mut WorldState, entity: &mut Entity, task: &Task) {
    let Some(kind) = task.resource else {
        return;
    };
    let site = task.target.unwrap_or(entity.position);
    let Some(node_id) = query::nearest_node(world, site, kind).map(|node| node.id) else {
        debug!(entity = %entity.id, kind = %kind, "gather finished with nothing left to take");
        return;
    };
    let Some(node) = world.resources.get_mut(&node_id) else {
        return;
    };
    let taken = resource::harvest(node, resource::harvest_yield(entity.level));
    entity.bank_resource(kind, taken);
    debug!(entity = %entity.id, kind = %kind, taken, "harvest banked");
}

fn complete_build(world: &mut WorldState, entity: &mut Entity, task: &Task) {
    let Some(kind) = task.structure else {
        return;
    };
    let (wood_cost, stone_cost) = kind.cost();
    if entity.wood < wood_cost || entity.stone < stone_cost {
        debug!(entity = %entity.id, structure = %kind, "construction skipped, stocks ran dry");
        return;
    }
    entity.wood -= wood_cost;
    entity.stone -= stone_cost;
    let site = task.target.unwrap_or(entity.position);
    let building = Building::new(kind, site, entity.id);
    info!(entity = %entity.id, building = %building.id, structure = %kind, "construction finished");
    entity.buildings.push(building.id);
    world.buildings.insert(building.id, building);
}

fn complete_communicate(world: &mut WorldState, entity: &mut Entity, task: &Task) {
    let meeting_point = task.target.unwrap_or(entity.position);
    let Some((partner_id, distance)) = query::nearest_entity(world, meeting_point, entity.id)
    else {
        return;
    };
    if distance > PARTNER_RADIUS {
        debug!(entity = %entity.id, "nobody close enough to talk to");
        return;
    }
    entity.strengthen_bond(partner_id, BOND_INCREMENT);
    if let Some(partner) = world.entities.get_mut(&partner_id) {
        partner.strengthen_bond(entity.id, BOND_INCREMENT);
    }
    debug!(entity = %entity.id, partner = %partner_id, "bond strengthened");
}
