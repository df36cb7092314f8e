//! The per-entity update cycle.
//!
//! Each tick, every entity runs the same fixed sequence: cooldown, task
//! work, a new decision if the slot is free, then metabolism and movement.
//! Decisions are made locally and immediately; the provider is consulted
//! fire-and-forget, and its replies land on a later tick through
//! [`apply_replies`] under a staleness guard keyed on the entity's decision
//! serial.

use rand::Rng;
use tracing::{debug, info};

use vivarium_types::{DecisionReply, DecisionRequest, Entity, EntityId, Task, WorldState};

use crate::config::EngineConfig;
use crate::context;
use crate::provider::DecisionProvider;
use crate::scoring;
use crate::task;

/// Distance at which a task's work site counts as reached.
const ARRIVAL_RADIUS: f64 = 2.0;

/// Distance inside which movement snaps onto the target point.
const SNAP_RADIUS: f64 = 1.0;

/// Experience granted for each completed task.
const TASK_EXPERIENCE: f64 = 10.0;

/// What happened to one entity during its update step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityOutcome {
    /// A new decision was made and a request submitted.
    pub decided: bool,
    /// A task finished this step.
    pub completed: bool,
}

/// Tally of provider replies handled in one drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplyOutcome {
    /// Replies that replaced the locally assigned task.
    pub applied: usize,
    /// Replies dropped as stale, deferred, or under-confident.
    pub discarded: usize,
}

/// Step one entity through cooldown, task work, decision, and metabolism.
///
/// The entity is checked out of the map for the duration of the step so the
/// world stays freely queryable; an id that is not in the map is a no-op.
pub fn update_entity(
    world: &mut WorldState,
    id: EntityId,
    provider: &mut dyn DecisionProvider,
    config: &EngineConfig,
    rng: &mut impl Rng,
    dt: f64,
) -> EntityOutcome {
    let mut outcome = EntityOutcome::default();
    let Some(mut entity) = world.entities.remove(&id) else {
        return outcome;
    };

    entity.decision_cooldown = entity.decision_cooldown.saturating_sub(1);

    outcome.completed = progress_task(world, &mut entity, dt);

    if entity.decision_cooldown == 0 && !entity.has_task() {
        decide(world, &mut entity, provider, config, rng);
        outcome.decided = true;
    }

    integrate(&mut entity, config, dt);

    world.entities.insert(id, entity);
    outcome
}

/// Apply drained provider replies under the staleness guard.
///
/// A reply lands only when the entity still exists, the serial matches, the
/// task it raced is still in the slot, and confidence clears the floor.
/// Applied replies replace the task at fresh targets without touching the
/// cooldown or the serial; everything else is dropped with a debug log.
pub fn apply_replies(
    world: &mut WorldState,
    replies: Vec<DecisionReply>,
    provider_name: &str,
    config: &EngineConfig,
    rng: &mut impl Rng,
) -> ReplyOutcome {
    let mut outcome = ReplyOutcome::default();
    for reply in replies {
        let Some(decision) = reply.decision else {
            outcome.discarded = outcome.discarded.saturating_add(1);
            continue;
        };
        let Some(mut entity) = world.entities.remove(&reply.entity) else {
            debug!(entity = %reply.entity, "reply for an entity that no longer exists");
            outcome.discarded = outcome.discarded.saturating_add(1);
            continue;
        };

        if reply.serial == entity.decision_serial
            && entity.has_task()
            && decision.is_confident(config.confidence_floor)
        {
            let chosen =
                task::task_for(decision.action, &entity, world, config.neighbor_radius, rng);
            aim_at_task(&mut entity, &chosen);
            info!(
                entity = %reply.entity,
                provider = provider_name,
                action = %chosen.kind,
                confidence = decision.confidence,
                reasoning = %decision.reasoning,
                "provider decision applied"
            );
            entity.current_task = Some(chosen);
            outcome.applied = outcome.applied.saturating_add(1);
        } else {
            debug!(
                entity = %reply.entity,
                serial = reply.serial,
                current = entity.decision_serial,
                confidence = decision.confidence,
                "reply discarded as stale or under-confident"
            );
            outcome.discarded = outcome.discarded.saturating_add(1);
        }

        world.entities.insert(reply.entity, entity);
    }
    outcome
}

/// Advance the current task, applying its effect once progress reaches 1.
/// Returns whether the task finished this step.
fn progress_task(world: &mut WorldState, entity: &mut Entity, dt: f64) -> bool {
    let Some(mut current) = entity.current_task.take() else {
        return false;
    };

    let rate = (0.5 + entity.personality.efficiency) / current.duration;
    current.progress = (current.progress + rate * dt).min(1.0);

    if let Some(site) = current.target {
        if entity.position.distance_to(site) > ARRIVAL_RADIUS {
            entity.target = site;
            entity.is_moving = true;
        } else {
            entity.is_moving = false;
        }
    }

    if current.is_complete() {
        task::complete(world, entity, &current);
        if entity.grant_experience(TASK_EXPERIENCE) {
            info!(entity = %entity.id, level = entity.level, "leveled up");
        }
        entity.decision_serial = entity.decision_serial.wrapping_add(1);
        entity.is_moving = false;
        debug!(entity = %entity.id, kind = %current.kind, "task finished");
        true
    } else {
        entity.current_task = Some(current);
        false
    }
}

/// Choose a task locally, assign it, then ask the provider for a better one.
fn decide(
    world: &WorldState,
    entity: &mut Entity,
    provider: &mut dyn DecisionProvider,
    config: &EngineConfig,
    rng: &mut impl Rng,
) {
    let action = scoring::choose_action(world, entity, config.neighbor_radius, rng);
    let chosen = task::task_for(action, entity, world, config.neighbor_radius, rng);
    entity.decision_serial = entity.decision_serial.wrapping_add(1);
    aim_at_task(entity, &chosen);
    debug!(
        entity = %entity.id,
        action = %chosen.kind,
        serial = entity.decision_serial,
        "task assigned locally"
    );
    entity.current_task = Some(chosen);

    provider.submit(DecisionRequest {
        entity: entity.id,
        serial: entity.decision_serial,
        snapshot: context::snapshot_of(entity),
        context: context::context_for(world, entity, config.neighbor_radius),
    });
    entity.decision_cooldown = config.decision_cooldown;
}

fn aim_at_task(entity: &mut Entity, chosen: &Task) {
    if let Some(site) = chosen.target {
        entity.target = site;
        entity.is_moving = entity.position.distance_to(site) > ARRIVAL_RADIUS;
    }
}

/// Metabolism and movement: walk, eat, starve or heal, age.
fn integrate(entity: &mut Entity, config: &EngineConfig, dt: f64) {
    if entity.is_moving {
        step_toward_target(entity, dt);
    }

    entity.food = (entity.food - config.food_decay * dt).max(0.0);
    if entity.food <= 0.0 {
        entity.damage(config.health_decay * dt);
    } else {
        entity.heal(config.health_regen * dt);
    }
    entity.age += dt;
}

fn step_toward_target(entity: &mut Entity, dt: f64) {
    let dx = entity.target.x - entity.position.x;
    let dy = entity.target.y - entity.position.y;
    let distance = entity.position.distance_to(entity.target);
    let step = entity.speed * dt;

    if distance <= SNAP_RADIUS || step >= distance {
        entity.position = entity.target;
        entity.is_moving = false;
        return;
    }

    entity.position.x += dx / distance * step;
    entity.position.y += dy / distance * step;
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use vivarium_types::{Decision, EntityId, Personality, Position, TaskKind};

    use crate::provider::RuleProvider;

    use super::*;

    /// Records submissions and never answers; isolates the local path.
    #[derive(Default)]
    struct CountingProvider {
        requests: Vec<DecisionRequest>,
    }

    impl DecisionProvider for CountingProvider {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn submit(&mut self, request: DecisionRequest) {
            self.requests.push(request);
        }

        fn drain(&mut self) -> Vec<DecisionReply> {
            Vec::new()
        }
    }

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
            color: "#DDA0DD".to_owned(),
            size: 10.0,
            speed: 1.0,
            is_moving: false,
            current_task: None,
            buildings: Vec::new(),
            relationships: BTreeMap::new(),
            explored_areas: BTreeSet::new(),
            personality: Personality::default(),
            decision_cooldown: 0,
            decision_serial: 0,
        }
    }

    fn world_with(entity: Entity) -> (WorldState, EntityId) {
        let id = entity.id;
        let mut world = WorldState::new();
        world.entities.insert(id, entity);
        (world, id)
    }

    fn busy_task() -> Task {
        Task::explore(Position::new(300.0, 0.0), 60.0)
    }

    #[test]
    fn cooldown_decrements_and_saturates() {
        let mut entity = test_entity();
        entity.decision_cooldown = 5;
        entity.current_task = Some(busy_task());
        let (mut world, id) = world_with(entity);
        let mut provider = CountingProvider::default();
        let mut rng = SmallRng::seed_from_u64(1);

        update_entity(
            &mut world,
            id,
            &mut provider,
            &EngineConfig::default(),
            &mut rng,
            1.0,
        );
        assert_eq!(
            world.entities.get(&id).map(|e| e.decision_cooldown),
            Some(4)
        );

        for _ in 0..10 {
            update_entity(
                &mut world,
                id,
                &mut provider,
                &EngineConfig::default(),
                &mut rng,
                1.0,
            );
        }
        assert_eq!(
            world.entities.get(&id).map(|e| e.decision_cooldown),
            Some(0)
        );
    }

    #[test]
    fn task_progress_follows_efficiency() {
        let mut entity = test_entity();
        entity.current_task = Some(busy_task());
        entity.decision_cooldown = 10;
        let (mut world, id) = world_with(entity);
        let mut provider = CountingProvider::default();
        let mut rng = SmallRng::seed_from_u64(2);

        update_entity(
            &mut world,
            id,
            &mut provider,
            &EngineConfig::default(),
            &mut rng,
            1.0,
        );

        // Efficiency 0.5 gives rate (0.5 + 0.5) / 60 per tick.
        let progress = world
            .entities
            .get(&id)
            .and_then(|e| e.current_task.as_ref())
            .map(|t| t.progress);
        assert_eq!(progress, Some(1.0 / 60.0));
    }

    #[test]
    fn completion_clears_task_and_bumps_serial() {
        let mut entity = test_entity();
        let mut almost_done = busy_task();
        almost_done.progress = 0.999;
        entity.current_task = Some(almost_done);
        entity.decision_cooldown = 10;
        let (mut world, id) = world_with(entity);
        let mut provider = CountingProvider::default();
        let mut rng = SmallRng::seed_from_u64(3);

        let outcome = update_entity(
            &mut world,
            id,
            &mut provider,
            &EngineConfig::default(),
            &mut rng,
            1.0,
        );

        assert!(outcome.completed);
        let Some(after) = world.entities.get(&id) else {
            return;
        };
        assert!(after.current_task.is_none());
        assert_eq!(after.experience, 10.0);
        assert_eq!(after.decision_serial, 1);
    }

    #[test]
    fn empty_slot_gets_a_task_and_a_request() {
        let (mut world, id) = world_with(test_entity());
        let mut provider = CountingProvider::default();
        let mut rng = SmallRng::seed_from_u64(4);

        let outcome = update_entity(
            &mut world,
            id,
            &mut provider,
            &EngineConfig::default(),
            &mut rng,
            1.0,
        );

        assert!(outcome.decided);
        let Some(after) = world.entities.get(&id) else {
            return;
        };
        assert!(after.has_task());
        assert_eq!(after.decision_cooldown, 30);
        assert_eq!(after.decision_serial, 1);
        assert_eq!(provider.requests.len(), 1);
        assert_eq!(provider.requests.first().map(|r| r.serial), Some(1));
    }

    #[test]
    fn no_decision_while_cooling_down() {
        let mut entity = test_entity();
        entity.decision_cooldown = 10;
        let (mut world, id) = world_with(entity);
        let mut provider = CountingProvider::default();
        let mut rng = SmallRng::seed_from_u64(5);

        let outcome = update_entity(
            &mut world,
            id,
            &mut provider,
            &EngineConfig::default(),
            &mut rng,
            1.0,
        );

        assert!(!outcome.decided);
        assert!(provider.requests.is_empty());
        assert_eq!(world.entities.get(&id).map(Entity::has_task), Some(false));
    }

    #[test]
    fn starvation_drains_health_and_food_floors_at_zero() {
        let mut entity = test_entity();
        entity.food = 0.01;
        entity.health = 50.0;
        entity.decision_cooldown = 10;
        let (mut world, id) = world_with(entity);
        let mut provider = CountingProvider::default();
        let mut rng = SmallRng::seed_from_u64(6);
        let config = EngineConfig::default();

        update_entity(&mut world, id, &mut provider, &config, &mut rng, 1.0);
        let Some(after) = world.entities.get(&id) else {
            return;
        };
        assert_eq!(after.food, 0.0);
        assert_eq!(after.health, 50.0 - config.health_decay);
    }

    #[test]
    fn fed_entity_regenerates_up_to_the_cap() {
        let mut entity = test_entity();
        entity.health = 99.999;
        entity.decision_cooldown = 10;
        let (mut world, id) = world_with(entity);
        let mut provider = CountingProvider::default();
        let mut rng = SmallRng::seed_from_u64(7);

        for _ in 0..10 {
            update_entity(
                &mut world,
                id,
                &mut provider,
                &EngineConfig::default(),
                &mut rng,
                1.0,
            );
        }
        assert_eq!(world.entities.get(&id).map(|e| e.health), Some(100.0));
    }

    #[test]
    fn movement_steps_toward_the_target_and_snaps() {
        let mut entity = test_entity();
        entity.target = Position::new(10.0, 0.0);
        entity.is_moving = true;
        entity.decision_cooldown = 30;
        entity.current_task = Some(busy_task());
        let (mut world, id) = world_with(entity);
        let mut provider = CountingProvider::default();
        let mut rng = SmallRng::seed_from_u64(8);

        // busy_task aims at (300, 0); the first update re-targets there.
        update_entity(
            &mut world,
            id,
            &mut provider,
            &EngineConfig::default(),
            &mut rng,
            1.0,
        );
        let Some(after) = world.entities.get(&id) else {
            return;
        };
        assert_eq!(after.target, Position::new(300.0, 0.0));
        assert_eq!(after.position.x, 1.0);
        assert_eq!(after.position.y, 0.0);

        // Inside the snap radius the walk ends exactly on the target.
        if let Some(walker) = world.entities.get_mut(&id) {
            walker.position = Position::new(299.5, 0.0);
            walker.current_task = None;
            walker.decision_cooldown = 10;
            walker.is_moving = true;
        }
        update_entity(
            &mut world,
            id,
            &mut provider,
            &EngineConfig::default(),
            &mut rng,
            1.0,
        );
        let Some(snapped) = world.entities.get(&id) else {
            return;
        };
        assert_eq!(snapped.position, Position::new(300.0, 0.0));
        assert!(!snapped.is_moving);
    }

    #[test]
    fn missing_entity_is_a_no_op() {
        let mut world = WorldState::new();
        let mut provider = CountingProvider::default();
        let mut rng = SmallRng::seed_from_u64(9);
        let outcome = update_entity(
            &mut world,
            EntityId::new(),
            &mut provider,
            &EngineConfig::default(),
            &mut rng,
            1.0,
        );
        assert_eq!(outcome, EntityOutcome::default());
    }

    #[test]
    fn matching_reply_replaces_the_task() {
        let mut entity = test_entity();
        entity.decision_serial = 1;
        entity.decision_cooldown = 15;
        let mut raced = busy_task();
        raced.progress = 0.2;
        entity.current_task = Some(raced);
        let (mut world, id) = world_with(entity);
        let mut rng = SmallRng::seed_from_u64(10);

        let reply = DecisionReply {
            entity: id,
            serial: 1,
            decision: Some(Decision::new(TaskKind::Explore, "scenic route", 0.9)),
        };
        let outcome = apply_replies(
            &mut world,
            vec![reply],
            "test",
            &EngineConfig::default(),
            &mut rng,
        );

        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.discarded, 0);
        let Some(after) = world.entities.get(&id) else {
            return;
        };
        // Fresh task, untouched cooldown and serial.
        assert_eq!(
            after.current_task.as_ref().map(|t| t.progress),
            Some(0.0)
        );
        assert_eq!(after.decision_cooldown, 15);
        assert_eq!(after.decision_serial, 1);
    }

    #[test]
    fn stale_serial_is_discarded() {
        let mut entity = test_entity();
        entity.decision_serial = 2;
        entity.current_task = Some(busy_task());
        let (mut world, id) = world_with(entity);
        let mut rng = SmallRng::seed_from_u64(11);

        let reply = DecisionReply {
            entity: id,
            serial: 1,
            decision: Some(Decision::new(TaskKind::Gather, "old news", 0.9)),
        };
        let outcome = apply_replies(
            &mut world,
            vec![reply],
            "test",
            &EngineConfig::default(),
            &mut rng,
        );

        assert_eq!(outcome.applied, 0);
        assert_eq!(outcome.discarded, 1);
        // The raced task survives untouched, original target included.
        let target = world
            .entities
            .get(&id)
            .and_then(|e| e.current_task.as_ref())
            .and_then(|t| t.target);
        assert_eq!(target, Some(Position::new(300.0, 0.0)));
    }

    #[test]
    fn low_confidence_is_discarded() {
        let mut entity = test_entity();
        entity.decision_serial = 1;
        entity.current_task = Some(busy_task());
        let (mut world, id) = world_with(entity);
        let mut rng = SmallRng::seed_from_u64(12);

        let reply = DecisionReply {
            entity: id,
            serial: 1,
            decision: Some(Decision::new(TaskKind::Gather, "maybe", 0.3)),
        };
        let outcome = apply_replies(
            &mut world,
            vec![reply],
            "test",
            &EngineConfig::default(),
            &mut rng,
        );
        assert_eq!(outcome.applied, 0);
        assert_eq!(outcome.discarded, 1);
    }

    #[test]
    fn empty_slot_and_missing_entity_are_discarded() {
        let mut entity = test_entity();
        entity.decision_serial = 1;
        let (mut world, id) = world_with(entity);
        let mut rng = SmallRng::seed_from_u64(13);

        let for_idle = DecisionReply {
            entity: id,
            serial: 1,
            decision: Some(Decision::new(TaskKind::Gather, "too late", 0.9)),
        };
        let for_ghost = DecisionReply {
            entity: EntityId::new(),
            serial: 0,
            decision: Some(Decision::new(TaskKind::Gather, "nobody home", 0.9)),
        };
        let deferred = DecisionReply {
            entity: id,
            serial: 1,
            decision: None,
        };
        let outcome = apply_replies(
            &mut world,
            vec![for_idle, for_ghost, deferred],
            "test",
            &EngineConfig::default(),
            &mut rng,
        );
        assert_eq!(outcome.applied, 0);
        assert_eq!(outcome.discarded, 3);
    }

    #[test]
    fn rule_provider_round_trip_overrides_the_local_task() {
        let mut entity = test_entity();
        // Low health forces the ladder's top rung.
        entity.health = 10.0;
        let (mut world, id) = world_with(entity);
        let mut provider = RuleProvider::new();
        let mut rng = SmallRng::seed_from_u64(14);
        let config = EngineConfig::default();

        let outcome = update_entity(&mut world, id, &mut provider, &config, &mut rng, 1.0);
        assert!(outcome.decided);

        let replies = provider.drain();
        assert_eq!(replies.len(), 1);
        let applied = apply_replies(&mut world, replies, "rules", &config, &mut rng);
        assert_eq!(applied.applied, 1);

        // The ladder said gather; without nodes this degrades to explore,
        // but the slot was replaced either way with zero progress.
        let progress = world
            .entities
            .get(&id)
            .and_then(|e| e.current_task.as_ref())
            .map(|t| t.progress);
        assert_eq!(progress, Some(0.0));
    }
}
