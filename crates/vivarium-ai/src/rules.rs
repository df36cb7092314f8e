//! Deterministic rule ladder.
//!
//! The always-available local decider: a fixed priority ladder over the
//! entity snapshot and world context. Survival first, then industry, then
//! social behavior, with exploration as the unconditional floor. The ladder
//! is a pure function of its inputs, which makes it the reference decider
//! for tests and the fallback for every other provider.

use tracing::info;

use vivarium_types::{Decision, EntitySnapshot, TaskKind, WorldContext};

// Thresholds, kept as named constants so operators can find and tune them.

/// Health below this forces a food run no matter what else is going on.
const CRITICAL_HEALTH: f64 = 30.0;

/// Food reserve below this triggers a gathering trip.
const LOW_FOOD: f64 = 20.0;

/// Wood stock needed before construction is worth starting.
const BUILD_WOOD: f64 = 50.0;

/// Stone stock needed before construction is worth starting.
const BUILD_STONE: f64 = 30.0;

/// Cooperation trait above which an entity seeks out company.
const SOCIAL_COOPERATION: f64 = 0.6;

/// Decide an action for one entity. First matching rule wins.
#[must_use]
pub fn decide(snapshot: &EntitySnapshot, context: &WorldContext) -> Decision {
    if snapshot.health < CRITICAL_HEALTH {
        info!(
            entity = %snapshot.id,
            health = snapshot.health,
            rule = "critical_health",
            "rule ladder: gathering food to recover"
        );
        return Decision::new(TaskKind::Gather, "Low health, need food", 0.9);
    }

    if snapshot.food < LOW_FOOD {
        info!(
            entity = %snapshot.id,
            food = snapshot.food,
            rule = "low_food",
            "rule ladder: restocking food reserves"
        );
        return Decision::new(TaskKind::Gather, "Low food reserves", 0.8);
    }

    if snapshot.wood >= BUILD_WOOD && snapshot.stone >= BUILD_STONE {
        info!(
            entity = %snapshot.id,
            wood = snapshot.wood,
            stone = snapshot.stone,
            rule = "ready_to_build",
            "rule ladder: spending stockpile on construction"
        );
        return Decision::new(TaskKind::Build, "Have enough resources to build", 0.7);
    }

    if context.nearby_entity_count > 0 && snapshot.personality.cooperation > SOCIAL_COOPERATION {
        info!(
            entity = %snapshot.id,
            neighbors = context.nearby_entity_count,
            cooperation = snapshot.personality.cooperation,
            rule = "social_visit",
            "rule ladder: visiting a nearby companion"
        );
        return Decision::new(
            TaskKind::Communicate,
            "Social entity with nearby companions",
            0.6,
        );
    }

    info!(entity = %snapshot.id, rule = "default_explore", "rule ladder: exploring");
    Decision::new(TaskKind::Explore, "Default exploration behavior", 0.6)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use vivarium_types::{EntityId, Personality, Position, Season, TimeOfDay, Weather};

    use super::*;

    fn make_snapshot() -> EntitySnapshot {
        EntitySnapshot {
            id: EntityId::new(),
            position: Position::ORIGIN,
            health: 100.0,
            food: 60.0,
            wood: 0.0,
            stone: 0.0,
            level: 1,
            age: 0.0,
            personality: Personality::default(),
            building_count: 0,
            explored_count: 0,
        }
    }

    fn make_context() -> WorldContext {
        WorldContext {
            weather: Weather::Sunny,
            season: Season::Spring,
            time_of_day: TimeOfDay::Day,
            nearby_entity_count: 0,
            available_resources: "food: 100".to_owned(),
            generation: 1,
            total_entities: 5,
        }
    }

    #[test]
    fn critical_health_forces_gathering() {
        let mut snapshot = make_snapshot();
        snapshot.health = 20.0;
        let decision = decide(&snapshot, &make_context());
        assert_eq!(decision.action, TaskKind::Gather);
        assert_eq!(decision.confidence, 0.9);
        assert_eq!(decision.reasoning, "Low health, need food");
    }

    #[test]
    fn critical_health_outranks_everything() {
        let mut snapshot = make_snapshot();
        snapshot.health = 10.0;
        snapshot.wood = 200.0;
        snapshot.stone = 200.0;
        snapshot.personality.cooperation = 1.0;
        let mut context = make_context();
        context.nearby_entity_count = 4;

        assert_eq!(decide(&snapshot, &context).action, TaskKind::Gather);
    }

    #[test]
    fn low_food_triggers_gathering() {
        let mut snapshot = make_snapshot();
        snapshot.food = 10.0;
        let decision = decide(&snapshot, &make_context());
        assert_eq!(decision.action, TaskKind::Gather);
        assert_eq!(decision.confidence, 0.8);
        assert_eq!(decision.reasoning, "Low food reserves");
    }

    #[test]
    fn stockpile_triggers_building() {
        let mut snapshot = make_snapshot();
        snapshot.wood = 50.0;
        snapshot.stone = 30.0;
        let decision = decide(&snapshot, &make_context());
        assert_eq!(decision.action, TaskKind::Build);
        assert_eq!(decision.confidence, 0.7);
    }

    #[test]
    fn build_needs_both_stocks() {
        let mut snapshot = make_snapshot();
        snapshot.wood = 200.0;
        snapshot.stone = 29.0;
        assert_eq!(decide(&snapshot, &make_context()).action, TaskKind::Explore);
    }

    #[test]
    fn sociable_entity_communicates_when_not_alone() {
        let mut snapshot = make_snapshot();
        snapshot.personality.cooperation = 0.8;
        let mut context = make_context();
        context.nearby_entity_count = 2;
        let decision = decide(&snapshot, &context);
        assert_eq!(decision.action, TaskKind::Communicate);
        assert_eq!(decision.reasoning, "Social entity with nearby companions");
    }

    #[test]
    fn sociable_entity_explores_when_alone() {
        let mut snapshot = make_snapshot();
        snapshot.personality.cooperation = 0.8;
        let decision = decide(&snapshot, &make_context());
        assert_eq!(decision.action, TaskKind::Explore);
        assert_eq!(decision.confidence, 0.6);
        assert_eq!(decision.reasoning, "Default exploration behavior");
    }

    #[test]
    fn ladder_is_deterministic() {
        let mut snapshot = make_snapshot();
        snapshot.health = 20.0;
        snapshot.food = 50.0;
        let context = make_context();
        for _ in 0..10 {
            let decision = decide(&snapshot, &context);
            assert_eq!(decision.action, TaskKind::Gather);
            assert_eq!(decision.confidence, 0.9);
        }
    }
}
