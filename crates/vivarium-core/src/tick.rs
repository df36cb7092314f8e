//! Tick cycle: the ten-phase engine loop that drives the Vivarium world.
//!
//! Each call to [`Simulation::advance`] runs through these phases:
//!
//! 1. **Clock** -- advance world time by `dt`.
//! 2. **Replies** -- drain the decision provider and apply eligible replies
//!    under the staleness guard.
//! 3. **Entities** -- per-entity AI update in id order: cooldown, task work,
//!    new decisions, metabolism, and movement.
//! 4. **Buildings** -- accumulate production, credit completed batches to
//!    owners, roll structural decay.
//! 5. **Resources** -- regrow every node toward its capacity.
//! 6. **Particles** -- integrate, cull, and occasionally emit ambient magic.
//! 7. **Offspring** -- probabilistic birth from a thriving parent.
//! 8. **Deaths** -- remove entities at zero health or past the age cap;
//!    reseed a fresh generation on total collapse.
//! 9. **Environment** -- derive the season from the clock, occasionally
//!    reroll the weather.
//! 10. **Events** -- probabilistic world events: discovery, conflict,
//!     cooperation, disaster.
//!
//! `advance` is infallible; a negative `dt` is treated as zero. All
//! randomness flows through the simulation's seeded RNG, so a run is
//! reproducible for a given seed and decision provider.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info};

use vivarium_ai::{DecisionProvider, EngineConfig, apply_replies, update_entity};
use vivarium_types::{EntityId, EventImpact, EventKind, WorldState};
use vivarium_world::{
    accumulate_production, ambient_magic, birth_spark, death_smoke, gold_strike, offspring_of,
    random_entity, random_node, regenerate, roll_weather, season_for, step_all, weather_decay,
};

use crate::config::SimConfig;

/// Food gauge ceiling applied when cooperation events share supplies.
const FOOD_CAP: f64 = 100.0;

/// Probability that any one entity is struck when a disaster fires.
const DISASTER_CHANCE: f64 = 0.3;

/// Summary of a single tick's execution, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// World time advanced this tick.
    pub dt: f64,
    /// Living entities at the end of the tick.
    pub entities: usize,
    /// Local decisions made (and provider requests submitted).
    pub decisions: usize,
    /// Provider replies that replaced a locally assigned task.
    pub overrides_applied: usize,
    /// Provider replies dropped as stale, deferred, or under-confident.
    pub replies_discarded: usize,
    /// Tasks that finished this tick.
    pub tasks_completed: usize,
    /// Entities born this tick.
    pub births: usize,
    /// Entities removed this tick.
    pub deaths: usize,
    /// Events appended to the log this tick.
    pub events: usize,
    /// Generation counter at the end of the tick.
    pub generation: u32,
}

/// One running world: state, seeded randomness, tuning, and the decision
/// provider. The host drives it by calling [`Simulation::advance`] in a
/// loop; everything else is internal.
pub struct Simulation {
    world: WorldState,
    rng: SmallRng,
    config: SimConfig,
    engine: EngineConfig,
    provider: Box<dyn DecisionProvider>,
}

impl Simulation {
    /// Create an empty simulation from a config and a decision provider.
    ///
    /// The RNG is seeded from `config.world.seed`. The world starts empty;
    /// call [`Simulation::bootstrap`] to populate it.
    #[must_use]
    pub fn new(config: SimConfig, provider: Box<dyn DecisionProvider>) -> Self {
        let engine = EngineConfig {
            decision_cooldown: config.decisions.cooldown,
            confidence_floor: config.decisions.confidence_floor,
            neighbor_radius: config.decisions.neighbor_radius,
            food_decay: config.rates.food_decay,
            health_decay: config.rates.health_decay,
            health_regen: config.rates.health_regen,
        };
        Self {
            world: WorldState::new(),
            rng: SmallRng::seed_from_u64(config.world.seed),
            config,
            engine,
            provider,
        }
    }

    /// The current world state.
    #[must_use]
    pub const fn world(&self) -> &WorldState {
        &self.world
    }

    /// The configuration this simulation was built from.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Populate a fresh world: entities, resource nodes, and the opening
    /// event naming every founder.
    pub fn bootstrap(&mut self) {
        for _ in 0..self.config.population.initial {
            let entity = random_entity(&mut self.rng);
            self.world.entities.insert(entity.id, entity);
        }
        for _ in 0..self.config.bootstrap.resource_count {
            let node = random_node(&mut self.rng);
            self.world.resources.insert(node.id, node);
        }
        let founders: Vec<EntityId> = self.world.entities.keys().copied().collect();
        info!(
            entities = founders.len(),
            resources = self.world.resources.len(),
            seed = self.config.world.seed,
            "world bootstrapped"
        );
        self.world.record_event(
            EventKind::Discovery,
            founders,
            "A new world begins to evolve...",
            EventImpact::new(100.0, 0.0),
        );
    }

    /// Run one tick of the simulation.
    ///
    /// `dt` is the world time to advance; negative values are clamped to
    /// zero. Returns a [`TickReport`] summarizing what happened.
    pub fn advance(&mut self, dt: f64) -> TickReport {
        let dt = dt.max(0.0);
        let mut report = TickReport {
            dt,
            ..TickReport::default()
        };

        // Phase 1: clock.
        self.world.time += dt;

        // Phase 2: provider replies.
        let replies = self.provider.drain();
        let landed = apply_replies(
            &mut self.world,
            replies,
            self.provider.name(),
            &self.engine,
            &mut self.rng,
        );
        report.overrides_applied = landed.applied;
        report.replies_discarded = landed.discarded;

        // Phase 3: per-entity updates, in id order.
        let ids: Vec<EntityId> = self.world.entities.keys().copied().collect();
        for id in ids {
            let outcome = update_entity(
                &mut self.world,
                id,
                self.provider.as_mut(),
                &self.engine,
                &mut self.rng,
                dt,
            );
            if outcome.decided {
                report.decisions = report.decisions.saturating_add(1);
            }
            if outcome.completed {
                report.tasks_completed = report.tasks_completed.saturating_add(1);
            }
        }

        self.step_buildings(dt);
        self.step_resources(dt);
        self.step_particles(dt);
        self.roll_offspring(dt, &mut report);
        self.process_deaths(&mut report);
        self.step_environment(dt);
        self.roll_world_event(dt, &mut report);

        report.entities = self.world.population();
        report.generation = self.world.generation;
        debug!(
            time = self.world.time,
            population = report.entities,
            decisions = report.decisions,
            "tick complete"
        );
        report
    }

    /// Phase 4: production accumulation, batch transfer, and decay.
    fn step_buildings(&mut self, dt: f64) {
        let decay_chance = self.config.rates.building_decay;
        for building in self.world.buildings.values_mut() {
            if let Some((resource, units)) = accumulate_production(building, dt)
                && let Some(owner) = self.world.entities.get_mut(&building.owner)
            {
                owner.bank_resource(resource, units);
            }
            weather_decay(building, decay_chance, dt, &mut self.rng);
        }
    }

    /// Phase 5: regrow every resource node toward capacity.
    fn step_resources(&mut self, dt: f64) {
        for node in self.world.resources.values_mut() {
            regenerate(node, dt);
        }
    }

    /// Phase 6: integrate and cull particles, occasionally add ambience.
    fn step_particles(&mut self, dt: f64) {
        step_all(&mut self.world.particles, dt);
        if self.rng.random::<f64>() < self.config.rates.ambient_particle * dt {
            let sparkle = ambient_magic(&mut self.rng);
            self.world.particles.push(sparkle);
        }
    }

    /// Phase 7: probabilistic birth from a thriving parent.
    fn roll_offspring(&mut self, dt: f64, report: &mut TickReport) {
        if self.rng.random::<f64>() >= self.config.rates.offspring * dt {
            return;
        }
        if self.world.population() >= self.config.population.cap {
            return;
        }

        let qualified: Vec<EntityId> = self
            .world
            .entities
            .values()
            .filter(|e| e.health > 80.0 && e.food > 60.0 && e.level >= 2)
            .map(|e| e.id)
            .collect();
        if qualified.is_empty() {
            return;
        }
        let pick = self.rng.random_range(0..qualified.len());
        let Some(parent_id) = qualified.get(pick).copied() else {
            return;
        };
        let Some(parent) = self.world.entities.get(&parent_id) else {
            return;
        };

        let child = offspring_of(parent, &mut self.rng);
        let child_id = child.id;
        let spark = birth_spark(child.position, &mut self.rng);
        info!(parent = %parent_id, child = %child_id, "offspring born");
        self.world.particles.push(spark);
        self.world.entities.insert(child_id, child);
        self.world.record_event(
            EventKind::Evolution,
            vec![parent_id, child_id],
            format!("{parent_id} has created offspring!"),
            EventImpact::new(50.0, 0.0),
        );
        report.births = report.births.saturating_add(1);
        report.events = report.events.saturating_add(1);
    }

    /// Phase 8: remove the dead; reseed a new generation on collapse.
    fn process_deaths(&mut self, report: &mut TickReport) {
        let max_age = self.config.population.max_age;
        let doomed: Vec<EntityId> = self
            .world
            .entities
            .values()
            .filter(|e| e.health <= 0.0 || e.age > max_age)
            .map(|e| e.id)
            .collect();

        for id in doomed {
            if let Some(entity) = self.world.entities.remove(&id) {
                info!(entity = %id, age = entity.age, "entity died");
                self.world.particles.push(death_smoke(entity.position));
                report.deaths = report.deaths.saturating_add(1);
            }
        }

        if self.world.population() == 0 {
            self.world.generation = self.world.generation.saturating_add(1);
            for _ in 0..self.config.population.reseed {
                let entity = random_entity(&mut self.rng);
                self.world.entities.insert(entity.id, entity);
            }
            let generation = self.world.generation;
            info!(
                generation,
                reseeded = self.config.population.reseed,
                "population collapsed, new generation seeded"
            );
            self.world.record_event(
                EventKind::Evolution,
                Vec::new(),
                format!("Generation {generation} begins!"),
                EventImpact::new(100.0, 0.0),
            );
            report.events = report.events.saturating_add(1);
        }
    }

    /// Phase 9: season from the clock, probabilistic weather change.
    fn step_environment(&mut self, dt: f64) {
        self.world.season = season_for(self.world.time);
        if self.rng.random::<f64>() < self.config.rates.weather * dt {
            self.world.weather = roll_weather(&mut self.rng);
            debug!(weather = ?self.world.weather, "weather shifted");
        }
    }

    /// Phase 10: probabilistic world event, uniform over the four kinds.
    fn roll_world_event(&mut self, dt: f64, report: &mut TickReport) {
        if self.rng.random::<f64>() >= self.config.rates.event * dt {
            return;
        }
        match self.rng.random_range(0..4_u32) {
            0 => self.discovery_event(report),
            1 => self.conflict_event(report),
            2 => self.cooperation_event(report),
            _ => self.disaster_event(report),
        }
    }

    /// A rich gold deposit appears somewhere on the plane.
    fn discovery_event(&mut self, report: &mut TickReport) {
        let node = gold_strike(&mut self.rng);
        info!(node = %node.id, amount = node.amount, "gold deposit discovered");
        self.world.resources.insert(node.id, node);
        self.world.record_event(
            EventKind::Discovery,
            Vec::new(),
            "A rich gold deposit has been discovered!",
            EventImpact::new(75.0, 0.0),
        );
        report.events = report.events.saturating_add(1);
    }

    /// Two entities clash over territory, both taking the same damage.
    ///
    /// Two independent uniform picks; when both land on the same entity
    /// the dispute fizzles and nothing is recorded.
    fn conflict_event(&mut self, report: &mut TickReport) {
        let ids: Vec<EntityId> = self.world.entities.keys().copied().collect();
        if ids.len() < 2 {
            return;
        }
        let first = ids.get(self.rng.random_range(0..ids.len())).copied();
        let second = ids.get(self.rng.random_range(0..ids.len())).copied();
        let (Some(a), Some(b)) = (first, second) else {
            return;
        };
        if a == b {
            return;
        }

        let damage = 10.0 + self.rng.random::<f64>() * 20.0;
        for id in [a, b] {
            if let Some(entity) = self.world.entities.get_mut(&id) {
                entity.damage(damage);
            }
        }
        info!(first = %a, second = %b, damage, "territorial dispute");
        self.world.record_event(
            EventKind::Conflict,
            vec![a, b],
            "A territorial dispute has broken out!",
            EventImpact::new(0.0, 50.0),
        );
        report.events = report.events.saturating_add(1);
    }

    /// The first few entities pool supplies and experience.
    fn cooperation_event(&mut self, report: &mut TickReport) {
        if self.world.population() < 2 {
            return;
        }
        let mut allies = Vec::new();
        for entity in self.world.entities.values_mut().take(3) {
            entity.food = (entity.food + 20.0).min(FOOD_CAP);
            entity.experience += 15.0;
            allies.push(entity.id);
        }
        info!(allies = allies.len(), "alliance formed");
        self.world.record_event(
            EventKind::Cooperation,
            allies,
            "Entities have formed an alliance and shared resources!",
            EventImpact::new(60.0, 0.0),
        );
        report.events = report.events.saturating_add(1);
    }

    /// A disaster strikes a random subset of the population.
    ///
    /// Struck entities lose health down to a floor of 10 and food down to
    /// zero; a disaster on its own never kills.
    fn disaster_event(&mut self, report: &mut TickReport) {
        let mut afflicted = Vec::new();
        for entity in self.world.entities.values_mut() {
            if self.rng.random::<f64>() < DISASTER_CHANCE {
                entity.health = (entity.health - 30.0).max(10.0);
                entity.food = (entity.food - 20.0).max(0.0);
                afflicted.push(entity.id);
            }
        }
        info!(afflicted = afflicted.len(), "natural disaster");
        self.world.record_event(
            EventKind::Disaster,
            afflicted,
            "A natural disaster has struck the world!",
            EventImpact::new(0.0, 80.0),
        );
        report.events = report.events.saturating_add(1);
    }
}
