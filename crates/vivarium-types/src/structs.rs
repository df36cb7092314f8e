//! Core world structs for the Vivarium simulation.
//!
//! Covers [`Position`], [`Personality`], [`Task`], [`Entity`], [`Building`],
//! [`ResourceNode`], and [`Particle`]. These are plain data carriers; tick
//! behavior lives in the world and engine crates.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::enums::{BuildingKind, ParticleKind, ResourceKind, TaskKind};
use crate::ids::{BuildingId, EntityId, ResourceId};

/// Upper bound for entity and building health.
pub const MAX_HEALTH: f64 = 100.0;

/// Upper bound for a relationship score between two entities.
pub const MAX_RELATIONSHIP: f64 = 100.0;

/// Side length of one exploration sector in world units.
pub const SECTOR_SIZE: f64 = 50.0;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A point in the 2D world plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// The world origin.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a position from coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Key of the exploration sector containing this position.
    ///
    /// Sectors are a fixed grid of [`SECTOR_SIZE`]-unit squares; the key is
    /// the `"col,row"` pair of floored sector indices.
    #[must_use]
    pub fn sector_key(self) -> String {
        let col = (self.x / SECTOR_SIZE).floor();
        let row = (self.y / SECTOR_SIZE).floor();
        format!("{col},{row}")
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Personality
// ---------------------------------------------------------------------------

/// Behavioral trait vector assigned at entity creation.
///
/// Each trait is an `f64` in the range 0.0 to 1.0. Traits bias decision
/// scoring but are never modified after birth; offspring receive a mutated
/// copy of a parent's vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    /// Tendency toward conflict. Above 0.7 the entity reads as hostile.
    pub aggression: f64,
    /// Preference for social contact and shared work.
    pub cooperation: f64,
    /// Drive to visit unexplored sectors.
    pub exploration: f64,
    /// Work-rate multiplier applied to task progress.
    pub efficiency: f64,
}

impl Personality {
    /// Return a copy with every trait clamped to the 0.0--1.0 range.
    #[must_use]
    pub const fn clamped(self) -> Self {
        Self {
            aggression: self.aggression.clamp(0.0, 1.0),
            cooperation: self.cooperation.clamp(0.0, 1.0),
            exploration: self.exploration.clamp(0.0, 1.0),
            efficiency: self.efficiency.clamp(0.0, 1.0),
        }
    }

    /// Whether this personality reads as hostile to neighbors.
    #[must_use]
    pub const fn is_hostile(self) -> bool {
        self.aggression > 0.7
    }
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            aggression: 0.5,
            cooperation: 0.5,
            exploration: 0.5,
            efficiency: 0.5,
        }
    }
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// Transient work intent owned by exactly one entity.
///
/// `progress` accumulates from 0.0 toward 1.0; the owning engine applies the
/// completion effect and clears the task exactly when progress reaches 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// The category of work.
    pub kind: TaskKind,
    /// Resource kind targeted by a gather task.
    pub resource: Option<ResourceKind>,
    /// Building kind targeted by a build task.
    pub structure: Option<BuildingKind>,
    /// Point the entity walks toward while working.
    pub target: Option<Position>,
    /// Completion fraction in `[0, 1]`.
    pub progress: f64,
    /// Ticks-equivalent denominator for the progress rate.
    pub duration: f64,
}

impl Task {
    /// A gather task aimed at a resource node.
    #[must_use]
    pub const fn gather(resource: ResourceKind, target: Position, duration: f64) -> Self {
        Self {
            kind: TaskKind::Gather,
            resource: Some(resource),
            structure: None,
            target: Some(target),
            progress: 0.0,
            duration,
        }
    }

    /// A build task aimed at a construction site.
    #[must_use]
    pub const fn build(structure: BuildingKind, target: Position, duration: f64) -> Self {
        Self {
            kind: TaskKind::Build,
            resource: None,
            structure: Some(structure),
            target: Some(target),
            progress: 0.0,
            duration,
        }
    }

    /// An explore task aimed at an unvisited sector.
    #[must_use]
    pub const fn explore(target: Position, duration: f64) -> Self {
        Self {
            kind: TaskKind::Explore,
            resource: None,
            structure: None,
            target: Some(target),
            progress: 0.0,
            duration,
        }
    }

    /// A communicate task aimed at a meeting point near another entity.
    #[must_use]
    pub const fn communicate(target: Position, duration: f64) -> Self {
        Self {
            kind: TaskKind::Communicate,
            resource: None,
            structure: None,
            target: Some(target),
            progress: 0.0,
            duration,
        }
    }

    /// A defend task aimed at a hostile neighbor's position.
    #[must_use]
    pub const fn defend(target: Position, duration: f64) -> Self {
        Self {
            kind: TaskKind::Defend,
            resource: None,
            structure: None,
            target: Some(target),
            progress: 0.0,
            duration,
        }
    }

    /// Whether progress has reached the completion threshold.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A simulated creature living on the world plane.
///
/// Gauges (`health`, `food`, `wood`, `stone`) are clamped at every mutation
/// site; `health` never exceeds [`MAX_HEALTH`] and no gauge goes negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Current position on the plane.
    pub position: Position,
    /// Point the entity is walking toward.
    pub target: Position,
    /// Health gauge, 0 to [`MAX_HEALTH`]. Death at 0.
    pub health: f64,
    /// Food gauge. Decays over time; starvation drains health.
    pub food: f64,
    /// Banked wood, spent on construction.
    pub wood: f64,
    /// Banked stone, spent on construction.
    pub stone: f64,
    /// Experience level, starting at 1.
    pub level: u32,
    /// Experience toward the next level.
    pub experience: f64,
    /// Age in world time units. Death past the age cap.
    pub age: f64,
    /// Display color as a hex string.
    pub color: String,
    /// Render size in world units.
    pub size: f64,
    /// Movement speed in units per time unit.
    pub speed: f64,
    /// Whether the entity is currently walking toward `target`.
    pub is_moving: bool,
    /// The task being worked on, if any.
    pub current_task: Option<Task>,
    /// Buildings owned by this entity, by id. The world map is authoritative.
    pub buildings: Vec<BuildingId>,
    /// Relationship scores with other entities, 0 to [`MAX_RELATIONSHIP`].
    pub relationships: BTreeMap<EntityId, f64>,
    /// Sector keys this entity has explored.
    pub explored_areas: BTreeSet<String>,
    /// Immutable behavioral traits.
    pub personality: Personality,
    /// Ticks remaining before the next decision is allowed.
    pub decision_cooldown: u32,
    /// Monotonic stamp bumped whenever the task slot changes hands.
    ///
    /// Remote decision replies carry the stamp they were issued under; a
    /// reply whose stamp no longer matches is stale and must be dropped.
    pub decision_serial: u64,
}

impl Entity {
    /// Whether a task is currently occupying the task slot.
    #[must_use]
    pub const fn has_task(&self) -> bool {
        self.current_task.is_some()
    }

    /// Add harvested or produced resources to the matching gauge.
    ///
    /// Water counts toward the food gauge and gold toward the stone gauge;
    /// entities have no separate storage for either.
    pub const fn bank_resource(&mut self, kind: ResourceKind, amount: f64) {
        match kind {
            ResourceKind::Food | ResourceKind::Water => self.food += amount,
            ResourceKind::Wood => self.wood += amount,
            ResourceKind::Stone | ResourceKind::Gold => self.stone += amount,
        }
    }

    /// Reduce health, flooring at zero.
    pub const fn damage(&mut self, amount: f64) {
        self.health = (self.health - amount).max(0.0);
    }

    /// Restore health, capping at [`MAX_HEALTH`].
    pub const fn heal(&mut self, amount: f64) {
        self.health = (self.health + amount).min(MAX_HEALTH);
    }

    /// Grant experience and handle the level-up threshold.
    ///
    /// Leveling up increments `level` and resets `experience` to zero. The
    /// threshold is `level * 100`. Returns `true` if a level was gained.
    pub fn grant_experience(&mut self, amount: f64) -> bool {
        self.experience += amount;
        let threshold = f64::from(self.level) * 100.0;
        if self.experience >= threshold {
            self.level = self.level.saturating_add(1);
            self.experience = 0.0;
            true
        } else {
            false
        }
    }

    /// Symmetrically raise the bond with another entity, capped at
    /// [`MAX_RELATIONSHIP`]. Only this entity's side is written; call on
    /// both parties for a mutual change.
    pub fn strengthen_bond(&mut self, other: EntityId, increment: f64) {
        let score = self.relationships.entry(other).or_insert(0.0);
        *score = (*score + increment).min(MAX_RELATIONSHIP);
    }
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Resource production state attached to farms and workshops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildingProduction {
    /// The resource being produced.
    pub resource: ResourceKind,
    /// Units produced per world time unit.
    pub rate: f64,
    /// Units accumulated and not yet transferred to the owner.
    pub amount: f64,
}

/// A constructed structure on the world map.
///
/// The world's building map is authoritative; the owning entity holds only
/// the building's id in its cross-reference list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Unique identifier.
    pub id: BuildingId,
    /// The structure type.
    pub kind: BuildingKind,
    /// Location on the plane.
    pub position: Position,
    /// Structural health, 0 to [`MAX_HEALTH`]. Never repaired or resurrected.
    pub health: f64,
    /// Upgrade level, starting at 1.
    pub level: u32,
    /// The entity that built and owns this structure.
    pub owner: EntityId,
    /// Production state for producing building kinds.
    pub production: Option<BuildingProduction>,
}

impl Building {
    /// Create a newly-built structure at full health, wiring up production
    /// for the kinds that have it.
    #[must_use]
    pub fn new(kind: BuildingKind, position: Position, owner: EntityId) -> Self {
        let production = kind
            .production()
            .map(|(resource, rate)| BuildingProduction {
                resource,
                rate,
                amount: 0.0,
            });
        Self {
            id: BuildingId::new(),
            kind,
            position,
            health: MAX_HEALTH,
            level: 1,
            owner,
            production,
        }
    }
}

// ---------------------------------------------------------------------------
// ResourceNode
// ---------------------------------------------------------------------------

/// A harvestable resource deposit on the world map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    /// Unique identifier.
    pub id: ResourceId,
    /// The resource kind this node yields.
    pub kind: ResourceKind,
    /// Location on the plane.
    pub position: Position,
    /// Units currently available, `0 <= amount <= max_amount`.
    pub amount: f64,
    /// Capacity ceiling the node regrows toward.
    pub max_amount: f64,
    /// Regrowth in units per world time unit.
    pub respawn_rate: f64,
}

// ---------------------------------------------------------------------------
// Particle
// ---------------------------------------------------------------------------

/// An ephemeral visual effect. Nothing references a particle; it lives out
/// its lifetime and is culled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Current position.
    pub position: Position,
    /// Horizontal velocity in units per time unit.
    pub velocity_x: f64,
    /// Vertical velocity in units per time unit.
    pub velocity_y: f64,
    /// Remaining lifetime. Culled at or below zero.
    pub life: f64,
    /// Lifetime at spawn, kept for fade-out rendering.
    pub max_life: f64,
    /// Display color as a hex string.
    pub color: String,
    /// Render size in world units.
    pub size: f64,
    /// Effect category.
    pub kind: ParticleKind,
}
