//! Decision contract types exchanged with decision providers.
//!
//! A provider receives an [`EntitySnapshot`] plus a [`WorldContext`] and
//! answers with a [`Decision`]. The snapshot is the **only** entity state a
//! provider sees; everything it needs to choose an action must be here.

use serde::{Deserialize, Serialize};

use crate::enums::{Season, TaskKind, TimeOfDay, Weather};
use crate::ids::EntityId;
use crate::structs::{Personality, Position};

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// A provider's answer: which action to take, why, and how sure it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// The chosen action.
    pub action: TaskKind,
    /// Free-text justification, for logs and events.
    pub reasoning: String,
    /// Certainty in `[0, 1]`. Low-confidence answers are not authoritative.
    pub confidence: f64,
}

impl Decision {
    /// Create a decision with confidence clamped to `[0, 1]`.
    #[must_use]
    pub fn new(action: TaskKind, reasoning: impl Into<String>, confidence: f64) -> Self {
        Self {
            action,
            reasoning: reasoning.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Whether this decision is confident enough to override a local one.
    #[must_use]
    pub const fn is_confident(&self, floor: f64) -> bool {
        self.confidence >= floor
    }
}

// ---------------------------------------------------------------------------
// EntitySnapshot
// ---------------------------------------------------------------------------

/// Immutable view of one entity's state, taken at decision time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// The entity this snapshot describes.
    pub id: EntityId,
    /// Position at snapshot time.
    pub position: Position,
    /// Health gauge.
    pub health: f64,
    /// Food gauge.
    pub food: f64,
    /// Banked wood.
    pub wood: f64,
    /// Banked stone.
    pub stone: f64,
    /// Experience level.
    pub level: u32,
    /// Age in world time units.
    pub age: f64,
    /// Behavioral traits.
    pub personality: Personality,
    /// Number of buildings the entity owns.
    pub building_count: usize,
    /// Number of sectors the entity has explored.
    pub explored_count: usize,
}

// ---------------------------------------------------------------------------
// WorldContext
// ---------------------------------------------------------------------------

/// World conditions visible to a decision provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldContext {
    /// Current weather.
    pub weather: Weather,
    /// Current season.
    pub season: Season,
    /// Phase of the day/night cycle.
    pub time_of_day: TimeOfDay,
    /// Entities within decision radius of the subject, excluding itself.
    pub nearby_entity_count: usize,
    /// One-line summary of harvestable resources (e.g. `"food: 3, wood: 2"`).
    pub available_resources: String,
    /// Current world generation.
    pub generation: u32,
    /// Total living entities.
    pub total_entities: usize,
}

// ---------------------------------------------------------------------------
// Request / Reply
// ---------------------------------------------------------------------------

/// A decision request submitted to a provider.
///
/// `serial` is the entity's decision stamp at submission time. Replies echo
/// it so the engine can discard answers that arrive after the entity's task
/// slot has already changed hands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// The entity asking for a decision.
    pub entity: EntityId,
    /// Decision stamp at submission time.
    pub serial: u64,
    /// The entity's state.
    pub snapshot: EntitySnapshot,
    /// The world's state.
    pub context: WorldContext,
}

/// A provider's reply to an earlier [`DecisionRequest`].
///
/// `decision` is `None` when the provider defers to the caller's fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionReply {
    /// The entity the reply is for.
    pub entity: EntityId,
    /// Decision stamp copied from the request.
    pub serial: u64,
    /// The chosen action, or `None` to defer.
    pub decision: Option<Decision>,
}
