//! The world event log.
//!
//! Events are append-only narrative entries. The log retains only the most
//! recent [`EventLog::DEFAULT_CAPACITY`] entries; the oldest is evicted
//! first when the cap is exceeded.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::enums::EventKind;
use crate::ids::{EntityId, EventId};

// ---------------------------------------------------------------------------
// EventImpact
// ---------------------------------------------------------------------------

/// Rough magnitude of an event's effect on the world, for display and
/// scoring. Both components are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventImpact {
    /// Beneficial magnitude.
    pub positive: f64,
    /// Harmful magnitude.
    pub negative: f64,
}

impl EventImpact {
    /// An impact with the given magnitudes.
    #[must_use]
    pub const fn new(positive: f64, negative: f64) -> Self {
        Self { positive, negative }
    }
}

// ---------------------------------------------------------------------------
// WorldEvent
// ---------------------------------------------------------------------------

/// One entry in the world event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldEvent {
    /// Unique identifier.
    pub id: EventId,
    /// Event category.
    pub kind: EventKind,
    /// World time at which the event occurred.
    pub timestamp: f64,
    /// Entities involved, possibly empty.
    pub entities: Vec<EntityId>,
    /// Human-readable description.
    pub message: String,
    /// Effect magnitude pair.
    pub impact: EventImpact,
}

impl WorldEvent {
    /// Create a new event with a fresh id.
    #[must_use]
    pub fn new(
        kind: EventKind,
        timestamp: f64,
        entities: Vec<EntityId>,
        message: impl Into<String>,
        impact: EventImpact,
    ) -> Self {
        Self {
            id: EventId::new(),
            kind,
            timestamp,
            entities,
            message: message.into(),
            impact,
        }
    }
}

// ---------------------------------------------------------------------------
// EventLog
// ---------------------------------------------------------------------------

/// Bounded FIFO log of [`WorldEvent`] entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    entries: VecDeque<WorldEvent>,
    capacity: usize,
}

impl EventLog {
    /// Number of events retained before the oldest is evicted.
    pub const DEFAULT_CAPACITY: usize = 50;

    /// Create an empty log with the default retention cap.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create an empty log with a custom retention cap.
    ///
    /// A capacity of zero keeps the log permanently empty.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an event, evicting the oldest entries beyond the cap.
    pub fn push(&mut self, event: WorldEvent) {
        self.entries.push_back(event);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Number of retained events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recently appended event, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&WorldEvent> {
        self.entries.back()
    }

    /// Iterate events from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &WorldEvent> {
        self.entries.iter()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a WorldEvent;
    type IntoIter = std::collections::vec_deque::Iter<'a, WorldEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
