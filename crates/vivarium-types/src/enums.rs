//! Enumeration types for the Vivarium simulation.
//!
//! Covers task categories, building and resource kinds, particle effects,
//! world events, and the environmental cycle.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Task types
// ---------------------------------------------------------------------------

/// The category of work an entity can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Collect resources from a node and carry them in personal gauges.
    Gather,
    /// Construct a building at a chosen site, paying material costs.
    Build,
    /// Travel to an unvisited sector and mark it as explored.
    Explore,
    /// Strengthen a relationship with a nearby entity.
    Communicate,
    /// Patrol against hostile neighbors.
    Defend,
}

impl TaskKind {
    /// Stable lowercase name, matching the remote decision wire format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gather => "gather",
            Self::Build => "build",
            Self::Explore => "explore",
            Self::Communicate => "communicate",
            Self::Defend => "defend",
        }
    }

    /// Parse a lowercase task name. Returns `None` for unknown names.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "gather" => Some(Self::Gather),
            "build" => Some(Self::Build),
            "explore" => Some(Self::Explore),
            "communicate" => Some(Self::Communicate),
            "defend" => Some(Self::Defend),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Building types
// ---------------------------------------------------------------------------

/// A type of building an entity can construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildingKind {
    /// Basic dwelling. Cheap, no production.
    House,
    /// Produces food over time for its owner.
    Farm,
    /// Produces wood over time for its owner.
    Workshop,
    /// Defensive barrier. No production.
    Wall,
    /// Watchtower. Expensive, no production.
    Tower,
}

impl BuildingKind {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::House => "house",
            Self::Farm => "farm",
            Self::Workshop => "workshop",
            Self::Wall => "wall",
            Self::Tower => "tower",
        }
    }

    /// Material cost as `(wood, stone)`.
    #[must_use]
    pub const fn cost(self) -> (f64, f64) {
        match self {
            Self::House => (50.0, 30.0),
            Self::Farm => (30.0, 20.0),
            Self::Workshop => (70.0, 50.0),
            Self::Wall => (20.0, 40.0),
            Self::Tower => (80.0, 100.0),
        }
    }

    /// Resource produced over time, if any, as `(kind, rate)`.
    #[must_use]
    pub const fn production(self) -> Option<(ResourceKind, f64)> {
        match self {
            Self::Farm => Some((ResourceKind::Food, 0.5)),
            Self::Workshop => Some((ResourceKind::Wood, 0.3)),
            Self::House | Self::Wall | Self::Tower => None,
        }
    }
}

impl std::fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Resource types
// ---------------------------------------------------------------------------

/// A kind of harvestable world resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Edible supplies. Restores the food gauge.
    Food,
    /// Timber for construction.
    Wood,
    /// Quarried rock for construction.
    Stone,
    /// Fresh water. Treated as food when consumed.
    Water,
    /// Rare metal. Treated as stone when banked.
    Gold,
}

impl ResourceKind {
    /// All resource kinds in declaration order.
    pub const ALL: [Self; 5] = [Self::Food, Self::Wood, Self::Stone, Self::Water, Self::Gold];

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Wood => "wood",
            Self::Stone => "stone",
            Self::Water => "water",
            Self::Gold => "gold",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Particle types
// ---------------------------------------------------------------------------

/// Visual effect particle category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleKind {
    /// Bright burst, subject to gravity.
    Spark,
    /// Drifting plume, subject to gravity.
    Smoke,
    /// Ambient glow, unaffected by gravity.
    Magic,
    /// Floating text marker, unaffected by gravity.
    Text,
}

impl ParticleKind {
    /// Whether gravity pulls this particle downward each step.
    #[must_use]
    pub const fn has_gravity(self) -> bool {
        matches!(self, Self::Spark | Self::Smoke)
    }
}

// ---------------------------------------------------------------------------
// World events
// ---------------------------------------------------------------------------

/// Category of a logged world event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Something new found: a gold deposit, an explored sector.
    Discovery,
    /// Entities came to blows.
    Conflict,
    /// Entities shared resources or formed bonds.
    Cooperation,
    /// Population milestones: births, generations, level-ups.
    Evolution,
    /// Large-scale harm to the population.
    Disaster,
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// The season of the world clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    /// First quarter of the yearly cycle.
    Spring,
    /// Second quarter.
    Summer,
    /// Third quarter.
    Autumn,
    /// Final quarter.
    Winter,
}

impl Season {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase of the day/night cycle, derived from the world clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// First lit quarter of the cycle.
    Morning,
    /// Midday quarter.
    Day,
    /// Fading quarter.
    Evening,
    /// Dark quarter.
    Night,
}

impl TimeOfDay {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Day => "day",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    /// Clear skies.
    Sunny,
    /// Light rain.
    Rainy,
    /// Heavy storm.
    Storm,
    /// Snowfall.
    Snow,
}

impl Weather {
    /// All weather conditions in declaration order.
    pub const ALL: [Self; 4] = [Self::Sunny, Self::Rainy, Self::Storm, Self::Snow];

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Rainy => "rainy",
            Self::Storm => "storm",
            Self::Snow => "snow",
        }
    }
}

impl std::fmt::Display for Weather {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_kind_parse_roundtrip() {
        for kind in [
            TaskKind::Gather,
            TaskKind::Build,
            TaskKind::Explore,
            TaskKind::Communicate,
            TaskKind::Defend,
        ] {
            assert_eq!(TaskKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn task_kind_parse_trims_and_lowercases() {
        assert_eq!(TaskKind::parse("  Gather \n"), Some(TaskKind::Gather));
        assert_eq!(TaskKind::parse("BUILD"), Some(TaskKind::Build));
        assert_eq!(TaskKind::parse("wander"), None);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&TaskKind::Communicate).unwrap_or_default();
        assert_eq!(json, "\"communicate\"");
        let json = serde_json::to_string(&Weather::Snow).unwrap_or_default();
        assert_eq!(json, "\"snow\"");
    }

    #[test]
    fn building_costs_match_catalog() {
        assert_eq!(BuildingKind::House.cost(), (50.0, 30.0));
        assert_eq!(BuildingKind::Tower.cost(), (80.0, 100.0));
    }

    #[test]
    fn only_farm_and_workshop_produce() {
        assert!(BuildingKind::Farm.production().is_some());
        assert!(BuildingKind::Workshop.production().is_some());
        assert!(BuildingKind::House.production().is_none());
        assert!(BuildingKind::Wall.production().is_none());
        assert!(BuildingKind::Tower.production().is_none());
    }

    #[test]
    fn gravity_applies_to_spark_and_smoke_only() {
        assert!(ParticleKind::Spark.has_gravity());
        assert!(ParticleKind::Smoke.has_gravity());
        assert!(!ParticleKind::Magic.has_gravity());
        assert!(!ParticleKind::Text.has_gravity());
    }
}
