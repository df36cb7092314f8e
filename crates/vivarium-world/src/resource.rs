//! Respawn and harvesting logic for resource nodes.
//!
//! Each node regrows toward `max_amount` at `respawn_rate` units per world
//! time unit. Harvesting yields scale with the harvester's level and are
//! capped by what the node actually holds. Both operations clamp at the
//! mutation site, so `0 <= amount <= max_amount` always holds afterward.

use vivarium_types::ResourceNode;

/// Base units gathered per completed gather task, before the level bonus.
pub const BASE_HARVEST: f64 = 10.0;

/// Extra units gathered per harvester level.
pub const HARVEST_PER_LEVEL: f64 = 2.0;

/// Apply respawn growth for one slice of world time.
///
/// Returns the number of units actually regrown (zero when the node is
/// already full).
pub fn regenerate(node: &mut ResourceNode, delta_time: f64) -> f64 {
    if node.amount >= node.max_amount {
        return 0.0;
    }
    let before = node.amount;
    node.amount = (node.amount + node.respawn_rate * delta_time).min(node.max_amount);
    node.amount - before
}

/// Deduct up to `requested` units, returning the amount actually taken.
///
/// A node holding less than `requested` yields everything it has. Negative
/// requests take nothing.
pub fn harvest(node: &mut ResourceNode, requested: f64) -> f64 {
    let taken = requested.min(node.amount).max(0.0);
    node.amount -= taken;
    taken
}

/// Units a harvester of the given level requests per gather completion.
#[must_use]
pub fn harvest_yield(level: u32) -> f64 {
    BASE_HARVEST + f64::from(level) * HARVEST_PER_LEVEL
}
