//! Per-tick building behavior: production accumulation and weathering.
//!
//! Producing buildings (farms, workshops) accumulate output continuously
//! and release it in whole batches of [`PRODUCTION_BATCH`] units, credited
//! to the owner's matching gauge by the caller. All buildings weather away
//! slowly through a small per-tick decay chance.

use rand::Rng;
use vivarium_types::{Building, ResourceKind};

/// Units a building must accumulate before a batch transfers to its owner.
pub const PRODUCTION_BATCH: f64 = 10.0;

/// Probability of one point of structural decay per world time unit.
pub const DECAY_CHANCE: f64 = 0.0001;

/// Accumulate production for one slice of world time and withdraw every
/// completed batch.
///
/// Returns `Some((resource, units))` with `units` a whole multiple of
/// [`PRODUCTION_BATCH`]; the accumulator keeps any remainder. Returns
/// `None` for non-producing buildings and when no batch completed.
pub fn accumulate_production(
    building: &mut Building,
    delta_time: f64,
) -> Option<(ResourceKind, f64)> {
    let production = building.production.as_mut()?;
    production.amount += production.rate * delta_time;
    let mut transferred = 0.0;
    while production.amount >= PRODUCTION_BATCH {
        production.amount -= PRODUCTION_BATCH;
        transferred += PRODUCTION_BATCH;
    }
    if transferred > 0.0 {
        Some((production.resource, transferred))
    } else {
        None
    }
}

/// Roll the structural decay chance for one slice of world time.
///
/// `chance` is the per-time-unit probability, normally [`DECAY_CHANCE`].
/// On a hit the building loses one point of health, floored at zero.
/// Buildings are never repaired; a ruin simply stops mattering.
pub fn weather_decay(building: &mut Building, chance: f64, delta_time: f64, rng: &mut impl Rng) {
    if rng.random::<f64>() < chance * delta_time {
        building.health = (building.health - 1.0).max(0.0);
    }
}
