//! Environmental cycles: seasons, the day/night clock, and weather.
//!
//! The season rotates on a fixed [`SEASON_DURATION`] schedule derived
//! purely from the world clock, so it needs no stored state and survives
//! serialization for free. Weather changes are probabilistic; when a
//! change fires the new condition is drawn uniformly.

use rand::Rng;
use vivarium_types::{Season, TimeOfDay, Weather};

/// World time units each season lasts.
pub const SEASON_DURATION: f64 = 1000.0;

/// World time units in one full day/night cycle.
pub const DAY_LENGTH: f64 = 86_400.0;

/// Probability of a weather change per world time unit.
pub const WEATHER_CHANGE_CHANCE: f64 = 0.001;

/// The season in effect at a given world time.
#[must_use]
pub fn season_for(time: f64) -> Season {
    let progress = time.rem_euclid(SEASON_DURATION * 4.0) / SEASON_DURATION;
    if progress < 1.0 {
        Season::Spring
    } else if progress < 2.0 {
        Season::Summer
    } else if progress < 3.0 {
        Season::Autumn
    } else {
        Season::Winter
    }
}

/// The day/night phase at a given world time.
///
/// The cycle is split into four equal quarters starting in darkness, so a
/// fresh world opens at night and brightens into morning.
#[must_use]
pub fn time_of_day_for(time: f64) -> TimeOfDay {
    let fraction = time.rem_euclid(DAY_LENGTH) / DAY_LENGTH;
    if fraction < 0.25 {
        TimeOfDay::Night
    } else if fraction < 0.5 {
        TimeOfDay::Morning
    } else if fraction < 0.75 {
        TimeOfDay::Day
    } else {
        TimeOfDay::Evening
    }
}

/// Draw a uniformly random weather condition.
pub fn roll_weather(rng: &mut impl Rng) -> Weather {
    let idx = rng.random_range(0..Weather::ALL.len());
    Weather::ALL.get(idx).copied().unwrap_or(Weather::Sunny)
}
