//! Particle physics and the spawn recipes for each effect.
//!
//! Particles drift under their velocity, lose one unit of life per world
//! time unit, and are culled at zero. Sparks and smoke additionally fall
//! under gravity. Spawn helpers encode the fixed recipes used by the
//! engine: golden birth sparks, grey death smoke, and teal ambient motes.

use rand::Rng;
use vivarium_types::{Particle, ParticleKind, Position};

/// Downward acceleration applied to gravity-affected particles.
pub const GRAVITY: f64 = 0.1;

/// Half-extent of the square region ambient motes may appear in.
pub const AMBIENT_EXTENT: f64 = 400.0;

/// Advance one particle by one slice of world time.
pub fn step(particle: &mut Particle, delta_time: f64) {
    particle.position.x += particle.velocity_x * delta_time;
    particle.position.y += particle.velocity_y * delta_time;
    particle.life -= delta_time;
    if particle.kind.has_gravity() {
        particle.velocity_y += GRAVITY * delta_time;
    }
}

/// Advance every particle and drop the expired ones.
pub fn step_all(particles: &mut Vec<Particle>, delta_time: f64) {
    for particle in particles.iter_mut() {
        step(particle, delta_time);
    }
    particles.retain(|p| p.life > 0.0);
}

/// A golden spark celebrating a birth, scattering from the newborn.
pub fn birth_spark(position: Position, rng: &mut impl Rng) -> Particle {
    Particle {
        position,
        velocity_x: (rng.random::<f64>() - 0.5) * 2.0,
        velocity_y: (rng.random::<f64>() - 0.5) * 2.0,
        life: 60.0,
        max_life: 60.0,
        color: String::from("#FFD700"),
        size: 3.0,
        kind: ParticleKind::Spark,
    }
}

/// A grey plume rising from a death site.
#[must_use]
pub fn death_smoke(position: Position) -> Particle {
    Particle {
        position,
        velocity_x: 0.0,
        velocity_y: -1.0,
        life: 30.0,
        max_life: 30.0,
        color: String::from("#666666"),
        size: 2.0,
        kind: ParticleKind::Smoke,
    }
}

/// A slow teal mote drifting somewhere on the plane.
pub fn ambient_magic(rng: &mut impl Rng) -> Particle {
    let life = 120.0 + rng.random::<f64>() * 180.0;
    Particle {
        position: Position::new(
            (rng.random::<f64>() - 0.5) * AMBIENT_EXTENT * 2.0,
            (rng.random::<f64>() - 0.5) * AMBIENT_EXTENT * 2.0,
        ),
        velocity_x: (rng.random::<f64>() - 0.5) * 0.5,
        velocity_y: (rng.random::<f64>() - 0.5) * 0.5,
        life,
        max_life: life,
        color: String::from("#4ECDC4"),
        size: 1.0 + rng.random::<f64>() * 2.0,
        kind: ParticleKind::Magic,
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn step_applies_velocity_and_life() {
        let mut smoke = death_smoke(Position::new(10.0, 10.0));
        step(&mut smoke, 2.0);
        assert_eq!(smoke.position.x, 10.0);
        assert_eq!(smoke.position.y, 8.0);
        assert_eq!(smoke.life, 28.0);
    }

    #[test]
    fn gravity_pulls_smoke_but_not_magic() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut smoke = death_smoke(Position::ORIGIN);
        let mut magic = ambient_magic(&mut rng);
        let magic_vy = magic.velocity_y;
        step(&mut smoke, 1.0);
        step(&mut magic, 1.0);
        assert_eq!(smoke.velocity_y, -1.0 + GRAVITY);
        assert_eq!(magic.velocity_y, magic_vy);
    }

    #[test]
    fn expired_particles_are_culled() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut particles = vec![
            death_smoke(Position::ORIGIN),
            birth_spark(Position::ORIGIN, &mut rng),
        ];
        step_all(&mut particles, 31.0);
        // Smoke (life 30) dies; spark (life 60) survives.
        assert_eq!(particles.len(), 1);
        assert_eq!(
            particles.first().map(|p| p.kind),
            Some(ParticleKind::Spark)
        );
    }

    #[test]
    fn ambient_magic_spawns_within_extent() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..100 {
            let mote = ambient_magic(&mut rng);
            assert!(mote.position.x.abs() <= AMBIENT_EXTENT);
            assert!(mote.position.y.abs() <= AMBIENT_EXTENT);
            assert!(mote.life >= 120.0 && mote.life <= 300.0);
            assert_eq!(mote.life, mote.max_life);
        }
    }
}
