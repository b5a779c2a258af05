//! Cosmetic particles (exhaust plumes, crash explosions)
//!
//! Nothing here affects gameplay. The buffer is bounded: once full, the
//! oldest particles are dropped to make room.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{GRAVITY, MAX_PARTICLES};

/// Exhaust colors (RGB)
pub const EXHAUST_ORANGE: u32 = 0xff6600;
pub const EXHAUST_AMBER: u32 = 0xffaa00;
/// Explosion colors (RGB)
pub const EXPLOSION_RED: u32 = 0xff0000;
pub const EXPLOSION_AMBER: u32 = 0xffaa00;

/// Particles per thruster per tick
const EXHAUST_COUNT: usize = 2;
/// Random velocity jitter range for exhaust
const EXHAUST_SPREAD: f32 = 0.5;
/// Particles in a crash explosion
const EXPLOSION_COUNT: usize = 50;
/// Life lost per frame
const FADE_RATE: f32 = 0.05;

/// A single particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life, fades from `max_life` to 0
    pub life: f32,
    pub max_life: f32,
    /// RGB color
    pub color: u32,
}

impl Particle {
    /// Opacity for painting, 0-1
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Bounded particle buffer, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Particles {
    items: Vec<Particle>,
}

impl Particles {
    pub fn new() -> Self {
        Self {
            items: Vec::with_capacity(MAX_PARTICLES),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Add a particle, evicting the oldest when at capacity
    pub fn push(&mut self, particle: Particle) {
        if self.items.len() >= MAX_PARTICLES {
            let excess = self.items.len() + 1 - MAX_PARTICLES;
            self.items.drain(..excess);
        }
        self.items.push(particle);
    }

    /// Exhaust puff at `origin` drifting with `vel`
    pub fn spawn_exhaust<R: Rng>(&mut self, origin: Vec2, vel: Vec2, rng: &mut R) {
        for _ in 0..EXHAUST_COUNT {
            let jitter = Vec2::new(
                (rng.random::<f32>() - 0.5) * EXHAUST_SPREAD,
                (rng.random::<f32>() - 0.5) * EXHAUST_SPREAD,
            );
            let color = if rng.random_bool(0.5) {
                EXHAUST_ORANGE
            } else {
                EXHAUST_AMBER
            };
            self.push(Particle {
                pos: origin,
                vel: vel + jitter,
                life: 1.0,
                max_life: 1.0,
                color,
            });
        }
    }

    /// Ring of fast particles bursting out of `origin`
    pub fn spawn_explosion<R: Rng>(&mut self, origin: Vec2, rng: &mut R) {
        for i in 0..EXPLOSION_COUNT {
            let angle = std::f32::consts::TAU * i as f32 / EXPLOSION_COUNT as f32;
            let speed: f32 = rng.random_range(2.0..6.0);
            let color = if rng.random_bool(0.5) {
                EXPLOSION_RED
            } else {
                EXPLOSION_AMBER
            };
            self.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: 1.0,
                max_life: 1.0,
                color,
            });
        }
    }

    /// Move, fade and drop dead particles. Particles fall at half gravity.
    pub fn update(&mut self, dt: f32) {
        for p in self.items.iter_mut() {
            p.life -= dt * FADE_RATE;
            p.pos += p.vel * dt;
            p.vel.y += GRAVITY * 0.5 * dt;
        }
        self.items.retain(|p| p.life > 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn dot(life: f32) -> Particle {
        Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            life,
            max_life: 1.0,
            color: EXHAUST_ORANGE,
        }
    }

    #[test]
    fn test_cap_evicts_oldest_first() {
        let mut particles = Particles::new();
        for i in 0..MAX_PARTICLES + 10 {
            let mut p = dot(1.0);
            p.pos.x = i as f32;
            particles.push(p);
        }
        assert_eq!(particles.len(), MAX_PARTICLES);
        assert_eq!(particles.as_slice()[0].pos.x, 10.0);
        assert_eq!(
            particles.as_slice()[MAX_PARTICLES - 1].pos.x,
            (MAX_PARTICLES + 9) as f32
        );
    }

    #[test]
    fn test_explosion_respects_cap() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut particles = Particles::new();
        for _ in 0..10 {
            particles.spawn_explosion(Vec2::new(100.0, 100.0), &mut rng);
        }
        assert_eq!(particles.len(), MAX_PARTICLES);
        for p in particles.as_slice() {
            let speed = p.vel.length();
            assert!((1.999..=6.001).contains(&speed));
        }
    }

    #[test]
    fn test_update_fades_and_removes() {
        let mut particles = Particles::new();
        particles.push(dot(0.04));
        particles.push(dot(1.0));

        particles.update(1.0);
        assert_eq!(particles.len(), 1);
        assert!((particles.as_slice()[0].life - 0.95).abs() < 1e-6);
        assert!((particles.as_slice()[0].vel.y - GRAVITY * 0.5).abs() < 1e-6);
        assert!((particles.as_slice()[0].alpha() - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_exhaust_spawns_two_jittered() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut particles = Particles::new();
        particles.spawn_exhaust(Vec2::new(5.0, 20.0), Vec2::new(0.0, 3.0), &mut rng);
        assert_eq!(particles.len(), 2);
        for p in particles.as_slice() {
            assert!((p.vel.x).abs() <= 0.25);
            assert!((p.vel.y - 3.0).abs() <= 0.25);
            assert!(p.color == EXHAUST_ORANGE || p.color == EXHAUST_AMBER);
        }
    }
}
