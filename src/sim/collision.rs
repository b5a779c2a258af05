//! Collision detection and landing classification
//!
//! Evaluates a candidate ship state against the viewport bounds, the terrain
//! polyline and the landing pads. Segments are checked left to right and the
//! first one under the ship decides the outcome.

use glam::Vec2;

use super::state::Ship;
use super::terrain::{LandingPad, Terrain, TerrainPoint};
use crate::consts::*;
use crate::settings::Ruleset;

/// Touchdown speed limits (strict upper bounds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandingLimits {
    pub max_vertical: f32,
    pub max_horizontal: f32,
}

impl LandingLimits {
    pub fn for_ruleset(ruleset: Ruleset) -> Self {
        Self {
            max_vertical: ruleset.safe_vertical_speed(),
            max_horizontal: ruleset.safe_horizontal_speed(),
        }
    }

    /// Whether a touchdown at `vel` is gentle enough
    #[inline]
    pub fn allows(&self, vel: Vec2) -> bool {
        vel.y.abs() < self.max_vertical && vel.x.abs() < self.max_horizontal
    }
}

/// Why a round ended in a crash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashCause {
    /// Left the viewport
    OutOfBounds,
    /// Touched ground that is not a pad
    Terrain,
    /// Touched a pad too fast
    HardLanding,
}

/// Result of resolving one candidate state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// No contact, the candidate may be committed
    Clear,
    Crash(CrashCause),
    /// Safe touchdown on `terrain.pads[pad]`
    Landed { pad: usize, score: u64 },
}

/// Linear interpolation of the segment `a`-`b` at `x`
///
/// `x` may lie slightly outside the segment when the ship straddles a vertex;
/// the line is extended in that case.
#[inline]
pub fn height_on_segment(a: TerrainPoint, b: TerrainPoint, x: f32) -> f32 {
    a.y + (b.y - a.y) * (x - a.x) / (b.x - a.x)
}

/// Points for a safe landing
///
/// `floor(floor(500 - 50 * speed + fuel / 10) * bonus)`, never negative.
pub fn landing_score(speed: f32, fuel: f32, bonus: f32) -> u64 {
    let base = (LANDING_BASE_SCORE - LANDING_SPEED_PENALTY * speed + fuel / LANDING_FUEL_DIVISOR)
        .floor();
    (base * bonus).floor().max(0.0) as u64
}

/// Pad under `x` whose height matches the ground at that point
fn pad_at(pads: &[LandingPad], x: f32, ground_y: f32) -> Option<usize> {
    pads.iter()
        .position(|pad| pad.contains_x(x) && (ground_y - pad.y).abs() < PAD_HEIGHT_TOLERANCE)
}

/// Classify a candidate ship state
///
/// `viewport` is the playable area `(width, height)`; `fuel` is the tank
/// level used for the landing score.
pub fn resolve(
    ship: &Ship,
    terrain: &Terrain,
    viewport: Vec2,
    fuel: f32,
    limits: LandingLimits,
) -> Outcome {
    let Vec2 { x, y } = ship.pos;

    if x < 0.0 || x > viewport.x || y < 0.0 || y > viewport.y {
        return Outcome::Crash(CrashCause::OutOfBounds);
    }

    let left = ship.left();
    let right = ship.right();
    let bottom = ship.bottom();

    for seg in terrain.points.windows(2) {
        let (a, b) = (seg[0], seg[1]);
        if right < a.x || left > b.x {
            continue;
        }

        let ground_y = height_on_segment(a, b, x);
        if bottom < ground_y {
            continue;
        }

        return match pad_at(&terrain.pads, x, ground_y) {
            Some(pad) if limits.allows(ship.vel) => Outcome::Landed {
                pad,
                score: landing_score(ship.speed(), fuel, terrain.pads[pad].bonus),
            },
            Some(_) => Outcome::Crash(CrashCause::HardLanding),
            None => Outcome::Crash(CrashCause::Terrain),
        };
    }

    Outcome::Clear
}
