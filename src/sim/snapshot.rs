//! Read-only view of a frame for external painters
//!
//! The host serializes a `Snapshot` to JSON once per frame and hands it to
//! the page. Nothing in here mutates the game.

use glam::Vec2;
use serde::Serialize;

use super::particles::Particle;
use super::state::{GamePhase, GameState, Ship};
use super::terrain::{LandingPad, PadDifficulty, TerrainPoint};
use super::tick::TickInput;
use crate::consts::INITIAL_FUEL;

/// Fuel fraction at or below which the HUD warns
pub const LOW_FUEL_FRACTION: f32 = 0.3;

/// Figures shown in the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hud {
    pub speed: f32,
    pub horizontal_speed: f32,
    pub vertical_speed: f32,
    /// 0-100
    pub fuel_percent: f32,
    pub low_fuel: bool,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        let fraction = (state.fuel / INITIAL_FUEL).clamp(0.0, 1.0);
        Self {
            speed: state.ship.speed(),
            horizontal_speed: state.ship.vel.x.abs(),
            vertical_speed: state.ship.vel.y.abs(),
            fuel_percent: fraction * 100.0,
            low_fuel: fraction <= LOW_FUEL_FRACTION,
        }
    }
}

/// Pad as painted, with its difficulty label resolved
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PadView {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub bonus: f32,
    pub difficulty: PadDifficulty,
}

impl From<&LandingPad> for PadView {
    fn from(pad: &LandingPad) -> Self {
        Self {
            x: pad.x,
            y: pad.y,
            width: pad.width,
            bonus: pad.bonus,
            difficulty: pad.difficulty(),
        }
    }
}

/// Particle as painted: position, color and fade
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub color: u32,
    /// Opacity, 0-1
    pub alpha: f32,
}

impl From<&Particle> for ParticleView {
    fn from(p: &Particle) -> Self {
        Self {
            pos: p.pos,
            color: p.color,
            alpha: p.alpha(),
        }
    }
}

/// Everything a painter needs for one frame
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub level: u32,
    pub score: u64,
    pub high_score: u64,
    pub fuel: f32,
    pub viewport: Vec2,
    pub ship: Ship,
    pub thrusters: TickInput,
    pub terrain: &'a [TerrainPoint],
    pub pads: Vec<PadView>,
    pub particles: Vec<ParticleView>,
    pub hud: Hud,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            level: self.level,
            score: self.score,
            high_score: self.high_score(),
            fuel: self.fuel,
            viewport: self.viewport,
            ship: self.ship,
            thrusters: self.thrusters,
            terrain: &self.terrain.points,
            pads: self.terrain.pads.iter().map(PadView::from).collect(),
            particles: self.particles.as_slice().iter().map(ParticleView::from).collect(),
            hud: Hud::from_state(self),
        }
    }
}
