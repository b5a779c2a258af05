//! Per-frame simulation tick
//!
//! Core game loop step: flight, fuel, particles, then collision resolution.
//! The candidate ship state is only committed when nothing was hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{self, LandingLimits, Outcome};
use super::flight;
use super::state::{GameEvent, GamePhase, GameState, ShipUpdate};
use crate::consts::*;

/// Thrusters held for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Main engine (pushes up)
    pub down: bool,
    /// Pushes left
    pub left: bool,
    /// Pushes right
    pub right: bool,
}

impl TickInput {
    pub fn any(&self) -> bool {
        self.down || self.left || self.right
    }
}

/// Advance the game by one rendered frame of `elapsed_ms` milliseconds
///
/// Returns the collision outcome while playing, `None` in any other phase.
/// Outside of play only the particles keep animating.
pub fn tick(state: &mut GameState, input: &TickInput, elapsed_ms: f32) -> Option<Outcome> {
    let dt = flight::frame_scale(elapsed_ms);

    if state.phase != GamePhase::Playing {
        state.particles.update(dt);
        return None;
    }

    let step = flight::step(&state.ship, input, state.fuel, dt);

    // Thruster on/off transitions for sound hooks
    match (state.thrusters.any(), step.fired.any()) {
        (false, true) => state.push_event(GameEvent::ThrusterStarted),
        (true, false) => state.push_event(GameEvent::ThrusterStopped),
        _ => {}
    }
    state.thrusters = step.fired;

    // Landing score counts the tank as it was when the frame began
    let fuel_at_start = state.fuel;
    if step.fuel_used > 0.0 {
        state.use_fuel(step.fuel_used);
    }

    if state.settings.particles_enabled() {
        emit_exhaust(state, step.fired);
    }
    state.particles.update(dt);

    let limits = LandingLimits::for_ruleset(state.settings.ruleset);
    let outcome = collision::resolve(&step.ship, &state.terrain, state.viewport, fuel_at_start, limits);

    match outcome {
        Outcome::Clear => {
            state.update_ship(ShipUpdate::from(step.ship));
        }
        Outcome::Crash(cause) => {
            let pos = step.ship.pos;
            if state.settings.particles_enabled() {
                state.particles.spawn_explosion(pos, &mut state.rng);
            }
            log::info!("Crashed ({:?}) at ({:.1}, {:.1})", cause, pos.x, pos.y);
            state.push_event(GameEvent::Crashed { pos, cause });
            state.game_over();
        }
        Outcome::Landed { pad, score } => {
            let bonus = state.terrain.pads[pad].bonus;
            log::info!(
                "Landed on pad {} (x{:.1}) at speed {:.2}: +{}",
                pad,
                bonus,
                step.ship.speed(),
                score
            );
            state.add_score(score);
            state.push_event(GameEvent::Landed { score, bonus });
            state.level_complete();
        }
    }

    Some(outcome)
}

/// Exhaust puffs for every firing thruster, emitted from the current
/// (pre-move) ship position
fn emit_exhaust(state: &mut GameState, fired: TickInput) {
    let ship = state.ship;
    let nozzle = Vec2::new(ship.rotation.cos(), ship.rotation.sin()) * SHIP_HALF_WIDTH;

    if fired.down {
        let origin = Vec2::new(ship.pos.x, ship.bottom());
        state.particles.spawn_exhaust(origin, Vec2::new(0.0, 3.0), &mut state.rng);
    }
    if fired.left {
        state.particles.spawn_exhaust(ship.pos + nozzle, Vec2::new(2.0, 0.0), &mut state.rng);
    }
    if fired.right {
        state.particles.spawn_exhaust(ship.pos - nozzle, Vec2::new(-2.0, 0.0), &mut state.rng);
    }
}
