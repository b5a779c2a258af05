//! Ship kinematics
//!
//! One Euler step per rendered frame. Constants are tuned per nominal frame;
//! the elapsed wall time is turned into a frame scale and capped so a resumed
//! tab cannot teleport the ship.

use glam::Vec2;

use super::state::Ship;
use super::tick::TickInput;
use crate::consts::*;

/// Frame scale for an elapsed interval in milliseconds, in `[0, MAX_FRAME_SCALE]`
#[inline]
pub fn frame_scale(elapsed_ms: f32) -> f32 {
    if !elapsed_ms.is_finite() {
        return MAX_FRAME_SCALE;
    }
    (elapsed_ms / NOMINAL_FRAME_MS).clamp(0.0, MAX_FRAME_SCALE)
}

/// Candidate result of one flight step, not yet committed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightStep {
    pub ship: Ship,
    /// Fuel burned this step (before clamping against the tank)
    pub fuel_used: f32,
    /// Thrusters that actually fired (held and fuelled)
    pub fired: TickInput,
}

/// Lean angle the ship eases toward for a given velocity
#[inline]
pub fn target_rotation(vel: Vec2) -> f32 {
    vel.x.atan2(-vel.y) * ROTATION_LEAN
}

/// Advance `ship` by `dt` frames with the held thrusters
///
/// Thrust only fires when the tank held fuel at the start of the step. Each
/// firing thruster burns its own share, so holding two keys costs twice as
/// much. Gravity always applies.
pub fn step(ship: &Ship, input: &TickInput, fuel: f32, dt: f32) -> FlightStep {
    let mut vel = ship.vel;
    let mut fuel_used = 0.0;
    let fired = if fuel > 0.0 {
        *input
    } else {
        TickInput::default()
    };

    if fired.down {
        vel.y -= VERTICAL_THRUST_POWER * dt;
        fuel_used += FUEL_CONSUMPTION * dt;
    }
    if fired.left {
        vel.x -= HORIZONTAL_THRUST_POWER * dt;
        fuel_used += FUEL_CONSUMPTION * dt;
    }
    if fired.right {
        vel.x += HORIZONTAL_THRUST_POWER * dt;
        fuel_used += FUEL_CONSUMPTION * dt;
    }

    vel.y += GRAVITY * dt;

    let rotation = ship.rotation + (target_rotation(vel) - ship.rotation) * ROTATION_EASING;
    let pos = ship.pos + vel * dt;

    FlightStep {
        ship: Ship { pos, vel, rotation },
        fuel_used,
        fired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hovering() -> Ship {
        Ship {
            pos: Vec2::new(400.0, 200.0),
            vel: Vec2::ZERO,
            rotation: 0.0,
        }
    }

    #[test]
    fn test_frame_scale_is_capped() {
        assert!((frame_scale(NOMINAL_FRAME_MS) - 1.0).abs() < 1e-6);
        assert_eq!(frame_scale(1000.0), MAX_FRAME_SCALE);
        assert_eq!(frame_scale(-5.0), 0.0);
        assert_eq!(frame_scale(f32::INFINITY), MAX_FRAME_SCALE);
    }

    #[test]
    fn test_gravity_without_input() {
        let s = step(&hovering(), &TickInput::default(), 1000.0, 1.0);
        assert_eq!(s.fuel_used, 0.0);
        assert!((s.ship.vel.y - GRAVITY).abs() < 1e-6);
        assert!((s.ship.pos.y - (200.0 + GRAVITY)).abs() < 1e-4);
        assert_eq!(s.ship.pos.x, 400.0);
    }

    #[test]
    fn test_each_thruster_burns_its_own_fuel() {
        let all = TickInput {
            down: true,
            left: true,
            right: true,
        };
        let s = step(&hovering(), &all, 1000.0, 2.0);
        assert!((s.fuel_used - 3.0 * FUEL_CONSUMPTION * 2.0).abs() < 1e-6);
        // Left and right cancel
        assert!(s.ship.vel.x.abs() < 1e-6);
        let expected_vy = (GRAVITY - VERTICAL_THRUST_POWER) * 2.0;
        assert!((s.ship.vel.y - expected_vy).abs() < 1e-6);
        assert_eq!(s.fired, all);
    }

    #[test]
    fn test_empty_tank_disables_thrust() {
        let input = TickInput {
            down: true,
            ..Default::default()
        };
        let s = step(&hovering(), &input, 0.0, 1.0);
        assert_eq!(s.fuel_used, 0.0);
        assert_eq!(s.fired, TickInput::default());
        assert!((s.ship.vel.y - GRAVITY).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_eases_toward_velocity_lean() {
        let mut ship = hovering();
        ship.vel = Vec2::new(1.0, -1.0);
        let target = target_rotation(Vec2::new(1.0, -1.0 + GRAVITY));

        let s = step(&ship, &TickInput::default(), 0.0, 1.0);
        assert!((s.ship.rotation - target * ROTATION_EASING).abs() < 1e-6);

        // Repeated steps converge on the target without overshooting
        let mut current = ship;
        for _ in 0..200 {
            current.rotation = step(&current, &TickInput::default(), 0.0, 0.0).ship.rotation;
        }
        assert!((current.rotation - target_rotation(current.vel)).abs() < 1e-3);
    }
}
