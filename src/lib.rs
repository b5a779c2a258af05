//! Moon Lander - A lunar lander arcade game
//!
//! Core modules:
//! - `sim`: Simulation (terrain generation, flight physics, collisions, game state)
//! - `platform`: Browser/native platform abstraction (input, storage, frame timing)
//! - `highscores`: Persisted best score
//! - `settings`: Ruleset selection and preferences

pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use settings::{Ruleset, Settings};

/// Game configuration constants
///
/// Velocities and accelerations are expressed per nominal frame (see
/// [`NOMINAL_FRAME_MS`](consts::NOMINAL_FRAME_MS)), positions in viewport pixels
/// with y growing downward.
pub mod consts {
    /// Nominal frame interval the physics constants are tuned for (60 Hz)
    pub const NOMINAL_FRAME_MS: f32 = 16.67;
    /// Largest frame scale applied in one tick (avoids jumps on tab resume)
    pub const MAX_FRAME_SCALE: f32 = 2.0;

    /// Downward acceleration, applied every tick
    pub const GRAVITY: f32 = 0.02;
    /// Down-key thrust (pushes the ship up)
    pub const VERTICAL_THRUST_POWER: f32 = 0.12;
    /// Left/right-key thrust
    pub const HORIZONTAL_THRUST_POWER: f32 = 0.03;
    /// Fuel burned per held thruster per frame
    pub const FUEL_CONSUMPTION: f32 = 0.5;
    /// Fuel at the start of every level
    pub const INITIAL_FUEL: f32 = 1000.0;

    /// Fraction of the target lean angle covered each tick
    pub const ROTATION_EASING: f32 = 0.1;
    /// Lean angle as a fraction of the velocity heading
    pub const ROTATION_LEAN: f32 = 0.3;

    /// Ship footprint: half of the hull width
    pub const SHIP_HALF_WIDTH: f32 = 10.0;
    /// Ship footprint: distance from center to landing legs
    pub const SHIP_BOTTOM_OFFSET: f32 = 15.0;
    /// Spawn altitude
    pub const SHIP_SPAWN_Y: f32 = 50.0;
    /// Horizontal drift given to a freshly spawned ship
    pub const SHIP_SPAWN_DRIFT: f32 = 0.5;

    /// Max difference between terrain and pad height to count as "on the pad"
    pub const PAD_HEIGHT_TOLERANCE: f32 = 2.0;
    /// Landing score before speed/fuel adjustments
    pub const LANDING_BASE_SCORE: f32 = 500.0;
    /// Points lost per unit of touchdown speed
    pub const LANDING_SPEED_PENALTY: f32 = 50.0;
    /// Fuel units per bonus point
    pub const LANDING_FUEL_DIVISOR: f32 = 10.0;

    /// Level-clear bonus: base plus per-level increment
    pub const LEVEL_BONUS_BASE: u64 = 500;
    pub const LEVEL_BONUS_PER_LEVEL: u64 = 100;

    /// Maximum live particles
    pub const MAX_PARTICLES: usize = 200;
}
