//! Simulation module
//!
//! All gameplay logic lives here:
//! - Terrain generation from a seeded RNG
//! - Frame-scaled flight physics
//! - Collision resolution against terrain and pads
//! - No rendering or DOM dependencies

pub mod collision;
pub mod flight;
pub mod particles;
pub mod snapshot;
pub mod state;
pub mod terrain;
pub mod tick;

pub use collision::{CrashCause, LandingLimits, Outcome, landing_score};
pub use particles::{Particle, Particles};
pub use snapshot::{Hud, PadView, ParticleView, Snapshot};
pub use state::{GameEvent, GamePhase, GameState, Ship, ShipUpdate};
pub use terrain::{LandingPad, PadDifficulty, Terrain, TerrainError, TerrainPoint};
pub use tick::{TickInput, tick};
