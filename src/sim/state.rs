//! Game state and core simulation types
//!
//! `GameState` is the single store the tick and the host mutate. It is owned
//! by the caller and passed by reference; there is no global instance.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::CrashCause;
use super::particles::Particles;
use super::terrain::{self, Terrain, TerrainError};
use super::tick::TickInput;
use crate::consts::*;
use crate::highscores::HighScore;
use crate::platform::KeyValueStore;
use crate::settings::Settings;

/// Top-level mode, decides which overlay the host shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    /// Title screen
    Menu,
    /// Active flight
    Playing,
    /// Ship crashed
    GameOver,
    /// Ship landed, waiting for the next level
    LevelComplete,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::GameOver => "gameOver",
            GamePhase::LevelComplete => "levelComplete",
        }
    }
}

/// The lander
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    /// Center position (screen coordinates, y down)
    pub pos: Vec2,
    /// Velocity per nominal frame
    pub vel: Vec2,
    /// Visual lean in radians, derived from velocity
    pub rotation: f32,
}

impl Default for Ship {
    fn default() -> Self {
        Self {
            pos: Vec2::new(100.0, SHIP_SPAWN_Y),
            vel: Vec2::ZERO,
            rotation: 0.0,
        }
    }
}

impl Ship {
    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Landing-leg line
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + SHIP_BOTTOM_OFFSET
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x - SHIP_HALF_WIDTH
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + SHIP_HALF_WIDTH
    }
}

/// Partial ship update; `None` fields keep their value
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShipUpdate {
    pub pos: Option<Vec2>,
    pub vel: Option<Vec2>,
    pub rotation: Option<f32>,
}

impl From<Ship> for ShipUpdate {
    fn from(ship: Ship) -> Self {
        Self {
            pos: Some(ship.pos),
            vel: Some(ship.vel),
            rotation: Some(ship.rotation),
        }
    }
}

/// Things the host may want to react to (sounds, UI), drained each frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    LevelStarted { level: u32 },
    ThrusterStarted,
    ThrusterStopped,
    Crashed { pos: Vec2, cause: CrashCause },
    Landed { score: u64, bonus: f32 },
    NewHighScore { score: u64 },
}

/// Complete game state
#[derive(Debug)]
pub struct GameState {
    pub phase: GamePhase,
    /// Current level (1-based)
    pub level: u32,
    pub score: u64,
    /// Remaining fuel, `0..=INITIAL_FUEL`
    pub fuel: f32,
    pub ship: Ship,
    /// Ground and pads; empty unless playing
    pub terrain: Terrain,
    /// Visual particles (not gameplay-affecting)
    pub particles: Particles,
    /// Thrusters that fired on the last tick
    pub thrusters: TickInput,
    /// Playable area (width, height)
    pub viewport: Vec2,
    pub settings: Settings,
    pub(crate) high_score: HighScore,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a state seeded from OS entropy, reading the high score from
    /// `storage`
    pub fn new(settings: Settings, storage: Box<dyn KeyValueStore>) -> Self {
        Self::with_rng(settings, storage, Pcg32::from_rng(&mut rand::rng()))
    }

    /// Create a state with a fixed seed (reproducible terrain)
    pub fn with_seed(settings: Settings, storage: Box<dyn KeyValueStore>, seed: u64) -> Self {
        Self::with_rng(settings, storage, Pcg32::seed_from_u64(seed))
    }

    fn with_rng(settings: Settings, storage: Box<dyn KeyValueStore>, rng: Pcg32) -> Self {
        Self {
            phase: GamePhase::Menu,
            level: 1,
            score: 0,
            fuel: INITIAL_FUEL,
            ship: Ship::default(),
            terrain: Terrain::default(),
            particles: Particles::new(),
            thrusters: TickInput::default(),
            viewport: Vec2::new(800.0, 600.0),
            settings,
            high_score: HighScore::load(storage),
            rng,
            events: Vec::new(),
        }
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    /// Resize the playable area. Takes effect at the next level entry.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }

    /// Begin a new run at level 1
    pub fn start_game(&mut self) -> Result<(), TerrainError> {
        let terrain = self.build_terrain(1)?;
        self.phase = GamePhase::Playing;
        self.level = 1;
        self.score = 0;
        self.enter_level(terrain);
        log::info!("Game started");
        Ok(())
    }

    /// Advance to the next level, awarding the level-clear bonus
    pub fn next_level(&mut self) -> Result<(), TerrainError> {
        let terrain = self.build_terrain(self.level + 1)?;
        let bonus = LEVEL_BONUS_BASE + LEVEL_BONUS_PER_LEVEL * self.level as u64;
        self.add_score(bonus);
        self.level += 1;
        self.phase = GamePhase::Playing;
        self.enter_level(terrain);
        log::info!("Level {} (clear bonus {})", self.level, bonus);
        Ok(())
    }

    /// Menu "start" button: next level after a landing, a fresh run from the
    /// title or game-over screen. Ignored while playing. Returns whether a
    /// round began.
    pub fn start_from_menu(&mut self) -> Result<bool, TerrainError> {
        match self.phase {
            GamePhase::Playing => Ok(false),
            GamePhase::LevelComplete => self.next_level().map(|()| true),
            GamePhase::Menu | GamePhase::GameOver => self.start_game().map(|()| true),
        }
    }

    /// Game-over "restart" button: back to the title screen. Ignored in any
    /// other phase.
    pub fn restart_from_game_over(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        self.reset();
        true
    }

    /// End the round with a crash
    pub fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.end_round();
        log::info!("Game over at level {} with {} points", self.level, self.score);
    }

    /// End the round with a landing
    pub fn level_complete(&mut self) {
        self.phase = GamePhase::LevelComplete;
        self.end_round();
        log::info!("Level {} complete, score {}", self.level, self.score);
    }

    /// Merge a partial ship update
    pub fn update_ship(&mut self, update: ShipUpdate) {
        if let Some(pos) = update.pos {
            self.ship.pos = pos;
        }
        if let Some(vel) = update.vel {
            self.ship.vel = vel;
        }
        if let Some(rotation) = update.rotation {
            self.ship.rotation = rotation;
        }
    }

    /// Burn fuel. Never goes below zero; negative amounts are ignored.
    pub fn use_fuel(&mut self, amount: f32) {
        self.fuel = (self.fuel - amount.max(0.0)).max(0.0);
    }

    /// Add points. Returns true when this set a new (persisted) high score.
    pub fn add_score(&mut self, points: u64) -> bool {
        self.score = self.score.saturating_add(points);
        let new_best = self.high_score.submit(self.score);
        if new_best {
            self.events.push(GameEvent::NewHighScore { score: self.score });
        }
        new_best
    }

    /// Replace the terrain with a fresh one for `level` in a `width` x
    /// `height` viewport
    pub fn generate_terrain(&mut self, level: u32, width: f32, height: f32) -> Result<(), TerrainError> {
        self.terrain = terrain::generate(level, width, height, self.settings.ruleset, &mut self.rng)?;
        self.viewport = Vec2::new(width, height);
        Ok(())
    }

    /// Back to the title screen. The high score is kept.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Menu;
        self.level = 1;
        self.score = 0;
        self.fuel = INITIAL_FUEL;
        self.ship = Ship::default();
        self.terrain.clear();
        self.particles.clear();
        self.thrusters = TickInput::default();
        self.events.clear();
    }

    /// Spawn the ship at the top center with a gentle drift
    pub fn initialize_ship_position(&mut self, width: f32) {
        self.ship = Ship {
            pos: Vec2::new(width / 2.0, SHIP_SPAWN_Y),
            vel: Vec2::new(SHIP_SPAWN_DRIFT, 0.0),
            rotation: 0.0,
        };
    }

    /// Take the events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn build_terrain(&mut self, level: u32) -> Result<Terrain, TerrainError> {
        terrain::generate(
            level,
            self.viewport.x,
            self.viewport.y,
            self.settings.ruleset,
            &mut self.rng,
        )
    }

    fn enter_level(&mut self, terrain: Terrain) {
        self.terrain = terrain;
        self.fuel = INITIAL_FUEL;
        self.particles.clear();
        self.thrusters = TickInput::default();
        self.initialize_ship_position(self.viewport.x);
        self.events.push(GameEvent::LevelStarted { level: self.level });
    }

    fn end_round(&mut self) {
        if self.thrusters.any() {
            self.events.push(GameEvent::ThrusterStopped);
        }
        self.thrusters = TickInput::default();
        self.terrain.clear();
    }
}
