//! Game settings and preferences
//!
//! Persisted separately from the high score in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform::storage::{self, KeyValueStore};

/// Rule presets. `Classic` is the single-pad game with tight landing limits,
/// `Multipad` adds scored pads and particle effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Ruleset {
    Classic,
    #[default]
    Multipad,
}

impl Ruleset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ruleset::Classic => "Classic",
            Ruleset::Multipad => "Multipad",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Ruleset::Classic),
            "multipad" | "multi" => Some(Ruleset::Multipad),
            _ => None,
        }
    }

    /// Terrain height band as fractions of viewport height (min, max)
    pub fn terrain_band(&self) -> (f32, f32) {
        match self {
            Ruleset::Classic => (0.4, 0.7),
            Ruleset::Multipad => (0.7, 0.9),
        }
    }

    /// Inclusive range of landing pads per level
    pub fn pad_count(&self) -> (usize, usize) {
        match self {
            Ruleset::Classic => (1, 1),
            Ruleset::Multipad => (1, 3),
        }
    }

    /// Fraction of the terrain pads may be placed in (start, end)
    pub fn pad_window(&self) -> (f32, f32) {
        match self {
            Ruleset::Classic => (0.3, 0.7),
            Ruleset::Multipad => (0.2, 0.8),
        }
    }

    /// Score multiplier for the pad at `index` (0 = widest)
    pub fn pad_bonus(&self, index: usize) -> f32 {
        match self {
            Ruleset::Classic => 1.0,
            Ruleset::Multipad => 0.8 + 0.6 * index as f32,
        }
    }

    /// Touchdown must be strictly slower than this vertically
    pub fn safe_vertical_speed(&self) -> f32 {
        match self {
            Ruleset::Classic => 2.0,
            Ruleset::Multipad => 3.0,
        }
    }

    /// Touchdown must be strictly slower than this horizontally
    pub fn safe_horizontal_speed(&self) -> f32 {
        match self {
            Ruleset::Classic => 1.5,
            Ruleset::Multipad => 2.0,
        }
    }

    /// Whether exhaust and explosion particles are spawned
    pub fn particles_enabled(&self) -> bool {
        match self {
            Ruleset::Classic => false,
            Ruleset::Multipad => true,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Rule preset
    pub ruleset: Ruleset,
    /// Particle effects (exhaust, explosions)
    pub particles: bool,
    /// Silence all sound cues
    #[serde(default)]
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ruleset: Ruleset::Multipad,
            particles: true,
            muted: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "moon_lander_settings";

    /// Create settings from a ruleset
    pub fn from_ruleset(ruleset: Ruleset) -> Self {
        Self {
            ruleset,
            ..Self::default()
        }
    }

    /// Effective particle switch (the ruleset and the preference must agree)
    pub fn particles_enabled(&self) -> bool {
        self.particles && self.ruleset.particles_enabled()
    }

    /// Flip the sound switch, returning the new muted state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Load settings, falling back to defaults when absent or unreadable
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match storage::load_json(store, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from storage");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::info!("Using default settings ({e})");
                Self::default()
            }
        }
    }

    /// Save settings
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match storage::save_json(store, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Settings not saved: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;

    #[test]
    fn test_ruleset_from_str() {
        assert_eq!(Ruleset::from_str("CLASSIC"), Some(Ruleset::Classic));
        assert_eq!(Ruleset::from_str("multi"), Some(Ruleset::Multipad));
        assert_eq!(Ruleset::from_str("hard"), None);
        assert_eq!(Ruleset::from_str(Ruleset::Classic.as_str()), Some(Ruleset::Classic));
    }

    #[test]
    fn test_bonus_grows_with_pad_index() {
        let r = Ruleset::Multipad;
        assert!(r.pad_bonus(0) < 1.0);
        assert!(r.pad_bonus(1) >= 1.0 && r.pad_bonus(1) < 1.5);
        assert!(r.pad_bonus(2) >= 1.5);
        assert_eq!(Ruleset::Classic.pad_bonus(2), 1.0);
    }

    #[test]
    fn test_classic_disables_particles() {
        let settings = Settings::from_ruleset(Ruleset::Classic);
        assert!(settings.particles);
        assert!(!settings.particles_enabled());

        let mut settings = Settings::default();
        assert!(settings.particles_enabled());
        settings.particles = false;
        assert!(!settings.particles_enabled());
    }

    #[test]
    fn test_load_save() {
        let mut store = MemoryStorage::new();
        assert_eq!(Settings::load(&store), Settings::default());

        let mut settings = Settings::from_ruleset(Ruleset::Classic);
        assert!(settings.toggle_mute());
        settings.save(&mut store);
        let loaded = Settings::load(&store);
        assert_eq!(loaded, settings);
        assert!(loaded.muted);

        // Settings saved before the sound switch existed load unmuted
        store
            .set_item(Settings::STORAGE_KEY, r#"{"ruleset":"Classic","particles":false}"#)
            .unwrap();
        let legacy = Settings::load(&store);
        assert_eq!(legacy.ruleset, Ruleset::Classic);
        assert!(!legacy.particles);
        assert!(!legacy.muted);

        store.set_item(Settings::STORAGE_KEY, "{broken").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }
}
