//! Held-key tracking for the three thrusters
//!
//! Only `ArrowDown`, `ArrowLeft` and `ArrowRight` are recognized; every other
//! key is ignored so the page keeps its default handling for it.

use crate::sim::TickInput;

/// A thruster bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Thruster {
    /// Main engine, pushes the ship up
    Down,
    /// Pushes the ship left
    Left,
    /// Pushes the ship right
    Right,
}

impl Thruster {
    /// Map a `KeyboardEvent.key` value to a thruster
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowDown" => Some(Thruster::Down),
            "ArrowLeft" => Some(Thruster::Left),
            "ArrowRight" => Some(Thruster::Right),
            _ => None,
        }
    }
}

/// Keys currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    down: bool,
    left: bool,
    right: bool,
}

impl HeldKeys {
    /// Record a key press. Returns true when the key drives a thruster.
    pub fn press(&mut self, key: &str) -> bool {
        match Thruster::from_key(key) {
            Some(thruster) => {
                self.set(thruster, true);
                true
            }
            None => false,
        }
    }

    /// Record a key release. Unknown keys are ignored.
    pub fn release(&mut self, key: &str) {
        if let Some(thruster) = Thruster::from_key(key) {
            self.set(thruster, false);
        }
    }

    /// Forget everything (focus loss, round end)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_held(&self, thruster: Thruster) -> bool {
        match thruster {
            Thruster::Down => self.down,
            Thruster::Left => self.left,
            Thruster::Right => self.right,
        }
    }

    /// Tick input for the current key state
    pub fn to_tick_input(&self) -> TickInput {
        TickInput {
            down: self.down,
            left: self.left,
            right: self.right,
        }
    }

    fn set(&mut self, thruster: Thruster, held: bool) {
        match thruster {
            Thruster::Down => self.down = held,
            Thruster::Left => self.left = held,
            Thruster::Right => self.right = held,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_arrow_thrust_keys_are_recognized() {
        let mut keys = HeldKeys::default();
        assert!(keys.press("ArrowDown"));
        assert!(keys.press("ArrowLeft"));
        assert!(!keys.press("ArrowUp"));
        assert!(!keys.press(" "));
        assert!(!keys.press("a"));

        let input = keys.to_tick_input();
        assert!(input.down);
        assert!(input.left);
        assert!(!input.right);
    }

    #[test]
    fn test_release_clears_single_key() {
        let mut keys = HeldKeys::default();
        keys.press("ArrowLeft");
        keys.press("ArrowRight");
        keys.release("ArrowLeft");
        keys.release("Escape");

        assert!(!keys.is_held(Thruster::Left));
        assert!(keys.is_held(Thruster::Right));

        keys.clear();
        assert_eq!(keys, HeldKeys::default());
    }
}
