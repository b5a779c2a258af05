//! Frame timing
//!
//! Turns `requestAnimationFrame` timestamps into elapsed milliseconds.

use crate::consts::NOMINAL_FRAME_MS;

/// Tracks the previous frame timestamp
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the previous call. The first call after a
    /// construction or [`reset`](Self::reset) reports one nominal frame.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let elapsed = match self.last_ms {
            Some(last) => (now_ms - last).max(0.0) as f32,
            None => NOMINAL_FRAME_MS,
        };
        self.last_ms = Some(now_ms);
        elapsed
    }

    /// Forget the previous timestamp (new round, tab resumed)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_nominal() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(5000.0), NOMINAL_FRAME_MS);
        assert!((clock.advance(5020.0) - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_backwards_timestamp_is_zero() {
        let mut clock = FrameClock::new();
        clock.advance(100.0);
        assert_eq!(clock.advance(90.0), 0.0);

        clock.reset();
        assert_eq!(clock.advance(90.0), NOMINAL_FRAME_MS);
    }
}
