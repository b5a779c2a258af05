//! Procedural terrain and landing pads
//!
//! Terrain is a polyline of evenly spaced vertices whose heights follow a
//! bounded random walk inside a band of the viewport. Landing pads are
//! flattened segments picked from the middle of the terrain, kept apart by a
//! minimum segment spacing.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::settings::Ruleset;

/// Random picks tried per pad before falling back to a full scan
pub const MAX_PAD_ATTEMPTS: usize = 64;

/// Widest pad, shrinking with level
const PAD_BASE_WIDTH: f32 = 100.0;
const PAD_MIN_WIDTH: f32 = 60.0;
const PAD_WIDTH_PER_LEVEL: f32 = 5.0;
/// Each successive pad is this fraction narrower than the first
const PAD_WIDTH_STEP: f32 = 0.25;

/// A vertex of the ground polyline (screen coordinates, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainPoint {
    pub x: f32,
    pub y: f32,
}

/// How risky a pad is, derived from its bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PadDifficulty {
    Easy,
    Medium,
    Hard,
}

/// A flat landing zone anchored on terrain segment `segment`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingPad {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    /// Score multiplier
    pub bonus: f32,
    /// Index of the anchor vertex; the anchor and its successor are flat
    pub segment: usize,
}

impl LandingPad {
    /// Whether `x` lies within `[x, x + width]`
    #[inline]
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.x && x <= self.x + self.width
    }

    pub fn difficulty(&self) -> PadDifficulty {
        if self.bonus >= 1.5 {
            PadDifficulty::Hard
        } else if self.bonus >= 1.0 {
            PadDifficulty::Medium
        } else {
            PadDifficulty::Easy
        }
    }
}

/// Generated ground for one level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    pub points: Vec<TerrainPoint>,
    /// Sorted by x
    pub pads: Vec<LandingPad>,
}

impl Terrain {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.pads.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.pads.clear();
    }
}

/// Rejected generation input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TerrainError {
    /// Levels start at 1
    InvalidLevel,
    /// Width and height must be finite and positive
    InvalidViewport { width: f32, height: f32 },
}

impl fmt::Display for TerrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLevel => write!(f, "level must be at least 1"),
            Self::InvalidViewport { width, height } => {
                write!(f, "invalid viewport {}x{}", width, height)
            }
        }
    }
}

impl std::error::Error for TerrainError {}

/// Number of terrain segments for a level (vertices = segments + 1)
pub fn segment_count(level: u32) -> usize {
    20 + 2 * level as usize
}

/// Largest height swing between neighbouring vertices
pub fn roughness(level: u32) -> f32 {
    20.0 + 10.0 * level as f32
}

/// Minimum anchor distance between two pads
pub fn pad_spacing(segments: usize, num_pads: usize) -> f32 {
    segments as f32 / (num_pads + 2) as f32
}

/// Pad width for a level; later pads are narrower
pub fn pad_width(level: u32, index: usize) -> f32 {
    let base = (PAD_BASE_WIDTH - PAD_WIDTH_PER_LEVEL * level as f32).max(PAD_MIN_WIDTH);
    base * (1.0 - PAD_WIDTH_STEP * index as f32)
}

/// Generate terrain and pads for `level` in a `width` x `height` viewport
pub fn generate<R: Rng>(
    level: u32,
    width: f32,
    height: f32,
    ruleset: Ruleset,
    rng: &mut R,
) -> Result<Terrain, TerrainError> {
    if level == 0 {
        return Err(TerrainError::InvalidLevel);
    }
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(TerrainError::InvalidViewport { width, height });
    }

    let segments = segment_count(level);
    let rough = roughness(level);
    let (band_lo, band_hi) = ruleset.terrain_band();
    let min_height = height * band_lo;
    let max_height = height * band_hi;

    let mut points = Vec::with_capacity(segments + 1);
    let mut y = rng.random_range(min_height..=max_height);
    for i in 0..=segments {
        if i > 0 {
            y = (y + (rng.random::<f32>() - 0.5) * rough).clamp(min_height, max_height);
        }
        let x = i as f32 / segments as f32 * width;
        points.push(TerrainPoint { x, y });
    }

    let (min_pads, max_pads) = ruleset.pad_count();
    let num_pads = rng.random_range(min_pads..=max_pads);
    let anchors = choose_pad_segments(segments, num_pads, ruleset.pad_window(), rng);

    let mut pads = Vec::with_capacity(anchors.len());
    for (index, &segment) in anchors.iter().enumerate() {
        let pad_y = points[segment].y;
        points[segment + 1].y = pad_y;
        pads.push(LandingPad {
            x: points[segment].x,
            y: pad_y,
            width: pad_width(level, index),
            bonus: ruleset.pad_bonus(index),
            segment,
        });
    }
    pads.sort_by(|a, b| a.x.total_cmp(&b.x));

    log::debug!(
        "Level {} terrain: {} segments, {} of {} pads at {:?}",
        level,
        segments,
        pads.len(),
        num_pads,
        anchors
    );

    Ok(Terrain { points, pads })
}

/// Half-open range of anchor indices allowed by the window. The anchor's
/// successor must exist, so the range never reaches `segments`.
fn candidate_range(segments: usize, window: (f32, f32)) -> (usize, usize) {
    let lo = (segments as f32 * window.0).floor() as usize;
    let hi = ((segments as f32 * window.1).floor() as usize).min(segments);
    if lo < hi { (lo, hi) } else { (0, segments) }
}

/// Pick up to `num_pads` anchor segments, each at least `pad_spacing` from
/// the others.
///
/// Random picks are retried a bounded number of times; after that the whole
/// window is scanned for the candidate farthest from the pads already placed.
/// When nothing in the window satisfies the spacing, placement stops early so
/// pads never overlap. The first pad is always placed.
fn choose_pad_segments<R: Rng>(
    segments: usize,
    num_pads: usize,
    window: (f32, f32),
    rng: &mut R,
) -> Vec<usize> {
    let (lo, hi) = candidate_range(segments, window);
    let spacing = pad_spacing(segments, num_pads);
    let mut chosen: Vec<usize> = Vec::with_capacity(num_pads);

    let nearest = |chosen: &[usize], candidate: usize| {
        chosen
            .iter()
            .map(|&s| s.abs_diff(candidate))
            .min()
            .unwrap_or(usize::MAX)
    };

    for _ in 0..num_pads {
        let mut pick = (0..MAX_PAD_ATTEMPTS)
            .map(|_| rng.random_range(lo..hi))
            .find(|&c| nearest(&chosen, c) as f32 >= spacing);

        if pick.is_none() {
            pick = (lo..hi)
                .filter(|&c| nearest(&chosen, c) as f32 >= spacing)
                .max_by_key(|&c| nearest(&chosen, c));
        }

        match pick {
            Some(segment) => chosen.push(segment),
            None => {
                log::warn!(
                    "No room for pad {} of {} (spacing {:.1}), keeping {}",
                    chosen.len() + 1,
                    num_pads,
                    spacing,
                    chosen.len()
                );
                break;
            }
        }
    }

    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng(seed: u64) -> Pcg32 {
        Pcg32::seed_from_u64(seed)
    }

    #[test]
    fn test_rejects_degenerate_input() {
        let mut r = rng(1);
        assert_eq!(
            generate(0, 800.0, 600.0, Ruleset::Multipad, &mut r),
            Err(TerrainError::InvalidLevel)
        );
        assert!(matches!(
            generate(1, 0.0, 600.0, Ruleset::Multipad, &mut r),
            Err(TerrainError::InvalidViewport { .. })
        ));
        assert!(matches!(
            generate(1, 800.0, f32::NAN, Ruleset::Multipad, &mut r),
            Err(TerrainError::InvalidViewport { .. })
        ));
    }

    #[test]
    fn test_classic_has_one_full_bonus_pad_in_window() {
        for seed in 0..50 {
            let terrain = generate(3, 800.0, 600.0, Ruleset::Classic, &mut rng(seed)).unwrap();
            assert_eq!(terrain.pads.len(), 1);

            let pad = &terrain.pads[0];
            let segments = segment_count(3);
            assert!(pad.segment >= (segments as f32 * 0.3) as usize);
            assert!(pad.segment < (segments as f32 * 0.7) as usize);
            assert_eq!(pad.bonus, 1.0);
            assert_eq!(pad.width, 85.0);
        }
    }

    #[test]
    fn test_pad_width_shrinks_with_level_and_index() {
        assert_eq!(pad_width(1, 0), 95.0);
        assert_eq!(pad_width(8, 0), 60.0);
        assert_eq!(pad_width(20, 0), 60.0);
        assert!(pad_width(1, 1) < pad_width(1, 0));
        assert!(pad_width(1, 2) < pad_width(1, 1));
    }

    #[test]
    fn test_wider_pads_pay_less() {
        for seed in 0..50 {
            let terrain = generate(2, 1200.0, 800.0, Ruleset::Multipad, &mut rng(seed)).unwrap();
            for a in &terrain.pads {
                for b in &terrain.pads {
                    if a.width > b.width {
                        assert!(a.bonus < b.bonus);
                    }
                }
            }
        }
    }

    #[test]
    fn test_pad_selection_terminates_when_crowded() {
        // Window holds a single segment but three pads are requested
        let picked = choose_pad_segments(22, 3, (0.5, 0.55), &mut rng(9));
        assert_eq!(picked, vec![11]);
    }

    #[test]
    fn test_difficulty_labels() {
        let pad = |bonus| LandingPad {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            bonus,
            segment: 0,
        };
        assert_eq!(pad(0.8).difficulty(), PadDifficulty::Easy);
        assert_eq!(pad(1.0).difficulty(), PadDifficulty::Medium);
        assert_eq!(pad(1.4).difficulty(), PadDifficulty::Medium);
        assert_eq!(pad(2.0).difficulty(), PadDifficulty::Hard);
    }

    fn ruleset_strategy() -> impl Strategy<Value = Ruleset> {
        prop_oneof![Just(Ruleset::Classic), Just(Ruleset::Multipad)]
    }

    proptest! {
        #[test]
        fn prop_terrain_shape(
            level in 1u32..40,
            width in 1.0f32..4000.0,
            height in 1.0f32..3000.0,
            ruleset in ruleset_strategy(),
            seed in any::<u64>(),
        ) {
            let terrain = generate(level, width, height, ruleset, &mut rng(seed)).unwrap();
            let segments = segment_count(level);
            let (lo, hi) = ruleset.terrain_band();

            prop_assert_eq!(terrain.points.len(), segments + 1);
            prop_assert_eq!(terrain.points[0].x, 0.0);
            prop_assert_eq!(terrain.points[segments].x, width);
            for pair in terrain.points.windows(2) {
                prop_assert!(pair[1].x > pair[0].x);
            }
            for p in &terrain.points {
                prop_assert!(p.y >= height * lo && p.y <= height * hi);
            }
        }

        #[test]
        fn prop_pads_are_flat_and_spaced(
            level in 1u32..40,
            seed in any::<u64>(),
            ruleset in ruleset_strategy(),
        ) {
            let terrain = generate(level, 1024.0, 768.0, ruleset, &mut rng(seed)).unwrap();
            let segments = segment_count(level);
            let (_, max_pads) = ruleset.pad_count();

            prop_assert!(!terrain.pads.is_empty());
            prop_assert!(terrain.pads.len() <= max_pads);

            for pad in &terrain.pads {
                prop_assert_eq!(pad.y, terrain.points[pad.segment].y);
                prop_assert_eq!(pad.y, terrain.points[pad.segment + 1].y);
                prop_assert_eq!(pad.x, terrain.points[pad.segment].x);
            }

            // Spacing shrinks as the requested count grows, so the largest
            // possible request gives a bound every terrain must meet.
            let spacing = pad_spacing(segments, max_pads);
            for (i, a) in terrain.pads.iter().enumerate() {
                for b in &terrain.pads[i + 1..] {
                    prop_assert!(a.segment.abs_diff(b.segment) as f32 >= spacing);
                }
            }
            for pair in terrain.pads.windows(2) {
                prop_assert!(pair[0].x < pair[1].x);
            }
        }

        #[test]
        fn prop_anchors_respect_spacing_for_requested_count(
            level in 1u32..40,
            num_pads in 1usize..=3,
            seed in any::<u64>(),
            ruleset in ruleset_strategy(),
        ) {
            let segments = segment_count(level);
            let window = ruleset.pad_window();
            let anchors = choose_pad_segments(segments, num_pads, window, &mut rng(seed));
            let (lo, hi) = candidate_range(segments, window);
            let spacing = pad_spacing(segments, num_pads);

            prop_assert!(!anchors.is_empty());
            prop_assert!(anchors.len() <= num_pads);
            for &a in &anchors {
                prop_assert!(a >= lo && a < hi);
            }
            for (i, &a) in anchors.iter().enumerate() {
                for &b in &anchors[i + 1..] {
                    prop_assert!(a.abs_diff(b) as f32 >= spacing);
                }
            }
        }
    }
}
