//! Procedural track generation and level pacing
//!
//! `generate` is a pure function of (step index, run seed): the sliding
//! window re-queries indices freely during refills, so two calls with the
//! same arguments must return bit-identical segments. It is total over the
//! whole `i64` domain - negative (pre-run) and far-future indices included.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{BIOME_SPAN, LEVEL_SAFE_MULT};

/// Categorical biome id. The render side packs two of these into one byte,
/// so every variant must fit a 4-bit channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Biome {
    Plains = 0,
    Forest = 1,
    Canyon = 2,
    Tunnel = 3,
    Snow = 4,
    Desert = 5,
    Swamp = 6,
    Intersection = 7,
}

impl Biome {
    /// 4-bit id for texture packing
    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }
}

/// Scenery kinds the span picker draws from (intersections are rolled separately)
const SCENERY: [Biome; 7] = [
    Biome::Plains,
    Biome::Forest,
    Biome::Canyon,
    Biome::Tunnel,
    Biome::Snow,
    Biome::Desert,
    Biome::Swamp,
];

/// Fraction of even-numbered spans that become intersections
const INTERSECTION_CHANCE: f64 = 0.35;

/// Intersection attributes attached to every segment of an intersection span
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntersectionBiome {
    /// Span-constant sub-seed; which side of 0.5 it falls on encodes the safe branch
    pub biome_seed: f64,
    /// 0-based position within the intersection, growing as the window advances
    pub index: i64,
    /// Total intersection length in segments
    pub duration: i64,
}

/// One discrete unit of track. Immutable once generated; dropped when it
/// scrolls out of the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSegment {
    /// Signed lateral curvature in [-1, 1]
    pub turn: f32,
    /// Forward slope in [0, 1]
    pub descent: f32,
    pub biome1: Biome,
    pub biome2: Biome,
    /// Blend weight from biome1 toward biome2 in [0, 1]
    pub biome_mix: f32,
    /// Per-segment sub-seed in [0, 1]
    pub track_seed: f32,
    /// Present only on segments of an intersection span
    pub intersection: Option<IntersectionBiome>,
}

// Distinct salts keep the span-level and segment-level RNG streams apart.
const SPAN_KIND_SALT: u64 = 0x5EED_0001;
const SPAN_ATTR_SALT: u64 = 0x5EED_0002;
const SEGMENT_SALT: u64 = 0x5EED_0003;

/// splitmix64 finalizer; spreads consecutive indices over the seed space
fn mix(mut h: u64) -> u64 {
    h ^= h >> 30;
    h = h.wrapping_mul(0xBF58476D1CE4E5B9);
    h ^= h >> 27;
    h = h.wrapping_mul(0x94D049BB133111EB);
    h ^ (h >> 31)
}

fn stream_rng(index: i64, seed: f64, salt: u64) -> Pcg32 {
    let h = (index as u64)
        .wrapping_mul(0x9E3779B97F4A7C15)
        .wrapping_add(seed.to_bits())
        .wrapping_add(salt);
    Pcg32::seed_from_u64(mix(h))
}

fn span_kind(span: i64, seed: f64) -> Biome {
    let mut rng = stream_rng(span, seed, SPAN_KIND_SALT);
    // intersections only land on even spans, so two are never adjacent
    if span.rem_euclid(2) == 0 && rng.random::<f64>() < INTERSECTION_CHANCE {
        return Biome::Intersection;
    }
    SCENERY[rng.random_range(0..SCENERY.len())]
}

struct SpanAttrs {
    kind: Biome,
    turn_bias: f32,
    descent_base: f32,
    intersection_seed: f64,
}

fn span_attrs(span: i64, seed: f64) -> SpanAttrs {
    let mut rng = stream_rng(span, seed, SPAN_ATTR_SALT);
    SpanAttrs {
        kind: span_kind(span, seed),
        turn_bias: rng.random_range(-0.5..0.5),
        descent_base: rng.random_range(0.1..0.7),
        intersection_seed: rng.random::<f64>(),
    }
}

/// Generate the segment at `step_index` for the run keyed by `seed`.
///
/// Step indices count down as the player advances, so the span a segment
/// belongs to is entered at its highest index; `biome2` looks ahead to the
/// span the player will reach next.
pub fn generate(step_index: i64, seed: f64) -> TrackSegment {
    let span = step_index.div_euclid(BIOME_SPAN);
    let index_in_span = step_index.rem_euclid(BIOME_SPAN);
    let attrs = span_attrs(span, seed);
    let next = span_attrs(span - 1, seed);

    let mut rng = stream_rng(step_index, seed, SEGMENT_SALT);
    let turn_jitter: f32 = rng.random_range(-0.5..0.5);
    let descent_jitter: f32 = rng.random_range(-0.15..0.15);
    let track_seed: f32 = rng.random::<f32>();

    let descent = (attrs.descent_base + descent_jitter).clamp(0.0, 1.0);

    let (turn, intersection) = if attrs.kind == Biome::Intersection {
        let index = BIOME_SPAN - 1 - index_in_span;
        let safe_sign = if attrs.intersection_seed > 0.5 { -1.0 } else { 1.0 };
        // past the entry the committed track bends toward the safe branch
        let turn = if index > 0 {
            safe_sign * (0.2 + 0.3 * track_seed)
        } else {
            0.5 * turn_jitter
        };
        (
            turn.clamp(-1.0, 1.0),
            Some(IntersectionBiome {
                biome_seed: attrs.intersection_seed,
                index,
                duration: BIOME_SPAN,
            }),
        )
    } else {
        ((attrs.turn_bias + turn_jitter).clamp(-1.0, 1.0), None)
    };

    // blend toward the upcoming biome over the closing half of the span
    let half = (BIOME_SPAN / 2) as f32;
    let biome_mix = ((half - index_in_span as f32) / half).clamp(0.0, 1.0);

    TrackSegment {
        turn,
        descent,
        biome1: attrs.kind,
        biome2: next.kind,
        biome_mix,
        track_seed,
        intersection,
    }
}

/// Number of steps in a level's run. Level -1 is the demo loop; positive
/// levels grow super-linearly so each completed run is meaningfully longer
/// than the last.
pub fn steps_for_level(level: i32) -> i64 {
    if level < 0 {
        20 * LEVEL_SAFE_MULT
    } else if level == 0 {
        LEVEL_SAFE_MULT
    } else {
        let l = f64::from(level);
        LEVEL_SAFE_MULT.saturating_mul((l + 0.2 * l * l).floor() as i64)
    }
}
