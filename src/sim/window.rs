//! Sliding track window and coordinate projection
//!
//! The window always holds exactly `TRACK_SIZE` segments; index 0 is the
//! segment under the player. Advancing pops the head and appends the next
//! segment entering view at the tail.

use glam::Vec3;

use super::track::{self, TrackSegment};
use crate::consts::{DESCENT_DY, TRACK_SIZE, TURN_DX};

/// Build the window for a run positioned at `step_index`: element `i` is
/// `generate(step_index - i, seed)`, so a fresh window and an advanced one
/// agree on every shared index.
pub fn initial_window(step_index: i64, seed: f64) -> Vec<TrackSegment> {
    (0..TRACK_SIZE as i64)
        .map(|i| track::generate(step_index - i, seed))
        .collect()
}

/// Advance the window by one segment boundary. `step_index` is the new
/// (already decremented) index of the head segment. Returns the dropped
/// head; the intersection resolver needs it for offset continuity.
pub fn advance_window(
    window: &mut Vec<TrackSegment>,
    step_index: i64,
    seed: f64,
) -> TrackSegment {
    let dropped = window.remove(0);
    window.push(track::generate(step_index - TRACK_SIZE as i64 + 1, seed));
    dropped
}

/// Project segments into camera-space positions, one point per segment,
/// accumulating lateral and vertical drift along the forward axis. The
/// camera follower reads a handful of these each tick.
pub fn track_to_coordinates(track: &[TrackSegment]) -> Vec<Vec3> {
    let mut out = Vec::with_capacity(track.len());
    let mut position = Vec3::ZERO;
    for segment in track {
        position += Vec3::new(
            TURN_DX * segment.turn,
            -DESCENT_DY * segment.descent,
            1.0,
        );
        out.push(position);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: f64 = 0.337;

    #[test]
    fn test_window_length_preserved() {
        let mut window = initial_window(100, SEED);
        assert_eq!(window.len(), TRACK_SIZE);
        for step in (90..100).rev() {
            advance_window(&mut window, step, SEED);
            assert_eq!(window.len(), TRACK_SIZE);
        }
    }

    #[test]
    fn test_advance_returns_old_head_and_appends_generated() {
        let mut window = initial_window(100, SEED);
        let head = window[0].clone();
        let dropped = advance_window(&mut window, 99, SEED);
        assert_eq!(dropped, head);
        assert_eq!(
            *window.last().unwrap(),
            track::generate(99 - TRACK_SIZE as i64 + 1, SEED)
        );
    }

    #[test]
    fn test_advance_matches_fresh_window() {
        let mut advanced = initial_window(100, SEED);
        advance_window(&mut advanced, 99, SEED);
        assert_eq!(advanced, initial_window(99, SEED));
    }

    #[test]
    fn test_coordinates_accumulate() {
        let segment = |turn: f32, descent: f32| TrackSegment {
            turn,
            descent,
            biome1: super::super::track::Biome::Plains,
            biome2: super::super::track::Biome::Plains,
            biome_mix: 0.0,
            track_seed: 0.0,
            intersection: None,
        };
        let coords = track_to_coordinates(&[segment(1.0, 0.0), segment(-1.0, 1.0)]);
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[0], Vec3::new(TURN_DX, 0.0, 1.0));
        assert_eq!(coords[1], Vec3::new(0.0, -DESCENT_DY, 2.0));
    }

    #[test]
    fn test_coordinates_empty() {
        assert!(track_to_coordinates(&[]).is_empty());
    }
}
