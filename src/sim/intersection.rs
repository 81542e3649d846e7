//! Intersection divergence state machine
//!
//! Runs once per segment-boundary crossing, after the window has advanced,
//! reading the new head segment. While an intersection is active the
//! alternate track mirrors the window with its turns sign-flipped; the mode
//! records which branch the cart is actually on.

use glam::Vec3;

use super::state::{AltTrackMode, GameState, Status};
use super::track::{IntersectionBiome, TrackSegment};
use crate::consts::{DESCENT_DY, TURN_DX};

/// Safety predicate shared by the resolver and the demo AI: true iff the
/// steering target points at the branch encoded by the biome seed.
pub fn correct_direction(switch_direction_target: f32, biome: &IntersectionBiome) -> bool {
    (switch_direction_target < 0.0) == (biome.biome_seed > 0.5)
}

/// Apply one boundary crossing to the alt-track state. `dropped` is the
/// head segment the window just popped.
pub fn resolve(g: &mut GameState, dropped: &TrackSegment) {
    let head_intersection = g.track[0].intersection;

    if let Some(biome) = head_intersection {
        g.intersection_biome_end = biome.duration - biome.index;
    }

    match head_intersection {
        Some(biome)
            if biome.index >= biome.duration - 1
                && g.alt_track_mode == AltTrackMode::CartOn =>
        {
            // exiting the intersection on the unsafe branch
            g.status = Status::GameOver;
        }
        Some(biome) if biome.index < biome.duration => {
            let dropped_alt = g.alt_track.first().cloned();
            g.alt_track = g
                .track
                .iter()
                .enumerate()
                .map(|(i, segment)| {
                    let mut alt = segment.clone();
                    if biome.index + i as i64 >= 0 {
                        alt.turn = -alt.turn;
                    }
                    alt
                })
                .collect();

            if let Some(alt) = dropped_alt {
                g.alt_track_offset.x -= TURN_DX * (dropped.turn - alt.turn);
                g.alt_track_offset.y -= DESCENT_DY * (dropped.descent - alt.descent);
            }

            let has_diverged = biome.index > 0 && g.alt_track_offset.x != 0.0;
            let direction_is_correct = correct_direction(g.switch_direction_target, &biome);
            // a choice made early in the intersection commits the cart for
            // its duration: once the tracks have diverged the mode is locked
            if !has_diverged || g.alt_track_mode == AltTrackMode::Off {
                g.alt_track_mode = if direction_is_correct {
                    AltTrackMode::CartOff
                } else {
                    AltTrackMode::CartOn
                };
            }
        }
        _ => {
            if g.alt_track_mode != AltTrackMode::Off {
                // the intersection has fully scrolled past
                g.alt_track.clear();
                g.alt_track_mode = AltTrackMode::Off;
                g.alt_track_offset = Vec3::ZERO;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TRACK_SIZE;
    use crate::sim::window;

    const SEED: f64 = 0.41;

    fn biome(biome_seed: f64, index: i64, duration: i64) -> IntersectionBiome {
        IntersectionBiome {
            biome_seed,
            index,
            duration,
        }
    }

    /// Running state with a full window whose head carries `intersection`
    fn state_with_head(intersection: Option<IntersectionBiome>) -> GameState {
        let mut g = GameState::new(SEED).leveled_up();
        g.track = window::initial_window(g.step_index, SEED);
        g.track[0].intersection = intersection;
        g
    }

    #[test]
    fn test_correct_direction_predicate() {
        // seed above 0.5 encodes the left branch
        assert!(!correct_direction(1.0, &biome(0.8, 0, 10)));
        assert!(correct_direction(-1.0, &biome(0.8, 0, 10)));
        assert!(correct_direction(1.0, &biome(0.2, 0, 10)));
        assert!(!correct_direction(-1.0, &biome(0.2, 0, 10)));
        // neutral target counts as "right"
        assert!(correct_direction(0.0, &biome(0.2, 0, 10)));
    }

    #[test]
    fn test_wrong_choice_turns_cart_on() {
        let mut g = state_with_head(Some(biome(0.8, 0, 10)));
        g.switch_direction_target = 1.0;
        let dropped = g.track[0].clone();
        resolve(&mut g, &dropped);
        assert_eq!(g.alt_track_mode, AltTrackMode::CartOn);
        assert_eq!(g.status, Status::Running);
        assert_eq!(g.intersection_biome_end, 10);
    }

    #[test]
    fn test_safe_choice_turns_cart_off() {
        let mut g = state_with_head(Some(biome(0.8, 0, 10)));
        g.switch_direction_target = -1.0;
        let dropped = g.track[0].clone();
        resolve(&mut g, &dropped);
        assert_eq!(g.alt_track_mode, AltTrackMode::CartOff);
    }

    #[test]
    fn test_alt_track_mirrors_with_flipped_turns() {
        let mut g = state_with_head(Some(biome(0.8, 2, 10)));
        g.switch_direction_target = 1.0;
        let dropped = g.track[0].clone();
        resolve(&mut g, &dropped);
        assert_eq!(g.alt_track.len(), TRACK_SIZE);
        for (real, alt) in g.track.iter().zip(&g.alt_track) {
            assert_eq!(alt.turn, -real.turn);
            assert_eq!(alt.descent, real.descent);
        }
    }

    #[test]
    fn test_mode_locked_after_divergence() {
        let mut g = state_with_head(Some(biome(0.8, 3, 10)));
        g.alt_track_mode = AltTrackMode::CartOn;
        g.alt_track = g.track.clone();
        g.alt_track[0].turn = -g.track[0].turn + 0.5;
        g.alt_track_offset.x = 0.4;
        // steering is correct now, but the divergence already committed
        g.switch_direction_target = -1.0;
        let dropped = g.track[0].clone();
        resolve(&mut g, &dropped);
        assert_eq!(g.alt_track_mode, AltTrackMode::CartOn);
    }

    #[test]
    fn test_offset_accumulates_from_dropped_pair() {
        let mut g = state_with_head(Some(biome(0.8, 1, 10)));
        g.alt_track_mode = AltTrackMode::CartOn;
        g.alt_track = g.track.clone();
        g.alt_track[0].turn = 0.25;
        g.alt_track[0].descent = 0.5;
        let mut dropped = g.track[0].clone();
        dropped.turn = -0.25;
        dropped.descent = 0.75;
        resolve(&mut g, &dropped);
        assert!((g.alt_track_offset.x - (-TURN_DX * (-0.5))).abs() < 1e-6);
        assert!((g.alt_track_offset.y - (-DESCENT_DY * 0.25)).abs() < 1e-6);
    }

    #[test]
    fn test_unsafe_exit_is_game_over() {
        let mut g = state_with_head(Some(biome(0.8, 9, 10)));
        g.alt_track_mode = AltTrackMode::CartOn;
        let dropped = g.track[0].clone();
        resolve(&mut g, &dropped);
        assert_eq!(g.status, Status::GameOver);
    }

    #[test]
    fn test_safe_exit_keeps_running() {
        let mut g = state_with_head(Some(biome(0.8, 9, 10)));
        g.alt_track_mode = AltTrackMode::CartOff;
        g.switch_direction_target = -1.0;
        let dropped = g.track[0].clone();
        resolve(&mut g, &dropped);
        assert_eq!(g.status, Status::Running);
    }

    #[test]
    fn test_scrolling_past_clears_alt_state() {
        let mut g = state_with_head(None);
        g.alt_track_mode = AltTrackMode::CartOff;
        g.alt_track = g.track.clone();
        g.alt_track_offset = Vec3::new(1.0, -0.5, 0.0);
        let dropped = g.track[0].clone();
        resolve(&mut g, &dropped);
        assert_eq!(g.alt_track_mode, AltTrackMode::Off);
        assert!(g.alt_track.is_empty());
        assert_eq!(g.alt_track_offset, Vec3::ZERO);
    }
}
