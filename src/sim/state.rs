//! Game state and run lifecycle
//!
//! `GameState` is the single per-tick aggregate. The step function clones
//! the previous snapshot, mutates the clone and hands it back; consumers
//! only ever read the returned value.

use glam::{Mat3, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::track::{self, TrackSegment};
use super::window;

/// Run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Running,
    /// Run completed; level-up fires after the dwell
    Finished,
    /// Crashed on an unsafe intersection exit; restart fires after the dwell
    GameOver,
}

/// Alternate-track divergence mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AltTrackMode {
    /// No active intersection
    Off,
    /// Player steered onto the unsafe branch; the alternate cart is live
    CartOn,
    /// Player picked the safe branch; the alternate cart collapses
    CartOff,
}

/// Overlay descriptor consumed read-only by the UI layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiState {
    pub title_centered: bool,
    pub title: String,
    pub body: String,
    pub footer: Option<String>,
}

/// Complete simulation state for one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Host clock of the latest tick, seconds. 0 means "not started yet":
    /// the first step call adopts the host clock.
    pub time: f64,
    /// Frame counter of the latest tick
    pub tick: u64,
    /// Host clock when the simulation first ticked
    pub start_time: f64,
    /// Host clock of the latest status transition; gates the dwell timers
    pub status_changed_time: f64,
    /// Host clock of the latest segment-boundary crossing
    pub step_time: f64,
    /// Frame counter of the latest segment-boundary crossing
    pub step_tick: u64,

    pub status: Status,
    /// -1 = start screen / demo, >= 0 = player run
    pub level: i32,
    /// Remaining segments in the run; counts down, -1 means finished
    pub step_index: i64,
    /// Fractional progress through the current segment, [0, 1)
    pub track_step_progress: f32,

    /// The sliding window; index 0 is under the player
    pub track: Vec<TrackSegment>,
    /// Alternate branch mirror of `track`; empty unless an intersection is active
    pub alt_track: Vec<TrackSegment>,
    pub alt_track_mode: AltTrackMode,
    /// Positional drift between the real and alternate track
    pub alt_track_offset: Vec3,
    /// Remaining segments of the active intersection, published for consumers
    pub intersection_biome_end: i64,

    pub speed: f32,
    pub acc: f32,
    /// Smoothed brake input in [0, 1]
    pub braking: f32,
    /// Continuous-smoothed steering, follows `switch_direction_target`
    pub switch_direction: f32,
    /// Discrete steering choice in {-1, 0, 1}
    pub switch_direction_target: f32,

    pub rot_x: f32,
    pub rot_y: f32,
    /// Crash camera pull-back, approaches 1 during game over
    pub zoom_out: f32,
    /// Camera orientation derived from `rot_x` / `rot_y`
    pub rot: Mat3,
    /// Camera position
    pub origin: Vec3,

    /// Current tutorial step index
    pub tutorial: usize,
    /// Overlay to display, if any
    pub ui_state: Option<UiState>,
    /// Run seed; restarting keeps it, leveling up derives a fresh one
    pub seed: f64,
}

/// Next run seed, derived so whole sessions replay from one initial seed
fn derive_seed(seed: f64) -> f64 {
    let mut rng = Pcg32::seed_from_u64(seed.to_bits().wrapping_mul(0x9E3779B97F4A7C15));
    rng.random::<f64>()
}

impl GameState {
    /// Boot state: demo run on the start screen, clock not yet started.
    pub fn new(seed: f64) -> Self {
        let mut state = GameState {
            time: 0.0,
            tick: 0,
            start_time: 0.0,
            status_changed_time: 0.0,
            step_time: 0.0,
            step_tick: 0,
            status: Status::Running,
            level: -1,
            step_index: 0,
            track_step_progress: 0.0,
            track: Vec::new(),
            alt_track: Vec::new(),
            alt_track_mode: AltTrackMode::Off,
            alt_track_offset: Vec3::ZERO,
            intersection_biome_end: 0,
            speed: 0.0,
            acc: 0.0,
            braking: 0.0,
            switch_direction: 0.0,
            switch_direction_target: 1.0,
            rot_x: 0.0,
            rot_y: 0.0,
            zoom_out: 0.0,
            rot: Mat3::IDENTITY,
            origin: Vec3::new(0.0, 0.05, 1.4),
            tutorial: 0,
            ui_state: None,
            seed,
        };
        state.reset_run(-1, seed);
        state
    }

    /// New run at the same level on the same track - re-running a memorized
    /// track is the core loop, so the seed is preserved.
    pub fn restarted(&self) -> Self {
        let mut state = self.clone();
        state.reset_run(self.level, self.seed);
        state
    }

    /// Move on to the next level on a freshly derived track.
    pub fn leveled_up(&self) -> Self {
        let mut state = self.clone();
        state.reset_run(self.level + 1, derive_seed(self.seed));
        state
    }

    fn reset_run(&mut self, level: i32, seed: f64) {
        self.level = level;
        self.seed = seed;
        self.step_index = track::steps_for_level(level);
        self.track = window::initial_window(self.step_index, seed);
        self.alt_track = Vec::new();
        self.alt_track_mode = AltTrackMode::Off;
        self.alt_track_offset = Vec3::ZERO;
        self.intersection_biome_end = 0;
        self.track_step_progress = 0.0;
        self.speed = 0.0;
        self.acc = 0.0;
        self.braking = 0.0;
        self.switch_direction = 0.0;
        self.switch_direction_target = 1.0;
        self.zoom_out = 0.0;
        self.status = Status::Running;
        self.status_changed_time = self.time;
        self.step_time = self.time;
        self.step_tick = self.tick;
        self.ui_state = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TRACK_SIZE;

    #[test]
    fn test_new_state_is_demo() {
        let state = GameState::new(0.5);
        assert_eq!(state.level, -1);
        assert_eq!(state.status, Status::Running);
        assert_eq!(state.step_index, track::steps_for_level(-1));
        assert_eq!(state.track.len(), TRACK_SIZE);
        assert!(state.alt_track.is_empty());
        assert_eq!(state.time, 0.0);
    }

    #[test]
    fn test_restart_keeps_level_and_seed() {
        let mut state = GameState::new(0.5).leveled_up();
        state.time = 42.0;
        state.status = Status::GameOver;
        state.speed = 12.0;
        state.zoom_out = 0.8;

        let restarted = state.restarted();
        assert_eq!(restarted.level, state.level);
        assert_eq!(restarted.seed, state.seed);
        assert_eq!(restarted.status, Status::Running);
        assert_eq!(restarted.step_index, track::steps_for_level(state.level));
        assert_eq!(restarted.speed, 0.0);
        assert_eq!(restarted.zoom_out, 0.0);
        assert_eq!(restarted.status_changed_time, 42.0);
        // same seed, same track
        assert_eq!(restarted.track, window::initial_window(restarted.step_index, state.seed));
    }

    #[test]
    fn test_level_up_advances_and_reseeds() {
        let demo = GameState::new(0.5);
        let first = demo.leveled_up();
        assert_eq!(first.level, 0);
        assert_ne!(first.seed, demo.seed);
        assert_eq!(first.step_index, track::steps_for_level(0));

        let second = first.leveled_up();
        assert_eq!(second.level, 1);
        assert_ne!(second.seed, first.seed);
    }

    #[test]
    fn test_derive_seed_deterministic() {
        assert_eq!(derive_seed(0.123), derive_seed(0.123));
        assert!((0.0..1.0).contains(&derive_seed(0.123)));
        assert!((0.0..1.0).contains(&derive_seed(0.0)));
    }
}
