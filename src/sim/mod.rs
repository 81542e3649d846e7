//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - One `step` per host frame: previous state in, next state out
//! - Seeded RNG only; re-querying the track generator is always safe
//! - No rendering or platform dependencies

pub mod intersection;
pub mod physics;
pub mod state;
pub mod tick;
pub mod track;
pub mod tutorial;
pub mod window;

pub use intersection::correct_direction;
pub use state::{AltTrackMode, GameState, Status, UiState};
pub use tick::{FrameTiming, InputSnapshot, StepConfig, step};
pub use track::{Biome, IntersectionBiome, TrackSegment, generate, steps_for_level};
pub use tutorial::{TutorialStep, TutorialTable};
pub use window::{advance_window, initial_window, track_to_coordinates};
