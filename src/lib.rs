//! Track Rush - deterministic simulation core for an infinite track-runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (track generation, intersections, physics, game state)
//!
//! Rendering, overlay drawing and raw input capture are external consumers:
//! each frame they hand the previous `GameState` to [`sim::step`] together
//! with the frame clock and an input snapshot, and read the returned state
//! without mutating it.

pub mod sim;

pub use sim::{GameState, InputSnapshot, Status, step};

/// Game configuration constants
pub mod consts {
    /// Number of track segments in the sliding window (index 0 = under the player)
    pub const TRACK_SIZE: usize = 8;
    /// Maximum dt consumed by one tick, in seconds (frame hitches are clamped)
    pub const DT_MAX: f64 = 0.1;
    /// Lateral drift per unit of turn between the real and alternate track
    pub const TURN_DX: f32 = 0.75;
    /// Vertical drift per unit of descent between the real and alternate track
    pub const DESCENT_DY: f32 = 0.6;
    /// Length of one biome span in segments; an intersection lasts one span
    pub const BIOME_SPAN: i64 = 10;
    /// Base run length unit, scaled by the level pacing curve
    pub const LEVEL_SAFE_MULT: i64 = 32;

    /// Acceleration ceiling
    pub const ACC_MAX: f32 = 4.0;
    /// Speed ceiling (segments per second)
    pub const SPEED_MAX: f32 = 20.0;
    /// Friction base factor, referenced at 60 steps/sec
    pub const FRICTION: f32 = 0.003;

    /// Per-tick approach rate of braking toward the raw brake input
    pub const BRAKE_SMOOTHING: f32 = 0.1;
    /// Per-tick approach rate of switch_direction toward its target
    pub const SWITCH_SMOOTHING: f32 = 0.1;
    /// Per-tick approach rate of the camera follower
    pub const CAMERA_SMOOTHING: f32 = 0.03;
    /// Per-tick approach rate of the crash pose and zoom-out
    pub const CRASH_SMOOTHING: f32 = 0.008;

    /// Dwell before an automatic restart / level-up fires, in seconds
    pub const STATUS_DWELL: f64 = 4.0;
    /// Dwell before the demo auto-restarts from a non-running status
    pub const DEMO_DWELL: f64 = 3.0;
    /// The demo AI re-rolls its steering target every this many ticks
    pub const DEMO_STEER_PERIOD: u64 = 60;
}

/// Hermite smoothstep of `x` between `edge0` and `edge1`
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
