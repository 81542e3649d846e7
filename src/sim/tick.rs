//! Per-frame simulation step
//!
//! `step` consumes the previous state by reference and returns the next
//! state by value: no aliasing between the two, no ambient globals. One
//! call per host frame; irregular frame times are clamped before any
//! integration, and at most one segment boundary is processed per tick.

use super::intersection::{self, correct_direction};
use super::physics;
use super::state::{GameState, Status, UiState};
use super::tutorial::{self, TutorialTable};
use super::window;
use crate::consts::{
    BRAKE_SMOOTHING, DEMO_DWELL, DEMO_STEER_PERIOD, DT_MAX, STATUS_DWELL,
};

/// Host frame clock: monotonic time in seconds plus a frame counter
#[derive(Debug, Clone, Copy)]
pub struct FrameTiming {
    pub time: f64,
    pub tick: u64,
}

/// Abstract input snapshot for one frame, produced by the host's input layer
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    /// Steering: -1 left, 1 right, 0 neutral
    pub key_right_delta: i8,
    /// Vertical debug delta, consumed only with free controls enabled
    pub key_up_delta: i8,
    /// Brake; on the start screen this starts the first run instead
    pub space_pressed: bool,
}

/// Per-call configuration threaded into the step (no ambient globals)
#[derive(Default)]
pub struct StepConfig<'a> {
    /// Debug camera: key deltas rotate the view, the follower is bypassed
    pub free_controls: bool,
    /// Host-supplied tutorial table, if any
    pub tutorial: Option<&'a TutorialTable>,
}

/// Advance the simulation by one frame.
pub fn step(
    previous: &GameState,
    timing: FrameTiming,
    input: &InputSnapshot,
    config: &StepConfig,
) -> GameState {
    let mut g = previous.clone();
    let FrameTiming { time, tick } = timing;

    if g.time == 0.0 {
        g.start_time = time;
        g.status_changed_time = time;
        g.step_time = time;
        g.step_tick = tick;
        g.time = time;
        g.tick = tick;
    }
    let dt = (time - g.time).min(DT_MAX) as f32;
    g.time = time;
    g.tick = tick;

    if let Some(table) = config.tutorial {
        tutorial::run(&mut g, table, input);
    }

    if g.level >= 0 {
        // user in control
        if config.free_controls {
            free_camera(&mut g, input, dt);
        }
        if input.key_right_delta != 0 {
            g.switch_direction_target = f32::from(input.key_right_delta);
        }
        let brake_input = if input.space_pressed { 1.0 } else { 0.0 };
        g.braking += (brake_input - g.braking) * BRAKE_SMOOTHING;

        if g.status == Status::GameOver && g.time - g.status_changed_time > STATUS_DWELL {
            log::info!("crashed; restarting level {}", g.level);
            return g.restarted();
        }
        if g.status == Status::Finished && g.time - g.status_changed_time > STATUS_DWELL {
            log::info!("level {} complete, moving up", g.level);
            return g.leveled_up();
        }
    } else {
        // start screen, demo AI in control
        if input.space_pressed {
            log::info!("starting first run");
            return g.leveled_up();
        }
        if g.status != Status::Running
            && (g.status == Status::Finished || g.time - g.status_changed_time > DEMO_DWELL)
        {
            return g.restarted();
        }
        demo_steering(&mut g);
    }

    if g.step_index < 0 {
        g.status = Status::Finished;
        finish_tick(&mut g, previous);
        return g;
    }

    g.track_step_progress += dt * g.speed;
    if g.track_step_progress >= 1.0 && g.status == Status::Running {
        // one boundary crossing per tick, even when a frame hitch pushes
        // the progress past 2.0
        log::debug!(
            "segment boundary: step_index={} fps~{:.0}",
            g.step_index - 1,
            (tick - g.step_tick) as f64 / (g.time - g.step_time).max(1e-6)
        );
        g.step_tick = tick;
        g.step_time = time;
        g.track_step_progress = 0.0;
        g.step_index -= 1;
        let dropped = window::advance_window(&mut g.track, g.step_index, g.seed);
        intersection::resolve(&mut g, &dropped);
    }

    physics::integrate(&mut g, dt, config.free_controls);

    finish_tick(&mut g, previous);
    g
}

/// Overlay sync plus the status-change timestamp; runs on every return path
/// so the dwell timers always measure from the actual transition.
fn finish_tick(g: &mut GameState, previous: &GameState) {
    sync_ui(g);
    if previous.status != g.status {
        g.status_changed_time = g.time;
    }
}

fn sync_ui(g: &mut GameState) {
    if g.level > 0 {
        match g.status {
            Status::GameOver => {
                g.ui_state = Some(UiState {
                    title_centered: true,
                    title: "Oops!".into(),
                    body: "Remember for\nnext run".into(),
                    footer: None,
                });
            }
            Status::Finished => {
                g.ui_state = Some(UiState {
                    title_centered: true,
                    title: "YES!".into(),
                    body: "You did it!".into(),
                    footer: Some("Try a longer run...".into()),
                });
            }
            Status::Running => {}
        }
    }
}

/// Start-screen autopilot: steer onto the safe branch of an intersection,
/// otherwise re-roll the steering target periodically. Fully deterministic
/// in (seed, tick) so demo runs replay identically.
fn demo_steering(g: &mut GameState) {
    if let Some(biome) = g.track[0].intersection {
        if !correct_direction(g.switch_direction_target, &biome) {
            g.switch_direction_target = -g.switch_direction_target;
        }
    } else if g.tick % DEMO_STEER_PERIOD == 0 {
        let h = (g.tick ^ g.seed.to_bits()).wrapping_mul(0x9E3779B97F4A7C15);
        g.switch_direction_target = if (h >> 60) & 1 == 0 { -1.0 } else { 1.0 };
    }
}

/// Debug fly-cam: the key deltas drive the view directly
fn free_camera(g: &mut GameState, input: &InputSnapshot, dt: f32) {
    g.rot_y += 2.0 * dt * f32::from(input.key_right_delta);
    g.rot_x += 2.0 * dt * f32::from(input.key_up_delta);
}
