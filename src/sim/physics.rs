//! Friction integrator and camera dynamics
//!
//! Runs every tick regardless of segment boundaries. All accumulators are
//! re-clamped to their documented ranges each tick; floating point drift
//! must never escape them.

use glam::{Mat3, Vec3};

use super::state::{AltTrackMode, GameState, Status};
use super::window::track_to_coordinates;
use crate::consts::{
    ACC_MAX, CAMERA_SMOOTHING, CRASH_SMOOTHING, FRICTION, SPEED_MAX, SWITCH_SMOOTHING,
    TRACK_SIZE,
};
use crate::smoothstep;

/// Camera orientation from the two smoothed angles. The column layout and
/// final transpose match the render contract: `transpose(Rx * Ry)`.
pub fn set_rot_matrix(rot: &mut Mat3, rot_x: f32, rot_y: f32) {
    let (sx, cx) = rot_x.sin_cos();
    let (sy, cy) = rot_y.sin_cos();
    let rx = Mat3::from_cols(
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, cx, sx),
        Vec3::new(0.0, -sx, cx),
    );
    let ry = Mat3::from_cols(
        Vec3::new(cy, 0.0, sy),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(-sy, 0.0, cy),
    );
    *rot = (rx * ry).transpose();
}

/// Advance speed, acceleration and the camera by one tick of length `dt`
/// seconds. With `free_controls` the follower is bypassed and the caller
/// owns `rot_x` / `rot_y`.
pub fn integrate(g: &mut GameState, dt: f32, free_controls: bool) {
    let track_coords = track_to_coordinates(&g.track);
    let alt_coords = track_to_coordinates(&g.alt_track);

    let descent = g.track[0].descent + 0.001;
    // frame-rate independent decay, referenced at 60 steps/sec
    let speed_friction = (1.0 - FRICTION).powf(60.0 * dt);
    let acc_friction = (1.0 - 0.2 * FRICTION).powf(60.0 * dt);

    g.acc = ((g.acc + 0.2 * descent * dt) * acc_friction).clamp(0.0, ACC_MAX);
    g.acc = (g.acc - g.braking * 0.4 * dt).clamp(0.0, ACC_MAX);
    g.speed = ((g.speed + dt * g.acc) * speed_friction).clamp(0.0, SPEED_MAX);

    if g.status == Status::GameOver {
        g.acc = 0.0;
        g.speed = (g.speed + (0.0 - g.speed) * CRASH_SMOOTHING).max(0.0);
        g.track_step_progress = 0.0;
        g.rot_x += (-0.9 - g.rot_x) * CRASH_SMOOTHING;
        g.rot_y += (track_coords[0].x.atan() + 0.7 - g.rot_y) * CRASH_SMOOTHING;
        g.zoom_out += (1.0 - g.zoom_out) * CRASH_SMOOTHING;
    } else {
        log::trace!("descent={descent:.3} acc={:.3} speed={:.3}", g.acc, g.speed);
        if !free_controls {
            let n = (TRACK_SIZE - 1).clamp(2, 3);
            let focus_on_alt = g.track[0].intersection.is_some()
                && g.alt_track_mode == AltTrackMode::CartOn
                && alt_coords.len() > n + 1;
            let coords = if focus_on_alt { &alt_coords } else { &track_coords };

            // forward look: blend between the next segment and a point a few
            // segments out, sliding with the in-segment progress
            let p = g.track_step_progress;
            let target = (1.0 - p) * coords[1] + coords[n] + p * (coords[n + 1] - coords[n]);
            let target_rot_x = (-0.4 + 0.5 * target.y / n as f32).atan();
            let target_rot_y = (0.8 * target.x / n as f32).atan();
            g.rot_x += (target_rot_x - g.rot_x) * CAMERA_SMOOTHING;
            g.rot_y += (target_rot_y - g.rot_y) * CAMERA_SMOOTHING;
        }

        g.switch_direction +=
            (g.switch_direction_target - g.switch_direction) * SWITCH_SMOOTHING;
    }

    set_rot_matrix(&mut g.rot, g.rot_x, g.rot_y);

    g.origin = Vec3::new(
        -g.zoom_out,
        0.05 + 1.5 * g.zoom_out,
        1.4 + (0.2 * g.braking - 0.2 * smoothstep(0.0, 6.0, g.speed)).min(0.0)
            - 0.2 * g.zoom_out,
    );
}
