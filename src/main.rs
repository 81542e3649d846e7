//! Track Rush headless demo driver
//!
//! Runs the simulation in demo mode at a fixed 60 Hz without a renderer
//! attached and dumps the final state as JSON - handy for eyeballing
//! determinism and profiling the core.
//!
//! Usage: `track-rush [seed] [frames]`

use track_rush::sim::{FrameTiming, GameState, InputSnapshot, StepConfig, step};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: f64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(0.42);
    let frames: u64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(3600);

    log::info!("running {frames} demo frames with seed {seed}");

    let input = InputSnapshot::default();
    let config = StepConfig::default();
    let mut state = GameState::new(seed);

    for frame in 0..frames {
        let timing = FrameTiming {
            time: frame as f64 / 60.0,
            tick: frame,
        };
        let next = step(&state, timing, &input, &config);
        if next.status != state.status {
            log::info!(
                "t={:.2}s status {:?} -> {:?} (step_index={})",
                next.time,
                state.status,
                next.status,
                next.step_index
            );
        }
        state = next;
    }

    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}
