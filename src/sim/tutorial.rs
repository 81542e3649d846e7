//! Generic tutorial step machine
//!
//! The core owns only the mechanism: an ordered table of steps, each pairing
//! an overlay with enter/leave/skip predicates and a per-tick hook. Step
//! content is host data threaded in through `StepConfig`; the crate ships no
//! steps of its own.

use super::state::{GameState, UiState};
use super::tick::InputSnapshot;

/// Predicate over the current state and this frame's input
pub type StepPredicate = fn(&GameState, &InputSnapshot) -> bool;

/// One tutorial step. `enter` installs the overlay, `leave` advances past
/// the step, `skip` advances without ever showing it.
pub struct TutorialStep {
    pub ui: UiState,
    pub enter: StepPredicate,
    pub leave: StepPredicate,
    pub skip: StepPredicate,
    /// Runs while the step's overlay is live and `leave` has not fired
    pub on_tick: fn(&mut GameState, &InputSnapshot),
}

/// Ordered step table plus the global gate deciding whether the machine
/// runs at all this frame.
pub struct TutorialTable {
    pub condition: StepPredicate,
    pub steps: Vec<TutorialStep>,
}

/// Advance the tutorial machine by one frame.
pub fn run(g: &mut GameState, table: &TutorialTable, input: &InputSnapshot) {
    if !(table.condition)(g, input) {
        return;
    }
    match table.steps.get(g.tutorial) {
        Some(step) => {
            if g.ui_state.as_ref() == Some(&step.ui) {
                // this step's overlay is already live
                if (step.leave)(g, input) {
                    g.tutorial += 1;
                } else {
                    (step.on_tick)(g, input);
                }
            } else if (step.skip)(g, input) {
                g.tutorial += 1;
            } else if (step.enter)(g, input) {
                g.ui_state = Some(step.ui.clone());
            } else {
                g.ui_state = None;
            }
        }
        None => g.ui_state = None,
    }
}
