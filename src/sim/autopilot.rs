//! Idle/demo mode: a simple AI that dodges trees
//!
//! Tuned for one tick per 60 Hz frame with the default scroll speed
//! (6000 units/s). It only decides when the character is free to act.

use super::state::{GamePhase, GameState};
use super::tick::InputEvent;
use crate::consts::{LEFTMOST_LANE, RIGHTMOST_LANE};

/// How far ahead a tree in the current lane counts as a threat
const THREAT_RANGE: f32 = 3000.0;
/// Distance band in which a jump lands the apex on the tree
const JUMP_BAND: (f32, f32) = (1500.0, 2100.0);
/// Trees this far behind still block a lane we'd slide into
const REAR_CLEARANCE: f32 = 400.0;

/// Pick the next input, or `None` to keep running
pub fn choose_input(state: &GameState) -> Option<InputEvent> {
    if state.phase != GamePhase::Running {
        return None;
    }
    let character = &state.character;
    if character.is_jumping() || character.is_switching() || character.pending_actions() > 0 {
        return None;
    }

    let lane = character.lane;
    let distance = nearest_ahead(state, lane)?;
    if distance > THREAT_RANGE {
        return None;
    }

    // Prefer sidestepping; alternate preference by tick so the run doesn't drift
    let sides = if state.time_ticks % 2 == 0 {
        [(lane - 1, InputEvent::MoveLeft), (lane + 1, InputEvent::MoveRight)]
    } else {
        [(lane + 1, InputEvent::MoveRight), (lane - 1, InputEvent::MoveLeft)]
    };
    for (target, event) in sides {
        if (LEFTMOST_LANE..=RIGHTMOST_LANE).contains(&target) && lane_is_clear(state, target) {
            return Some(event);
        }
    }

    if (JUMP_BAND.0..=JUMP_BAND.1).contains(&distance) {
        return Some(InputEvent::MoveUp);
    }
    None
}

/// Distance from the character to the closest tree ahead in `lane`
fn nearest_ahead(state: &GameState, lane: i8) -> Option<f32> {
    let x = state.tuning.lane_x(lane);
    let z = state.character.pos.z;
    state
        .obstacles
        .iter()
        .filter(|o| o.pos.x == x)
        .map(|o| z - o.pos.z)
        .filter(|d| *d >= 0.0)
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
}

fn lane_is_clear(state: &GameState, lane: i8) -> bool {
    let x = state.tuning.lane_x(lane);
    let z = state.character.pos.z;
    !state
        .obstacles
        .iter()
        .filter(|o| o.pos.x == x)
        .any(|o| (-REAR_CLEARANCE..=THREAT_RANGE).contains(&(z - o.pos.z)))
}
