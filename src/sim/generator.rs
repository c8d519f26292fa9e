//! Procedural obstacle rows

use glam::Vec3;
use rand::Rng;

use super::entity::Obstacle;
use super::state::GameState;
use crate::consts::{LEFTMOST_LANE, RIGHTMOST_LANE};

/// Spawn one row of trees at `z`
///
/// Each lane rolls independently against `presence_prob`, so a row holds
/// zero to three trees. Scales are uniform in `[min_scale, max_scale]`.
/// Returns the number of trees created.
pub fn spawn_row(
    state: &mut GameState,
    z: f32,
    presence_prob: f32,
    min_scale: f32,
    max_scale: f32,
) -> usize {
    let mut spawned = 0;
    for lane in LEFTMOST_LANE..=RIGHTMOST_LANE {
        let roll: f32 = state.rng.random();
        if roll >= presence_prob {
            continue;
        }
        let scale = min_scale + (max_scale - min_scale) * state.rng.random::<f32>();
        let pos = Vec3::new(state.tuning.lane_x(lane), state.tuning.obstacle_y, z);
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::new(id, pos, scale));
        spawned += 1;
    }
    log::debug!("Row at z={} spawned {} trees", z, spawned);
    spawned
}

/// Fill the track ahead of the character before the first tick
///
/// Leaves the row cursor on the farthest row so milestones line up.
pub fn populate_initial(state: &mut GameState) {
    let (first, last) = state.tuning.initial_rows;
    let spacing = state.tuning.row_spacing;
    let min_scale = state.tuning.min_scale;
    let presence = state.tunables.presence_prob;
    let max_scale = state.tunables.max_scale;

    for row in first..last {
        let z = -(row as f32) * spacing;
        spawn_row(state, z, presence, min_scale, max_scale);
        state.row_cursor_z = z;
    }
    log::info!(
        "Populated {} rows ({} trees)",
        last.saturating_sub(first),
        state.obstacles.len()
    );
}
