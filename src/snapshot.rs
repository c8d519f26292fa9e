//! Per-frame view of the simulation for the renderer and HUD
//!
//! Consumers only read this; it is rebuilt from `GameState` every frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::sim::{GamePhase, GameState, Pose};

/// Transform of one tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: u32,
    pub position: Vec3,
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub character: Pose,
    pub lane: i8,
    pub obstacles: Vec<ObstacleView>,
    pub fog_distance: f32,
    pub paused: bool,
    pub game_over: bool,
    pub score: u64,
    pub difficulty: u32,
    pub final_score: Option<u64>,
}

impl FrameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            character: state.character.pose(),
            lane: state.character.lane,
            obstacles: state
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    position: o.pos,
                    scale: o.scale,
                })
                .collect(),
            fog_distance: state.tunables.fog_distance,
            paused: matches!(state.phase, GamePhase::NotStarted | GamePhase::Paused),
            game_over: state.phase == GamePhase::GameOver,
            score: state.score,
            difficulty: state.difficulty,
            final_score: state.final_score,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
