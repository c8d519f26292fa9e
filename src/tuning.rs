//! Data-driven game balance
//!
//! Every gameplay number lives here so a host can load an alternative
//! balance from JSON. `Tuning::default()` is the shipped game.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f64,
    },

    #[error("spawn_z {spawn_z} is not a multiple of row_spacing {row_spacing}")]
    MisalignedSpawn { spawn_z: f32, row_spacing: f32 },

    #[error("row_spacing {row_spacing} is not a multiple of scroll_step {scroll_step}")]
    MisalignedScroll { row_spacing: f32, scroll_step: f32 },

    #[error("tier table must contain at least one tier")]
    EmptyTierTable,

    #[error("fog step {index} has an empty difficulty range")]
    EmptyFogRange { index: usize },
}

/// Obstacle density and size reached at a difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierTunables {
    /// Chance that a lane slot in a new row holds an obstacle
    pub presence_prob: f32,
    /// Upper bound of the uniform obstacle scale draw
    pub max_scale: f32,
}

/// Linear fog reduction applied over a half-open difficulty range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FogStep {
    /// First difficulty value (inclusive) that reduces the fog
    pub from: u32,
    /// Difficulty value (exclusive) where the reduction stops
    pub until: u32,
    /// Total distance removed across the whole range
    pub reduction: f32,
}

impl FogStep {
    /// Distance removed on each difficulty increment inside the range
    pub fn per_increment(&self) -> f32 {
        self.reduction / self.until.saturating_sub(self.from).max(1) as f32
    }

    pub fn contains(&self, difficulty: u32) -> bool {
        (self.from..self.until).contains(&difficulty)
    }
}

/// Axis-aligned extents of an obstacle at scale 1.0
///
/// The box is centered on the obstacle in x and z and rises from its base in y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleExtents {
    pub half_width: f32,
    pub height: f32,
    pub half_depth: f32,
}

/// Complete balance sheet for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Track ===
    /// Distance between lane centerlines
    pub lane_width: f32,
    /// Forward distance obstacles travel per tick
    pub scroll_step: f32,
    /// Forward distance between obstacle rows
    pub row_spacing: f32,
    /// z of the far boundary where new rows appear
    pub spawn_z: f32,
    /// Obstacles at or beyond this z are retired
    pub removal_z: f32,
    /// Row indices (exclusive end) populated before the first tick
    ///
    /// The last row should sit on `spawn_z` so spawned rows continue the spacing.
    pub initial_rows: (u32, u32),
    /// Base height of every obstacle
    pub obstacle_y: f32,
    pub obstacle_extents: ObstacleExtents,

    // === Difficulty ===
    pub initial_presence_prob: f32,
    pub initial_max_scale: f32,
    /// Lower bound of the scale draw at every tier
    pub min_scale: f32,
    /// Difficulty increments per tier
    pub level_length: u32,
    /// Tunables for tier 1, 2, ...; the last entry repeats forever
    pub tiers: Vec<TierTunables>,
    pub initial_fog: f32,
    pub fog_steps: Vec<FogStep>,
    pub score_per_tick: u64,

    // === Character ===
    /// Fixed z the character runs at
    pub character_z: f32,
    /// Jump length in seconds
    pub jump_duration: f64,
    /// Jump apex above the running bob
    pub jump_height: f32,
    /// Full gait cycles per second
    pub step_freq: f64,
    /// Horizontal distance covered per tick while switching lanes
    pub lane_switch_step: f32,
    /// Character box corners relative to its position
    pub character_box_min: Vec3,
    pub character_box_max: Vec3,
}

impl Default for Tuning {
    fn default() -> Self {
        let tier = |presence_prob, max_scale| TierTunables {
            presence_prob,
            max_scale,
        };
        Self {
            lane_width: 800.0,
            scroll_step: 100.0,
            row_spacing: 3000.0,
            spawn_z: -120_000.0,
            removal_z: 0.0,
            initial_rows: (10, 41),
            obstacle_y: -400.0,
            obstacle_extents: ObstacleExtents {
                half_width: 250.0,
                height: 1150.0,
                half_depth: 250.0,
            },

            initial_presence_prob: 0.2,
            initial_max_scale: 0.5,
            min_scale: 0.5,
            level_length: 30,
            tiers: vec![
                tier(0.35, 0.5),
                tier(0.35, 0.85),
                tier(0.5, 0.85),
                tier(0.5, 1.1),
                tier(0.5, 1.1),
                tier(0.55, 1.1),
                tier(0.55, 1.25),
            ],
            initial_fog: 40_000.0,
            fog_steps: vec![
                FogStep {
                    from: 150,
                    until: 180,
                    reduction: 25_000.0,
                },
                FogStep {
                    from: 240,
                    until: 270,
                    reduction: 5_000.0,
                },
            ],
            score_per_tick: 10,

            character_z: -4000.0,
            jump_duration: 0.6,
            jump_height: 2000.0,
            step_freq: 2.0,
            lane_switch_step: 200.0,
            character_box_min: Vec3::new(-115.0, -310.0, -40.0),
            character_box_max: Vec3::new(115.0, 320.0, 40.0),
        }
    }
}

impl Tuning {
    /// Parse a tuning file, filling missing fields from the defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!(
            "Loaded tuning: {} tiers, row spacing {}",
            tuning.tiers.len(),
            tuning.row_spacing
        );
        Ok(tuning)
    }

    /// Tunables for a tier (1-based); tiers past the table reuse its last row
    pub fn tier(&self, level: u32) -> TierTunables {
        let index = (level.max(1) - 1) as usize;
        self.tiers
            .get(index)
            .or_else(|| self.tiers.last())
            .copied()
            .unwrap_or(TierTunables {
                presence_prob: self.initial_presence_prob,
                max_scale: self.initial_max_scale,
            })
    }

    /// Fog distance removed when difficulty reaches `difficulty`
    pub fn fog_reduction(&self, difficulty: u32) -> f32 {
        self.fog_steps
            .iter()
            .filter(|step| step.contains(difficulty))
            .map(FogStep::per_increment)
            .sum()
    }

    /// x of a lane's centerline
    #[inline]
    pub fn lane_x(&self, lane: i8) -> f32 {
        lane as f32 * self.lane_width
    }

    /// Reject balance sheets that would break the simulation's invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("lane_width", self.lane_width as f64)?;
        positive("scroll_step", self.scroll_step as f64)?;
        positive("row_spacing", self.row_spacing as f64)?;
        positive("jump_duration", self.jump_duration)?;
        positive("step_freq", self.step_freq)?;
        positive("lane_switch_step", self.lane_switch_step as f64)?;
        positive("level_length", self.level_length as f64)?;

        if self.row_spacing % self.scroll_step != 0.0 {
            return Err(TuningError::MisalignedScroll {
                row_spacing: self.row_spacing,
                scroll_step: self.scroll_step,
            });
        }
        if self.spawn_z % self.row_spacing != 0.0 {
            return Err(TuningError::MisalignedSpawn {
                spawn_z: self.spawn_z,
                row_spacing: self.row_spacing,
            });
        }

        if self.tiers.is_empty() {
            return Err(TuningError::EmptyTierTable);
        }
        probability("initial_presence_prob", self.initial_presence_prob)?;
        at_least("initial_max_scale", self.initial_max_scale, self.min_scale)?;
        for tier in &self.tiers {
            probability("tiers.presence_prob", tier.presence_prob)?;
            at_least("tiers.max_scale", tier.max_scale, self.min_scale)?;
        }

        for (index, step) in self.fog_steps.iter().enumerate() {
            if step.until <= step.from {
                return Err(TuningError::EmptyFogRange { index });
            }
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            expected: "a positive finite number",
            value,
        })
    }
}

fn probability(field: &'static str, value: f32) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            expected: "within [0, 1]",
            value: value as f64,
        })
    }
}

fn at_least(field: &'static str, value: f32, min: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= min {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            expected: "at least min_scale",
            value: value as f64,
        })
    }
}
