//! Positioned, scaled world objects and their bounding boxes

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::tuning::ObstacleExtents;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of the given half extents around `center`
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Closed-interval overlap on all three axes (touching counts)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

/// A tree standing in one lane slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Base of the trunk
    pub pos: Vec3,
    /// Uniform scale applied to the whole tree
    pub scale: f32,
}

impl Obstacle {
    pub fn new(id: u32, pos: Vec3, scale: f32) -> Self {
        Self { id, pos, scale }
    }

    /// Move toward the character by `step`
    #[inline]
    pub fn scroll(&mut self, step: f32) {
        self.pos.z += step;
    }

    /// True once the obstacle has scrolled past `removal_z`
    #[inline]
    pub fn is_past(&self, removal_z: f32) -> bool {
        self.pos.z >= removal_z
    }

    pub fn bounding_box(&self, extents: &ObstacleExtents) -> Aabb {
        let half_width = self.scale * extents.half_width;
        let half_depth = self.scale * extents.half_depth;
        Aabb {
            min: Vec3::new(self.pos.x - half_width, self.pos.y, self.pos.z - half_depth),
            max: Vec3::new(
                self.pos.x + half_width,
                self.pos.y + self.scale * extents.height,
                self.pos.z + half_depth,
            ),
        }
    }
}
