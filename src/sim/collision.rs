//! Character vs obstacle hit testing
//!
//! Both sides are reduced to axis-aligned boxes; a touch counts as a hit.

use super::character::Character;
use super::entity::Obstacle;
use crate::tuning::Tuning;

/// True iff the character's box overlaps the obstacle's box
pub fn collides(character: &Character, obstacle: &Obstacle, tuning: &Tuning) -> bool {
    character
        .bounding_box(tuning)
        .overlaps(&obstacle.bounding_box(&tuning.obstacle_extents))
}

/// First obstacle (in list order) the character is touching
pub fn first_collision<'a>(
    character: &Character,
    obstacles: &'a [Obstacle],
    tuning: &Tuning,
) -> Option<&'a Obstacle> {
    let body = character.bounding_box(tuning);
    obstacles
        .iter()
        .find(|o| body.overlaps(&o.bounding_box(&tuning.obstacle_extents)))
}
