//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time is passed in, never read
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod character;
pub mod collision;
pub mod entity;
pub mod generator;
pub mod oscillator;
pub mod state;
pub mod tick;

pub use character::{Action, Character, Joint, JointPose, Motion, Pose};
pub use collision::{collides, first_collision};
pub use entity::{Aabb, Obstacle};
pub use generator::{populate_initial, spawn_row};
pub use oscillator::oscillate;
pub use state::{GameEvent, GamePhase, GameState, MAX_PENDING_EVENTS, Tunables};
pub use tick::{InputEvent, TickInput, apply_input, tick};
