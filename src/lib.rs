//! Boxy Run - a three-lane endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (character, obstacles, collisions, game loop)
//! - `snapshot`: Per-frame state handed to the renderer and HUD
//! - `platform`: Browser keyboard handling
//! - `tuning`: Data-driven game balance
//! - `ranks`: Score-to-rank table shown at game over

pub mod platform;
pub mod ranks;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use ranks::Rank;
pub use snapshot::FrameSnapshot;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Lane indices run from left (-1) to right (1)
    pub const LEFTMOST_LANE: i8 = -1;
    pub const RIGHTMOST_LANE: i8 = 1;

    /// Frame length assumed by the headless demo (60 Hz)
    pub const FRAME_DT: f64 = 1.0 / 60.0;
    /// Safety cap on headless demo length
    pub const MAX_DEMO_FRAMES: u64 = 60 * 60 * 10;
}
