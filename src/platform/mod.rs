//! Platform abstraction layer
//!
//! Turns raw browser key events into the simulation's logical inputs.

pub mod keyboard;

pub use keyboard::{KeyCommand, KeyGate};
