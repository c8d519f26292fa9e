//! Keyboard gating: held-key suppression and key-code mapping
//!
//! Browsers repeat `keydown` while a key is held; a key only fires again
//! after its `keyup`. Losing focus forgets every held key so nothing sticks.

use std::collections::HashSet;

use crate::sim::{GamePhase, InputEvent};

pub const KEY_LEFT: u32 = 37;
pub const KEY_UP: u32 = 38;
pub const KEY_RIGHT: u32 = 39;
pub const KEY_DOWN: u32 = 40;
pub const KEY_P: u32 = 80;
/// Codes at or below this are modifiers (shift, ctrl, alt) and never resume
const LAST_MODIFIER: u32 = 18;

/// What a key press asks the host to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Input(InputEvent),
    /// Start a new session (only offered after game over)
    Reset,
}

#[derive(Debug, Default)]
pub struct KeyGate {
    held: HashSet<u32>,
}

impl KeyGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a `keydown` to a command for the current phase
    pub fn key_down(&mut self, code: u32, phase: GamePhase) -> Option<KeyCommand> {
        if phase == GamePhase::GameOver {
            return (code == KEY_DOWN).then_some(KeyCommand::Reset);
        }
        if !self.held.insert(code) {
            return None;
        }

        let event = match phase {
            GamePhase::NotStarted | GamePhase::Paused => {
                (code > LAST_MODIFIER).then_some(InputEvent::TogglePause)
            }
            _ => match code {
                KEY_P => Some(InputEvent::TogglePause),
                KEY_UP => Some(InputEvent::MoveUp),
                KEY_LEFT => Some(InputEvent::MoveLeft),
                KEY_RIGHT => Some(InputEvent::MoveRight),
                _ => None,
            },
        };
        event.map(KeyCommand::Input)
    }

    pub fn key_up(&mut self, code: u32) {
        self.held.remove(&code);
    }

    /// Forget held keys (window focus changed)
    pub fn clear(&mut self) {
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_key_fires_once() {
        let mut gate = KeyGate::new();
        let first = gate.key_down(KEY_LEFT, GamePhase::Running);
        assert_eq!(first, Some(KeyCommand::Input(InputEvent::MoveLeft)));
        assert_eq!(gate.key_down(KEY_LEFT, GamePhase::Running), None);
        gate.key_up(KEY_LEFT);
        assert_eq!(
            gate.key_down(KEY_LEFT, GamePhase::Running),
            Some(KeyCommand::Input(InputEvent::MoveLeft))
        );
    }

    #[test]
    fn test_any_key_resumes() {
        let mut gate = KeyGate::new();
        assert_eq!(
            gate.key_down(65, GamePhase::NotStarted),
            Some(KeyCommand::Input(InputEvent::TogglePause))
        );
        assert_eq!(gate.key_down(16, GamePhase::Paused), None);
    }

    #[test]
    fn test_game_over_only_resets() {
        let mut gate = KeyGate::new();
        assert_eq!(gate.key_down(KEY_UP, GamePhase::GameOver), None);
        assert_eq!(
            gate.key_down(KEY_DOWN, GamePhase::GameOver),
            Some(KeyCommand::Reset)
        );
    }

    #[test]
    fn test_clear_releases_keys() {
        let mut gate = KeyGate::new();
        gate.key_down(KEY_UP, GamePhase::Running);
        gate.clear();
        assert_eq!(
            gate.key_down(KEY_UP, GamePhase::Running),
            Some(KeyCommand::Input(InputEvent::MoveUp))
        );
    }
}
