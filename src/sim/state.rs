//! Session state and core simulation types
//!
//! One `GameState` is one run: it owns the character, the live obstacles and
//! every counter. Nothing here reads a clock or a global.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::character::Character;
use super::entity::Obstacle;
use super::generator::populate_initial;
use crate::tuning::Tuning;

/// Events kept for a host that stops draining; older ones are dropped first
pub const MAX_PENDING_EVENTS: usize = 256;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first key press (behaves like a pause)
    NotStarted,
    /// Active gameplay
    Running,
    /// Frozen by the player
    Paused,
    /// Run ended; only a reset leaves this phase
    GameOver,
}

/// Notable things that happened during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    /// A new difficulty tier took effect
    TierReached {
        level: u32,
        presence_prob: f32,
        max_scale: f32,
    },
    FogChanged { distance: f32 },
    GameOver { final_score: u64 },
}

/// Tunables that ramp with difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tunables {
    pub presence_prob: f32,
    pub max_scale: f32,
    /// Far plane of the fog; the renderer's visibility distance
    pub fog_distance: f32,
}

impl Tunables {
    fn initial(tuning: &Tuning) -> Self {
        Self {
            presence_prob: tuning.initial_presence_prob,
            max_scale: tuning.initial_max_scale,
            fog_distance: tuning.initial_fog,
        }
    }
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Monotonic; frozen at game over
    pub score: u64,
    /// Row milestones passed so far
    pub difficulty: u32,
    pub tunables: Tunables,
    /// Simulated (non-paused) ticks
    pub time_ticks: u64,
    pub character: Character,
    /// Live trees, in spawn order
    pub obstacles: Vec<Obstacle>,
    /// z of the most recently spawned row, scrolled with the trees
    ///
    /// Tracked separately so an empty row still marks a milestone.
    pub row_cursor_z: f32,
    /// Trees that scrolled past and were removed
    pub obstacles_retired: u64,
    /// Set once, on the colliding tick
    pub final_score: Option<u64>,
    #[serde(skip)]
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a session with the shipped balance
    pub fn new(seed: u64, now: f64) -> Self {
        Self::with_tuning(seed, now, Tuning::default())
    }

    /// Create a session with a custom balance
    ///
    /// `tuning` is expected to have passed `Tuning::validate`.
    pub fn with_tuning(seed: u64, now: f64, tuning: Tuning) -> Self {
        let character = Character::new(now, &tuning);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tunables: Tunables::initial(&tuning),
            phase: GamePhase::NotStarted,
            score: 0,
            difficulty: 0,
            time_ticks: 0,
            character,
            obstacles: Vec::new(),
            row_cursor_z: tuning.spawn_z,
            obstacles_retired: 0,
            final_score: None,
            events: Vec::new(),
            next_id: 1,
            tuning,
        };

        populate_initial(&mut state);
        log::info!("New session (seed {})", seed);
        state
    }

    /// Start over with a new seed, keeping the balance
    pub fn reset(&mut self, seed: u64, now: f64) {
        let tuning = std::mem::take(&mut self.tuning);
        *self = Self::with_tuning(seed, now, tuning);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.phase, GamePhase::NotStarted | GamePhase::Paused)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    /// Take every event recorded since the last drain
    ///
    /// Hosts should drain once per frame. Only the newest
    /// `MAX_PENDING_EVENTS` are kept otherwise.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_waiting() {
        let state = GameState::new(1, 0.0);
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert!(state.is_paused());
        assert_eq!(state.score, 0);
        assert_eq!(state.tunables.fog_distance, 40_000.0);
        assert!(!state.obstacles.is_empty());
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = GameState::new(99, 0.0);
        let b = GameState::new(99, 5.0);
        let za: Vec<_> = a.obstacles.iter().map(|o| (o.pos, o.scale)).collect();
        let zb: Vec<_> = b.obstacles.iter().map(|o| (o.pos, o.scale)).collect();
        assert_eq!(za, zb);
    }

    #[test]
    fn test_undrained_events_are_capped() {
        let mut state = GameState::new(1, 0.0);
        for score in 0..(MAX_PENDING_EVENTS as u64 + 10) {
            state.push_event(GameEvent::GameOver { final_score: score });
        }
        let events = state.drain_events();
        assert_eq!(events.len(), MAX_PENDING_EVENTS);
        assert_eq!(events[0], GameEvent::GameOver { final_score: 10 });
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_reset_keeps_tuning() {
        let mut tuning = Tuning::default();
        tuning.score_per_tick = 3;
        let mut state = GameState::with_tuning(1, 0.0, tuning);
        state.score = 500;
        state.phase = GamePhase::GameOver;
        state.reset(2, 10.0);
        assert_eq!(state.seed, 2);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert_eq!(state.tuning.score_per_tick, 3);
    }

    #[test]
    fn test_serializes() {
        let state = GameState::new(5, 0.0);
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.obstacles.len(), state.obstacles.len());
    }
}
