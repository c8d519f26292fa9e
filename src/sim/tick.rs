//! Per-frame simulation tick
//!
//! Core game loop that advances the world one rendered frame at a time.
//! Within a tick the order is fixed: scroll, difficulty/spawn, character,
//! collision, score.

use serde::{Deserialize, Serialize};

use super::character::Action;
use super::collision::first_collision;
use super::generator::spawn_row;
use super::state::{GameEvent, GamePhase, GameState};

/// Logical player inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    MoveUp,
    MoveLeft,
    MoveRight,
    TogglePause,
}

/// Input collected since the previous frame, applied in order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub events: Vec<InputEvent>,
}

impl TickInput {
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// Apply one input event immediately
///
/// While waiting or paused, any input resumes the run and is otherwise
/// consumed. Movement is queued on the character and only acted on by the
/// next tick. Everything is ignored after game over.
pub fn apply_input(state: &mut GameState, event: InputEvent, now: f64) {
    match state.phase {
        GamePhase::GameOver => {}
        GamePhase::NotStarted | GamePhase::Paused => {
            let first = state.phase == GamePhase::NotStarted;
            state.phase = GamePhase::Running;
            state.character.on_unpause(now);
            if first {
                log::info!("Run started");
                state.push_event(GameEvent::Started);
            } else {
                log::info!("Resumed at score {}", state.score);
                state.push_event(GameEvent::Resumed);
            }
        }
        GamePhase::Running => match event {
            InputEvent::TogglePause => {
                state.phase = GamePhase::Paused;
                state.character.on_pause(now);
                log::info!("Paused at score {}", state.score);
                state.push_event(GameEvent::Paused);
            }
            InputEvent::MoveUp => state.character.enqueue(Action::Up),
            InputEvent::MoveLeft => state.character.enqueue(Action::Left),
            InputEvent::MoveRight => state.character.enqueue(Action::Right),
        },
    }
}

/// Advance the session by one frame at time `now` (seconds)
///
/// Returns true if the world was simulated; paused, waiting and finished
/// sessions only apply their input.
pub fn tick(state: &mut GameState, input: &TickInput, now: f64) -> bool {
    for &event in &input.events {
        apply_input(state, event, now);
    }

    if state.phase != GamePhase::Running {
        return false;
    }

    state.time_ticks += 1;

    scroll_world(state);
    advance_difficulty(state);

    let tuning = &state.tuning;
    state.character.update(now, tuning);

    let hit = first_collision(&state.character, &state.obstacles, &state.tuning).map(|o| o.id);
    if let Some(hit_id) = hit {
        end_run(state, hit_id);
        return true;
    }

    state.score = state.score.saturating_add(state.tuning.score_per_tick);
    true
}

/// Move every tree and the row cursor toward the character, retiring the
/// trees that have scrolled past
fn scroll_world(state: &mut GameState) {
    let step = state.tuning.scroll_step;
    let removal_z = state.tuning.removal_z;

    for obstacle in &mut state.obstacles {
        obstacle.scroll(step);
    }
    state.row_cursor_z += step;

    let before = state.obstacles.len();
    state.obstacles.retain(|o| !o.is_past(removal_z));
    state.obstacles_retired += (before - state.obstacles.len()) as u64;
}

/// On each row milestone: bump difficulty, apply tier and fog schedules,
/// then spawn the next row at the far boundary
fn advance_difficulty(state: &mut GameState) {
    if state.row_cursor_z % state.tuning.row_spacing != 0.0 {
        return;
    }

    state.difficulty += 1;
    let difficulty = state.difficulty;
    let level_length = state.tuning.level_length;

    if level_length > 0 && difficulty % level_length == 0 {
        let level = difficulty / level_length;
        let tier = state.tuning.tier(level);
        state.tunables.presence_prob = tier.presence_prob;
        state.tunables.max_scale = tier.max_scale;
        log::info!(
            "Tier {}: presence {:.2}, max scale {:.2}",
            level,
            tier.presence_prob,
            tier.max_scale
        );
        state.push_event(GameEvent::TierReached {
            level,
            presence_prob: tier.presence_prob,
            max_scale: tier.max_scale,
        });
    }

    let reduction = state.tuning.fog_reduction(difficulty);
    if reduction != 0.0 {
        let distance = (state.tunables.fog_distance - reduction).max(0.0);
        state.tunables.fog_distance = distance;
        state.push_event(GameEvent::FogChanged { distance });
    }

    let spawn_z = state.tuning.spawn_z;
    let min_scale = state.tuning.min_scale;
    let presence = state.tunables.presence_prob;
    let max_scale = state.tunables.max_scale;
    spawn_row(state, spawn_z, presence, min_scale, max_scale);
    state.row_cursor_z = spawn_z;
}

fn end_run(state: &mut GameState, hit_id: u32) {
    state.phase = GamePhase::GameOver;
    state.final_score = Some(state.score);
    log::info!(
        "Game over: hit tree {} at difficulty {}, final score {}",
        hit_id,
        state.difficulty,
        state.score
    );
    state.push_event(GameEvent::GameOver {
        final_score: state.score,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Obstacle;
    use crate::tuning::Tuning;
    use glam::Vec3;

    const FRAME: f64 = 1.0 / 60.0;

    fn clear_track() -> Tuning {
        let mut tuning = Tuning::default();
        tuning.initial_presence_prob = 0.0;
        for tier in &mut tuning.tiers {
            tier.presence_prob = 0.0;
        }
        tuning
    }

    fn started(tuning: Tuning) -> GameState {
        let mut state = GameState::with_tuning(1, 0.0, tuning);
        apply_input(&mut state, InputEvent::TogglePause, 0.0);
        state
    }

    #[test]
    fn test_first_input_starts_without_queueing() {
        let mut state = GameState::new(1, 0.0);
        let input = TickInput {
            events: vec![InputEvent::MoveLeft],
        };
        assert!(tick(&mut state, &input, 0.0));
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.character.pending_actions(), 0);
        assert_eq!(state.drain_events(), vec![GameEvent::Started]);
    }

    #[test]
    fn test_waiting_session_does_not_simulate() {
        let mut state = GameState::new(1, 0.0);
        let before: Vec<f32> = state.obstacles.iter().map(|o| o.pos.z).collect();
        assert!(!tick(&mut state, &TickInput::default(), 1.0));
        let after: Vec<f32> = state.obstacles.iter().map(|o| o.pos.z).collect();
        assert_eq!(before, after);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_pause_toggle() {
        let mut state = started(clear_track());
        let pause = TickInput {
            events: vec![InputEvent::TogglePause],
        };
        tick(&mut state, &TickInput::default(), FRAME);
        tick(&mut state, &pause, 2.0 * FRAME);
        assert_eq!(state.phase, GamePhase::Paused);
        let score = state.score;

        tick(&mut state, &TickInput::default(), 3.0 * FRAME);
        assert_eq!(state.score, score);

        tick(&mut state, &pause, 4.0 * FRAME);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, score + 10);
    }

    #[test]
    fn test_pause_freezes_the_world() {
        let mut state = started(clear_track());
        let id = state.next_entity_id();
        state
            .obstacles
            .push(Obstacle::new(id, Vec3::new(800.0, -400.0, -60_000.0), 0.5));
        let pause = TickInput {
            events: vec![InputEvent::TogglePause],
        };
        tick(&mut state, &TickInput::default(), FRAME);
        tick(&mut state, &pause, 2.0 * FRAME);
        assert_eq!(state.phase, GamePhase::Paused);

        let positions: Vec<Vec3> = state.obstacles.iter().map(|o| o.pos).collect();
        let cursor = state.row_cursor_z;
        let difficulty = state.difficulty;
        let ticks = state.time_ticks;

        // Long enough to cross a row milestone if anything still scrolled
        for i in 3..63 {
            assert!(!tick(&mut state, &TickInput::default(), i as f64 * FRAME));
        }
        assert_eq!(
            state.obstacles.iter().map(|o| o.pos).collect::<Vec<_>>(),
            positions
        );
        assert_eq!(state.row_cursor_z, cursor);
        assert_eq!(state.difficulty, difficulty);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_long_pause_keeps_jump_in_flight() {
        let mut state = started(clear_track());
        let jump = TickInput {
            events: vec![InputEvent::MoveUp],
        };
        tick(&mut state, &jump, FRAME);
        assert!(state.character.is_jumping());

        // Paused when the page hid, resumed ten seconds later
        apply_input(&mut state, InputEvent::TogglePause, 0.1);
        let resume = TickInput {
            events: vec![InputEvent::MoveLeft],
        };
        assert!(tick(&mut state, &resume, 10.0));
        tick(&mut state, &TickInput::default(), 10.0 + FRAME);
        assert!(state.character.is_jumping());
        assert!(state.character.pos.y > 500.0);
    }

    #[test]
    fn test_score_per_tick() {
        let mut state = started(clear_track());
        for i in 0..25 {
            tick(&mut state, &TickInput::default(), i as f64 * FRAME);
        }
        assert_eq!(state.score, 250);
        assert_eq!(state.time_ticks, 25);
    }

    #[test]
    fn test_difficulty_every_row() {
        let mut state = started(clear_track());
        // The cursor starts on the spawn boundary; the next milestone is 30 ticks away
        for i in 0..29 {
            tick(&mut state, &TickInput::default(), i as f64 * FRAME);
        }
        assert_eq!(state.difficulty, 0);
        tick(&mut state, &TickInput::default(), 0.5);
        assert_eq!(state.difficulty, 1);
        assert_eq!(state.row_cursor_z, -120_000.0);
    }

    #[test]
    fn test_tier_applies_at_level_length() {
        let mut state = started(clear_track());
        for i in 0..(30 * 30) {
            tick(&mut state, &TickInput::default(), i as f64 * FRAME);
        }
        assert_eq!(state.difficulty, 30);
        let tiers: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::TierReached { .. }))
            .collect();
        assert_eq!(tiers.len(), 1);
        assert_eq!(state.tunables.max_scale, 0.5);
    }

    #[test]
    fn test_collision_ends_run() {
        let mut state = started(clear_track());
        let id = state.next_entity_id();
        state
            .obstacles
            .push(Obstacle::new(id, Vec3::new(0.0, -400.0, -4100.0), 0.5));

        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, 0);
        assert_eq!(state.final_score, Some(0));

        let input = TickInput {
            events: vec![InputEvent::TogglePause, InputEvent::MoveUp],
        };
        assert!(!tick(&mut state, &input, 2.0 * FRAME));
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.character.pending_actions(), 0);
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            vec![InputEvent::MoveUp],
            vec![],
            vec![InputEvent::MoveLeft],
            vec![InputEvent::MoveRight, InputEvent::MoveRight],
            vec![],
        ];
        let mut state1 = GameState::new(99999, 0.0);
        let mut state2 = GameState::new(99999, 0.0);

        for (i, events) in inputs.iter().cycle().take(400).enumerate() {
            let input = TickInput {
                events: events.clone(),
            };
            let now = i as f64 * FRAME;
            tick(&mut state1, &input, now);
            tick(&mut state2, &input, now);
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.character.pos, state2.character.pos);
        assert_eq!(state1.obstacles.len(), state2.obstacles.len());
    }
}
