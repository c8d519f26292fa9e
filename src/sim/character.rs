//! The runner: lane/jump state machine and gait animation
//!
//! All timing is driven by the `now` argument (seconds). The character never
//! reads a clock, so the same inputs always produce the same pose.

use std::collections::VecDeque;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entity::Aabb;
use super::oscillator::oscillate;
use crate::consts::{LEFTMOST_LANE, RIGHTMOST_LANE};
use crate::tuning::Tuning;

/// A queued player command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Up,
    Left,
    Right,
}

/// What the character is doing on top of running
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    /// Base gait, accepts the next queued action
    Running,
    /// Airborne; gait pose frozen at takeoff
    Jumping { start_time: f64 },
    /// Sliding one lane toward -x while the gait continues
    SwitchingLeft,
    /// Sliding one lane toward +x while the gait continues
    SwitchingRight,
}

/// Articulated body parts, in depth-first build order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Joint {
    Head,
    Torso,
    LeftArm,
    RightArm,
    LeftLowerArm,
    RightLowerArm,
    LeftLeg,
    RightLeg,
    LeftLowerLeg,
    RightLowerLeg,
}

impl Joint {
    pub const COUNT: usize = 10;

    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::Head,
        Joint::Torso,
        Joint::LeftArm,
        Joint::RightArm,
        Joint::LeftLowerArm,
        Joint::RightLowerArm,
        Joint::LeftLeg,
        Joint::RightLeg,
        Joint::LeftLowerLeg,
        Joint::RightLowerLeg,
    ];

    /// Joint this one hangs from (`None` = character root)
    pub fn parent(self) -> Option<Joint> {
        match self {
            Joint::LeftLowerArm => Some(Joint::LeftArm),
            Joint::RightLowerArm => Some(Joint::RightArm),
            Joint::LeftLowerLeg => Some(Joint::LeftLeg),
            Joint::RightLowerLeg => Some(Joint::RightLeg),
            _ => None,
        }
    }

    /// Pivot position relative to the parent
    pub fn offset(self) -> Vec3 {
        match self {
            Joint::Head => Vec3::new(0.0, 260.0, -25.0),
            Joint::Torso => Vec3::new(0.0, 100.0, 0.0),
            Joint::LeftArm => Vec3::new(-100.0, 190.0, -10.0),
            Joint::RightArm => Vec3::new(100.0, 190.0, -10.0),
            Joint::LeftLowerArm | Joint::RightLowerArm => Vec3::new(0.0, -170.0, 0.0),
            Joint::LeftLeg => Vec3::new(-50.0, -10.0, 30.0),
            Joint::RightLeg => Vec3::new(50.0, -10.0, 30.0),
            Joint::LeftLowerLeg | Joint::RightLowerLeg => Vec3::new(0.0, -200.0, 0.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Joint::Head => "head",
            Joint::Torso => "torso",
            Joint::LeftArm => "left_arm",
            Joint::RightArm => "right_arm",
            Joint::LeftLowerArm => "left_lower_arm",
            Joint::RightLowerArm => "right_lower_arm",
            Joint::LeftLeg => "left_leg",
            Joint::RightLeg => "right_leg",
            Joint::LeftLowerLeg => "left_lower_leg",
            Joint::RightLowerLeg => "right_lower_leg",
        }
    }

    /// Swing curve for this joint (degrees)
    fn gait(self) -> GaitCurve {
        let curve = |cycles, min, max, phase| GaitCurve {
            cycles,
            min,
            max,
            phase,
        };
        match self {
            Joint::Head => curve(2.0, -10.0, -5.0, 0.0),
            Joint::Torso => curve(2.0, -10.0, -5.0, 180.0),
            Joint::LeftArm => curve(1.0, -70.0, 50.0, 180.0),
            Joint::RightArm => curve(1.0, -70.0, 50.0, 0.0),
            Joint::LeftLowerArm => curve(1.0, 70.0, 140.0, 180.0),
            Joint::RightLowerArm => curve(1.0, 70.0, 140.0, 0.0),
            Joint::LeftLeg => curve(1.0, -20.0, 80.0, 0.0),
            Joint::RightLeg => curve(1.0, -20.0, 80.0, 180.0),
            Joint::LeftLowerLeg => curve(1.0, -130.0, 5.0, 240.0),
            Joint::RightLowerLeg => curve(1.0, -130.0, 5.0, 60.0),
        }
    }
}

/// One row of the gait table; `cycles` multiplies the step frequency
#[derive(Debug, Clone, Copy)]
struct GaitCurve {
    cycles: f64,
    min: f64,
    max: f64,
    phase: f64,
}

impl GaitCurve {
    fn sample(&self, step_freq: f64, time: f64) -> f64 {
        oscillate(self.cycles * step_freq, self.min, self.max, self.phase, time)
    }
}

/// Vertical bob: two bounces per stride
const BOB: GaitCurve = GaitCurve {
    cycles: 2.0,
    min: 0.0,
    max: 20.0,
    phase: 0.0,
};

/// Flat joint entry handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointPose {
    pub joint: Joint,
    pub parent: Option<Joint>,
    pub offset: Vec3,
    /// Rotation about the x axis, radians
    pub rotation_x: f32,
}

/// Everything needed to draw the character this frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub joints: Vec<JointPose>,
}

/// The player-controlled runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub pos: Vec3,
    /// Lane index in `LEFTMOST_LANE..=RIGHTMOST_LANE`
    pub lane: i8,
    pub motion: Motion,
    /// Gait clock origin; running time is `now - running_origin`
    running_origin: f64,
    pause_start: f64,
    queue: VecDeque<Action>,
    /// Current rotation per joint, radians, indexed like `Joint::ALL`
    rotations: [f32; Joint::COUNT],
}

impl Character {
    /// Create a character standing in the middle lane
    ///
    /// The character starts paused at `now`: the gait clock only runs once
    /// `on_unpause` is called.
    pub fn new(now: f64, tuning: &Tuning) -> Self {
        Self {
            pos: Vec3::new(0.0, 0.0, tuning.character_z),
            lane: 0,
            motion: Motion::Running,
            running_origin: now,
            pause_start: now,
            queue: VecDeque::new(),
            rotations: [0.0; Joint::COUNT],
        }
    }

    /// Queue an action for the next time the character is free
    pub fn enqueue(&mut self, action: Action) {
        self.queue.push_back(action);
    }

    pub fn pending_actions(&self) -> usize {
        self.queue.len()
    }

    pub fn is_jumping(&self) -> bool {
        matches!(self.motion, Motion::Jumping { .. })
    }

    pub fn is_switching(&self) -> bool {
        matches!(self.motion, Motion::SwitchingLeft | Motion::SwitchingRight)
    }

    /// Seconds of running time at `now` (pauses and completed jumps excluded)
    pub fn running_clock(&self, now: f64) -> f64 {
        (now - self.running_origin).max(0.0)
    }

    pub fn rotation(&self, joint: Joint) -> f32 {
        self.rotations[joint as usize]
    }

    /// Advance the state machine and pose to `now`
    pub fn update(&mut self, now: f64, tuning: &Tuning) {
        if self.motion == Motion::Running {
            if let Some(action) = self.queue.pop_front() {
                self.begin(action, now);
            }
        }

        if let Motion::Jumping { start_time } = self.motion {
            let jump_clock = (now - start_time).max(0.0);
            let arc_clock = jump_clock.min(tuning.jump_duration);
            let arc = (std::f64::consts::PI * arc_clock / tuning.jump_duration).sin();
            let takeoff_bob = BOB.sample(tuning.step_freq, start_time - self.running_origin);
            self.pos.y = tuning.jump_height * arc as f32 + takeoff_bob as f32;

            if jump_clock > tuning.jump_duration {
                self.motion = Motion::Running;
                self.running_origin += tuning.jump_duration;
            }
            return;
        }

        let running_clock = self.running_clock(now);
        self.pos.y = BOB.sample(tuning.step_freq, running_clock) as f32;
        for joint in Joint::ALL {
            let degrees = joint.gait().sample(tuning.step_freq, running_clock);
            self.rotations[joint as usize] = degrees.to_radians() as f32;
        }

        match self.motion {
            Motion::SwitchingLeft => {
                self.pos.x -= tuning.lane_switch_step;
                if tuning.lane_x(self.lane) - self.pos.x > tuning.lane_width {
                    self.finish_switch(self.lane - 1, tuning);
                }
            }
            Motion::SwitchingRight => {
                self.pos.x += tuning.lane_switch_step;
                if self.pos.x - tuning.lane_x(self.lane) > tuning.lane_width {
                    self.finish_switch(self.lane + 1, tuning);
                }
            }
            _ => {}
        }
    }

    /// Activate a dequeued action; boundary lane moves are dropped
    fn begin(&mut self, action: Action, now: f64) {
        self.motion = match action {
            Action::Up => Motion::Jumping { start_time: now },
            Action::Left if self.lane > LEFTMOST_LANE => Motion::SwitchingLeft,
            Action::Right if self.lane < RIGHTMOST_LANE => Motion::SwitchingRight,
            Action::Left | Action::Right => {
                log::debug!("Ignoring {:?} at lane {}", action, self.lane);
                Motion::Running
            }
        };
    }

    fn finish_switch(&mut self, lane: i8, tuning: &Tuning) {
        self.lane = lane.clamp(LEFTMOST_LANE, RIGHTMOST_LANE);
        self.pos.x = tuning.lane_x(self.lane);
        self.motion = Motion::Running;
        log::debug!("Arrived in lane {}", self.lane);
    }

    pub fn on_pause(&mut self, now: f64) {
        self.pause_start = now;
    }

    /// Shift the clocks so paused time never counts toward gait or jump
    pub fn on_unpause(&mut self, now: f64) {
        let paused_for = (now - self.pause_start).max(0.0);
        self.running_origin += paused_for;
        if let Motion::Jumping { start_time } = &mut self.motion {
            *start_time += paused_for;
        }
    }

    pub fn bounding_box(&self, tuning: &Tuning) -> Aabb {
        Aabb::new(
            self.pos + tuning.character_box_min,
            self.pos + tuning.character_box_max,
        )
    }

    pub fn pose(&self) -> Pose {
        Pose {
            position: self.pos,
            joints: Joint::ALL
                .iter()
                .map(|&joint| JointPose {
                    joint,
                    parent: joint.parent(),
                    offset: joint.offset(),
                    rotation_x: self.rotations[joint as usize],
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1.0 / 60.0;

    fn running(tuning: &Tuning) -> Character {
        let mut character = Character::new(0.0, tuning);
        character.on_unpause(0.0);
        character
    }

    #[test]
    fn test_switch_left_takes_five_ticks() {
        let tuning = Tuning::default();
        let mut character = running(&tuning);
        character.enqueue(Action::Left);

        for i in 0..4 {
            character.update(i as f64 * FRAME, &tuning);
            assert_eq!(character.motion, Motion::SwitchingLeft);
        }
        character.update(4.0 * FRAME, &tuning);
        assert_eq!(character.motion, Motion::Running);
        assert_eq!(character.lane, -1);
        assert_eq!(character.pos.x, -800.0);
    }

    #[test]
    fn test_boundary_move_is_consumed() {
        let tuning = Tuning::default();
        let mut character = running(&tuning);
        character.lane = 1;
        character.pos.x = 800.0;
        character.enqueue(Action::Right);
        character.update(0.0, &tuning);
        assert_eq!(character.motion, Motion::Running);
        assert_eq!(character.pending_actions(), 0);
        assert_eq!(character.pos.x, 800.0);
    }

    #[test]
    fn test_actions_wait_for_jump() {
        let tuning = Tuning::default();
        let mut character = running(&tuning);
        character.enqueue(Action::Up);
        character.enqueue(Action::Left);

        character.update(0.0, &tuning);
        assert!(character.is_jumping());
        assert_eq!(character.pending_actions(), 1);

        character.update(0.3, &tuning);
        assert!(character.pos.y > 1900.0, "apex near jump height");
        assert_eq!(character.pending_actions(), 1);

        character.update(0.61, &tuning);
        assert_eq!(character.motion, Motion::Running);

        character.update(0.62, &tuning);
        assert_eq!(character.motion, Motion::SwitchingLeft);
    }

    #[test]
    fn test_jump_consumes_running_time() {
        let tuning = Tuning::default();
        let mut character = running(&tuning);
        character.enqueue(Action::Up);
        character.update(1.0, &tuning);
        character.update(1.7, &tuning);
        assert!(!character.is_jumping());
        assert!((character.running_clock(2.0) - 1.4).abs() < 1e-9);
    }

    #[test]
    fn test_pause_shifts_jump() {
        let tuning = Tuning::default();
        let mut character = running(&tuning);
        character.enqueue(Action::Up);
        character.update(0.0, &tuning);
        character.on_pause(0.2);
        character.on_unpause(10.2);
        character.update(10.5, &tuning);
        assert!(character.is_jumping(), "only 0.5s of jump elapsed");
    }

    #[test]
    fn test_clock_never_negative() {
        let tuning = Tuning::default();
        let mut character = running(&tuning);
        character.update(-5.0, &tuning);
        assert_eq!(character.running_clock(-5.0), 0.0);
        assert!((character.pos.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_pose_lists_every_joint() {
        let tuning = Tuning::default();
        let mut character = running(&tuning);
        character.update(0.1, &tuning);
        let pose = character.pose();
        assert_eq!(pose.joints.len(), Joint::COUNT);
        let lower_leg = pose
            .joints
            .iter()
            .find(|j| j.joint == Joint::LeftLowerLeg)
            .unwrap();
        assert_eq!(lower_leg.parent, Some(Joint::LeftLeg));
        assert_eq!(lower_leg.rotation_x, character.rotation(Joint::LeftLowerLeg));
    }
}
