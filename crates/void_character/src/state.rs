//! Body state classification

use serde::{Deserialize, Serialize};

/// Below this a velocity component counts as still
pub const MOTION_EPSILON: f32 = 0.01;

/// What the character body is doing this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BodyState {
    /// On the floor, not moving
    #[default]
    Stopped,
    /// On the floor, coasting without input
    Moving,
    /// On the floor, moving under input
    Running,
    /// Airborne and going up without a jump
    Rising,
    /// Going up from a jump
    Jumping,
    /// Moving along a climbable surface
    Climbing,
    /// Airborne and going down
    Falling,
}

/// Everything the classification looks at, taken after the move
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionSample {
    pub is_jumping: bool,
    pub is_climbing: bool,
    /// Realized vertical velocity
    pub vertical_velocity: f32,
    /// Realized horizontal speed
    pub horizontal_speed: f32,
    pub on_floor: bool,
    pub has_intent: bool,
}

impl BodyState {
    /// Classify a tick's motion. Jumping beats climbing, climbing beats
    /// free flight, and floor states come last.
    pub fn classify(sample: &MotionSample) -> Self {
        let vy = sample.vertical_velocity;

        if sample.is_jumping && vy > 0.0 {
            return Self::Jumping;
        }
        if sample.is_climbing && (!sample.on_floor || vy.abs() > MOTION_EPSILON) {
            return Self::Climbing;
        }
        if !sample.on_floor {
            return if vy > MOTION_EPSILON {
                Self::Rising
            } else {
                Self::Falling
            };
        }
        if sample.horizontal_speed < MOTION_EPSILON {
            Self::Stopped
        } else if sample.has_intent {
            Self::Running
        } else {
            Self::Moving
        }
    }

    /// Whether this state is off the floor
    pub fn is_airborne(&self) -> bool {
        matches!(self, Self::Rising | Self::Jumping | Self::Falling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded() -> MotionSample {
        MotionSample {
            on_floor: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_jumping_beats_climbing() {
        let sample = MotionSample {
            is_jumping: true,
            is_climbing: true,
            vertical_velocity: 0.5,
            on_floor: true,
            ..Default::default()
        };
        assert_eq!(BodyState::classify(&sample), BodyState::Jumping);

        let sample = MotionSample {
            on_floor: false,
            horizontal_speed: 3.0,
            ..sample
        };
        assert_eq!(BodyState::classify(&sample), BodyState::Jumping);
    }

    #[test]
    fn test_climbing() {
        let sample = MotionSample {
            is_climbing: true,
            vertical_velocity: 8.0,
            ..Default::default()
        };
        assert_eq!(BodyState::classify(&sample), BodyState::Climbing);

        // Walking along the foot of a wall is not climbing
        let sample = MotionSample {
            is_climbing: true,
            horizontal_speed: 4.0,
            has_intent: true,
            ..grounded()
        };
        assert_eq!(BodyState::classify(&sample), BodyState::Running);
    }

    #[test]
    fn test_airborne_states() {
        let rising = MotionSample {
            vertical_velocity: 3.0,
            ..Default::default()
        };
        assert_eq!(BodyState::classify(&rising), BodyState::Rising);

        let falling = MotionSample {
            vertical_velocity: -3.0,
            ..Default::default()
        };
        assert_eq!(BodyState::classify(&falling), BodyState::Falling);

        // A jump past its apex falls
        let apex = MotionSample {
            is_jumping: true,
            vertical_velocity: -0.1,
            ..Default::default()
        };
        assert_eq!(BodyState::classify(&apex), BodyState::Falling);
        assert!(BodyState::Falling.is_airborne());
    }

    #[test]
    fn test_floor_states() {
        assert_eq!(BodyState::classify(&grounded()), BodyState::Stopped);

        let running = MotionSample {
            horizontal_speed: 5.0,
            has_intent: true,
            ..grounded()
        };
        assert_eq!(BodyState::classify(&running), BodyState::Running);

        let coasting = MotionSample {
            horizontal_speed: 5.0,
            ..grounded()
        };
        assert_eq!(BodyState::classify(&coasting), BodyState::Moving);
        assert!(!BodyState::Moving.is_airborne());
    }
}
