//! Movement tunables

use crate::error::{CharacterError, Result};
use serde::{Deserialize, Serialize};

/// Tunables of a [`MovementController`](crate::mover::MovementController).
///
/// Set once by whoever spawns the character and adjusted at runtime as needed
/// (gravity is typically synced from the world).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoverConfig {
    /// Downward acceleration while airborne (units/s²)
    pub gravity: f32,
    /// Vertical velocity at take-off (units/s)
    pub jump_velocity: f32,
    /// Horizontal acceleration on the floor while steering toward top speed
    pub acceleration: f32,
    /// Horizontal acceleration in the air while steering toward top speed
    pub air_acceleration: f32,
    /// Horizontal braking on the floor
    pub deceleration: f32,
    /// Horizontal braking in the air
    pub air_deceleration: f32,
    /// Top horizontal speed, also the climbing speed
    pub speed: f32,
    /// Character mass used for push exchanges
    pub mass: f32,
    /// Scale of the force the character applies to rigid bodies
    pub force_multiplier: f32,
    /// Scale of the push the character receives from rigid bodies
    pub character_push_force_multiplier: f32,
    /// Gradual turn rate (interpolation weight per second)
    pub turn_speed: f32,
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self {
            gravity: 60.0,
            jump_velocity: 25.0,
            acceleration: 180.0,
            air_acceleration: 40.0,
            deceleration: 120.0,
            air_deceleration: 10.0,
            speed: 8.0,
            mass: 80.0,
            force_multiplier: 1.0,
            character_push_force_multiplier: 1.0,
            turn_speed: 12.0,
        }
    }
}

impl MoverConfig {
    /// Parse a configuration from JSON; missing fields keep their defaults
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set gravity magnitude
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set top speed
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Set take-off velocity
    pub fn with_jump_velocity(mut self, jump_velocity: f32) -> Self {
        self.jump_velocity = jump_velocity;
        self
    }

    /// Set character mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Set floor acceleration and deceleration
    pub fn with_ground_control(mut self, acceleration: f32, deceleration: f32) -> Self {
        self.acceleration = acceleration;
        self.deceleration = deceleration;
        self
    }

    /// Set air acceleration and deceleration
    pub fn with_air_control(mut self, acceleration: f32, deceleration: f32) -> Self {
        self.air_acceleration = acceleration;
        self.air_deceleration = deceleration;
        self
    }

    /// Check that every tunable is a positive finite number
    pub fn validate(&self) -> Result<()> {
        let tunables = [
            ("gravity", self.gravity),
            ("jump_velocity", self.jump_velocity),
            ("acceleration", self.acceleration),
            ("air_acceleration", self.air_acceleration),
            ("deceleration", self.deceleration),
            ("air_deceleration", self.air_deceleration),
            ("speed", self.speed),
            ("mass", self.mass),
            ("force_multiplier", self.force_multiplier),
            ("character_push_force_multiplier", self.character_push_force_multiplier),
            ("turn_speed", self.turn_speed),
        ];

        for (name, value) in tunables {
            if !(value.is_finite() && value > 0.0) {
                return Err(CharacterError::InvalidTunable { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(MoverConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_tunable() {
        let config = MoverConfig::default().with_mass(0.0);
        match config.validate() {
            Err(CharacterError::InvalidTunable { name, .. }) => assert_eq!(name, "mass"),
            other => panic!("expected invalid mass, got {other:?}"),
        }

        let config = MoverConfig::default().with_speed(f32::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = MoverConfig::from_json(r#"{ "speed": 5.5, "gravity": 30.0 }"#).unwrap();
        assert_eq!(config.speed, 5.5);
        assert_eq!(config.gravity, 30.0);
        assert_eq!(config.jump_velocity, MoverConfig::default().jump_velocity);
    }

    #[test]
    fn test_json_errors() {
        assert!(matches!(
            MoverConfig::from_json("{ not json"),
            Err(CharacterError::ConfigParse(_))
        ));
        assert!(matches!(
            MoverConfig::from_json(r#"{ "gravity": -1.0 }"#),
            Err(CharacterError::InvalidTunable { name: "gravity", .. })
        ));
    }

    #[test]
    fn test_json_roundtrip_of_custom_values() {
        let config = MoverConfig::default()
            .with_air_control(20.0, 5.0)
            .with_jump_velocity(12.0);
        let text = config.to_json().unwrap();
        assert_eq!(MoverConfig::from_json(&text).unwrap(), config);
    }
}
