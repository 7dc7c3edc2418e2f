//! World and character-controller settings

use crate::error::{PhysicsError, Result};
use serde::{Deserialize, Serialize};

/// Settings of a [`PhysicsWorld`](crate::world::PhysicsWorld) and of the
/// move-and-slide its characters share
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Acceleration of dynamic bodies; characters bring their own gravity
    pub gravity: [f32; 3],

    /// Length of one fixed step (seconds)
    pub timestep: f32,

    /// Cap on fixed steps run by one `step` call
    pub max_substeps: u32,

    pub solver_iterations: usize,

    /// Gap kept between a character and the obstacles it slides along
    pub character_offset: f32,

    /// Distance under which a walking character is glued to the ground (0 = off)
    pub snap_to_ground: f32,

    /// Steepest slope a character can walk up (radians)
    pub max_slope_climb_angle: f32,

    /// Slopes steeper than this make a character slide down (radians)
    pub min_slope_slide_angle: f32,

    /// Extra distance at which post-move contacts are still reported
    pub contact_prediction: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.81, 0.0],
            timestep: 1.0 / 60.0,
            max_substeps: 4,
            solver_iterations: 4,
            character_offset: 0.01,
            snap_to_ground: 0.2,
            max_slope_climb_angle: std::f32::consts::FRAC_PI_4,
            min_slope_slide_angle: std::f32::consts::FRAC_PI_6,
            contact_prediction: 0.05,
        }
    }
}

impl PhysicsConfig {
    pub fn with_gravity(mut self, x: f32, y: f32, z: f32) -> Self {
        self.gravity = [x, y, z];
        self
    }

    pub fn with_timestep(mut self, timestep: f32) -> Self {
        self.timestep = timestep;
        self
    }

    /// Disable ground snapping for characters
    pub fn without_ground_snap(mut self) -> Self {
        self.snap_to_ground = 0.0;
        self
    }

    /// Check that the configuration can drive a simulation
    pub fn validate(&self) -> Result<()> {
        if !(self.timestep > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "timestep must be positive, got {}",
                self.timestep
            )));
        }
        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidConfig("max_substeps must be at least 1".into()));
        }
        if self.character_offset < 0.0 || self.contact_prediction < 0.0 {
            return Err(PhysicsError::InvalidConfig(
                "character offset and contact prediction cannot be negative".into(),
            ));
        }
        Ok(())
    }
}
