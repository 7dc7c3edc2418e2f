use thiserror::Error;

use crate::body::RigidBodyHandle;
use crate::character::CharacterHandle;
use crate::collider::ColliderHandle;

#[derive(Debug, Error)]
pub enum PhysicsError {
    #[error("No rigid body {0:?} in the world")]
    BodyNotFound(RigidBodyHandle),

    #[error("No collider {0:?} in the world")]
    ColliderNotFound(ColliderHandle),

    #[error("No character {0:?} in the world")]
    CharacterNotFound(CharacterHandle),

    #[error("Invalid physics configuration: {0}")]
    InvalidConfig(String),

    /// Capsule dimensions that can't form a character
    #[error("Invalid character capsule (radius {radius}, height {height})")]
    InvalidCapsule { radius: f32, height: f32 },
}

pub type Result<T> = std::result::Result<T, PhysicsError>;
