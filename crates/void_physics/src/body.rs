//! Scenery and props: the rigid bodies characters walk on and push

use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Handle to a rigid body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RigidBodyHandle(pub(crate) rapier::RigidBodyHandle);

/// How a body takes part in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyKind {
    /// Level geometry
    Fixed,
    /// Simulated; characters can push it
    #[default]
    Dynamic,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RigidBodyDesc {
    pub kind: BodyKind,
    pub position: [f32; 3],
    pub linear_velocity: [f32; 3],
    /// Mass on top of what the colliders contribute
    pub additional_mass: f32,
}

impl RigidBodyDesc {
    pub fn dynamic() -> Self {
        Self::default()
    }

    pub fn fixed() -> Self {
        Self {
            kind: BodyKind::Fixed,
            ..Self::default()
        }
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = [x, y, z];
        self
    }

    pub fn with_velocity(mut self, x: f32, y: f32, z: f32) -> Self {
        self.linear_velocity = [x, y, z];
        self
    }

    pub fn with_additional_mass(mut self, mass: f32) -> Self {
        self.additional_mass = mass;
        self
    }

    pub(crate) fn to_rapier_builder(&self) -> rapier::RigidBodyBuilder {
        let [x, y, z] = self.position;
        let [vx, vy, vz] = self.linear_velocity;
        let builder = match self.kind {
            BodyKind::Fixed => rapier::RigidBodyBuilder::fixed(),
            BodyKind::Dynamic => rapier::RigidBodyBuilder::dynamic()
                .linvel(rapier::Vector::new(vx, vy, vz))
                .additional_mass(self.additional_mass.max(0.0)),
        };
        builder.translation(rapier::Vector::new(x, y, z))
    }
}

/// A dynamic body as seen by a character touching it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicBodyState {
    pub handle: RigidBodyHandle,
    pub mass: f32,
    pub linear_velocity: [f32; 3],
    /// World space
    pub center_of_mass: [f32; 3],
    /// Restitution, when the body bounces at all
    pub bounce: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_ignores_velocity() {
        let body = RigidBodyDesc::fixed()
            .with_position(1.0, 2.0, 3.0)
            .with_velocity(5.0, 0.0, 0.0)
            .to_rapier_builder()
            .build();
        assert!(body.is_fixed());
        assert_eq!(body.translation().x, 1.0);
        assert_eq!(body.linvel().x, 0.0);
    }

    #[test]
    fn test_dynamic_desc() {
        let desc = RigidBodyDesc::dynamic().with_additional_mass(20.0);
        assert_eq!(desc.kind, BodyKind::Dynamic);
        let body = desc.to_rapier_builder().build();
        assert!(body.is_dynamic());
    }
}
