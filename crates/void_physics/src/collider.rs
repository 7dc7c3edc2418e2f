//! Collision shapes, and the climbable tag characters look for

use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Handle to a collider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub(crate) rapier::ColliderHandle);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    Ball { radius: f32 },
    Cuboid { half_extents: [f32; 3] },
    /// Upright capsule; `half_height` excludes the caps
    Capsule { half_height: f32, radius: f32 },
}

impl Default for ColliderShape {
    fn default() -> Self {
        Self::cuboid(0.5, 0.5, 0.5)
    }
}

impl ColliderShape {
    pub fn sphere(radius: f32) -> Self {
        Self::Ball { radius }
    }

    /// Box from half-extents
    pub fn cuboid(hx: f32, hy: f32, hz: f32) -> Self {
        Self::Cuboid {
            half_extents: [hx, hy, hz],
        }
    }

    pub fn capsule(half_height: f32, radius: f32) -> Self {
        Self::Capsule { half_height, radius }
    }

    pub(crate) fn to_rapier(self) -> rapier::SharedShape {
        match self {
            Self::Ball { radius } => rapier::SharedShape::ball(radius),
            Self::Cuboid { half_extents: [hx, hy, hz] } => rapier::SharedShape::cuboid(hx, hy, hz),
            Self::Capsule {
                half_height,
                radius,
            } => rapier::SharedShape::capsule_y(half_height, radius),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColliderDesc {
    pub shape: ColliderShape,
    pub friction: f32,
    /// 0 never bounces, 1 bounces back fully
    pub restitution: f32,
    pub density: f32,
    /// Characters may climb this surface
    pub climbable: bool,
}

impl Default for ColliderDesc {
    fn default() -> Self {
        Self {
            shape: ColliderShape::default(),
            friction: 0.5,
            restitution: 0.0,
            density: 1.0,
            climbable: false,
        }
    }
}

impl ColliderDesc {
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            ..Default::default()
        }
    }

    pub fn with_climbable(mut self, climbable: bool) -> Self {
        self.climbable = climbable;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub(crate) fn to_rapier_builder(&self) -> rapier::ColliderBuilder {
        rapier::ColliderBuilder::new(self.shape.to_rapier())
            .friction(self.friction)
            .restitution(self.restitution)
            .density(self.density)
    }
}
