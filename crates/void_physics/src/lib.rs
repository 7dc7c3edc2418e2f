//! Void Physics - Rapier 3D host for kinematic characters
//!
//! This crate owns the physics world that character controllers run against.
//!
//! # Features
//!
//! - Static and dynamic rigid bodies, box/sphere/capsule colliders
//! - Kinematic characters with move-and-slide, floor detection and
//!   post-move contacts (point + normal facing the character)
//! - Climbable surface tagging and box probes around a character
//! - Push impulses applied at an offset from a body's centre of mass
//! - Fixed-timestep stepping
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                  PhysicsWorld                     │
//! │  ┌─────────────┐  ┌─────────────┐  ┌───────────┐ │
//! │  │ RigidBodySet│  │ ColliderSet │  │ Climbable │ │
//! │  └─────────────┘  └─────────────┘  └───────────┘ │
//! │  ┌──────────────────────┐  ┌───────────────────┐ │
//! │  │   PhysicsPipeline    │  │ Character bodies  │ │
//! │  │ (integration, solver)│  │ (move_shape, KCC) │ │
//! │  └──────────────────────┘  └───────────────────┘ │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use void_physics::prelude::*;
//!
//! let mut physics = PhysicsWorld::new(PhysicsConfig::default());
//!
//! let floor = physics.create_rigid_body(RigidBodyDesc::fixed());
//! physics.create_collider(ColliderDesc::new(ColliderShape::cuboid(20.0, 0.5, 20.0)), Some(floor));
//!
//! let player = physics.create_character(CharacterDesc::default().with_position(0.0, 2.0, 0.0))?;
//!
//! // Once per physics tick
//! let moved = physics.move_character(player, [0.0, -1.0, 4.0], 1.0 / 60.0)?;
//! physics.step(1.0 / 60.0);
//! ```

pub mod body;
pub mod character;
pub mod collider;
pub mod config;
pub mod error;
pub mod query;
pub mod world;

pub mod prelude {
    //! Common imports for physics functionality
    pub use crate::body::{BodyKind, DynamicBodyState, RigidBodyDesc, RigidBodyHandle};
    pub use crate::character::{
        CharacterContact, CharacterDesc, CharacterHandle, CharacterHitbox, CharacterMove,
    };
    pub use crate::collider::{ColliderDesc, ColliderHandle, ColliderShape};
    pub use crate::config::PhysicsConfig;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::query::{PhysicsQuery, ProbeHit};
    pub use crate::world::PhysicsWorld;
}

pub use prelude::*;
