//! Void Character - kinematic character movement
//!
//! Drives a kinematic body from input intents once per fixed physics tick:
//! ground and air acceleration, jumping under gravity, climbing tagged
//! surfaces, pushing dynamic rigid bodies, and turning the body toward its
//! move direction.
//!
//! The controller is engine-agnostic. Anything that implements
//! [`CharacterHost`] can host it; with the default `rapier` feature,
//! [`void_physics::PhysicsWorld`] does.
//!
//! # Example
//!
//! ```ignore
//! use void_character::prelude::*;
//! use void_physics::{CharacterDesc, PhysicsConfig, PhysicsWorld};
//!
//! let mut world = PhysicsWorld::new(PhysicsConfig::default());
//! let body = world.create_character(CharacterDesc::default())?;
//!
//! let mut mover = MovementController::new(MoverConfig::default());
//! mover.bind_body(&world, body);
//! mover.set_input(1.0, 0.0);
//!
//! // Once per physics tick
//! mover.tick(&mut world, Some(&FixedCamera::new(0.0)), 1.0 / 60.0);
//! world.step(1.0 / 60.0);
//!
//! for event in mover.drain_events() {
//!     println!("{:?}", event);
//! }
//! ```

pub mod climb;
pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod mover;
pub mod pusher;
pub mod rotator;
pub mod state;

#[cfg(feature = "rapier")]
mod rapier_host;

#[cfg(test)]
mod testing;

pub mod prelude {
    //! Common imports for character movement
    pub use crate::climb::{ClimbDirection, ClimbProbe, ClimbSensor, ProbeHit};
    pub use crate::config::MoverConfig;
    pub use crate::error::{CharacterError, Result};
    pub use crate::events::MoverEvent;
    pub use crate::host::{
        CameraView, CharacterHost, Contact, FixedCamera, Hitbox, MoveOutcome, PushableBody, Surface,
    };
    pub use crate::mover::MovementController;
    pub use crate::pusher::{PushForces, PushParams, RigidBodyPusher};
    pub use crate::rotator::BodyRotator;
    pub use crate::state::BodyState;
}

pub use prelude::*;
