//! The seam between the movement controller and the engine hosting it
//!
//! The controller never owns physics state. Everything it needs from the
//! world goes through [`CharacterHost`], keyed by the host's own handle types.
//! Capabilities a host cannot supply have default implementations that make
//! the character never climb and never push.

use crate::climb::{ClimbProbe, ProbeHit};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Size of a character's collision volume in its local frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Hitbox {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self { width, height, depth }
    }
}

/// A dynamic rigid body the character can exchange forces with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PushableBody<R> {
    pub handle: R,
    pub mass: f32,
    pub linear_velocity: Vec3,
    /// World-space centre of mass
    pub center_of_mass: Vec3,
    /// Restitution, when the body defines one
    pub bounce: Option<f32>,
}

/// What a contact touched, resolved once by the host at contact time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface<R> {
    Static,
    Climbable,
    Pushable(PushableBody<R>),
}

/// One contact reported by a move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact<R> {
    /// Contact point, world space
    pub point: Vec3,
    /// Surface normal pointing toward the character
    pub normal: Vec3,
    pub surface: Surface<R>,
}

/// Result of a move-and-slide
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome<R> {
    /// Velocity realized after collision resolution
    pub velocity: Vec3,
    /// Floor contact after the move
    pub on_floor: bool,
    pub contacts: Vec<Contact<R>>,
}

/// Read access to the camera the character moves relative to
pub trait CameraView {
    /// Camera yaw in radians
    fn yaw(&self) -> f32;

    /// Distance the camera is zoomed out from its target
    fn zoom_out_distance(&self) -> f32 {
        0.0
    }
}

/// A camera with a fixed yaw
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedCamera {
    pub yaw: f32,
    pub zoom_out_distance: f32,
}

impl FixedCamera {
    pub fn new(yaw: f32) -> Self {
        Self {
            yaw,
            zoom_out_distance: 0.0,
        }
    }
}

impl CameraView for FixedCamera {
    fn yaw(&self) -> f32 {
        self.yaw
    }

    fn zoom_out_distance(&self) -> f32 {
        self.zoom_out_distance
    }
}

/// Engine services a character controller runs against
pub trait CharacterHost {
    /// Handle of a kinematic character body
    type Body: Copy + PartialEq + Debug;
    /// Handle of a dynamic rigid body
    type RigidBody: Copy + PartialEq + Debug;

    /// Collision volume of the body, `None` if unknown
    fn hitbox(&self, body: Self::Body) -> Option<Hitbox>;

    /// Current facing of the body
    fn yaw(&self, body: Self::Body) -> Option<f32>;

    /// Turn the body to `yaw`
    fn set_yaw(&mut self, body: Self::Body, yaw: f32);

    /// Whether the last move ended on the floor
    fn is_on_floor(&self, body: Self::Body) -> bool;

    /// Move the body with `velocity` for `dt` seconds, sliding along obstacles.
    /// `None` when the body no longer exists.
    fn move_and_slide(
        &mut self,
        body: Self::Body,
        velocity: Vec3,
        dt: f32,
    ) -> Option<MoveOutcome<Self::RigidBody>>;

    /// Overlap `probe` around the body and report the surfaces found
    fn probe(&self, _body: Self::Body, _probe: &ClimbProbe) -> Vec<ProbeHit> {
        Vec::new()
    }

    /// Fresh state of a rigid body previously reported as pushable
    fn pushable(&self, _handle: Self::RigidBody) -> Option<PushableBody<Self::RigidBody>> {
        None
    }

    /// Push a rigid body with `force` for `dt`, applied at `offset` from its
    /// centre of mass
    fn push_rigid_body(
        &mut self,
        _handle: Self::RigidBody,
        _force: Vec3,
        _offset: Vec3,
        _dt: f32,
    ) {
    }
}
