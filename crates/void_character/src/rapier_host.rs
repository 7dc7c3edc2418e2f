//! [`CharacterHost`] for the Rapier-backed [`PhysicsWorld`]

use crate::climb::{ClimbProbe, ProbeHit};
use crate::host::{CharacterHost, Contact, Hitbox, MoveOutcome, PushableBody, Surface};
use glam::Vec3;
use void_physics::{
    CharacterHandle, ColliderHandle, DynamicBodyState, PhysicsWorld, RigidBodyHandle,
};

fn pushable_from(state: DynamicBodyState) -> PushableBody<RigidBodyHandle> {
    PushableBody {
        handle: state.handle,
        mass: state.mass,
        linear_velocity: Vec3::from_array(state.linear_velocity),
        center_of_mass: Vec3::from_array(state.center_of_mass),
        bounce: state.bounce,
    }
}

/// Classify what a collider is to a character touching it
fn surface_of(world: &PhysicsWorld, collider: ColliderHandle) -> Surface<RigidBodyHandle> {
    if let Some(state) = world.dynamic_body_of(collider) {
        Surface::Pushable(pushable_from(state))
    } else if world.is_climbable(collider) {
        Surface::Climbable
    } else {
        Surface::Static
    }
}

impl CharacterHost for PhysicsWorld {
    type Body = CharacterHandle;
    type RigidBody = RigidBodyHandle;

    fn hitbox(&self, body: CharacterHandle) -> Option<Hitbox> {
        self.character_hitbox(body)
            .ok()
            .map(|hitbox| Hitbox::new(hitbox.width, hitbox.height, hitbox.depth))
    }

    fn yaw(&self, body: CharacterHandle) -> Option<f32> {
        self.character_yaw(body).ok()
    }

    fn set_yaw(&mut self, body: CharacterHandle, yaw: f32) {
        if let Err(err) = self.set_character_yaw(body, yaw) {
            log::warn!("Failed to turn character: {}", err);
        }
    }

    fn is_on_floor(&self, body: CharacterHandle) -> bool {
        self.character_grounded(body).unwrap_or(false)
    }

    fn move_and_slide(
        &mut self,
        body: CharacterHandle,
        velocity: Vec3,
        dt: f32,
    ) -> Option<MoveOutcome<RigidBodyHandle>> {
        let moved = match self.move_character(body, velocity.to_array(), dt) {
            Ok(moved) => moved,
            Err(err) => {
                log::warn!("Failed to move character: {}", err);
                return None;
            }
        };

        let contacts = moved
            .contacts
            .iter()
            .map(|contact| Contact {
                point: Vec3::from_array(contact.point),
                normal: Vec3::from_array(contact.normal),
                surface: surface_of(self, contact.collider),
            })
            .collect();

        Some(MoveOutcome {
            velocity: Vec3::from_array(moved.velocity),
            on_floor: moved.grounded,
            contacts,
        })
    }

    fn probe(&self, body: CharacterHandle, probe: &ClimbProbe) -> Vec<ProbeHit> {
        match self.probe_character(body, probe.half_extents.to_array()) {
            Ok(hits) => hits
                .into_iter()
                .map(|hit| ProbeHit {
                    point: Vec3::from_array(hit.point),
                    normal: Vec3::from_array(hit.normal),
                    distance: hit.distance,
                    climbable: hit.climbable,
                })
                .collect(),
            Err(err) => {
                log::warn!("Climb probe failed: {}", err);
                Vec::new()
            }
        }
    }

    fn pushable(&self, handle: RigidBodyHandle) -> Option<PushableBody<RigidBodyHandle>> {
        self.dynamic_body_state(handle).map(pushable_from)
    }

    fn push_rigid_body(&mut self, handle: RigidBodyHandle, force: Vec3, offset: Vec3, dt: f32) {
        if let Err(err) = self.apply_push(handle, force.to_array(), offset.to_array(), dt) {
            log::warn!("Failed to push rigid body: {}", err);
        }
    }
}
