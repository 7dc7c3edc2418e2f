//! Kinematic characters moved with Rapier's character controller
//!
//! A character is a kinematic position-based body carrying a Y capsule. It is
//! moved once per physics step by [`PhysicsWorld::move_character`], which
//! slides along obstacles, tracks floor contact and reports the contacts found
//! at the resolved position. The next kinematic position takes effect on the
//! following [`PhysicsWorld::step`].

use crate::body::RigidBodyHandle;
use crate::collider::ColliderHandle;
use crate::error::{PhysicsError, Result};
use crate::world::PhysicsWorld;
use rapier3d::na::UnitQuaternion;
use rapier3d::parry::query as parry_query;
use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Handle to a kinematic character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharacterHandle(pub(crate) rapier::RigidBodyHandle);

impl CharacterHandle {
    /// The rigid body backing this character
    pub fn body(&self) -> RigidBodyHandle {
        RigidBodyHandle(self.0)
    }
}

/// Axis-aligned size of a character's collision volume, in its local frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterHitbox {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

/// Description for creating a character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterDesc {
    /// Initial position of the capsule centre
    pub position: [f32; 3],
    /// Initial facing (radians about +Y)
    pub yaw: f32,
    /// Capsule radius
    pub radius: f32,
    /// Total capsule height, caps included
    pub height: f32,
}

impl Default for CharacterDesc {
    fn default() -> Self {
        Self {
            position: [0.0, 1.0, 0.0],
            yaw: 0.0,
            radius: 0.4,
            height: 1.8,
        }
    }
}

impl CharacterDesc {
    /// Set initial position
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = [x, y, z];
        self
    }

    /// Set capsule dimensions
    pub fn with_size(mut self, radius: f32, height: f32) -> Self {
        self.radius = radius;
        self.height = height;
        self
    }

    /// Set initial facing
    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    /// Collision volume derived from the capsule
    pub fn hitbox(&self) -> CharacterHitbox {
        CharacterHitbox {
            width: self.radius * 2.0,
            height: self.height,
            depth: self.radius * 2.0,
        }
    }

    fn half_height(&self) -> f32 {
        (self.height * 0.5 - self.radius).max(0.0)
    }
}

/// A contact found after a character move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterContact {
    /// The collider touched
    pub collider: ColliderHandle,
    /// Contact point on the collider, world space
    pub point: [f32; 3],
    /// Surface normal pointing from the collider toward the character
    pub normal: [f32; 3],
}

/// Outcome of one character move
#[derive(Debug, Clone, Default)]
pub struct CharacterMove {
    /// Velocity actually realized after sliding
    pub velocity: [f32; 3],
    /// Whether the character ended the move on the floor
    pub grounded: bool,
    /// Contacts at the resolved position
    pub contacts: Vec<CharacterContact>,
}

/// Runtime record of a character
pub(crate) struct CharacterBody {
    pub(crate) collider: rapier::ColliderHandle,
    pub(crate) shape: rapier::SharedShape,
    pub(crate) hitbox: CharacterHitbox,
    pub(crate) yaw: f32,
    pub(crate) grounded: bool,
    pub(crate) velocity: [f32; 3],
}

pub(crate) fn yaw_isometry(translation: rapier::Vector<f32>, yaw: f32) -> rapier::Isometry<f32> {
    rapier::Isometry::from_parts(
        rapier::Translation::from(translation),
        UnitQuaternion::from_axis_angle(&rapier::Vector::y_axis(), yaw),
    )
}

impl PhysicsWorld {
    /// Create a kinematic character
    pub fn create_character(&mut self, desc: CharacterDesc) -> Result<CharacterHandle> {
        if !(desc.radius > 0.0) || desc.height < desc.radius * 2.0 {
            return Err(PhysicsError::InvalidCapsule {
                radius: desc.radius,
                height: desc.height,
            });
        }

        let translation = rapier::Vector::new(desc.position[0], desc.position[1], desc.position[2]);
        let body = rapier::RigidBodyBuilder::kinematic_position_based()
            .position(yaw_isometry(translation, desc.yaw))
            .build();
        let body = self.bodies.insert(body);

        let shape = rapier::SharedShape::capsule_y(desc.half_height(), desc.radius);
        let collider = rapier::ColliderBuilder::new(shape.clone()).build();
        let collider = self.colliders.insert_with_parent(collider, body, &mut self.bodies);
        self.query_pipeline.update(&self.colliders);

        let handle = CharacterHandle(body);
        self.characters.insert(
            handle,
            CharacterBody {
                collider,
                shape,
                hitbox: desc.hitbox(),
                yaw: desc.yaw,
                grounded: false,
                velocity: [0.0; 3],
            },
        );
        log::info!("Created character {:?} at {:?}", handle, desc.position);
        Ok(handle)
    }

    /// Remove a character and its collider
    pub fn remove_character(&mut self, handle: CharacterHandle) -> Result<()> {
        self.characters
            .remove(&handle)
            .ok_or(PhysicsError::CharacterNotFound(handle))?;
        self.remove_rigid_body(handle.body());
        Ok(())
    }

    /// Current position of a character
    pub fn character_position(&self, handle: CharacterHandle) -> Result<[f32; 3]> {
        self.body_position(handle.body())
            .map_err(|_| PhysicsError::CharacterNotFound(handle))
    }

    /// Facing of a character
    pub fn character_yaw(&self, handle: CharacterHandle) -> Result<f32> {
        self.characters
            .get(&handle)
            .map(|c| c.yaw)
            .ok_or(PhysicsError::CharacterNotFound(handle))
    }

    /// Set the facing of a character, applied with its next move
    pub fn set_character_yaw(&mut self, handle: CharacterHandle, yaw: f32) -> Result<()> {
        self.characters
            .get_mut(&handle)
            .map(|c| c.yaw = yaw)
            .ok_or(PhysicsError::CharacterNotFound(handle))
    }

    /// Whether the last move ended on the floor
    pub fn character_grounded(&self, handle: CharacterHandle) -> Result<bool> {
        self.characters
            .get(&handle)
            .map(|c| c.grounded)
            .ok_or(PhysicsError::CharacterNotFound(handle))
    }

    /// Velocity realized by the last move
    pub fn character_velocity(&self, handle: CharacterHandle) -> Result<[f32; 3]> {
        self.characters
            .get(&handle)
            .map(|c| c.velocity)
            .ok_or(PhysicsError::CharacterNotFound(handle))
    }

    /// Collision volume of a character
    pub fn character_hitbox(&self, handle: CharacterHandle) -> Result<CharacterHitbox> {
        self.characters
            .get(&handle)
            .map(|c| c.hitbox)
            .ok_or(PhysicsError::CharacterNotFound(handle))
    }

    /// Collider attached to a character
    pub fn character_collider(&self, handle: CharacterHandle) -> Result<ColliderHandle> {
        self.characters
            .get(&handle)
            .map(|c| ColliderHandle(c.collider))
            .ok_or(PhysicsError::CharacterNotFound(handle))
    }

    /// Move a character with `velocity` for `dt` seconds, sliding along obstacles
    pub fn move_character(
        &mut self,
        handle: CharacterHandle,
        velocity: [f32; 3],
        dt: f32,
    ) -> Result<CharacterMove> {
        let character = self
            .characters
            .get_mut(&handle)
            .ok_or(PhysicsError::CharacterNotFound(handle))?;
        let position = *self
            .bodies
            .get(handle.0)
            .ok_or(PhysicsError::CharacterNotFound(handle))?
            .position();

        let desired = rapier::Vector::new(velocity[0], velocity[1], velocity[2]) * dt;
        let filter = rapier::QueryFilter::new()
            .exclude_rigid_body(handle.0)
            .exclude_sensors();

        let mut touched: Vec<rapier::ColliderHandle> = Vec::new();
        let movement = self.character_controller.move_shape(
            dt,
            &self.bodies,
            &self.colliders,
            &self.query_pipeline,
            character.shape.as_ref(),
            &position,
            desired,
            filter,
            |collision| {
                if !touched.contains(&collision.handle) {
                    touched.push(collision.handle);
                }
            },
        );

        let next = yaw_isometry(position.translation.vector + movement.translation, character.yaw);

        let mut contacts = Vec::with_capacity(touched.len());
        for collider_handle in touched {
            let Some(collider) = self.colliders.get(collider_handle) else {
                continue;
            };
            let contact = parry_query::contact(
                collider.position(),
                collider.shape(),
                &next,
                character.shape.as_ref(),
                self.config.contact_prediction + self.config.character_offset,
            );
            if let Ok(Some(contact)) = contact {
                contacts.push(CharacterContact {
                    collider: ColliderHandle(collider_handle),
                    point: [contact.point1.x, contact.point1.y, contact.point1.z],
                    normal: [contact.normal1.x, contact.normal1.y, contact.normal1.z],
                });
            }
        }

        let realized = if dt > 0.0 {
            movement.translation / dt
        } else {
            rapier::Vector::zeros()
        };
        character.grounded = movement.grounded;
        character.velocity = [realized.x, realized.y, realized.z];

        if let Some(body) = self.bodies.get_mut(handle.0) {
            body.set_next_kinematic_position(next);
        }

        log::trace!(
            "Character {:?} moved {:?} (grounded: {}, contacts: {})",
            handle,
            character.velocity,
            movement.grounded,
            contacts.len()
        );

        Ok(CharacterMove {
            velocity: character.velocity,
            grounded: movement.grounded,
            contacts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::RigidBodyDesc;
    use crate::collider::{ColliderDesc, ColliderShape};
    use crate::config::PhysicsConfig;
    use approx::assert_abs_diff_eq;

    const DT: f32 = 1.0 / 60.0;

    fn world_with_floor() -> PhysicsWorld {
        let mut world = PhysicsWorld::new(PhysicsConfig::default());
        let floor = world.create_rigid_body(RigidBodyDesc::fixed());
        let slab = ColliderDesc::new(ColliderShape::cuboid(20.0, 0.5, 20.0));
        world.create_collider(slab, Some(floor));
        world
    }

    #[test]
    fn test_hitbox_from_capsule() {
        let hitbox = CharacterDesc::default().with_size(0.5, 2.0).hitbox();
        assert_eq!(hitbox.width, 1.0);
        assert_eq!(hitbox.height, 2.0);
        assert_eq!(hitbox.depth, 1.0);
    }

    #[test]
    fn test_rejects_degenerate_capsule() {
        let mut world = PhysicsWorld::default();
        let result = world.create_character(CharacterDesc::default().with_size(0.5, 0.5));
        assert!(matches!(result, Err(PhysicsError::InvalidCapsule { .. })));
    }

    #[test]
    fn test_character_lands_on_floor() {
        let mut world = world_with_floor();
        let character = world
            .create_character(CharacterDesc::default().with_position(0.0, 2.0, 0.0))
            .unwrap();

        let mut grounded = false;
        for _ in 0..120 {
            let result = world.move_character(character, [0.0, -5.0, 0.0], DT).unwrap();
            world.step(DT);
            if result.grounded {
                grounded = true;
                break;
            }
        }

        assert!(grounded, "character should reach the floor");
        assert!(world.character_grounded(character).unwrap());
        let y = world.character_position(character).unwrap()[1];
        assert!(y > 0.5 && y < 2.0, "character should rest on top of the floor, got {y}");
    }

    #[test]
    fn test_free_move_realizes_requested_velocity() {
        let mut world = PhysicsWorld::default();
        let character = world.create_character(CharacterDesc::default()).unwrap();

        let result = world.move_character(character, [3.0, 0.0, 0.0], DT).unwrap();
        assert_abs_diff_eq!(result.velocity[0], 3.0, epsilon = 1e-3);
        assert!(result.contacts.is_empty());
    }

    #[test]
    fn test_unknown_character() {
        let mut world = PhysicsWorld::default();
        let character = world.create_character(CharacterDesc::default()).unwrap();
        world.remove_character(character).unwrap();
        assert!(matches!(
            world.move_character(character, [0.0; 3], DT),
            Err(PhysicsError::CharacterNotFound(_))
        ));
    }
}
