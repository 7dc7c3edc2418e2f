//! Physics queries around characters (climb probes)

use crate::character::{yaw_isometry, CharacterHandle};
use crate::collider::ColliderHandle;
use crate::error::Result;
use crate::world::PhysicsWorld;
use rapier3d::parry::query as parry_query;
use rapier3d::prelude as rapier;

/// A surface overlapped by a probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    /// The collider that was hit
    pub collider: ColliderHandle,
    /// Closest point on the collider, world space
    pub point: [f32; 3],
    /// Surface normal pointing from the collider toward the probe
    pub normal: [f32; 3],
    /// Horizontal distance from the probe centre, in the probe's local frame
    pub distance: f32,
    /// Whether the collider is tagged climbable
    pub climbable: bool,
}

/// Query interface for physics world
pub struct PhysicsQuery<'a> {
    pub(crate) query_pipeline: &'a rapier::QueryPipeline,
    pub(crate) colliders: &'a rapier::ColliderSet,
    pub(crate) bodies: &'a rapier::RigidBodySet,
    pub(crate) world: &'a PhysicsWorld,
}

impl<'a> PhysicsQuery<'a> {
    /// Overlap a box centred on `center` and turned by `yaw`, reporting every
    /// solid collider it touches.
    pub fn probe_box(
        &self,
        half_extents: [f32; 3],
        center: [f32; 3],
        yaw: f32,
        exclude_body: Option<rapier::RigidBodyHandle>,
    ) -> Vec<ProbeHit> {
        let shape = rapier::SharedShape::cuboid(half_extents[0], half_extents[1], half_extents[2]);
        let pos = yaw_isometry(rapier::Vector::new(center[0], center[1], center[2]), yaw);

        let mut filter = rapier::QueryFilter::new().exclude_sensors();
        if let Some(body) = exclude_body {
            filter = filter.exclude_rigid_body(body);
        }

        let mut overlapped = Vec::new();
        self.query_pipeline.intersections_with_shape(
            self.bodies,
            self.colliders,
            &pos,
            shape.as_ref(),
            filter,
            |handle| {
                overlapped.push(handle);
                true
            },
        );

        let mut hits = Vec::with_capacity(overlapped.len());
        for handle in overlapped {
            let Some(collider) = self.colliders.get(handle) else {
                continue;
            };
            let Ok(Some(contact)) = parry_query::contact(
                collider.position(),
                collider.shape(),
                &pos,
                shape.as_ref(),
                0.0,
            ) else {
                continue;
            };

            let local = pos.inverse_transform_point(&contact.point1);
            hits.push(ProbeHit {
                collider: ColliderHandle(handle),
                point: [contact.point1.x, contact.point1.y, contact.point1.z],
                normal: [contact.normal1.x, contact.normal1.y, contact.normal1.z],
                distance: (local.x * local.x + local.z * local.z).sqrt(),
                climbable: self.world.is_climbable(ColliderHandle(handle)),
            });
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

impl PhysicsWorld {
    /// Run a climb probe of the given half-extents around a character
    pub fn probe_character(
        &self,
        handle: CharacterHandle,
        half_extents: [f32; 3],
    ) -> Result<Vec<ProbeHit>> {
        let yaw = self.character_yaw(handle)?;
        let center = self.character_position(handle)?;
        Ok(self.query().probe_box(half_extents, center, yaw, Some(handle.0)))
    }
}

#[cfg(test)]
mod tests {
    use crate::body::RigidBodyDesc;
    use crate::character::CharacterDesc;
    use crate::collider::{ColliderDesc, ColliderShape};
    use crate::world::PhysicsWorld;

    #[test]
    fn test_probe_finds_climbable_wall() {
        let mut world = PhysicsWorld::default();
        let wall = world.create_rigid_body(RigidBodyDesc::fixed().with_position(0.0, 1.0, 0.52));
        world.create_collider(
            ColliderDesc::new(ColliderShape::cuboid(2.0, 2.0, 0.1)).with_climbable(true),
            Some(wall),
        );
        let character = world.create_character(CharacterDesc::default()).unwrap();

        let hits = world.probe_character(character, [0.4, 1.9, 0.45]).unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].climbable);
        // Wall face looks back toward the character at -Z
        assert!(hits[0].normal[2] < -0.9);
    }

    #[test]
    fn test_probe_ignores_distant_and_own_collider() {
        let mut world = PhysicsWorld::default();
        let wall = world.create_rigid_body(RigidBodyDesc::fixed().with_position(0.0, 1.0, 5.0));
        world.create_collider(
            ColliderDesc::new(ColliderShape::cuboid(2.0, 2.0, 0.1)).with_climbable(true),
            Some(wall),
        );
        let character = world.create_character(CharacterDesc::default()).unwrap();

        let hits = world.probe_character(character, [0.4, 1.9, 0.45]).unwrap();
        assert!(hits.is_empty());
    }
}
