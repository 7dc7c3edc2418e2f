//! Force exchange between the character and dynamic rigid bodies it touches

use crate::host::{CharacterHost, Contact, PushableBody, Surface};
use glam::Vec3;

/// Masses and multipliers on the character's side of a push
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PushParams {
    pub character_mass: f32,
    pub force_multiplier: f32,
    pub character_push_force_multiplier: f32,
}

/// Forces produced by one contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PushForces {
    /// Force applied to the rigid body, along the contact's inward direction
    pub push_force: Vec3,
    /// Magnitude pushing back on the character, along the contact normal
    pub character_push_force: f32,
}

/// Compute the forces for a contact with `normal` pointing toward the
/// character. Returns `None` for bodies without positive mass.
pub fn push_forces(
    params: &PushParams,
    character_velocity: Vec3,
    body_velocity: Vec3,
    body_mass: f32,
    bounce: Option<f32>,
    normal: Vec3,
) -> Option<PushForces> {
    if body_mass <= 0.0 || params.character_mass <= 0.0 {
        return None;
    }
    let inward = -normal;

    let mut character_push_force = (body_velocity.dot(normal) - character_velocity.dot(inward))
        .max(0.0)
        * (body_mass / params.character_mass)
        * params.character_push_force_multiplier;
    if let Some(bounce) = bounce {
        character_push_force *= 1.0 - bounce;
    }

    let push = (character_velocity.dot(inward) - body_velocity.dot(inward)).max(0.0)
        * (params.character_mass / body_mass)
        * params.force_multiplier;

    Some(PushForces {
        push_force: inward * push,
        character_push_force,
    })
}

#[derive(Debug, Clone, Copy)]
struct PushEntry<R> {
    body: PushableBody<R>,
    normal: Vec3,
    offset: Vec3,
    forces: PushForces,
}

/// Per-tick set of rigid bodies being pushed, one entry per body
#[derive(Debug, Clone)]
pub struct RigidBodyPusher<R> {
    entries: Vec<PushEntry<R>>,
}

impl<R> Default for RigidBodyPusher<R> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<R: Copy + PartialEq> RigidBodyPusher<R> {
    /// Resolve `contacts` against `character_velocity`. Bodies whose current
    /// state can't be read through `refresh` are skipped.
    pub fn resolve<F>(
        params: &PushParams,
        character_velocity: Vec3,
        contacts: &[Contact<R>],
        mut refresh: F,
    ) -> Self
    where
        F: FnMut(R) -> Option<PushableBody<R>>,
    {
        let mut pusher = Self::default();
        for contact in contacts {
            let Surface::Pushable(reported) = contact.surface else {
                continue;
            };
            let Some(body) = refresh(reported.handle) else {
                log::warn!("pushed rigid body vanished before its push was resolved");
                continue;
            };
            let Some(forces) = push_forces(
                params,
                character_velocity,
                body.linear_velocity,
                body.mass,
                body.bounce,
                contact.normal,
            ) else {
                continue;
            };
            pusher.insert(PushEntry {
                body,
                normal: contact.normal,
                offset: contact.point - body.center_of_mass,
                forces,
            });
        }
        pusher
    }

    // Keeps the contact closest to the centre of mass; on a tie the first wins.
    fn insert(&mut self, entry: PushEntry<R>) {
        match self
            .entries
            .iter_mut()
            .find(|existing| existing.body.handle == entry.body.handle)
        {
            Some(existing) => {
                if entry.offset.length_squared() < existing.offset.length_squared() {
                    *existing = entry;
                }
            }
            None => self.entries.push(entry),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Offset from the body's centre of mass of the contact kept for `handle`
    pub fn offset_of(&self, handle: R) -> Option<Vec3> {
        self.entries
            .iter()
            .find(|entry| entry.body.handle == handle)
            .map(|entry| entry.offset)
    }

    /// Forces resolved for `handle`
    pub fn forces_of(&self, handle: R) -> Option<PushForces> {
        self.entries
            .iter()
            .find(|entry| entry.body.handle == handle)
            .map(|entry| entry.forces)
    }

    /// Velocity change pushed back onto the character
    pub fn character_velocity_delta(&self) -> Vec3 {
        self.entries
            .iter()
            .map(|entry| entry.normal * (entry.forces.character_push_force / entry.body.mass))
            .sum()
    }

    /// Apply every push force through the host
    pub fn apply<H>(&self, host: &mut H, dt: f32)
    where
        H: CharacterHost<RigidBody = R>,
    {
        for entry in &self.entries {
            if entry.forces.push_force.length_squared() > 0.0 {
                host.push_rigid_body(entry.body.handle, entry.forces.push_force, entry.offset, dt);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const PARAMS: PushParams = PushParams {
        character_mass: 80.0,
        force_multiplier: 1.0,
        character_push_force_multiplier: 1.0,
    };

    const INTO_CRATE: Vec3 = Vec3::new(0.0, 0.0, 4.0);

    /// Forces for a body straight ahead along +z
    fn head_on_forces(
        character_velocity: Vec3,
        body_velocity: Vec3,
        body_mass: f32,
        bounce: Option<f32>,
    ) -> PushForces {
        push_forces(&PARAMS, character_velocity, body_velocity, body_mass, bounce, Vec3::NEG_Z)
            .unwrap()
    }

    fn crate_body(handle: u32, mass: f32) -> PushableBody<u32> {
        PushableBody {
            handle,
            mass,
            linear_velocity: Vec3::ZERO,
            center_of_mass: Vec3::new(0.0, 0.5, 2.0),
            bounce: None,
        }
    }

    fn contact(body: PushableBody<u32>, point: Vec3) -> Contact<u32> {
        Contact {
            point,
            normal: Vec3::NEG_Z,
            surface: Surface::Pushable(body),
        }
    }

    #[test]
    fn test_head_on_push() {
        let forces = head_on_forces(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO, 40.0, None);
        assert_abs_diff_eq!(forces.push_force.z, 4.0 * 2.0);
        assert_abs_diff_eq!(forces.character_push_force, 0.0);
    }

    #[test]
    fn test_moving_away_does_not_push() {
        let forces = head_on_forces(Vec3::new(0.0, 0.0, -4.0), Vec3::ZERO, 40.0, None);
        assert_eq!(forces.push_force, Vec3::ZERO);
    }

    #[test]
    fn test_mass_ratio() {
        let character_velocity = Vec3::ZERO;
        // Body closing in on the character
        let body_velocity = Vec3::new(0.0, 0.0, -3.0);

        let light = head_on_forces(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, 20.0, None);
        let heavy = head_on_forces(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, 40.0, None);
        assert_abs_diff_eq!(heavy.push_force.z * 2.0, light.push_force.z, epsilon = 1e-5);

        let light = head_on_forces(character_velocity, body_velocity, 20.0, None);
        let heavy = head_on_forces(character_velocity, body_velocity, 40.0, None);
        assert!(light.character_push_force > 0.0);
        assert_abs_diff_eq!(
            heavy.character_push_force,
            light.character_push_force * 2.0,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_bounce_scales_character_push() {
        let body_velocity = Vec3::new(0.0, 0.0, -2.0);
        let plain = head_on_forces(Vec3::ZERO, body_velocity, 80.0, None);
        let bouncy = head_on_forces(Vec3::ZERO, body_velocity, 80.0, Some(0.75));
        assert_abs_diff_eq!(plain.character_push_force, 2.0);
        assert_abs_diff_eq!(bouncy.character_push_force, 0.5);
    }

    #[test]
    fn test_massless_body_is_skipped() {
        assert!(push_forces(&PARAMS, Vec3::Z, Vec3::ZERO, 0.0, None, Vec3::NEG_Z).is_none());
    }

    #[test]
    fn test_closest_contact_to_center_of_mass_wins() {
        let body = crate_body(7, 40.0);
        let contacts = [
            contact(body, Vec3::new(0.4, 0.9, 1.5)),
            contact(body, Vec3::new(0.1, 0.5, 1.5)),
            contact(body, Vec3::new(-0.3, 0.2, 1.5)),
        ];
        let pusher = RigidBodyPusher::resolve(&PARAMS, INTO_CRATE, &contacts, |_| Some(body));

        assert_eq!(pusher.len(), 1);
        let offset = pusher.offset_of(7).unwrap();
        assert_abs_diff_eq!(offset.x, 0.1, epsilon = 1e-6);
        assert_abs_diff_eq!(offset.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_tie_keeps_first_contact() {
        let body = crate_body(7, 40.0);
        let contacts = [
            contact(body, Vec3::new(0.2, 0.5, 1.5)),
            contact(body, Vec3::new(-0.2, 0.5, 1.5)),
        ];
        let pusher = RigidBodyPusher::resolve(&PARAMS, INTO_CRATE, &contacts, |_| Some(body));
        assert_abs_diff_eq!(pusher.offset_of(7).unwrap().x, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_static_contacts_and_vanished_bodies_are_ignored() {
        let body = crate_body(3, 40.0);
        let contacts = [
            Contact {
                point: Vec3::ZERO,
                normal: Vec3::Y,
                surface: Surface::Static,
            },
            contact(body, Vec3::new(0.0, 0.5, 1.5)),
        ];
        let pusher = RigidBodyPusher::resolve(&PARAMS, Vec3::Z, &contacts, |_| None);
        assert!(pusher.is_empty());
        assert_eq!(pusher.character_velocity_delta(), Vec3::ZERO);
    }

    #[test]
    fn test_character_velocity_delta() {
        let mut body = crate_body(1, 40.0);
        body.linear_velocity = Vec3::new(0.0, 0.0, -4.0);
        let contacts = [contact(body, Vec3::new(0.0, 0.5, 1.5))];
        let pusher = RigidBodyPusher::resolve(&PARAMS, Vec3::ZERO, &contacts, |_| Some(body));

        // 4 closing speed * (40 / 80) = 2, over 40 kg, along the normal
        let delta = pusher.character_velocity_delta();
        assert_abs_diff_eq!(delta.z, -0.05, epsilon = 1e-6);
    }
}
