//! In-memory host for controller tests

use crate::climb::{ClimbProbe, ProbeHit};
use crate::host::{CharacterHost, Contact, Hitbox, MoveOutcome, PushableBody};
use glam::Vec3;

pub const BODY: u32 = 1;

/// A host with one body, a flat floor and scripted probe and contact results
#[derive(Debug, Clone)]
pub struct ScriptedHost {
    pub position: Vec3,
    pub yaw: f32,
    pub hitbox: Option<Hitbox>,
    /// Height of an infinite floor, `None` for a bottomless world
    pub floor_height: Option<f32>,
    pub on_floor: bool,
    pub probe_hits: Vec<ProbeHit>,
    /// Contacts reported by the next move only
    pub next_contacts: Vec<Contact<u32>>,
    pub bodies: Vec<PushableBody<u32>>,
    pub moves: Vec<Vec3>,
    pub pushes: Vec<(u32, Vec3, Vec3)>,
}

impl ScriptedHost {
    /// Body standing on a floor at height zero
    pub fn on_floor() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            hitbox: Some(Hitbox::new(0.8, 1.8, 0.8)),
            floor_height: Some(0.0),
            on_floor: true,
            probe_hits: Vec::new(),
            next_contacts: Vec::new(),
            bodies: Vec::new(),
            moves: Vec::new(),
            pushes: Vec::new(),
        }
    }

    /// Body hanging in the air with nothing below it
    pub fn airborne() -> Self {
        Self {
            position: Vec3::new(0.0, 10.0, 0.0),
            floor_height: None,
            on_floor: false,
            ..Self::on_floor()
        }
    }

    pub fn last_move(&self) -> Vec3 {
        self.moves.last().copied().unwrap_or(Vec3::ZERO)
    }
}

impl CharacterHost for ScriptedHost {
    type Body = u32;
    type RigidBody = u32;

    fn hitbox(&self, body: u32) -> Option<Hitbox> {
        (body == BODY).then_some(self.hitbox).flatten()
    }

    fn yaw(&self, body: u32) -> Option<f32> {
        (body == BODY).then_some(self.yaw)
    }

    fn set_yaw(&mut self, body: u32, yaw: f32) {
        if body == BODY {
            self.yaw = yaw;
        }
    }

    fn is_on_floor(&self, body: u32) -> bool {
        body == BODY && self.on_floor
    }

    fn move_and_slide(&mut self, body: u32, velocity: Vec3, dt: f32) -> Option<MoveOutcome<u32>> {
        if body != BODY {
            return None;
        }
        self.moves.push(velocity);

        let start = self.position;
        let mut next = start + velocity * dt;
        self.on_floor = false;
        if let Some(floor) = self.floor_height {
            if next.y <= floor {
                next.y = floor;
                self.on_floor = true;
            }
        }
        self.position = next;

        Some(MoveOutcome {
            velocity: (next - start) / dt,
            on_floor: self.on_floor,
            contacts: std::mem::take(&mut self.next_contacts),
        })
    }

    fn probe(&self, _body: u32, _probe: &ClimbProbe) -> Vec<ProbeHit> {
        self.probe_hits.clone()
    }

    fn pushable(&self, handle: u32) -> Option<PushableBody<u32>> {
        self.bodies.iter().find(|body| body.handle == handle).copied()
    }

    fn push_rigid_body(&mut self, handle: u32, force: Vec3, offset: Vec3, _dt: f32) {
        self.pushes.push((handle, force, offset));
    }
}
