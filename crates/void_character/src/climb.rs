//! Climbable surface detection
//!
//! A box probe slightly larger than the character's hitbox is overlapped
//! around the body once per tick. Any climbable surface inside it makes the
//! character able to climb; the closest one decides the climb direction.

use crate::host::{CharacterHost, Hitbox};
use glam::Vec3;
use std::f32::consts::PI;

/// Extra probe height above half the hitbox height
pub const PROBE_HEIGHT_MARGIN: f32 = 1.0;

/// Extra probe depth so surfaces at zero clearance still register
pub const PROBE_DEPTH_EPSILON: f32 = 0.1;

/// Move directions within this angle of the wall climb up
pub const CLIMB_UP_LIMIT: f32 = 0.45 * PI;

/// Move directions beyond this angle from the wall climb down
pub const CLIMB_DOWN_LIMIT: f32 = 0.55 * PI;

/// Probe volume, centred on the body and turned with it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimbProbe {
    pub half_extents: Vec3,
}

impl ClimbProbe {
    pub fn from_hitbox(hitbox: &Hitbox) -> Self {
        let height = hitbox.height * 0.5 + PROBE_HEIGHT_MARGIN;
        let depth = hitbox.depth + PROBE_DEPTH_EPSILON;
        Self {
            half_extents: Vec3::new(hitbox.width, height, depth) * 0.5,
        }
    }
}

/// A surface reported by a probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    pub point: Vec3,
    /// Surface normal pointing toward the probe
    pub normal: Vec3,
    /// Distance from the probe centre in the probe's local frame
    pub distance: f32,
    pub climbable: bool,
}

/// Which way a climbing character goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClimbDirection {
    Up,
    Down,
    /// Roughly parallel to the wall: keep the previous vertical velocity
    Hold,
}

impl ClimbDirection {
    /// Partition the angle between the wall and the move direction
    pub fn from_angle(angle: f32) -> Self {
        let angle = angle.abs();
        if angle <= CLIMB_UP_LIMIT {
            Self::Up
        } else if angle >= CLIMB_DOWN_LIMIT {
            Self::Down
        } else {
            Self::Hold
        }
    }
}

/// Signed angle about +Y from "into the wall" to the move direction, taken
/// in the horizontal plane. `None` when either vector has no horizontal part.
pub fn climb_angle(surface_normal: Vec3, move_direction: Vec3) -> Option<f32> {
    let into_wall = Vec3::new(-surface_normal.x, 0.0, -surface_normal.z);
    let direction = Vec3::new(move_direction.x, 0.0, move_direction.z);
    if into_wall.length_squared() < 1e-8 || direction.length_squared() < 1e-8 {
        return None;
    }
    let cross = into_wall.cross(direction).y;
    Some(cross.atan2(into_wall.dot(direction)))
}

/// Closest climbable hit
pub fn closest_climbable(hits: &[ProbeHit]) -> Option<&ProbeHit> {
    hits.iter()
        .filter(|hit| hit.climbable)
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Tracks whether the character touches a climbable surface
#[derive(Debug, Clone, Default)]
pub struct ClimbSensor {
    probe: Option<ClimbProbe>,
    can_climb: bool,
    surface_normal: Option<Vec3>,
}

impl ClimbSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the probe for a newly bound body. Without a hitbox the sensor
    /// never reports a climbable surface.
    pub fn rebuild(&mut self, hitbox: Option<Hitbox>) {
        self.probe = hitbox.as_ref().map(ClimbProbe::from_hitbox);
        self.can_climb = false;
        self.surface_normal = None;
    }

    pub fn probe(&self) -> Option<&ClimbProbe> {
        self.probe.as_ref()
    }

    pub fn can_climb(&self) -> bool {
        self.can_climb
    }

    /// Normal of the closest climbable surface from the last check
    pub fn surface_normal(&self) -> Option<Vec3> {
        self.surface_normal
    }

    /// Fold probe results in. Returns the new value when can-climb changed.
    pub fn update(&mut self, hits: &[ProbeHit]) -> Option<bool> {
        self.surface_normal = closest_climbable(hits).map(|hit| hit.normal);
        let can_climb = self.surface_normal.is_some();
        if can_climb != self.can_climb {
            self.can_climb = can_climb;
            Some(can_climb)
        } else {
            None
        }
    }

    /// Probe around `body` and fold the results in
    pub fn sense<H: CharacterHost>(&mut self, host: &H, body: H::Body) -> Option<bool> {
        let hits = match self.probe {
            Some(probe) => host.probe(body, &probe),
            None => Vec::new(),
        };
        self.update(&hits)
    }
}
