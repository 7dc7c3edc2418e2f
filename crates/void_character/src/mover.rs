//! Kinematic character movement
//!
//! [`MovementController`] turns input intents into a velocity once per fixed
//! physics tick and hands it to the host's move-and-slide. It owns no physics
//! state; the body it drives lives in the host and is referred to by handle.
//!
//! Per tick, in order: climb check, rotation, target velocity, vertical rule,
//! horizontal approach, push resolution, move, continuity fix, classification.
//! The move direction is computed from the camera yaw, so a body that is
//! still turning moves ahead of where it faces.

use crate::climb::{climb_angle, ClimbDirection, ClimbSensor};
use crate::config::MoverConfig;
use crate::events::MoverEvent;
use crate::host::{CameraView, CharacterHost, Contact};
use crate::pusher::{PushParams, RigidBodyPusher};
use crate::rotator::BodyRotator;
use crate::state::{BodyState, MotionSample};
use glam::{Quat, Vec2, Vec3};

/// Velocities this close to their goal snap onto it
pub const SNAP_THRESHOLD: f32 = 0.1;

/// Step `current` toward `goal` by `acceleration * dt`.
///
/// Lands exactly on the goal when it is already within [`SNAP_THRESHOLD`],
/// when the step ends within it, or when the step would carry past it.
pub fn approach_velocity(current: Vec2, goal: Vec2, acceleration: f32, dt: f32) -> Vec2 {
    let to_goal = goal - current;
    let distance = to_goal.length();
    if distance <= SNAP_THRESHOLD {
        return goal;
    }

    let next = current + to_goal / distance * (acceleration * dt);
    let remaining = goal - next;
    if remaining.length() <= SNAP_THRESHOLD || remaining.dot(to_goal) <= 0.0 {
        goal
    } else {
        next
    }
}

/// World-space unit move direction for an input relative to `yaw`. Zero input
/// gives a zero vector.
pub fn move_direction(forward: f32, right: f32, yaw: f32) -> Vec3 {
    (Quat::from_rotation_y(yaw) * Vec3::new(right, 0.0, forward)).normalize_or_zero()
}

/// Drives one kinematic character body from input intents
#[derive(Debug)]
pub struct MovementController<H: CharacterHost> {
    /// Tunables, safe to change between ticks
    pub config: MoverConfig,
    forward_value: f32,
    right_value: f32,
    is_jumping: bool,
    is_climbing: bool,
    is_fast_turn_enabled: bool,
    is_running: bool,
    last_velocity: Vec3,
    last_xz_velocity: Vec2,
    realized_velocity: Vec3,
    state: BodyState,
    body: Option<H::Body>,
    fallback_yaw: f32,
    rotator: BodyRotator,
    climb_sensor: ClimbSensor,
    /// Contacts from the previous move, resolved one tick late
    pending_contacts: Vec<Contact<H::RigidBody>>,
    events: Vec<MoverEvent>,
}

impl<H: CharacterHost> MovementController<H> {
    pub fn new(config: MoverConfig) -> Self {
        let rotator = BodyRotator::new(config.turn_speed);
        Self {
            config,
            forward_value: 0.0,
            right_value: 0.0,
            is_jumping: false,
            is_climbing: false,
            is_fast_turn_enabled: false,
            is_running: true,
            last_velocity: Vec3::ZERO,
            last_xz_velocity: Vec2::ZERO,
            realized_velocity: Vec3::ZERO,
            state: BodyState::default(),
            body: None,
            fallback_yaw: 0.0,
            rotator,
            climb_sensor: ClimbSensor::new(),
            pending_contacts: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Take control of `body`, returning the previously bound body.
    ///
    /// The climb probe is rebuilt from the new body's hitbox and the rotator
    /// starts from its current yaw. Motion carried from the old body is
    /// dropped.
    pub fn bind_body(&mut self, host: &H, body: H::Body) -> Option<H::Body> {
        let hitbox = host.hitbox(body);
        if hitbox.is_none() {
            log::warn!("Character body {:?} has no hitbox, climbing disabled", body);
        }
        self.climb_sensor.rebuild(hitbox);
        self.rotator.reset(host.yaw(body).unwrap_or(self.fallback_yaw));
        self.reset_motion();

        log::info!("Bound character body {:?}", body);
        self.body.replace(body)
    }

    /// Release the bound body. Ticks are no-ops until another is bound.
    pub fn unbind_body(&mut self) -> Option<H::Body> {
        let body = self.body.take();
        if let Some(body) = body {
            log::info!("Unbound character body {:?}", body);
        }
        self.climb_sensor.rebuild(None);
        self.reset_motion();
        body
    }

    fn reset_motion(&mut self) {
        self.last_velocity = Vec3::ZERO;
        self.last_xz_velocity = Vec2::ZERO;
        self.realized_velocity = Vec3::ZERO;
        self.pending_contacts.clear();
        self.is_climbing = false;
        self.state = BodyState::default();
    }

    pub fn body(&self) -> Option<H::Body> {
        self.body
    }

    /// Set the move intent, each axis clamped to [-1, 1]
    pub fn set_input(&mut self, forward: f32, right: f32) {
        self.forward_value = clamp_axis(forward);
        self.right_value = clamp_axis(right);
    }

    pub fn input(&self) -> (f32, f32) {
        (self.forward_value, self.right_value)
    }

    pub fn has_intent(&self) -> bool {
        self.forward_value != 0.0 || self.right_value != 0.0
    }

    pub fn set_jumping(&mut self, jumping: bool) {
        self.is_jumping = jumping;
    }

    pub fn is_jumping(&self) -> bool {
        self.is_jumping
    }

    pub fn is_climbing(&self) -> bool {
        self.is_climbing
    }

    pub fn set_fast_turn_enabled(&mut self, enabled: bool) {
        if self.is_fast_turn_enabled == enabled {
            return;
        }
        self.is_fast_turn_enabled = enabled;
        log::debug!("Fast turn {}", if enabled { "enabled" } else { "disabled" });
        self.events.push(MoverEvent::FastTurnToggled { enabled });
    }

    pub fn is_fast_turn_enabled(&self) -> bool {
        self.is_fast_turn_enabled
    }

    /// Gate ticking without unbinding the body
    pub fn set_running(&mut self, running: bool) {
        self.is_running = running;
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Sync gravity from a world setting
    pub fn set_gravity(&mut self, gravity: f32) {
        self.config.gravity = gravity;
    }

    /// Yaw used while no camera is supplied
    pub fn set_fallback_yaw(&mut self, yaw: f32) {
        self.fallback_yaw = yaw;
    }

    pub fn state(&self) -> BodyState {
        self.state
    }

    /// Velocity the host realized on the last move
    pub fn velocity(&self) -> Vec3 {
        self.realized_velocity
    }

    /// Velocity carried into the next tick
    pub fn last_velocity(&self) -> Vec3 {
        self.last_velocity
    }

    pub fn rotator(&self) -> &BodyRotator {
        &self.rotator
    }

    pub fn climb_sensor(&self) -> &ClimbSensor {
        &self.climb_sensor
    }

    /// Take the events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<MoverEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance the character by one physics tick of `dt` seconds
    pub fn tick(&mut self, host: &mut H, camera: Option<&dyn CameraView>, dt: f32) {
        if !self.is_running || dt.is_nan() || dt <= 0.0 {
            return;
        }
        let Some(body) = self.body else {
            return;
        };

        let camera_yaw = match camera {
            Some(camera) => {
                self.fallback_yaw = camera.yaw();
                self.fallback_yaw
            }
            None => self.fallback_yaw,
        };
        let on_floor = host.is_on_floor(body);
        let has_intent = self.has_intent();

        if let Some(can_climb) = self.climb_sensor.sense(&*host, body) {
            log::debug!("Climbable surface {}", if can_climb { "reached" } else { "lost" });
            self.events.push(MoverEvent::ClimbableChanged { can_climb });
        }
        self.is_climbing = self.climb_sensor.can_climb();

        self.rotate(host, body, camera_yaw, has_intent, dt);

        let direction = move_direction(self.forward_value, self.right_value, camera_yaw);
        let target = Vec2::new(direction.x, direction.z) * self.config.speed;

        let (vertical, zero_horizontal) =
            self.vertical_velocity(direction, on_floor, has_intent, dt);

        let exceeding = self.last_xz_velocity.length() > self.config.speed;
        let accelerating = has_intent && !exceeding;
        let acceleration = match (on_floor, accelerating) {
            (true, true) => self.config.acceleration,
            (true, false) => self.config.deceleration,
            (false, true) => self.config.air_acceleration,
            (false, false) => self.config.air_deceleration,
        };
        let horizontal = if zero_horizontal {
            Vec2::ZERO
        } else {
            approach_velocity(self.last_xz_velocity, target, acceleration, dt)
        };

        let mut velocity = Vec3::new(horizontal.x, vertical, horizontal.y);

        let contacts = std::mem::take(&mut self.pending_contacts);
        let params = PushParams {
            character_mass: self.config.mass,
            force_multiplier: self.config.force_multiplier,
            character_push_force_multiplier: self.config.character_push_force_multiplier,
        };
        let pusher = RigidBodyPusher::resolve(&params, velocity, &contacts, |handle| {
            host.pushable(handle)
        });
        velocity += pusher.character_velocity_delta();
        pusher.apply(host, dt);

        let Some(outcome) = host.move_and_slide(body, velocity, dt) else {
            log::warn!("Character body {:?} is gone, skipping move", body);
            return;
        };

        let vertical = if outcome.velocity.y.abs() < velocity.y.abs() {
            outcome.velocity.y
        } else {
            velocity.y
        };
        self.last_velocity = Vec3::new(velocity.x, vertical, velocity.z);
        self.last_xz_velocity = Vec2::new(velocity.x, velocity.z);
        self.realized_velocity = outcome.velocity;
        self.pending_contacts = outcome.contacts;

        log::trace!(
            "Character tick: requested {:?}, realized {:?}, on floor {}",
            velocity,
            outcome.velocity,
            outcome.on_floor
        );

        let state = BodyState::classify(&MotionSample {
            is_jumping: self.is_jumping,
            is_climbing: self.is_climbing,
            vertical_velocity: outcome.velocity.y,
            horizontal_speed: Vec2::new(outcome.velocity.x, outcome.velocity.z).length(),
            on_floor: outcome.on_floor,
            has_intent,
        });
        if state != self.state {
            log::debug!("Body state {:?} -> {:?}", self.state, state);
            self.events.push(MoverEvent::BodyStateChanged {
                old: self.state,
                new: state,
            });
            self.state = state;
        }
    }

    fn rotate(&mut self, host: &mut H, body: H::Body, camera_yaw: f32, has_intent: bool, dt: f32) {
        self.rotator.speed = self.config.turn_speed;
        if self.is_fast_turn_enabled {
            self.rotator.turns_instantly = true;
            self.rotator.set_target(camera_yaw);
        } else if has_intent {
            self.rotator.turns_instantly = false;
            self.rotator.gradual_turn_enabled = !(self.is_jumping || self.is_climbing);
            self.rotator
                .set_target(camera_yaw + f32::atan2(-self.right_value, -self.forward_value));
        } else {
            return;
        }

        let before = self.rotator.yaw();
        let yaw = self.rotator.update(dt);
        if yaw != before {
            host.set_yaw(body, yaw);
        }
    }

    /// Vertical velocity for this tick, and whether horizontal motion is
    /// suppressed by climbing
    fn vertical_velocity(
        &self,
        direction: Vec3,
        on_floor: bool,
        has_intent: bool,
        dt: f32,
    ) -> (f32, bool) {
        let previous = self.last_velocity.y;

        if self.is_jumping {
            if on_floor || self.is_climbing {
                return (self.config.jump_velocity, false);
            }
            return (previous - self.config.gravity * dt, false);
        }

        if self.is_climbing {
            if !has_intent {
                return (0.0, false);
            }
            let climb = self
                .climb_sensor
                .surface_normal()
                .and_then(|normal| climb_angle(normal, direction))
                .map(ClimbDirection::from_angle)
                .unwrap_or(ClimbDirection::Hold);
            return match climb {
                ClimbDirection::Up => (self.config.speed, true),
                ClimbDirection::Down if on_floor => (0.0, false),
                ClimbDirection::Down => (-self.config.speed, true),
                ClimbDirection::Hold => (previous, true),
            };
        }

        if !on_floor {
            return (previous - self.config.gravity * dt, false);
        }
        (previous, false)
    }
}

fn clamp_axis(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}
