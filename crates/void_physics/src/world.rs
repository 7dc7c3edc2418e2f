//! The physics world characters are moved through
//!
//! Owns the Rapier sets, the fixed-timestep solver and the per-character
//! state. Collider climbability lives here as a tag set rather than on the
//! colliders themselves.

use crate::body::{DynamicBodyState, RigidBodyDesc, RigidBodyHandle};
use crate::character::{CharacterBody, CharacterHandle};
use crate::collider::{ColliderDesc, ColliderHandle};
use crate::config::PhysicsConfig;
use crate::error::{PhysicsError, Result};
use crate::query::PhysicsQuery;
use rapier3d::control::{CharacterLength, KinematicCharacterController};
use rapier3d::prelude as rapier;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;

/// Rapier's stepping machinery, everything but the body and collider sets
struct Solver {
    pipeline: rapier::PhysicsPipeline,
    gravity: rapier::Vector<f32>,
    params: rapier::IntegrationParameters,
    islands: rapier::IslandManager,
    broad_phase: rapier::DefaultBroadPhase,
    narrow_phase: rapier::NarrowPhase,
    impulse_joints: rapier::ImpulseJointSet,
    multibody_joints: rapier::MultibodyJointSet,
    ccd: rapier::CCDSolver,
}

impl Solver {
    fn new(config: &PhysicsConfig) -> Self {
        let [gx, gy, gz] = config.gravity;
        let mut params = rapier::IntegrationParameters::default();
        params.dt = config.timestep;
        params.num_solver_iterations =
            NonZeroUsize::new(config.solver_iterations).unwrap_or(NonZeroUsize::MIN);

        Self {
            pipeline: rapier::PhysicsPipeline::new(),
            gravity: rapier::Vector::new(gx, gy, gz),
            params,
            islands: rapier::IslandManager::new(),
            broad_phase: rapier::DefaultBroadPhase::new(),
            narrow_phase: rapier::NarrowPhase::new(),
            impulse_joints: rapier::ImpulseJointSet::new(),
            multibody_joints: rapier::MultibodyJointSet::new(),
            ccd: rapier::CCDSolver::new(),
        }
    }

    fn step(&mut self, bodies: &mut rapier::RigidBodySet, colliders: &mut rapier::ColliderSet) {
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            bodies,
            colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &(),
        );
    }
}

/// Rigid bodies, colliders and kinematic characters in one simulation
pub struct PhysicsWorld {
    pub(crate) config: PhysicsConfig,
    solver: Solver,
    pub(crate) query_pipeline: rapier::QueryPipeline,
    pub(crate) bodies: rapier::RigidBodySet,
    pub(crate) colliders: rapier::ColliderSet,
    climbable: HashSet<rapier::ColliderHandle>,
    pub(crate) characters: HashMap<CharacterHandle, CharacterBody>,
    /// Move-and-slide settings shared by every character
    pub(crate) character_controller: KinematicCharacterController,
    /// Time not yet consumed by a fixed step
    accumulator: f32,
}

impl PhysicsWorld {
    pub fn new(config: PhysicsConfig) -> Self {
        let character_controller = KinematicCharacterController {
            offset: CharacterLength::Absolute(config.character_offset),
            max_slope_climb_angle: config.max_slope_climb_angle,
            min_slope_slide_angle: config.min_slope_slide_angle,
            snap_to_ground: (config.snap_to_ground > 0.0)
                .then_some(CharacterLength::Absolute(config.snap_to_ground)),
            ..Default::default()
        };

        log::info!(
            "Physics world created (timestep: {:.4}s, gravity: {:?})",
            config.timestep,
            config.gravity
        );

        Self {
            solver: Solver::new(&config),
            config,
            query_pipeline: rapier::QueryPipeline::new(),
            bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            climbable: HashSet::new(),
            characters: HashMap::new(),
            character_controller,
            accumulator: 0.0,
        }
    }

    /// Like [`PhysicsWorld::new`], rejecting configurations that can't step
    pub fn try_new(config: PhysicsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    // ==================== Rigid Bodies ====================

    pub fn create_rigid_body(&mut self, desc: RigidBodyDesc) -> RigidBodyHandle {
        RigidBodyHandle(self.bodies.insert(desc.to_rapier_builder()))
    }

    /// Remove a rigid body together with its colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        let Some(body) = self.bodies.get(handle.0) else {
            return;
        };
        for collider in body.colliders() {
            self.climbable.remove(collider);
        }

        self.bodies.remove(
            handle.0,
            &mut self.solver.islands,
            &mut self.colliders,
            &mut self.solver.impulse_joints,
            &mut self.solver.multibody_joints,
            true,
        );
        self.query_pipeline.update(&self.colliders);
    }

    fn body(&self, handle: RigidBodyHandle) -> Result<&rapier::RigidBody> {
        self.bodies.get(handle.0).ok_or(PhysicsError::BodyNotFound(handle))
    }

    /// World-space translation of a rigid body
    pub fn body_position(&self, handle: RigidBodyHandle) -> Result<[f32; 3]> {
        let t = self.body(handle)?.translation();
        Ok([t.x, t.y, t.z])
    }

    pub fn body_velocity(&self, handle: RigidBodyHandle) -> Result<[f32; 3]> {
        let v = self.body(handle)?.linvel();
        Ok([v.x, v.y, v.z])
    }

    /// Push a dynamic body with `force` held for `dt`, applied at `offset`
    /// from its centre of mass
    pub fn apply_push(
        &mut self,
        handle: RigidBodyHandle,
        force: [f32; 3],
        offset: [f32; 3],
        dt: f32,
    ) -> Result<()> {
        let body = self
            .bodies
            .get_mut(handle.0)
            .ok_or(PhysicsError::BodyNotFound(handle))?;
        let point = *body.center_of_mass() + rapier::Vector::new(offset[0], offset[1], offset[2]);
        let impulse = rapier::Vector::new(force[0], force[1], force[2]) * dt;
        body.apply_impulse_at_point(impulse, point, true);
        Ok(())
    }

    // ==================== Colliders ====================

    /// Create a collider, attached to `parent` when given
    pub fn create_collider(
        &mut self,
        desc: ColliderDesc,
        parent: Option<RigidBodyHandle>,
    ) -> ColliderHandle {
        let collider = desc.to_rapier_builder();
        let handle = if let Some(parent) = parent {
            self.colliders.insert_with_parent(collider, parent.0, &mut self.bodies)
        } else {
            self.colliders.insert(collider)
        };
        if desc.climbable {
            self.climbable.insert(handle);
        }
        self.query_pipeline.update(&self.colliders);
        ColliderHandle(handle)
    }

    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        self.colliders
            .remove(handle.0, &mut self.solver.islands, &mut self.bodies, true);
        self.climbable.remove(&handle.0);
        self.query_pipeline.update(&self.colliders);
    }

    /// Whether characters may climb this collider
    pub fn is_climbable(&self, handle: ColliderHandle) -> bool {
        self.climbable.contains(&handle.0)
    }

    pub fn set_climbable(&mut self, handle: ColliderHandle, climbable: bool) -> Result<()> {
        if !self.colliders.contains(handle.0) {
            return Err(PhysicsError::ColliderNotFound(handle));
        }
        if climbable {
            self.climbable.insert(handle.0);
        } else {
            self.climbable.remove(&handle.0);
        }
        Ok(())
    }

    /// The dynamic body a collider belongs to, if any
    pub fn dynamic_body_of(&self, handle: ColliderHandle) -> Option<DynamicBodyState> {
        let collider = self.colliders.get(handle.0)?;
        self.dynamic_body_state(RigidBodyHandle(collider.parent()?))
    }

    /// Current state of a dynamic body; `None` for missing or non-dynamic
    /// bodies. Bounce is the highest restitution among its colliders.
    pub fn dynamic_body_state(&self, handle: RigidBodyHandle) -> Option<DynamicBodyState> {
        let body = self.bodies.get(handle.0).filter(|body| body.is_dynamic())?;
        let velocity = body.linvel();
        let com = body.center_of_mass();
        let bounce = body
            .colliders()
            .iter()
            .filter_map(|collider| self.colliders.get(*collider))
            .map(|collider| collider.restitution())
            .fold(0.0f32, f32::max);
        Some(DynamicBodyState {
            handle,
            mass: body.mass(),
            linear_velocity: [velocity.x, velocity.y, velocity.z],
            center_of_mass: [com.x, com.y, com.z],
            bounce: (bounce > 0.0).then_some(bounce),
        })
    }

    // ==================== Simulation ====================

    /// Advance by `delta_time`, in whole fixed steps. Leftover time carries
    /// into the next call; at most `max_substeps` run per call.
    pub fn step(&mut self, delta_time: f32) {
        self.accumulator += delta_time;

        let mut substeps = 0;
        while self.accumulator >= self.config.timestep && substeps < self.config.max_substeps {
            self.solver.step(&mut self.bodies, &mut self.colliders);
            self.accumulator -= self.config.timestep;
            substeps += 1;
        }

        self.query_pipeline.update(&self.colliders);
    }

    pub fn query(&self) -> PhysicsQuery<'_> {
        PhysicsQuery {
            query_pipeline: &self.query_pipeline,
            colliders: &self.colliders,
            bodies: &self.bodies,
            world: self,
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}
