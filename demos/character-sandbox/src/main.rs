//! Headless character sandbox
//!
//! Runs a scripted walk through a small scene: a crate to push, a climbable
//! wall to scale and a jump off the top. Body state changes are logged as
//! they happen.
//!
//! Usage: RUST_LOG=info cargo run -p character-sandbox [mover-config.json]

use std::error::Error;

use void_character::prelude::*;
use void_physics::{
    CharacterDesc, ColliderDesc, ColliderShape, PhysicsConfig, PhysicsWorld, RigidBodyDesc,
    RigidBodyHandle,
};

const DT: f32 = 1.0 / 60.0;

/// One leg of the scripted walk
struct Phase {
    name: &'static str,
    ticks: usize,
    forward: f32,
    right: f32,
    jumping: bool,
}

const fn phase(name: &'static str, ticks: usize, forward: f32, right: f32, jumping: bool) -> Phase {
    Phase {
        name,
        ticks,
        forward,
        right,
        jumping,
    }
}

const SCRIPT: &[Phase] = &[
    phase("push crate", 90, 1.0, 0.0, false),
    phase("coast", 30, 0.0, 0.0, false),
    phase("walk to wall", 75, 0.0, 1.0, false),
    phase("hang", 30, 0.0, 0.0, false),
    phase("jump off", 20, 0.0, -1.0, true),
    phase("fall", 120, 0.0, 0.0, false),
];

fn load_config() -> std::result::Result<MoverConfig, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading mover config from {}", path);
            let text = std::fs::read_to_string(&path)?;
            Ok(MoverConfig::from_json(&text)?)
        }
        None => Ok(MoverConfig::default()),
    }
}

fn build_scene(world: &mut PhysicsWorld) -> RigidBodyHandle {
    let floor = world.create_rigid_body(RigidBodyDesc::fixed());
    world.create_collider(ColliderDesc::new(ColliderShape::cuboid(30.0, 0.5, 30.0)), Some(floor));

    let wall = world.create_rigid_body(RigidBodyDesc::fixed().with_position(8.2, 2.5, 0.0));
    world.create_collider(
        ColliderDesc::new(ColliderShape::cuboid(0.2, 2.0, 3.0)).with_climbable(true),
        Some(wall),
    );

    let crate_body = world.create_rigid_body(RigidBodyDesc::dynamic().with_position(0.0, 1.0, 4.0));
    world.create_collider(
        ColliderDesc::new(ColliderShape::cuboid(0.5, 0.5, 0.5)).with_density(20.0),
        Some(crate_body),
    );
    crate_body
}

fn main() -> std::result::Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = load_config()?;

    let mut world = PhysicsWorld::try_new(PhysicsConfig::default())?;
    let crate_body = build_scene(&mut world);
    world.step(DT);

    let player = world.create_character(CharacterDesc::default().with_position(0.0, 1.45, 0.0))?;
    let mut mover = MovementController::new(config);
    mover.bind_body(&world, player);

    let camera = FixedCamera::new(0.0);
    let mut tick = 0usize;
    for phase in SCRIPT {
        log::info!("Phase '{}' for {} ticks", phase.name, phase.ticks);
        mover.set_input(phase.forward, phase.right);
        mover.set_jumping(phase.jumping);

        for _ in 0..phase.ticks {
            mover.tick(&mut world, Some(&camera), DT);
            world.step(DT);
            tick += 1;

            for event in mover.drain_events() {
                match event {
                    MoverEvent::BodyStateChanged { old, new } => {
                        log::info!("[{:4}] {:?} -> {:?}", tick, old, new)
                    }
                    MoverEvent::ClimbableChanged { can_climb } => {
                        log::info!("[{:4}] can climb: {}", tick, can_climb)
                    }
                    MoverEvent::FastTurnToggled { enabled } => {
                        log::info!("[{:4}] fast turn: {}", tick, enabled)
                    }
                }
            }
        }

        log::info!(
            "Phase '{}' done: player at {:?}, state {:?}",
            phase.name,
            world.character_position(player)?,
            mover.state()
        );
    }

    log::info!("Crate ended at {:?}", world.body_position(crate_body)?);
    Ok(())
}
