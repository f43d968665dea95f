//! Drop demo
//!
//! Drops a crate onto a floor, lets it settle, makes it jump and logs every
//! contact along the way. Pass a `.toml` or `.ron` physics file as the first
//! argument to override the default gravity and drag.

use bowser_engine::foundation::logging;
use bowser_engine::prelude::*;

const FRAME_TIME: f64 = 1.0 / 60.0;
const FRAMES: u64 = 240;
const JUMP_PRESS: u64 = 90;
const JUMP_RELEASE: u64 = 100;

fn build_scene(physics: PhysicsConfig) -> Result<(Scene, EntityId), Box<dyn std::error::Error>> {
    let mut scene = Scene::new("drop", physics)?;

    scene.add(
        Entity::new("floor")
            .with_surface(Surface::new(0.4, 0.2))
            .with_collider(Collider::new("floor", ColliderGeometry::quad(20.0, 20.0)?)),
    );

    let crate_id = scene.add(
        Entity::new("crate")
            .dynamic(true)
            .with_mass(2.0)?
            .with_position(Vec3::new(0.13, 4.0, 0.07))
            .with_velocity(Vec3::new(1.0, 0.0, 0.0))
            .with_collider(
                Collider::new("body", ColliderGeometry::cuboid(Vec3::new(0.5, 0.5, 0.5))?)
                    .receiving(true),
            )
            .with_behavior(JumpBehavior::new(KeyCode::Space).with_potential(20.0)),
    );

    Ok((scene, crate_id))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_default("info");

    let physics = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading physics from {}", path);
            PhysicsConfig::load_from_file(&path)?
        }
        None => PhysicsConfig::default().with_gravity(Vec3::new(0.0, -0.3, 0.0)),
    };

    let (scene, crate_id) = build_scene(physics)?;
    let mut game = Game::new();
    game.add_scene(scene);

    for number in 1..=FRAMES {
        match number {
            JUMP_PRESS => game.keyboard_mut().press(KeyCode::Space),
            JUMP_RELEASE => game.keyboard_mut().release(KeyCode::Space),
            _ => {}
        }
        game.update_with_delta(FRAME_TIME);

        let Some(body) = game.scene("drop").and_then(|scene| scene.entity(crate_id)) else {
            log::error!("Crate left the scene at frame {}", number);
            break;
        };
        for contact in body.collisions() {
            log::info!(
                "Frame {}: '{}' hit '{}' of {} at {:?}",
                number,
                contact.receiver,
                contact.key,
                contact.owner,
                contact.point
            );
        }
        log::debug!(
            "Frame {}: position {:?}, velocity {:?}",
            number,
            body.position(),
            body.velocity()
        );
    }

    if let Some(body) = game.scene("drop").and_then(|scene| scene.entity(crate_id)) {
        log::info!(
            "Finished after {} frames with the crate at {:?}",
            game.frame(),
            body.position()
        );
    }
    Ok(())
}
