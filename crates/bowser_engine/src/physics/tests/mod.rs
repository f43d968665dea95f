//! Whole-frame physics scenarios run through a real scene

mod contacts;

use crate::config::PhysicsConfig;
use crate::foundation::math::Vec3;
use crate::game::Frame;
use crate::input::Keyboard;
use crate::physics::collision::ColliderGeometry;
use crate::physics::forces::Surface;
use crate::scene::{Collider, Entity, Scene};

/// Run `frames` updates of length `delta`
pub(super) fn run(scene: &mut Scene, frames: u64, delta: f64) {
    let keyboard = Keyboard::new();
    for number in 1..=frames {
        scene.update(&Frame::new(delta, number, &keyboard));
    }
}

pub(super) fn scene_with(physics: PhysicsConfig) -> Scene {
    Scene::new("scenario", physics).unwrap()
}

/// Static 10x10 floor whose top surface sits at `height`
pub(super) fn floor(key: &str, height: f64, surface: Surface) -> Entity {
    Entity::new(key)
        .with_position(Vec3::new(0.0, height, 0.0))
        .with_surface(surface)
        .with_collider(Collider::new(key, ColliderGeometry::quad(5.0, 5.0).unwrap()))
}

/// Dynamic unit box that both emits and receives
pub(super) fn falling_box(position: Vec3, velocity: Vec3) -> Entity {
    Entity::new("box")
        .dynamic(true)
        .with_position(position)
        .with_velocity(velocity)
        .with_collider(
            Collider::new("body", ColliderGeometry::cuboid(Vec3::new(0.5, 0.5, 0.5)).unwrap())
                .receiving(true),
        )
}
