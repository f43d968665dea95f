//! Sweep-and-correct contact resolution

use std::cell::Cell;
use std::rc::Rc;

use super::{falling_box, floor, run, scene_with};
use crate::behavior::{Behavior, BehaviorContext};
use crate::config::PhysicsConfig;
use crate::foundation::math::Vec3;
use crate::physics::collision::ColliderGeometry;
use crate::physics::forces::Surface;
use crate::scene::{Collider, Entity, Scene};
use approx::assert_relative_eq;

/// Counts collision hook invocations
struct ContactCounter {
    calls: Rc<Cell<usize>>,
}

impl Behavior for ContactCounter {
    fn on_collision(&mut self, _context: &mut BehaviorContext<'_>) {
        self.calls.set(self.calls.get() + 1);
    }
}

/// Static slab centered at `x`; its inner face sits half a unit closer to the origin
fn wall(key: &str, x: f64) -> Entity {
    Entity::new(key)
        .with_position(Vec3::new(x, 0.0, 0.0))
        .with_collider(Collider::new(
            key,
            ColliderGeometry::cuboid(Vec3::new(0.5, 2.0, 2.0)).unwrap(),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_onto_rough_elastic_floor() {
        let mut scene = scene_with(PhysicsConfig::default());
        scene.add(floor("ground", 0.0, Surface::new(0.5, 0.3)));
        let id = scene.add(falling_box(Vec3::new(0.13, 0.6, 0.07), Vec3::new(2.0, -4.0, 0.0)));

        run(&mut scene, 1, 0.1);

        let body = scene.entity(id).unwrap();
        assert_eq!(body.collisions().len(), 1);

        let forces = body.forces();
        assert_relative_eq!(forces.normal_force, Vec3::new(0.0, 4.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(forces.friction, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(forces.bounce_force, Vec3::new(0.0, 1.2, 0.0), epsilon = 1e-12);
        assert_relative_eq!(body.cof(), 0.5);

        // normal component cancelled then reflected at 0.3, tangential halved
        assert_relative_eq!(body.velocity(), Vec3::new(1.0, 1.2, 0.0), epsilon = 1e-12);

        // pushed back out so the bottom face rests on the floor
        assert_relative_eq!(body.position(), Vec3::new(0.33, 0.5, 0.07), epsilon = 1e-9);

        let contact = &body.collisions()[0];
        assert_eq!(contact.key, "ground");
        assert_eq!(contact.receiver, "body");
        assert_relative_eq!(contact.normal, Vec3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_collision_hook_fires_once() {
        let calls = Rc::new(Cell::new(0));
        let mut scene = scene_with(PhysicsConfig::default());
        scene.add(floor("ground", 0.0, Surface::default()));
        let id = scene.add(
            falling_box(Vec3::new(0.13, 0.6, 0.07), Vec3::new(0.0, -4.0, 0.0)).with_behavior(
                ContactCounter {
                    calls: Rc::clone(&calls),
                },
            ),
        );

        assert!(scene.entity(id).unwrap().collisions().is_empty());
        run(&mut scene, 1, 0.1);

        assert_eq!(scene.entity(id).unwrap().collisions().len(), 1);
        assert_eq!(calls.get(), 1);

        // velocity was cancelled, so the next frame has no contact
        run(&mut scene, 1, 0.1);
        assert!(scene.entity(id).unwrap().collisions().is_empty());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_resting_contact_under_gravity() {
        let physics = PhysicsConfig::default().with_gravity(Vec3::new(0.0, -0.5, 0.0));
        let mut scene = scene_with(physics);
        scene.add(floor("ground", 0.0, Surface::default()));
        let id = scene.add(falling_box(Vec3::new(0.13, 0.5, 0.07), Vec3::zeros()));

        for _ in 0..30 {
            run(&mut scene, 1, 0.1);
            let body = scene.entity(id).unwrap();
            assert_eq!(body.collisions().len(), 1);
            assert_relative_eq!(body.position().y, 0.5, epsilon = 1e-9);
            assert_relative_eq!(body.velocity().y, 0.0, epsilon = 1e-12);
        }
    }

    fn drop_through_two_floors(upper_first: bool) -> Scene {
        let mut scene = scene_with(PhysicsConfig::default());
        let upper = floor("upper", 0.0, Surface::new(0.1, 0.0));
        let lower = floor("lower", -0.2, Surface::new(0.9, 0.0));
        if upper_first {
            scene.add(upper);
            scene.add(lower);
        } else {
            scene.add(lower);
            scene.add(upper);
        }
        scene.add(falling_box(Vec3::new(0.13, 0.6, 0.07), Vec3::new(0.0, -6.0, 0.0)));
        run(&mut scene, 1, 0.1);
        scene
    }

    #[test]
    fn test_nearest_surface_wins_in_either_order() {
        let outcomes: Vec<_> = [true, false]
            .into_iter()
            .map(|upper_first| {
                let scene = drop_through_two_floors(upper_first);
                let body = scene.find_by_key("box").unwrap();
                (
                    body.position(),
                    body.velocity(),
                    body.cof(),
                    body.collisions().iter().map(|c| c.key.clone()).collect::<Vec<_>>(),
                )
            })
            .collect();

        let (position, velocity, cof, keys) = &outcomes[0];
        assert_eq!(keys, &["upper"]);
        assert_relative_eq!(position.y, 0.5, epsilon = 1e-9);
        assert_relative_eq!(*cof, 0.1);
        assert_relative_eq!(*velocity, Vec3::zeros(), epsilon = 1e-12);
        assert_eq!(outcomes[0], outcomes[1]);
    }

    #[test]
    fn test_wedge_stops_at_depth_ceiling() {
        let mut scene = scene_with(PhysicsConfig::default());
        scene.add(wall("left", -0.9));
        scene.add(wall("right", 0.9));
        let start = Vec3::new(0.0, 0.13, 0.0);
        let id = scene.add(falling_box(start, Vec3::zeros()));

        run(&mut scene, 1, 0.1);

        // the box is wider than the gap, every correction creates a new contact
        let body = scene.entity(id).unwrap();
        assert_eq!(body.collisions().len(), 8);
        assert!(body.position().x.abs() <= 0.1 + 1e-9);
        assert_relative_eq!(body.position().y, start.y);
        assert_relative_eq!(body.position().z, start.z);

        let keys: Vec<_> = body.collisions().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys[..4], ["left", "right", "left", "right"]);
    }

    #[test]
    fn test_wedge_honours_configured_depth() {
        let mut scene = scene_with(PhysicsConfig::default().with_max_resolution_depth(3));
        scene.add(wall("left", -0.9));
        scene.add(wall("right", 0.9));
        let id = scene.add(falling_box(Vec3::new(0.0, 0.13, 0.0), Vec3::zeros()));

        for _ in 0..10 {
            run(&mut scene, 1, 0.1);
            let body = scene.entity(id).unwrap();
            assert_eq!(body.collisions().len(), 3);
            assert!(body.position().x.abs() <= 0.2 + 1e-9);
        }
    }

    #[test]
    fn test_own_colliders_never_hit() {
        let mut scene = scene_with(PhysicsConfig::default());
        let id = scene.add(
            falling_box(Vec3::zeros(), Vec3::new(0.0, -1.0, 0.0)).with_collider(
                Collider::new("shield", ColliderGeometry::cuboid(Vec3::new(2.0, 2.0, 2.0)).unwrap()),
            ),
        );

        run(&mut scene, 5, 0.1);
        let body = scene.entity(id).unwrap();
        assert!(body.collisions().is_empty());
        assert_relative_eq!(body.position().y, -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_receive_only_sensor_is_not_struck() {
        let mut scene = scene_with(PhysicsConfig::default());
        scene.add(
            Entity::new("trigger").with_collider(
                Collider::new("trigger", ColliderGeometry::quad(5.0, 5.0).unwrap())
                    .emitting(false)
                    .receiving(true)
                    .zone(true),
            ),
        );
        let id = scene.add(falling_box(Vec3::new(0.13, 0.6, 0.07), Vec3::new(0.0, -4.0, 0.0)));

        run(&mut scene, 1, 0.1);
        assert!(scene.entity(id).unwrap().collisions().is_empty());
    }

    #[test]
    fn test_removed_floor_no_longer_collides() {
        let mut scene = scene_with(PhysicsConfig::default());
        let ground = scene.add(floor("ground", 0.0, Surface::default()));
        scene.remove(ground).unwrap();
        let id = scene.add(falling_box(Vec3::new(0.13, 0.6, 0.07), Vec3::new(0.0, -4.0, 0.0)));

        run(&mut scene, 1, 0.1);

        let body = scene.entity(id).unwrap();
        assert!(body.collisions().is_empty());
        assert_relative_eq!(body.position().y, 0.2, epsilon = 1e-12);
        assert_eq!(scene.collider_count(), 1);
        assert!(scene.entity(ground).is_none());
    }

    #[test]
    fn test_moved_static_floor_updates_registry() {
        let mut scene = scene_with(PhysicsConfig::default());
        let ground = scene.add(floor("ground", -10.0, Surface::default()));
        scene
            .entity_mut(ground)
            .unwrap()
            .set_position(Vec3::new(0.0, 0.0, 0.0));
        let id = scene.add(falling_box(Vec3::new(0.13, 0.6, 0.07), Vec3::new(0.0, -4.0, 0.0)));

        // the floor is updated before the box, so the box sees it at y = 0
        run(&mut scene, 1, 0.1);
        assert_eq!(scene.entity(id).unwrap().collisions().len(), 1);
        assert_relative_eq!(scene.entity(id).unwrap().position().y, 0.5, epsilon = 1e-9);
    }
}
