//! # Bowser Engine
//!
//! Scene-graph core for small 3D games: entities arranged in trees, simple
//! per-frame integration and raycast-based collision resolution.
//!
//! ## Features
//!
//! - **Scene Tree**: Entities own their children, colliders and behaviors
//! - **Physics**: Gravity, drag, friction and restitution per entity
//! - **Collision**: Sweep-and-correct contacts against triangle colliders
//! - **Input**: Per-frame key states with hit, lift, hold and analog ramp
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bowser_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut scene = Scene::new("level", PhysicsConfig::default())?;
//!     scene.add(
//!         Entity::new("floor")
//!             .with_collider(Collider::new("floor", ColliderGeometry::quad(10.0, 10.0)?)),
//!     );
//!     let crate_id = scene.add(
//!         Entity::new("crate")
//!             .dynamic(true)
//!             .with_position(Vec3::new(0.0, 3.0, 0.0))
//!             .with_collider(
//!                 Collider::new("body", ColliderGeometry::cuboid(Vec3::new(0.5, 0.5, 0.5))?)
//!                     .receiving(true),
//!             ),
//!     );
//!
//!     let mut game = Game::new();
//!     game.add_scene(scene);
//!     for _ in 0..120 {
//!         game.update_with_delta(1.0 / 60.0);
//!     }
//!
//!     let resting = game.scene("level").and_then(|scene| scene.entity(crate_id));
//!     println!("{:?}", resting.map(Entity::position));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod behavior;
pub mod config;
pub mod foundation;
pub mod game;
pub mod input;
pub mod physics;
pub mod scene;

pub use game::{Frame, Game};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        behavior::{Behavior, BehaviorContext, JumpBehavior, JumpPhase},
        config::{Config, ConfigError, PhysicsConfig},
        foundation::{
            collections::ColliderHandle,
            math::{Quat, Transform, Vec3},
            time::Timer,
        },
        game::{Frame, Game},
        input::{KeyCode, KeyState, Keyboard, Modifiers},
        physics::{ColliderGeometry, Resolution, Surface},
        scene::{Collider, ColliderFlags, CollisionRecord, Entity, EntityId, Scene, SceneError, SceneHook},
    };
}
