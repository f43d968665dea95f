//! Scene tree
//!
//! A [`Scene`] owns an ordered list of root [`Entity`] trees, the physics
//! constants they share and a [`ColliderRegistry`] of every emitting
//! collider attached anywhere in those trees.
//!
//! ## Architecture
//!
//! ```text
//! Game ──frame──▶ Scene ──SceneContext──▶ Entity (depth first)
//!                   │                        │
//!                   └── ColliderRegistry ◀───┘ world matrices, raycasts
//! ```
//!
//! Entities never hold a pointer back to their scene. While attached they
//! carry an [`EntityId`]; whatever they need from the scene is lent to them
//! for the duration of a call through [`SceneContext`].

mod collider;
mod entity;
mod loading;
mod registry;
mod scene_tree;

pub use collider::{Collidable, Collider, ColliderFlags};
pub use entity::{CollisionRecord, Entity, EntityId, EntityIds};
pub use loading::{LoadCompleter, LoadQueue, PendingInsert};
pub use registry::{ColliderRegistry, RegisteredCollider, RegistryHit};
pub use scene_tree::{Scene, SceneContext, SceneError, SceneHook};

use crate::foundation::math::Mat4;
use crate::game::Frame;

/// Something advanced once per frame
pub trait Updatable {
    /// Advance by one frame. `scene` is `None` while detached, in which case
    /// anything that needs gravity, drag or the registry is skipped.
    fn update(&mut self, frame: &Frame<'_>, scene: Option<&mut SceneContext<'_>>);
}

/// Something that joins and leaves a scene
pub trait SceneMember {
    /// Join the scene below a parent with world matrix `parent_world`.
    ///
    /// Assigns ids to the whole subtree and registers emitting colliders.
    /// Returns this member's id.
    fn attach(&mut self, scene: &mut SceneContext<'_>, parent_world: &Mat4) -> EntityId;

    /// Leave the scene, unregistering every collider of the subtree
    fn detach(&mut self, registry: &mut ColliderRegistry);

    /// Whether currently attached
    fn is_attached(&self) -> bool;
}
