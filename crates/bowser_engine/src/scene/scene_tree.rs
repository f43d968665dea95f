//! Scene: root entities, the collider registry and physics constants

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use crate::config::{Config, ConfigError, PhysicsConfig};
use crate::foundation::collections::ColliderHandle;
use crate::foundation::math::{Mat4, Vec3};
use crate::game::Frame;
use crate::input::KeyCode;
use super::collider::Collider;
use super::entity::{Entity, EntityId, EntityIds};
use super::loading::{LoadCompleter, LoadQueue, PendingInsert};
use super::registry::ColliderRegistry;
use super::{SceneMember, Updatable};

/// Errors raised by scene operations
#[derive(Error, Debug)]
pub enum SceneError {
    /// No entity with this id is attached to the scene
    #[error("no entity {0} in this scene")]
    UnknownEntity(EntityId),

    /// Mass must be positive and finite
    #[error("mass must be positive and finite, got {0}")]
    InvalidMass(f64),

    /// Physics constants failed validation
    #[error("invalid physics configuration: {0}")]
    Config(#[from] ConfigError),
}

/// What an entity borrows from its scene while it updates or attaches
pub struct SceneContext<'a> {
    /// Scene physics constants
    pub physics: &'a PhysicsConfig,
    /// Emitting colliders of the scene
    pub registry: &'a mut ColliderRegistry,
    /// Entity id allocator
    pub ids: &'a mut EntityIds,
}

/// Scene-level logic run once per frame after every root entity updated
pub trait SceneHook {
    /// Called at the end of [`Scene::update`]
    fn on_update(&mut self, scene: &mut Scene, frame: &Frame<'_>);
}

impl<F> SceneHook for F
where
    F: FnMut(&mut Scene, &Frame<'_>),
{
    fn on_update(&mut self, scene: &mut Scene, frame: &Frame<'_>) {
        self(scene, frame);
    }
}

/// A tree of entities sharing gravity, drag and a collider registry
pub struct Scene {
    key: String,
    physics: PhysicsConfig,
    entities: Vec<Entity>,
    registry: ColliderRegistry,
    ids: EntityIds,
    pending: LoadQueue,
    hooks: Vec<Box<dyn SceneHook>>,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("key", &self.key)
            .field("physics", &self.physics)
            .field("entities", &self.entities)
            .field("colliders", &self.registry.len())
            .field("pending", &self.pending.len())
            .field("hooks", &self.hooks.len())
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Empty scene with validated physics constants
    pub fn new(key: impl Into<String>, physics: PhysicsConfig) -> Result<Self, SceneError> {
        physics.validate()?;
        Ok(Self {
            key: key.into(),
            physics,
            entities: Vec::new(),
            registry: ColliderRegistry::new(),
            ids: EntityIds::default(),
            pending: LoadQueue::new(),
            hooks: Vec::new(),
        })
    }

    /// Empty scene with physics constants read from a `.toml` or `.ron` file
    pub fn from_config_file(key: impl Into<String>, path: &str) -> Result<Self, SceneError> {
        Self::new(key, PhysicsConfig::load_from_file(path)?)
    }

    /// Scene key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Physics constants
    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    /// Per-frame gravity
    pub fn gravity(&self) -> Vec3 {
        self.physics.gravity
    }

    /// Per-frame drag fraction
    pub fn drag(&self) -> f64 {
        self.physics.drag
    }

    /// Change gravity
    pub fn set_gravity(&mut self, gravity: Vec3) -> Result<(), SceneError> {
        let physics = self.physics.clone().with_gravity(gravity);
        physics.validate()?;
        self.physics = physics;
        Ok(())
    }

    /// Change drag; must stay in `[0, 1)`
    pub fn set_drag(&mut self, drag: f64) -> Result<(), SceneError> {
        let physics = self.physics.clone().with_drag(drag);
        physics.validate()?;
        self.physics = physics;
        Ok(())
    }

    /// Registered emitting colliders
    pub fn registry(&self) -> &ColliderRegistry {
        &self.registry
    }

    /// Number of registered emitting colliders
    pub fn collider_count(&self) -> usize {
        self.registry.len()
    }

    /// Root entities in update order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Entity anywhere in the tree
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find_map(|entity| entity.find(id))
    }

    /// Mutable entity anywhere in the tree.
    ///
    /// Colliders and children added through this reference join the scene
    /// when the entity next updates.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find_map(|entity| entity.find_mut(id))
    }

    /// Keys read by the behaviors of every attached entity
    pub fn watched_keys(&self) -> BTreeSet<KeyCode> {
        let mut keys = BTreeSet::new();
        for entity in &self.entities {
            entity.collect_watched_keys(&mut keys);
        }
        keys
    }

    /// First entity with `key`, depth first
    pub fn find_by_key(&self, key: &str) -> Option<&Entity> {
        self.entities.iter().find_map(|entity| entity.find_by_key(key))
    }

    /// Attach a root entity and its subtree
    pub fn add(&mut self, mut entity: Entity) -> EntityId {
        let mut context = SceneContext {
            physics: &self.physics,
            registry: &mut self.registry,
            ids: &mut self.ids,
        };
        let id = entity.attach(&mut context, &Mat4::identity());
        self.entities.push(entity);
        id
    }

    /// Attach `entity` as the last child of `parent`
    pub fn add_child(&mut self, parent: EntityId, mut entity: Entity) -> Result<EntityId, SceneError> {
        let Self {
            physics,
            entities,
            registry,
            ids,
            ..
        } = self;
        let parent_entity = entities
            .iter_mut()
            .find_map(|root| root.find_mut(parent))
            .ok_or(SceneError::UnknownEntity(parent))?;

        let mut context = SceneContext {
            physics,
            registry,
            ids,
        };
        let parent_world = *parent_entity.world_matrix();
        let id = entity.attach(&mut context, &parent_world);
        parent_entity.add_child(entity);
        Ok(id)
    }

    /// Add a collider to an entity and register it right away if it emits.
    ///
    /// Adding a collider identical to the one stored under the same key is a
    /// no-op. Returns the collider's registry handle, if it has one.
    pub fn add_collider(
        &mut self,
        id: EntityId,
        collider: Collider,
    ) -> Result<Option<ColliderHandle>, SceneError> {
        let key = collider.key().to_string();
        let Self {
            entities, registry, ..
        } = self;
        let entity = entities
            .iter_mut()
            .find_map(|root| root.find_mut(id))
            .ok_or(SceneError::UnknownEntity(id))?;

        entity.add_collider(collider);
        entity.sync_colliders(registry);
        Ok(entity.collider_handle(&key))
    }

    /// Remove a collider from an entity and drop its registry entry
    pub fn remove_collider(&mut self, id: EntityId, key: &str) -> Result<Option<Collider>, SceneError> {
        let Self {
            entities, registry, ..
        } = self;
        let entity = entities
            .iter_mut()
            .find_map(|root| root.find_mut(id))
            .ok_or(SceneError::UnknownEntity(id))?;

        let removed = entity.remove_collider(key);
        entity.sync_colliders(registry);
        Ok(removed)
    }

    /// Detach an entity and its subtree, dropping all of their colliders
    /// from the registry. The returned entity can be added again.
    pub fn remove(&mut self, id: EntityId) -> Result<Entity, SceneError> {
        let mut removed = match self.entities.iter().position(|entity| entity.id() == Some(id)) {
            Some(index) => self.entities.remove(index),
            None => self
                .entities
                .iter_mut()
                .find_map(|root| root.take_descendant(id))
                .ok_or(SceneError::UnknownEntity(id))?,
        };

        removed.detach(&mut self.registry);
        Ok(removed)
    }

    /// Park an entity that is still loading.
    ///
    /// It is inserted under `parent` (or as a root) at the first update after
    /// the returned completer fires. The id is reserved immediately.
    pub fn add_deferred(
        &mut self,
        parent: Option<EntityId>,
        mut entity: Entity,
    ) -> Result<(EntityId, LoadCompleter), SceneError> {
        if let Some(parent) = parent {
            if self.entity(parent).is_none() {
                return Err(SceneError::UnknownEntity(parent));
            }
        }

        let id = self.ids.allocate();
        entity.assign_id(id);
        let completer = self.pending.defer(id, parent, entity);
        Ok((id, completer))
    }

    /// Entities parked by [`Scene::add_deferred`] that have not completed
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Run `hook` at the end of every update, after the whole tree moved.
    ///
    /// Hooks run in registration order and may edit the scene freely.
    pub fn on_update(&mut self, hook: impl SceneHook + 'static) {
        self.hooks.push(Box::new(hook));
    }

    /// Show or hide the debug outline of every collider
    pub fn set_colliders_visible(&mut self, visible: bool) {
        for entity in &mut self.entities {
            entity.set_colliders_visible(visible);
        }
    }

    /// Run one frame: insert completed loads, then update every root entity
    /// and, through them, the whole tree.
    pub fn update(&mut self, frame: &Frame<'_>) {
        self.insert_loaded();

        let Self {
            physics,
            entities,
            registry,
            ids,
            ..
        } = self;
        let mut context = SceneContext {
            physics,
            registry,
            ids,
        };
        for entity in entities.iter_mut() {
            entity.update(frame, Some(&mut context));
        }

        self.run_hooks(frame);
    }

    fn run_hooks(&mut self, frame: &Frame<'_>) {
        if self.hooks.is_empty() {
            return;
        }

        let mut hooks = std::mem::take(&mut self.hooks);
        for hook in &mut hooks {
            hook.on_update(self, frame);
        }
        // Keep hooks registered while the others ran
        hooks.append(&mut self.hooks);
        self.hooks = hooks;
    }

    fn insert_loaded(&mut self) {
        for (id, PendingInsert { parent, entity }) in self.pending.drain_ready() {
            let inserted = match parent {
                None => {
                    self.add(entity);
                    Ok(id)
                }
                Some(parent) => self.add_child(parent, entity),
            };

            match inserted {
                Ok(id) => log::debug!("Inserted deferred entity {} into scene '{}'", id, self.key),
                Err(error) => log::warn!(
                    "Dropped deferred entity {} of scene '{}': {}",
                    id,
                    self.key,
                    error
                ),
            }
        }
    }
}
