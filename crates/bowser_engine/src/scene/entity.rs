//! Scene entities
//!
//! An [`Entity`] owns its kinematic state, a keyed set of colliders, an
//! ordered list of child entities and any attached behaviors. Dynamic
//! entities integrate their motion every frame and resolve the contacts their
//! receiving colliders make with emitting colliders registered in the scene.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::behavior::{Behavior, BehaviorContext};
use crate::foundation::collections::ColliderHandle;
use crate::foundation::math::{
    inverse_transform_vector, transform_point, translation_of, Mat4, Quat, Transform, Vec3,
};
use crate::game::Frame;
use crate::input::KeyCode;
use crate::physics::forces::{Body, Forces, Surface};
use crate::physics::resolution::{self, Resolution};
use super::collider::{Collidable, Collider};
use super::registry::{ColliderRegistry, RegisteredCollider};
use super::scene_tree::{SceneContext, SceneError};
use super::{SceneMember, Updatable};

/// Identifier assigned to an entity when it joins a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    /// Wrap a raw id
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id value
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic entity id allocator; ids are never reused within a scene
#[derive(Debug, Default)]
pub struct EntityIds {
    last: u64,
}

impl EntityIds {
    /// Next unused id
    pub fn allocate(&mut self) -> EntityId {
        self.last += 1;
        EntityId(self.last)
    }
}

/// One contact resolved during an entity's update
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionRecord {
    /// Struck collider
    pub handle: ColliderHandle,
    /// Entity owning the struck collider
    pub owner: EntityId,
    /// Key of the struck collider
    pub key: String,
    /// Key of this entity's collider whose vertex made the contact
    pub receiver: String,
    /// Intersection point in world space
    pub point: Vec3,
    /// World-space surface normal at the intersection
    pub normal: Vec3,
    /// World position of the penetrating vertex before correction
    pub vertex: Vec3,
    /// Distance along the sweep ray
    pub distance: f64,
}

#[derive(Debug, Clone)]
struct AttachedCollider {
    collider: Collider,
    handle: Option<ColliderHandle>,
}

#[derive(Clone, Copy)]
enum Hook {
    PreUpdate,
    Collision,
    PostUpdate,
}

/// A node of the scene tree
pub struct Entity {
    id: Option<EntityId>,
    key: String,
    transform: Transform,
    local: Mat4,
    parent_world: Mat4,
    world: Mat4,
    dirty: bool,
    dynamic: bool,
    body: Body,
    forces: Forces,
    surface: Surface,
    colliders: BTreeMap<String, AttachedCollider>,
    retired: Vec<ColliderHandle>,
    children: Vec<Entity>,
    collisions: Vec<CollisionRecord>,
    behaviors: Vec<Box<dyn Behavior>>,
    visible: bool,
    inherited_visible: bool,
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("transform", &self.transform)
            .field("dynamic", &self.dynamic)
            .field("body", &self.body)
            .field("surface", &self.surface)
            .field("colliders", &self.colliders.keys().collect::<Vec<_>>())
            .field("children", &self.children)
            .field("behaviors", &self.behaviors.len())
            .finish_non_exhaustive()
    }
}

impl Entity {
    /// Static, visible entity at the origin
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            id: None,
            key: key.into(),
            transform: Transform::identity(),
            local: Mat4::identity(),
            parent_world: Mat4::identity(),
            world: Mat4::identity(),
            dirty: false,
            dynamic: false,
            body: Body::default(),
            forces: Forces::default(),
            surface: Surface::default(),
            colliders: BTreeMap::new(),
            retired: Vec::new(),
            children: Vec::new(),
            collisions: Vec::new(),
            behaviors: Vec::new(),
            visible: true,
            inherited_visible: true,
        }
    }

    // Builders

    /// Make the entity integrate motion and resolve contacts
    pub fn dynamic(mut self, dynamic: bool) -> Self {
        self.dynamic = dynamic;
        self
    }

    /// Builder pattern: set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.set_position(position);
        self
    }

    /// Builder pattern: set rotation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.set_rotation(rotation);
        self
    }

    /// Builder pattern: set scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.set_scale(scale);
        self
    }

    /// Builder pattern: set velocity
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.body.velocity = velocity;
        self
    }

    /// Builder pattern: set mass
    pub fn with_mass(mut self, mass: f64) -> Result<Self, SceneError> {
        self.set_mass(mass)?;
        Ok(self)
    }

    /// Builder pattern: set the surface struck entities respond to
    pub fn with_surface(mut self, surface: Surface) -> Self {
        self.surface = surface;
        self
    }

    /// Builder pattern: add a collider
    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.add_collider(collider);
        self
    }

    /// Builder pattern: add a child
    pub fn with_child(mut self, child: Entity) -> Self {
        self.add_child(child);
        self
    }

    /// Builder pattern: attach a behavior
    pub fn with_behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.add_behavior(Box::new(behavior));
        self
    }

    // Accessors

    /// Id, once attached to a scene
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    /// Key given at construction
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Position in the parent's frame
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Rotation in the parent's frame
    pub fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    /// Scale in the parent's frame
    pub fn scale(&self) -> Vec3 {
        self.transform.scale
    }

    /// Local transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Velocity
    pub fn velocity(&self) -> Vec3 {
        self.body.velocity
    }

    /// Kinematic state
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Mutable kinematic state
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Mass
    pub fn mass(&self) -> f64 {
        self.body.mass
    }

    /// Surface exposed to entities striking this one
    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Force accumulators from the last integration
    pub fn forces(&self) -> &Forces {
        &self.forces
    }

    /// Friction accumulator carried into the next integration
    pub fn cof(&self) -> f64 {
        self.forces.cof
    }

    /// Whether the entity integrates motion
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Whether a transform change is waiting to be applied
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Visible, and every ancestor visible too
    pub fn is_visible(&self) -> bool {
        self.visible && self.inherited_visible
    }

    /// World matrix as of the last transform refresh
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world
    }

    /// World position as of the last transform refresh
    pub fn world_position(&self) -> Vec3 {
        translation_of(&self.world)
    }

    /// Contacts resolved during the last integration
    pub fn collisions(&self) -> &[CollisionRecord] {
        &self.collisions
    }

    /// Children in update order
    pub fn children(&self) -> &[Entity] {
        &self.children
    }

    /// Direct child by key
    pub fn child(&self, key: &str) -> Option<&Entity> {
        self.children.iter().find(|child| child.key == key)
    }

    /// Mutable direct child by key
    pub fn child_mut(&mut self, key: &str) -> Option<&mut Entity> {
        self.children.iter_mut().find(|child| child.key == key)
    }

    /// Collider by key
    pub fn collider(&self, key: &str) -> Option<&Collider> {
        self.colliders.get(key).map(|attached| &attached.collider)
    }

    /// Colliders in key order
    pub fn colliders(&self) -> impl Iterator<Item = &Collider> {
        self.colliders.values().map(|attached| &attached.collider)
    }

    /// Registry handle of a collider, while registered
    pub fn collider_handle(&self, key: &str) -> Option<ColliderHandle> {
        self.colliders.get(key).and_then(|attached| attached.handle)
    }

    /// Number of attached behaviors
    pub fn behavior_count(&self) -> usize {
        self.behaviors.len()
    }

    /// Add the keys read by behaviors anywhere in this subtree to `keys`
    pub fn collect_watched_keys(&self, keys: &mut BTreeSet<KeyCode>) {
        keys.extend(self.behaviors.iter().flat_map(|behavior| behavior.watched_keys()));
        for child in &self.children {
            child.collect_watched_keys(keys);
        }
    }

    // Mutators

    /// Move the entity; applied to static entities at their next update
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
        self.dirty = true;
    }

    /// Rotate the entity; applied to static entities at their next update
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.transform.rotation = rotation;
        self.dirty = true;
    }

    /// Scale the entity; applied to static entities at their next update
    pub fn set_scale(&mut self, scale: Vec3) {
        self.transform.scale = scale;
        self.dirty = true;
    }

    /// Overwrite velocity
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.body.velocity = velocity;
    }

    /// Queue a force for the next integration
    pub fn apply_force(&mut self, force: Vec3) {
        self.body.apply_force(force);
    }

    /// Change mass; must be positive and finite
    pub fn set_mass(&mut self, mass: f64) -> Result<(), SceneError> {
        if !(mass > 0.0 && mass.is_finite()) {
            return Err(SceneError::InvalidMass(mass));
        }
        self.body.mass = mass;
        Ok(())
    }

    /// Change the surface struck entities respond to
    pub fn set_surface(&mut self, surface: Surface) {
        self.surface = surface;
    }

    /// Switch between dynamic and static
    pub fn set_dynamic(&mut self, dynamic: bool) {
        self.dynamic = dynamic;
    }

    /// Show or hide the entity and, through it, its whole subtree
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.propagate_visibility();
    }

    /// Show or hide the debug outline of every collider in the subtree
    pub fn set_colliders_visible(&mut self, visible: bool) {
        for attached in self.colliders.values_mut() {
            attached.collider.set_visible(visible);
        }
        for child in &mut self.children {
            child.set_colliders_visible(visible);
        }
    }

    /// Append a child; it joins the scene at the parent's next update.
    pub fn add_child(&mut self, mut child: Entity) {
        child.inherited_visible = self.is_visible();
        child.propagate_visibility();
        self.children.push(child);
    }

    /// Add a collider, replacing any collider with the same key.
    ///
    /// Adding a collider identical to the one already stored under its key
    /// changes nothing, so an emitting collider is never registered twice.
    /// Returns the replaced collider.
    pub fn add_collider(&mut self, collider: Collider) -> Option<Collider> {
        if let Some(existing) = self.colliders.get(collider.key()) {
            if existing.collider == collider {
                return None;
            }
        }

        let key = collider.key().to_string();
        let previous = self.colliders.insert(
            key,
            AttachedCollider {
                collider,
                handle: None,
            },
        )?;
        self.retired.extend(previous.handle);
        Some(previous.collider)
    }

    /// Remove a collider; its registry entry is dropped at the next sync.
    pub fn remove_collider(&mut self, key: &str) -> Option<Collider> {
        let removed = self.colliders.remove(key)?;
        self.retired.extend(removed.handle);
        Some(removed.collider)
    }

    /// Attach a behavior
    pub fn add_behavior(&mut self, behavior: Box<dyn Behavior>) {
        self.behaviors.push(behavior);
    }

    // Tree queries

    /// This entity or a descendant by id
    pub fn find(&self, id: EntityId) -> Option<&Entity> {
        if self.id == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Mutable lookup of this entity or a descendant by id
    pub fn find_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if self.id == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// This entity or a descendant by key, depth first
    pub fn find_by_key(&self, key: &str) -> Option<&Entity> {
        if self.key == key {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_by_key(key))
    }

    /// Detach a descendant from the tree without touching the registry
    pub(crate) fn take_descendant(&mut self, id: EntityId) -> Option<Entity> {
        if let Some(index) = self.children.iter().position(|child| child.id == Some(id)) {
            return Some(self.children.remove(index));
        }
        self.children
            .iter_mut()
            .find_map(|child| child.take_descendant(id))
    }

    /// Reserve an id before the entity is attached
    pub(crate) fn assign_id(&mut self, id: EntityId) {
        self.id.get_or_insert(id);
    }

    // Transform and registry bookkeeping

    fn propagate_visibility(&mut self) {
        let visible = self.is_visible();
        for child in &mut self.children {
            child.inherited_visible = visible;
            child.propagate_visibility();
        }
    }

    fn recompute_local(&mut self) {
        self.local = self.transform.to_matrix();
    }

    /// Recompute world matrices for the subtree and push them to the registry.
    fn refresh_world(&mut self, mut registry: Option<&mut ColliderRegistry>) {
        self.world = self.parent_world * self.local;
        if let Some(registry) = registry.as_deref_mut() {
            self.sync_colliders(registry);
        }

        let world = self.world;
        for child in &mut self.children {
            child.parent_world = world;
            child.refresh_world(registry.as_deref_mut());
        }
    }

    /// Flush retired handles, register new emitters, refresh live entries.
    pub(crate) fn sync_colliders(&mut self, registry: &mut ColliderRegistry) {
        for handle in self.retired.drain(..) {
            registry.unregister(handle);
        }

        let Some(owner) = self.id else {
            return;
        };

        for attached in self.colliders.values_mut() {
            let world = self.world * attached.collider.local_matrix();
            if let Some(handle) = attached.handle {
                if registry.update(handle, world, self.surface) {
                    continue;
                }
            }

            attached.handle = attached.collider.emits().then(|| {
                registry.register(RegisteredCollider {
                    owner,
                    key: attached.collider.key().to_string(),
                    geometry: attached.collider.shared_geometry().clone(),
                    world,
                    surface: self.surface,
                    flags: attached.collider.flags(),
                })
            });
        }
    }

    /// Register what was added since the last sync and attach new children.
    fn attach_pending(&mut self, scene: &mut SceneContext<'_>) {
        if self.id.is_none() {
            return;
        }
        self.sync_colliders(scene.registry);

        let world = self.world;
        for child in &mut self.children {
            if child.id.is_none() {
                child.attach(scene, &world);
            }
        }
    }

    /// World positions of every vertex of every receiving collider,
    /// colliders in key order and vertices in geometry order.
    pub(crate) fn receiving_vertices(&self) -> impl Iterator<Item = (&str, Vec3)> + '_ {
        self.colliders
            .values()
            .filter(|attached| attached.collider.receives())
            .flat_map(move |attached| {
                let matrix = self.world * attached.collider.local_matrix();
                attached
                    .collider
                    .shared_geometry()
                    .vertices()
                    .iter()
                    .map(move |vertex| (attached.collider.key(), transform_point(&matrix, vertex)))
            })
    }

    /// Shift the entity by a world-space vector, mapped through the inverse
    /// of its own world rotation and scale.
    pub(crate) fn apply_correction(&mut self, correction: &Vec3, registry: &mut ColliderRegistry) {
        match inverse_transform_vector(&self.world, correction) {
            Some(local) => {
                self.transform.position += local;
                self.recompute_local();
                self.refresh_world(Some(registry));
            }
            None => log::warn!(
                "Entity '{}' has a singular transform; positional correction skipped",
                self.key
            ),
        }
    }

    /// Accumulate the response to a contact and keep its record.
    pub(crate) fn record_contact(&mut self, record: CollisionRecord, surface: Surface) {
        self.forces
            .record_contact(&record.normal, &self.body.velocity, surface);
        self.collisions.push(record);
    }

    // Update

    fn run_behaviors(&mut self, hook: Hook, frame: &Frame<'_>) {
        if self.behaviors.is_empty() {
            return;
        }

        let mut behaviors = std::mem::take(&mut self.behaviors);
        let mut context = BehaviorContext {
            key: &self.key,
            position: self.transform.position,
            body: &mut self.body,
            collisions: &self.collisions,
            frame: *frame,
        };
        for behavior in &mut behaviors {
            match hook {
                Hook::PreUpdate => behavior.pre_update(&mut context),
                Hook::Collision => behavior.on_collision(&mut context),
                Hook::PostUpdate => behavior.post_update(&mut context),
            }
        }
        self.behaviors = behaviors;
    }

    /// Integrate one frame and resolve the resulting contacts.
    fn step(&mut self, frame: &Frame<'_>, origin: Vec3, scene: &mut SceneContext<'_>) -> Resolution {
        let displacement = self
            .body
            .integrate(scene.physics.gravity, self.forces.cof, frame.delta);
        self.transform.position += displacement;
        self.dirty = false;
        self.recompute_local();
        self.refresh_world(Some(scene.registry));

        self.forces.begin_frame();
        self.collisions.clear();

        let outcome = resolution::handle_collisions(self, origin, scene);

        if !self.collisions.is_empty() {
            self.body.velocity += self.forces.contact_response();
            self.run_behaviors(Hook::Collision, frame);
        }

        self.forces
            .apply_drag(&mut self.body.velocity, scene.physics.drag);
        outcome
    }
}

impl Updatable for Entity {
    fn update(&mut self, frame: &Frame<'_>, mut scene: Option<&mut SceneContext<'_>>) {
        let origin = self.world_position();
        if let Some(scene) = scene.as_deref_mut() {
            self.attach_pending(scene);
        }

        self.run_behaviors(Hook::PreUpdate, frame);

        if self.dynamic {
            match scene.as_deref_mut() {
                Some(scene) if self.id.is_some() => {
                    self.step(frame, origin, scene);
                }
                _ => log::trace!("Entity '{}' is not in a scene; integration skipped", self.key),
            }
        } else if self.dirty {
            self.dirty = false;
            self.recompute_local();
            self.refresh_world(scene.as_deref_mut().map(|scene| &mut *scene.registry));
        }

        self.run_behaviors(Hook::PostUpdate, frame);

        for child in &mut self.children {
            child.update(frame, scene.as_deref_mut());
        }
    }
}

impl SceneMember for Entity {
    fn attach(&mut self, scene: &mut SceneContext<'_>, parent_world: &Mat4) -> EntityId {
        let id = *self.id.get_or_insert_with(|| scene.ids.allocate());
        self.parent_world = *parent_world;
        self.dirty = false;
        self.recompute_local();
        self.world = self.parent_world * self.local;
        self.sync_colliders(scene.registry);

        let world = self.world;
        for child in &mut self.children {
            child.attach(scene, &world);
        }
        log::debug!("Attached entity '{}' as {}", self.key, id);
        id
    }

    fn detach(&mut self, registry: &mut ColliderRegistry) {
        for handle in self.retired.drain(..) {
            registry.unregister(handle);
        }
        for attached in self.colliders.values_mut() {
            if let Some(handle) = attached.handle.take() {
                registry.unregister(handle);
            }
        }
        for child in &mut self.children {
            child.detach(registry);
        }
        if let Some(id) = self.id.take() {
            log::debug!("Detached entity '{}' ({})", self.key, id);
        }
    }

    fn is_attached(&self) -> bool {
        self.id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::input::Keyboard;
    use crate::physics::collision::ColliderGeometry;
    use crate::scene::ColliderFlags;
    use approx::assert_relative_eq;

    fn unit_box(key: &str) -> Collider {
        Collider::new(key, ColliderGeometry::cuboid(Vec3::new(0.5, 0.5, 0.5)).unwrap())
    }

    #[test]
    fn test_detached_dynamic_entity_is_not_integrated() {
        let keyboard = Keyboard::new();
        let mut entity = Entity::new("loose")
            .dynamic(true)
            .with_velocity(Vec3::new(1.0, 0.0, 0.0));

        entity.update(&Frame::new(1.0, 1, &keyboard), None);

        assert_eq!(entity.position(), Vec3::zeros());
        assert_eq!(entity.velocity(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_detached_static_entity_applies_pending_transform() {
        let keyboard = Keyboard::new();
        let mut entity = Entity::new("sign").with_position(Vec3::new(0.0, 2.0, 0.0));
        assert!(entity.is_dirty());

        entity.update(&Frame::new(1.0, 1, &keyboard), None);

        assert!(!entity.is_dirty());
        assert_relative_eq!(entity.world_position(), Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_mass_must_be_positive() {
        assert!(matches!(
            Entity::new("ghost").with_mass(0.0),
            Err(SceneError::InvalidMass(_))
        ));
        assert!(Entity::new("ghost").set_mass(f64::NAN).is_err());
        assert_eq!(Entity::new("rock").with_mass(3.0).unwrap().mass(), 3.0);
    }

    #[test]
    fn test_same_collider_twice_is_a_no_op() {
        let mut entity = Entity::new("crate");
        assert!(entity.add_collider(unit_box("body")).is_none());
        assert!(entity.add_collider(unit_box("body")).is_none());
        assert_eq!(entity.colliders().count(), 1);

        let moved = unit_box("body").with_offset(Vec3::y());
        assert!(entity.add_collider(moved).is_some());
        assert_eq!(entity.collider("body").map(Collider::offset), Some(Vec3::y()));
    }

    #[test]
    fn test_visibility_propagates_to_subtree() {
        let mut root = Entity::new("root").with_child(Entity::new("arm").with_child(Entity::new("hand")));

        root.set_visible(false);
        let hand = root.find_by_key("hand").unwrap();
        assert!(!hand.is_visible());

        root.set_visible(true);
        assert!(root.find_by_key("hand").unwrap().is_visible());

        root.child_mut("arm").unwrap().set_visible(false);
        assert!(root.is_visible());
        assert!(!root.find_by_key("hand").unwrap().is_visible());

        // A child added under a hidden parent starts hidden
        root.child_mut("arm").unwrap().add_child(Entity::new("glove"));
        assert!(!root.find_by_key("glove").unwrap().is_visible());
    }

    #[test]
    fn test_collider_visibility_toggles_subtree() {
        let mut root = Entity::new("root")
            .with_collider(unit_box("body"))
            .with_child(Entity::new("arm").with_collider(unit_box("arm")));

        root.set_colliders_visible(true);
        assert!(root.collider("body").unwrap().is_visible());
        assert!(root.child("arm").unwrap().collider("arm").unwrap().is_visible());
    }

    #[test]
    fn test_attach_assigns_ids_and_registers_emitters() {
        let physics = PhysicsConfig::default();
        let mut registry = ColliderRegistry::new();
        let mut ids = EntityIds::default();
        let mut scene = SceneContext {
            physics: &physics,
            registry: &mut registry,
            ids: &mut ids,
        };

        let mut root = Entity::new("root")
            .with_collider(unit_box("body"))
            .with_collider(unit_box("sensor").emitting(false).receiving(true))
            .with_child(Entity::new("arm").with_collider(unit_box("arm")));
        root.attach(&mut scene, &Mat4::identity());

        assert_eq!(root.id(), Some(EntityId::from_raw(1)));
        assert_eq!(root.child("arm").and_then(Entity::id), Some(EntityId::from_raw(2)));
        assert!(root.collider_handle("body").is_some());
        assert!(root.collider_handle("sensor").is_none());
        assert_eq!(registry.len(), 2);

        root.detach(&mut registry);
        assert!(registry.is_empty());
        assert!(!root.is_attached());
        assert!(root.child("arm").unwrap().id().is_none());
    }

    #[test]
    fn test_registered_entry_carries_collider_flags() {
        let physics = PhysicsConfig::default();
        let mut registry = ColliderRegistry::new();
        let mut ids = EntityIds::default();
        let mut scene = SceneContext {
            physics: &physics,
            registry: &mut registry,
            ids: &mut ids,
        };

        let mut spikes = Entity::new("spikes")
            .with_surface(Surface::new(0.2, 0.1))
            .with_collider(unit_box("blade").offensive(true).receiving(true));
        spikes.attach(&mut scene, &Mat4::identity());

        let handle = spikes.collider_handle("blade").unwrap();
        let entry = registry.get(handle).unwrap();
        assert_eq!(
            entry.flags,
            ColliderFlags::EMIT | ColliderFlags::RECEIVE | ColliderFlags::OFFENSIVE
        );
        assert_eq!(entry.owner, spikes.id().unwrap());
        assert_eq!(entry.surface, Surface::new(0.2, 0.1));
    }

    #[test]
    fn test_child_world_follows_parent() {
        let physics = PhysicsConfig::default();
        let mut registry = ColliderRegistry::new();
        let mut ids = EntityIds::default();
        let mut scene = SceneContext {
            physics: &physics,
            registry: &mut registry,
            ids: &mut ids,
        };

        let mut root = Entity::new("root")
            .with_position(Vec3::new(1.0, 0.0, 0.0))
            .with_scale(Vec3::new(2.0, 2.0, 2.0))
            .with_child(Entity::new("arm").with_position(Vec3::new(0.0, 1.0, 0.0)));
        root.attach(&mut scene, &Mat4::identity());

        assert_relative_eq!(
            root.child("arm").unwrap().world_position(),
            Vec3::new(1.0, 2.0, 0.0),
            epsilon = 1e-12
        );
    }
}
