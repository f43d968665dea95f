//! Collider registry
//!
//! Every emitting collider attached to a scene lives here, keyed by a
//! generational [`ColliderHandle`]. Entities keep their handles and push fresh
//! world matrices in whenever their transform changes, so a raycast never has
//! to walk the entity tree.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::foundation::collections::{ColliderHandle, HandleMap};
use crate::foundation::math::Mat4;
use crate::physics::collision::{ColliderGeometry, Ray, RayHit};
use crate::physics::forces::Surface;
use super::collider::ColliderFlags;
use super::entity::EntityId;

/// A collider as seen by the registry
#[derive(Debug, Clone)]
pub struct RegisteredCollider {
    /// Entity that owns the collider
    pub owner: EntityId,
    /// Collider key, unique per owner
    pub key: String,
    /// Shared model-space shape
    pub geometry: Arc<ColliderGeometry>,
    /// Current world matrix (owner world * collider offset)
    pub world: Mat4,
    /// Response coefficients of the owner
    pub surface: Surface,
    /// Capability flags
    pub flags: ColliderFlags,
}

/// Nearest collider struck by a registry raycast
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryHit {
    /// Handle of the struck collider
    pub handle: ColliderHandle,
    /// Entity owning the struck collider
    pub owner: EntityId,
    /// Key of the struck collider
    pub key: String,
    /// Surface of the struck entity
    pub surface: Surface,
    /// Intersection details in world space
    pub hit: RayHit,
}

/// Generational store of emitting colliders
#[derive(Debug, Default)]
pub struct ColliderRegistry {
    colliders: HandleMap<ColliderHandle, RegisteredCollider>,
}

impl ColliderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a collider and return its handle
    pub fn register(&mut self, collider: RegisteredCollider) -> ColliderHandle {
        let owner = collider.owner;
        let handle = self.colliders.insert(collider);
        log::trace!("Registered collider {:?} for entity {}", handle, owner);
        handle
    }

    /// Remove a collider. Stale handles are ignored and return `None`.
    pub fn unregister(&mut self, handle: ColliderHandle) -> Option<RegisteredCollider> {
        let removed = self.colliders.remove(handle);
        if removed.is_some() {
            log::trace!("Unregistered collider {:?}", handle);
        }
        removed
    }

    /// Whether `handle` still refers to a live entry
    pub fn contains(&self, handle: ColliderHandle) -> bool {
        self.colliders.contains_key(handle)
    }

    /// Look up a registered collider
    pub fn get(&self, handle: ColliderHandle) -> Option<&RegisteredCollider> {
        self.colliders.get(handle)
    }

    /// Refresh world matrix and surface of a registered collider.
    ///
    /// Returns `false` when the handle is stale.
    pub fn update(&mut self, handle: ColliderHandle, world: Mat4, surface: Surface) -> bool {
        match self.colliders.get_mut(handle) {
            Some(entry) => {
                entry.world = world;
                entry.surface = surface;
                true
            }
            None => false,
        }
    }

    /// Number of registered colliders
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Whether no colliders are registered
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Iterate over all registered colliders
    pub fn iter(&self) -> impl Iterator<Item = (ColliderHandle, &RegisteredCollider)> {
        self.colliders.iter()
    }

    /// Nearest emitting collider hit by `ray` within `max_distance`.
    ///
    /// Colliders owned by `exclude_owner` are skipped. Only front faces
    /// count. Hits at the same distance are ordered by owner id and then by
    /// collider key, so the answer does not depend on registration order.
    pub fn raycast(
        &self,
        ray: &Ray,
        max_distance: f64,
        exclude_owner: Option<EntityId>,
    ) -> Option<RegistryHit> {
        let mut nearest: Option<(ColliderHandle, &RegisteredCollider, RayHit)> = None;

        for (handle, entry) in &self.colliders {
            if Some(entry.owner) == exclude_owner || !entry.flags.contains(ColliderFlags::EMIT) {
                continue;
            }

            // Cheap rejection before any triangle is transformed
            if !entry.geometry.world_bounds(&entry.world).intersects_segment(ray, max_distance) {
                continue;
            }
            let Some(hit) = entry.geometry.to_world_space(&entry.world).intersect_ray(ray, max_distance) else {
                continue;
            };

            let closer = match &nearest {
                None => true,
                Some((_, best, best_hit)) => {
                    compare_hits(&hit, entry, best_hit, best) == Ordering::Less
                }
            };
            if closer {
                nearest = Some((handle, entry, hit));
            }
        }

        nearest.map(|(handle, entry, hit)| RegistryHit {
            handle,
            owner: entry.owner,
            key: entry.key.clone(),
            surface: entry.surface,
            hit,
        })
    }
}

fn compare_hits(
    hit: &RayHit,
    entry: &RegisteredCollider,
    other_hit: &RayHit,
    other: &RegisteredCollider,
) -> Ordering {
    hit.distance
        .total_cmp(&other_hit.distance)
        .then_with(|| entry.owner.cmp(&other.owner))
        .then_with(|| entry.key.cmp(&other.key))
}
