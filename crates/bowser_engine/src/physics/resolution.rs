//! Contact resolution
//!
//! Every vertex of every receiving collider of an entity is swept along a
//! ray from the entity's world position before integration to the vertex's
//! position after it. The first vertex whose ray strikes an emitting collider
//! of another entity is pushed back out along the struck surface's normal,
//! the response forces are accumulated, and the scan restarts from the top
//! with the corrected transform. The scan stops when no ray hits anything or
//! when the configured depth ceiling is reached.

use crate::foundation::math::Vec3;
use crate::physics::collision::Ray;
use crate::scene::{CollisionRecord, ColliderRegistry, Entity, RegistryHit, SceneContext};

/// How a resolution pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No receiving vertex penetrates anything any more
    Settled {
        /// Corrections applied
        contacts: usize,
    },
    /// The depth ceiling was reached with a contact still pending
    DepthExceeded {
        /// Corrections applied
        contacts: usize,
    },
}

impl Resolution {
    /// Corrections applied during the pass
    pub fn contacts(&self) -> usize {
        match *self {
            Self::Settled { contacts } | Self::DepthExceeded { contacts } => contacts,
        }
    }

    /// Whether the pass ended without pending contacts
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Settled { .. })
    }
}

struct Contact {
    receiver: String,
    vertex: Vec3,
    hit: RegistryHit,
}

/// Resolve the contacts `entity` makes after moving away from `origin`.
///
/// At most `max_resolution_depth` corrections are applied. Reaching the
/// ceiling leaves the entity where the last correction put it and logs a
/// warning.
pub fn handle_collisions(entity: &mut Entity, origin: Vec3, scene: &mut SceneContext<'_>) -> Resolution {
    let max_depth = scene.physics.max_resolution_depth;
    let epsilon = scene.physics.ray_epsilon;
    let mut contacts = 0;

    while let Some(contact) = find_contact(entity, origin, scene.registry, epsilon) {
        if contacts >= max_depth {
            log::warn!(
                "Entity '{}' still penetrating '{}' after {} corrections; resolution stopped",
                entity.key(),
                contact.hit.key,
                contacts
            );
            return Resolution::DepthExceeded { contacts };
        }

        resolve_contact(entity, contact, scene.registry);
        contacts += 1;
    }

    Resolution::Settled { contacts }
}

fn find_contact(
    entity: &Entity,
    origin: Vec3,
    registry: &ColliderRegistry,
    epsilon: f64,
) -> Option<Contact> {
    let owner = entity.id();
    entity.receiving_vertices().find_map(|(receiver, vertex)| {
        let (ray, length) = Ray::between(origin, vertex, epsilon)?;
        let hit = registry.raycast(&ray, length - epsilon, owner)?;
        Some(Contact {
            receiver: receiver.to_string(),
            vertex,
            hit,
        })
    })
}

fn resolve_contact(entity: &mut Entity, contact: Contact, registry: &mut ColliderRegistry) {
    let Contact { receiver, vertex, hit } = contact;
    let normal = hit.hit.normal;
    let overlap = hit.hit.point - vertex;
    let corrective = normal * overlap.dot(&normal);

    log::trace!(
        "Entity '{}' vertex {:?} hit '{}' of {}; correcting by {:?}",
        entity.key(),
        vertex,
        hit.key,
        hit.owner,
        corrective
    );
    entity.apply_correction(&corrective, registry);

    entity.record_contact(
        CollisionRecord {
            handle: hit.handle,
            owner: hit.owner,
            key: hit.key,
            receiver,
            point: hit.hit.point,
            normal,
            vertex,
            distance: hit.hit.distance,
        },
        hit.surface,
    );
}
