//! Colliders attached to entities

use std::sync::Arc;

use bitflags::bitflags;

use crate::foundation::math::{Mat4, Vec3};
use crate::physics::collision::{ColliderError, ColliderGeometry};

bitflags! {
    /// Collider capabilities
    ///
    /// `EMIT` colliders are registered with the scene and can be struck.
    /// `RECEIVE` colliders sweep their vertices and get corrected when they
    /// strike something. `OFFENSIVE` and `ZONE` are gameplay markers carried
    /// for callers; resolution does not branch on them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColliderFlags: u8 {
        /// Deals damage or otherwise acts on what it touches
        const OFFENSIVE = 0b0001;
        /// Registered as a surface others can strike
        const EMIT      = 0b0010;
        /// Resolved against emitting surfaces
        const RECEIVE   = 0b0100;
        /// Pass-through volume
        const ZONE      = 0b1000;
    }
}

impl Default for ColliderFlags {
    fn default() -> Self {
        Self::EMIT
    }
}

/// Capability set of anything a raycast can be resolved against
pub trait Collidable {
    /// Model-space shape
    fn geometry(&self) -> &ColliderGeometry;

    /// Capability flags
    fn flags(&self) -> ColliderFlags;
}

/// A keyed shape owned by an entity
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    key: String,
    geometry: Arc<ColliderGeometry>,
    flags: ColliderFlags,
    offset: Vec3,
    visible: bool,
}

impl Collider {
    /// Emitting collider with the given shape
    pub fn new(key: impl Into<String>, geometry: ColliderGeometry) -> Self {
        Self::shared(key, Arc::new(geometry))
    }

    /// Collider reusing geometry shared with other colliders
    pub fn shared(key: impl Into<String>, geometry: Arc<ColliderGeometry>) -> Self {
        Self {
            key: key.into(),
            geometry,
            flags: ColliderFlags::default(),
            offset: Vec3::zeros(),
            visible: false,
        }
    }

    /// Build the shape from raw vertices and triangle indices.
    pub fn from_mesh(
        key: impl Into<String>,
        vertices: Vec<Vec3>,
        indices: Vec<u32>,
    ) -> Result<Self, ColliderError> {
        Ok(Self::new(key, ColliderGeometry::new(vertices, indices)?))
    }

    /// Replace all flags
    pub fn with_flags(mut self, flags: ColliderFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Toggle `EMIT`
    pub fn emitting(mut self, emit: bool) -> Self {
        self.flags.set(ColliderFlags::EMIT, emit);
        self
    }

    /// Toggle `RECEIVE`
    pub fn receiving(mut self, receive: bool) -> Self {
        self.flags.set(ColliderFlags::RECEIVE, receive);
        self
    }

    /// Toggle `OFFENSIVE`
    pub fn offensive(mut self, offensive: bool) -> Self {
        self.flags.set(ColliderFlags::OFFENSIVE, offensive);
        self
    }

    /// Toggle `ZONE`
    pub fn zone(mut self, zone: bool) -> Self {
        self.flags.set(ColliderFlags::ZONE, zone);
        self
    }

    /// Offset from the owning entity's origin
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Key, unique per owning entity
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Shared handle to the shape
    pub fn shared_geometry(&self) -> &Arc<ColliderGeometry> {
        &self.geometry
    }

    /// Offset from the owning entity's origin
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Whether the collider registers as a strikeable surface
    pub fn emits(&self) -> bool {
        self.flags.contains(ColliderFlags::EMIT)
    }

    /// Whether the collider is corrected when its vertices strike a surface
    pub fn receives(&self) -> bool {
        self.flags.contains(ColliderFlags::RECEIVE)
    }

    /// Debug visibility
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the collider's debug outline
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Matrix placing the collider inside its owner's frame
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.offset)
    }
}

impl Collidable for Collider {
    fn geometry(&self) -> &ColliderGeometry {
        &self.geometry
    }

    fn flags(&self) -> ColliderFlags {
        self.flags
    }
}
