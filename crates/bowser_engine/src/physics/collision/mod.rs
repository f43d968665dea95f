//! Narrow-phase collision geometry
//!
//! # Architecture
//!
//! - **Model Space Storage**: collider shapes keep local coordinates
//! - **On-Demand Transformation**: shapes are moved to world space only for a query
//! - **Coordinate Decoupling**: geometry is shared (`Arc`) and independent of
//!   the transform of whichever entity owns it
//!
//! # Module Organization
//!
//! - [`primitives`] - Rays, bounding spheres, triangles
//! - [`geometry`] - Model-space collider shapes and their world-space view

pub mod primitives;
pub mod geometry;

pub use primitives::{Ray, RayHit, BoundingSphere, Triangle};
pub use geometry::{ColliderError, ColliderGeometry, WorldSpaceGeometry};
