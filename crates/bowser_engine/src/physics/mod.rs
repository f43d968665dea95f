//! Physics: integration and contact resolution
//!
//! - [`collision`] - Rays, triangles and model-space collider geometry
//! - [`forces`] - Kinematic state and per-frame force accumulators
//! - [`resolution`] - Sweep-and-correct contact resolution for one entity

pub mod collision;
pub mod forces;
pub mod resolution;

#[cfg(test)]
mod tests;

pub use collision::{BoundingSphere, ColliderError, ColliderGeometry, Ray, RayHit, Triangle};
pub use forces::{Body, Forces, Surface};
pub use resolution::{handle_collisions, Resolution};
