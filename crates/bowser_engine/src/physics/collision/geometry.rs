//! Collider geometry
//!
//! Shapes are stored in model space and only transformed to world space when
//! a ray is cast against them, so a moving collider never rewrites its
//! vertex data.

use thiserror::Error;

use crate::foundation::math::{transform_point, translation_of, Mat4, Vec3};
use super::primitives::{BoundingSphere, Ray, RayHit, Triangle};

/// Errors raised while building collider geometry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColliderError {
    /// Geometry has no vertices at all
    #[error("collider geometry has no vertices")]
    EmptyGeometry,

    /// Index buffer does not describe whole triangles
    #[error("index count {0} is not a multiple of 3")]
    PartialTriangle(usize),

    /// An index points past the end of the vertex list
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending index
        index: u32,
        /// Number of vertices available
        vertex_count: usize,
    },

    /// A vertex coordinate is NaN or infinite
    #[error("vertex {0} has a non-finite coordinate")]
    NonFiniteVertex(usize),
}

/// Model-space collider shape: vertices plus optional triangle indices.
///
/// Vertices drive the sweep test of a receiving collider. Triangles are what
/// an emitting collider exposes to raycasts; a shape without indices can
/// receive but never be struck.
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderGeometry {
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
    local_bounding_radius: f64,
}

impl ColliderGeometry {
    /// Build geometry from model-space vertices and triangle indices.
    pub fn new(vertices: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, ColliderError> {
        if vertices.is_empty() {
            return Err(ColliderError::EmptyGeometry);
        }
        if indices.len() % 3 != 0 {
            return Err(ColliderError::PartialTriangle(indices.len()));
        }
        if let Some(position) = vertices
            .iter()
            .position(|v| !v.iter().all(|c| c.is_finite()))
        {
            return Err(ColliderError::NonFiniteVertex(position));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(ColliderError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            });
        }

        let local_bounding_radius = vertices
            .iter()
            .map(Vec3::norm)
            .fold(0.0, f64::max);

        Ok(Self {
            vertices,
            indices,
            local_bounding_radius,
        })
    }

    /// Vertex-only geometry; useful for sensor points that receive contacts.
    pub fn points(vertices: Vec<Vec3>) -> Result<Self, ColliderError> {
        Self::new(vertices, Vec::new())
    }

    /// Axis-aligned box centered on the origin with outward-facing triangles.
    pub fn cuboid(half_extents: Vec3) -> Result<Self, ColliderError> {
        let (x, y, z) = (half_extents.x, half_extents.y, half_extents.z);
        let vertices = vec![
            Vec3::new(-x, -y, -z),
            Vec3::new(x, -y, -z),
            Vec3::new(x, y, -z),
            Vec3::new(-x, y, -z),
            Vec3::new(-x, -y, z),
            Vec3::new(x, -y, z),
            Vec3::new(x, y, z),
            Vec3::new(-x, y, z),
        ];
        let indices = vec![
            4, 5, 6, 4, 6, 7, // +z
            0, 2, 1, 0, 3, 2, // -z
            1, 2, 6, 1, 6, 5, // +x
            0, 4, 7, 0, 7, 3, // -x
            3, 7, 6, 3, 6, 2, // +y
            0, 1, 5, 0, 5, 4, // -y
        ];
        Self::new(vertices, indices)
    }

    /// Horizontal rectangle in the XZ plane whose front face points up (+Y).
    pub fn quad(half_width: f64, half_depth: f64) -> Result<Self, ColliderError> {
        let vertices = vec![
            Vec3::new(-half_width, 0.0, -half_depth),
            Vec3::new(half_width, 0.0, -half_depth),
            Vec3::new(half_width, 0.0, half_depth),
            Vec3::new(-half_width, 0.0, half_depth),
        ];
        Self::new(vertices, vec![0, 3, 2, 0, 2, 1])
    }

    /// Model-space vertices
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Number of triangles exposed to raycasts
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Radius of the model-space bounding sphere around the origin
    pub fn local_bounding_radius(&self) -> f64 {
        self.local_bounding_radius
    }

    /// Bounding sphere of this shape once placed by `matrix`
    pub fn world_bounds(&self, matrix: &Mat4) -> BoundingSphere {
        BoundingSphere::new(
            translation_of(matrix),
            self.local_bounding_radius * max_axis_scale(matrix),
        )
    }

    /// Transform this shape to world space with `matrix`.
    pub fn to_world_space(&self, matrix: &Mat4) -> WorldSpaceGeometry {
        let triangles = self
            .indices
            .chunks_exact(3)
            .map(|tri| {
                Triangle::new(
                    transform_point(matrix, &self.vertices[tri[0] as usize]),
                    transform_point(matrix, &self.vertices[tri[1] as usize]),
                    transform_point(matrix, &self.vertices[tri[2] as usize]),
                )
            })
            .collect();

        WorldSpaceGeometry {
            triangles,
            bounds: self.world_bounds(matrix),
        }
    }
}

/// Largest stretch the linear part of `matrix` applies to any basis axis.
fn max_axis_scale(matrix: &Mat4) -> f64 {
    (0..3)
        .map(|column| matrix.fixed_view::<3, 1>(0, column).norm())
        .fold(0.0, f64::max)
}

/// World-space triangles, created on demand for a single query
#[derive(Debug)]
pub struct WorldSpaceGeometry {
    /// Triangles in world space
    pub triangles: Vec<Triangle>,
    /// Bounding sphere in world space
    pub bounds: BoundingSphere,
}

impl WorldSpaceGeometry {
    /// Nearest front-facing hit within `max_distance`, if any.
    pub fn intersect_ray(&self, ray: &Ray, max_distance: f64) -> Option<RayHit> {
        if !self.bounds.intersects_segment(ray, max_distance) {
            return None;
        }

        self.triangles
            .iter()
            .filter_map(|triangle| triangle.intersect_front(ray, max_distance))
            .fold(None, |closest: Option<RayHit>, hit| match closest {
                Some(best) if best.distance <= hit.distance => Some(best),
                _ => Some(hit),
            })
    }
}
