//! Primitive collision shapes and intersection algorithms
//!
//! Rays, bounding spheres and triangles in world space. Everything here is
//! plain double-precision math with no knowledge of entities or registries.

use crate::foundation::math::Vec3;

/// A ray for vertex sweeps and picking
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray from `from` towards `to`, together with the distance between them.
    ///
    /// Returns `None` for a segment shorter than `min_length`, which has no
    /// usable direction.
    pub fn between(from: Vec3, to: Vec3, min_length: f64) -> Option<(Self, f64)> {
        let delta = to - from;
        let length = delta.norm();
        if !(length > min_length) {
            return None;
        }

        Some((
            Self {
                origin: from,
                direction: delta / length,
            },
            length,
        ))
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a ray intersection test against a surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The distance from the ray origin to the hit point
    pub distance: f64,
    /// The point of intersection in world space
    pub point: Vec3,
    /// The unit surface normal at the intersection point
    pub normal: Vec3,
}

/// A bounding sphere used to reject rays before triangle tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f64,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Whether `point` lies inside or on the sphere
    pub fn contains(&self, point: &Vec3) -> bool {
        (point - self.center).norm_squared() <= self.radius * self.radius
    }

    /// Test whether the ray segment `[0, max_distance]` touches this sphere.
    pub fn intersects_segment(&self, ray: &Ray, max_distance: f64) -> bool {
        if self.contains(&ray.origin) {
            return true;
        }

        // Solve |origin + t*direction - center|^2 = radius^2 for a unit direction
        let oc = ray.origin - self.center;
        let b = oc.dot(&ray.direction);
        let c = oc.norm_squared() - self.radius * self.radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return false;
        }

        let t = -b - discriminant.sqrt();
        t >= 0.0 && t <= max_distance
    }
}

/// A triangle for collision detection
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    /// Triangle vertices in world space
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Calculates the normal of the triangle (right-hand rule)
    pub fn normal(&self) -> Vec3 {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).normalize()
    }

    /// Möller-Trumbore ray-triangle intersection algorithm
    /// Returns (t, u, v) barycentric coordinates if hit, None otherwise
    ///
    /// See: "Fast, Minimum Storage Ray/Triangle Intersection" by Möller & Trumbore
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f64, f64, f64)> {
        const EPSILON: f64 = 1e-12;

        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(&edge2);
        let a = edge1.dot(&h);

        // Ray parallel to triangle
        if a.abs() < EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = f * ray.direction.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(&q);
        if t >= 0.0 {
            Some((t, u, v))
        } else {
            None
        }
    }

    /// Intersect only when the ray approaches the front face.
    ///
    /// Back faces and degenerate (zero-area) triangles never report a hit,
    /// so a vertex leaving a surface is not pulled back into it.
    pub fn intersect_front(&self, ray: &Ray, max_distance: f64) -> Option<RayHit> {
        let normal = (self.v1 - self.v0).cross(&(self.v2 - self.v0));
        let area = normal.norm();
        if area <= f64::EPSILON {
            return None;
        }
        let normal = normal / area;
        if normal.dot(&ray.direction) >= 0.0 {
            return None;
        }

        let (t, _, _) = self.intersect_ray(ray)?;
        if t > max_distance {
            return None;
        }

        Some(RayHit {
            distance: t,
            point: ray.point_at(t),
            normal,
        })
    }
}
