//! Math utilities and types
//!
//! Double-precision aliases over nalgebra. Every kinematic quantity in the
//! engine (positions, velocities, forces) is a `Vec3` with value semantics,
//! so there is no shared mutable vector to alias by accident.

pub use nalgebra::{
    Vector3,
    Matrix3, Matrix4,
    UnitQuaternion,
};

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f64>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f64>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f64>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f64>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position relative to the parent frame
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Convert to a transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// Extract the translation column of an affine matrix.
pub fn translation_of(matrix: &Mat4) -> Vec3 {
    Vec3::new(matrix.m14, matrix.m24, matrix.m34)
}

/// Transform a point by an affine matrix.
pub fn transform_point(matrix: &Mat4, point: &Vec3) -> Vec3 {
    matrix.transform_point(&Point3::from(*point)).coords
}

/// Map a world-space direction into the frame described by `matrix`,
/// ignoring its translation.
///
/// Returns `None` when the linear part is singular (zero scale).
pub fn inverse_transform_vector(matrix: &Mat4, vector: &Vec3) -> Option<Vec3> {
    let linear: Mat3 = matrix.fixed_view::<3, 3>(0, 0).into_owned();
    linear.try_inverse().map(|inverse| inverse * vector)
}
