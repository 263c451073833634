//! Mathematical type aliases shared across the workspace.

use nalgebra::{Matrix2, Matrix3, Matrix4, Vector2, Vector3};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 2D vector with [`Real`] components.
pub type Vec2 = Vector2<Real>;
/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 2×2 matrix with [`Real`] entries.
pub type Mat2 = Matrix2<Real>;
/// 3×3 matrix with [`Real`] entries.
pub type Mat3 = Matrix3<Real>;
/// 4×4 matrix with [`Real`] entries.
pub type Mat4 = Matrix4<Real>;

/// The degenerate-result sentinel: a 4×4 matrix filled with NaN.
pub fn nan_matrix() -> Mat4 {
    Mat4::from_element(Real::NAN)
}

/// Convert a 3D vector into homogeneous coordinates `(x, y, z, 1)`.
pub fn to_homogeneous(v: &Vec3) -> nalgebra::Vector4<Real> {
    nalgebra::Vector4::new(v.x, v.y, v.z, 1.0)
}
