//! Degenerate-safe math helpers layered over `glam`.
//!
//! Every helper here returns a well-defined value for degenerate input
//! (zero-length vectors, singular matrices) instead of producing NaN.

use glam::{Affine3A, Mat3, Mat4, Vec2, Vec3};

/// A linear map counts as singular when its determinant, relative to the
/// product of its column lengths, is at or below this.
pub const DETERMINANT_EPSILON: f32 = 1e-6;

/// Returns `true` if `det` is a usable determinant for a linear map whose
/// columns have lengths multiplying to `column_scale`.
///
/// The test is scale-relative: a uniformly tiny but well-formed transform is
/// invertible, a transform with a collapsed axis is not.
#[inline]
#[must_use]
pub fn is_invertible_determinant(det: f32, column_scale: f32) -> bool {
    det.is_finite() && column_scale.is_finite() && det.abs() > DETERMINANT_EPSILON * column_scale
}

/// Returns `true` if the 3x3 linear map `m` can be inverted.
#[must_use]
pub fn is_invertible_linear(m: &Mat3) -> bool {
    let column_scale = m.x_axis.length() * m.y_axis.length() * m.z_axis.length();
    is_invertible_determinant(m.determinant(), column_scale)
}

/// Inverts the affine matrix `m`, or returns `None` when its linear part is
/// singular.
#[must_use]
pub fn try_inverse(m: &Mat4) -> Option<Mat4> {
    if is_invertible_linear(&Mat3::from_mat4(*m)) {
        Some(m.inverse())
    } else {
        None
    }
}

/// Inverts `m`, falling back to identity when it is singular.
#[inline]
#[must_use]
pub fn inverse_or_identity(m: &Mat4) -> Mat4 {
    try_inverse(m).unwrap_or(Mat4::IDENTITY)
}

/// Largest per-axis scale factor encoded in an affine transform.
#[must_use]
pub fn max_scale_on_axis(m: &Affine3A) -> f32 {
    let sx = m.matrix3.x_axis.length_squared();
    let sy = m.matrix3.y_axis.length_squared();
    let sz = m.matrix3.z_axis.length_squared();
    sx.max(sy).max(sz).sqrt()
}

/// Inverse-transpose of the linear part of `m`, used to carry normals to world space.
///
/// Singular transforms (zero scale on some axis) yield the identity.
#[must_use]
pub fn normal_matrix(m: &Affine3A) -> Mat3 {
    let linear = Mat3::from(m.matrix3);
    if is_invertible_linear(&linear) {
        linear.inverse().transpose()
    } else {
        Mat3::IDENTITY
    }
}

/// Twice the signed area of the 2D triangle `a, b, c` (shoelace formula).
///
/// Positive when the vertices wind counter-clockwise in a y-up space.
#[inline]
#[must_use]
pub fn signed_area(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)
}

/// Camera-space depth of a world-space point: positive in front of the camera,
/// growing with distance.
#[inline]
#[must_use]
pub fn view_depth(view: &Mat4, point: Vec3) -> f32 {
    -view.transform_point3(point).z
}
