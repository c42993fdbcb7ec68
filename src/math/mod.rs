mod transform;
mod geometry;

pub use transform::Transform;
pub use geometry::{Plane, Segment, closest_points_between_segments, line_circle_intersection};

/// 2D vector, used for in-plane quantities such as tangent impulses
pub type Vector2 = nalgebra::Vector2<f32>;

/// 3D vector used throughout the collision pipeline
pub type Vector3 = nalgebra::Vector3<f32>;

/// 3x3 matrix, used for inertia tensors and contact bases
pub type Matrix3 = nalgebra::Matrix3<f32>;

/// Unit quaternion representing an orientation
pub type Quaternion = nalgebra::UnitQuaternion<f32>;

/// Constant for a very small number, used for comparisons
pub const EPSILON: f32 = 1.0e-6;

/// Returns true if the two floating point values are approximately equal
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Returns true if the value is approximately zero
#[inline]
pub fn approx_zero(a: f32) -> bool {
    a.abs() < EPSILON
}

/// Returns true if every component of the vector is finite
#[inline]
pub fn is_finite(v: &Vector3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

/// Normalizes `v`, falling back to `fallback` when `v` is too short to have a direction
#[inline]
pub fn normalize_or(v: Vector3, fallback: Vector3) -> Vector3 {
    v.try_normalize(EPSILON).unwrap_or(fallback)
}

/// Returns a unit vector perpendicular to `v`
pub fn any_perpendicular(v: &Vector3) -> Vector3 {
    let reference = if v.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
    normalize_or(v.cross(&reference), Vector3::z())
}
