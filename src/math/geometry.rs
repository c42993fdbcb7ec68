use crate::math::{Vector2, Vector3, EPSILON};

/// An infinite plane `normal · x = distance`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal of the plane
    pub normal: Vector3,

    /// Signed distance of the plane from the origin along `normal`
    pub distance: f32,
}

impl Plane {
    /// Creates a plane through `point` with the given unit normal
    pub fn from_point_normal(point: Vector3, normal: Vector3) -> Self {
        Self {
            normal,
            distance: normal.dot(&point),
        }
    }

    /// Signed distance from the plane; positive on the side the normal points to
    #[inline]
    pub fn signed_distance(&self, point: &Vector3) -> f32 {
        self.normal.dot(point) - self.distance
    }

    /// Orthogonal projection of `point` onto the plane
    #[inline]
    pub fn project_point(&self, point: &Vector3) -> Vector3 {
        point - self.normal * self.signed_distance(point)
    }
}

/// A finite line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// First endpoint
    pub start: Vector3,

    /// Second endpoint
    pub end: Vector3,
}

impl Segment {
    /// Creates a new segment
    pub fn new(start: Vector3, end: Vector3) -> Self {
        Self { start, end }
    }

    /// Vector from `start` to `end`
    #[inline]
    pub fn direction(&self) -> Vector3 {
        self.end - self.start
    }

    /// Length of the segment
    #[inline]
    pub fn length(&self) -> f32 {
        self.direction().norm()
    }

    /// Midpoint of the segment
    #[inline]
    pub fn midpoint(&self) -> Vector3 {
        (self.start + self.end) * 0.5
    }

    /// Point at parameter `t` (0 at `start`, 1 at `end`)
    #[inline]
    pub fn point_at(&self, t: f32) -> Vector3 {
        self.start + self.direction() * t
    }

    /// Parameter of the point on the segment closest to `point`, clamped to [0, 1].
    /// Zero-length segments return 0.
    pub fn closest_parameter(&self, point: &Vector3) -> f32 {
        let d = self.direction();
        let length_sq = d.norm_squared();

        if length_sq <= EPSILON {
            return 0.0;
        }

        ((point - self.start).dot(&d) / length_sq).clamp(0.0, 1.0)
    }

    /// The point on the segment closest to `point`
    #[inline]
    pub fn closest_point(&self, point: &Vector3) -> Vector3 {
        self.point_at(self.closest_parameter(point))
    }
}

/// Computes the closest points between two segments.
///
/// Returns `(point_on_a, point_on_b)`. Degenerate (zero-length) segments are
/// treated as points, and parallel segments resolve to the overlap start.
pub fn closest_points_between_segments(a: &Segment, b: &Segment) -> (Vector3, Vector3) {
    let d1 = a.direction();
    let d2 = b.direction();
    let r = a.start - b.start;

    let len_a = d1.norm_squared();
    let len_b = d2.norm_squared();
    let f = d2.dot(&r);

    let (s, t) = if len_a <= EPSILON && len_b <= EPSILON {
        (0.0, 0.0)
    } else if len_a <= EPSILON {
        (0.0, (f / len_b).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(&r);

        if len_b <= EPSILON {
            ((-c / len_a).clamp(0.0, 1.0), 0.0)
        } else {
            let bd = d1.dot(&d2);
            let denom = len_a * len_b - bd * bd;

            let mut s = if denom > EPSILON {
                ((bd * f - c * len_b) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };

            let mut t = (bd * s + f) / len_b;

            if t < 0.0 {
                t = 0.0;
                s = (-c / len_a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((bd - c) / len_a).clamp(0.0, 1.0);
            }

            (s, t)
        }
    };

    (a.point_at(s), b.point_at(t))
}

/// Intersects the 2D line `origin + t * direction` with a circle.
///
/// Returns the two line parameters `(t0, t1)` with `t0 <= t1`, or `None` when the
/// line misses the circle or the direction is degenerate.
pub fn line_circle_intersection(
    origin: Vector2,
    direction: Vector2,
    center: Vector2,
    radius: f32,
) -> Option<(f32, f32)> {
    let a = direction.norm_squared();
    if a <= EPSILON {
        return None;
    }

    let offset = origin - center;
    let b = 2.0 * offset.dot(&direction);
    let c = offset.norm_squared() - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    Some(((-b - root) / (2.0 * a), (-b + root) / (2.0 * a)))
}
