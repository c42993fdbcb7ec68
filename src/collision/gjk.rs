use arrayvec::ArrayVec;

use crate::math::{any_perpendicular, Vector3, EPSILON};
use crate::shapes::{WorldCapsule, WorldCylinder, WorldObb, WorldPolytope, WorldSphere};

/// Maximum number of iterations for the GJK algorithm
const MAX_ITERATIONS: usize = 64;

/// A convex shape that can answer support queries
pub trait SupportMap {
    /// Farthest point of the shape along `direction`
    fn support(&self, direction: &Vector3) -> Vector3;

    /// A point inside the shape
    fn center(&self) -> Vector3;
}

macro_rules! impl_support_map {
    ($($ty:ty => |$s:ident| $center:expr),* $(,)?) => {
        $(
            impl SupportMap for $ty {
                #[inline]
                fn support(&self, direction: &Vector3) -> Vector3 {
                    <$ty>::support(self, direction)
                }

                #[inline]
                fn center(&self) -> Vector3 {
                    let $s = self;
                    $center
                }
            }
        )*
    };
}

impl_support_map!(
    WorldSphere => |s| s.center,
    WorldObb => |s| s.center,
    WorldCapsule => |s| s.segment.midpoint(),
    WorldCylinder => |s| s.axis.midpoint(),
    WorldPolytope => |s| s.centroid(),
);

/// A vertex of the Minkowski difference A - B together with the shape points that produced it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupportPoint {
    /// `on_a - on_b`
    pub point: Vector3,
    pub on_a: Vector3,
    pub on_b: Vector3,
}

/// Support point of the Minkowski difference A - B along `direction`
pub fn minkowski_support<A: SupportMap + ?Sized, B: SupportMap + ?Sized>(
    a: &A,
    b: &B,
    direction: &Vector3,
) -> SupportPoint {
    let on_a = a.support(direction);
    let on_b = b.support(&-direction);
    SupportPoint {
        point: on_a - on_b,
        on_a,
        on_b,
    }
}

/// A simplex is a geometric shape: point, line, triangle, or tetrahedron.
///
/// The most recently added point is always first.
#[derive(Debug, Clone, Default)]
pub struct Simplex {
    points: ArrayVec<SupportPoint, 4>,
}

impl Simplex {
    /// Creates a new empty simplex
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a point in front of the simplex
    pub fn push_front(&mut self, point: SupportPoint) {
        if self.points.is_full() {
            self.points.pop();
        }
        self.points.insert(0, point);
    }

    /// Gets the number of points in the simplex
    pub fn size(&self) -> usize {
        self.points.len()
    }

    /// Gets a reference to the points in the simplex
    pub fn get_points(&self) -> &[SupportPoint] {
        &self.points
    }

    fn set(&mut self, points: &[SupportPoint]) {
        self.points.clear();
        self.points.extend(points.iter().copied());
    }
}

#[inline]
fn same_direction(a: &Vector3, b: &Vector3) -> bool {
    a.dot(b) > 0.0
}

/// GJK (Gilbert-Johnson-Keerthi) boolean intersection test
pub struct GJK;

impl GJK {
    /// Checks if two convex shapes overlap.
    ///
    /// On overlap returns the final tetrahedron enclosing the origin, which
    /// seeds EPA. Touching shapes are reported as separated.
    pub fn intersect<A: SupportMap + ?Sized, B: SupportMap + ?Sized>(a: &A, b: &B) -> Option<Simplex> {
        let mut direction = a.center() - b.center();
        if direction.norm_squared() <= EPSILON {
            direction = Vector3::x();
        }

        let mut simplex = Simplex::new();
        let first = minkowski_support(a, b, &direction);
        simplex.push_front(first);
        direction = -first.point;

        for _ in 0..MAX_ITERATIONS {
            if direction.norm_squared() <= EPSILON * EPSILON {
                // Origin lies on the current simplex; grow it in any direction that is not degenerate
                direction = Self::degenerate_direction(&simplex);
            }

            let support = minkowski_support(a, b, &direction);
            if support.point.dot(&direction) <= 0.0 {
                return None;
            }

            simplex.push_front(support);
            if Self::next_simplex(&mut simplex, &mut direction) {
                return Some(simplex);
            }
        }

        // No verdict: conservatively treat the shapes as separated
        None
    }

    fn degenerate_direction(simplex: &Simplex) -> Vector3 {
        let points = simplex.get_points();
        match points.len() {
            2 => any_perpendicular(&(points[1].point - points[0].point)),
            3 => (points[1].point - points[0].point).cross(&(points[2].point - points[0].point)),
            _ => Vector3::x(),
        }
    }

    /// Reduces the simplex to the feature closest to the origin and updates the search direction
    fn next_simplex(simplex: &mut Simplex, direction: &mut Vector3) -> bool {
        match simplex.size() {
            2 => Self::line_case(simplex, direction),
            3 => Self::triangle_case(simplex, direction),
            4 => Self::tetrahedron_case(simplex, direction),
            _ => false,
        }
    }

    fn line_case(simplex: &mut Simplex, direction: &mut Vector3) -> bool {
        let [a, b] = [simplex.points[0], simplex.points[1]];
        let ab = b.point - a.point;
        let ao = -a.point;

        if same_direction(&ab, &ao) {
            *direction = ab.cross(&ao).cross(&ab);
        } else {
            simplex.set(&[a]);
            *direction = ao;
        }

        false
    }

    fn triangle_case(simplex: &mut Simplex, direction: &mut Vector3) -> bool {
        let [a, b, c] = [simplex.points[0], simplex.points[1], simplex.points[2]];
        let ab = b.point - a.point;
        let ac = c.point - a.point;
        let ao = -a.point;

        let abc = ab.cross(&ac);

        if same_direction(&abc.cross(&ac), &ao) {
            if same_direction(&ac, &ao) {
                simplex.set(&[a, c]);
                *direction = ac.cross(&ao).cross(&ac);
            } else {
                simplex.set(&[a, b]);
                return Self::line_case(simplex, direction);
            }
        } else if same_direction(&ab.cross(&abc), &ao) {
            simplex.set(&[a, b]);
            return Self::line_case(simplex, direction);
        } else if same_direction(&abc, &ao) {
            *direction = abc;
        } else {
            simplex.set(&[a, c, b]);
            *direction = -abc;
        }

        false
    }

    fn tetrahedron_case(simplex: &mut Simplex, direction: &mut Vector3) -> bool {
        let [a, b, c, d] = [simplex.points[0], simplex.points[1], simplex.points[2], simplex.points[3]];
        let ab = b.point - a.point;
        let ac = c.point - a.point;
        let ad = d.point - a.point;
        let ao = -a.point;

        let abc = ab.cross(&ac);
        let acd = ac.cross(&ad);
        let adb = ad.cross(&ab);

        if same_direction(&abc, &ao) {
            simplex.set(&[a, b, c]);
            return Self::triangle_case(simplex, direction);
        }

        if same_direction(&acd, &ao) {
            simplex.set(&[a, c, d]);
            return Self::triangle_case(simplex, direction);
        }

        if same_direction(&adb, &ao) {
            simplex.set(&[a, d, b]);
            return Self::triangle_case(simplex, direction);
        }

        true
    }
}
