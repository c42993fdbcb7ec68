use std::f32::consts::PI;

use crate::math::{normalize_or, Matrix3, Segment, Transform, Vector3};

/// A capsule collision shape (cylinder with hemisphere caps at both ends).
///
/// The spine runs along the local Y axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Capsule {
    /// The radius of the capsule
    radius: f32,

    /// The height of the capsule (cylinder part only, excluding the hemisphere caps)
    height: f32,
}

impl Capsule {
    /// Creates a new capsule with the given radius and spine length
    pub fn new(radius: f32, height: f32) -> Self {
        Self {
            radius: radius.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Returns the radius of the capsule
    pub fn get_radius(&self) -> f32 {
        self.radius
    }

    /// Returns the height of the capsule (cylinder part only)
    pub fn get_height(&self) -> f32 {
        self.height
    }

    /// Returns the total height of the capsule (including hemisphere caps)
    pub fn get_total_height(&self) -> f32 {
        self.height + 2.0 * self.radius
    }

    /// Returns the half-height of the capsule's cylinder part
    pub fn get_half_height(&self) -> f32 {
        self.height * 0.5
    }

    pub fn volume(&self) -> f32 {
        let cylinder_volume = PI * self.radius.powi(2) * self.height;
        let sphere_volume = (4.0 / 3.0) * PI * self.radius.powi(3);

        cylinder_volume + sphere_volume
    }

    /// Approximates the capsule as a solid cylinder of the full height
    pub fn inertia_tensor(&self, mass: f32) -> Matrix3 {
        let total_height = self.get_total_height();
        let r2 = self.radius.powi(2);

        let ix = (1.0 / 12.0) * mass * (3.0 * r2 + total_height.powi(2));
        let iy = 0.5 * mass * r2;

        Matrix3::from_diagonal(&Vector3::new(ix, iy, ix))
    }

    /// Places the capsule's spine in world space
    pub fn to_world(&self, transform: &Transform) -> WorldCapsule {
        let half = Vector3::new(0.0, self.get_half_height(), 0.0);
        WorldCapsule {
            segment: Segment::new(transform.transform_point(-half), transform.transform_point(half)),
            radius: self.radius * transform.max_scale(),
        }
    }
}

/// A capsule in world space: every point within `radius` of `segment`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldCapsule {
    pub segment: Segment,
    pub radius: f32,
}

impl WorldCapsule {
    /// Farthest point of the capsule along `direction`
    pub fn support(&self, direction: &Vector3) -> Vector3 {
        let end = if self.segment.direction().dot(direction) >= 0.0 {
            self.segment.end
        } else {
            self.segment.start
        };
        end + normalize_or(*direction, Vector3::zeros()) * self.radius
    }
}
