use std::f32::consts::PI;

use crate::math::{normalize_or, Matrix3, Segment, Transform, Vector3};

/// A cylinder collision shape, axis along local Y
#[derive(Debug, Clone, PartialEq)]
pub struct Cylinder {
    /// The radius of the cylinder
    radius: f32,

    /// The height of the cylinder
    height: f32,
}

impl Cylinder {
    /// Creates a new cylinder with the given radius and height
    pub fn new(radius: f32, height: f32) -> Self {
        Self {
            radius: radius.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Returns the radius of the cylinder
    pub fn get_radius(&self) -> f32 {
        self.radius
    }

    /// Returns the height of the cylinder
    pub fn get_height(&self) -> f32 {
        self.height
    }

    /// Returns the half-height of the cylinder
    pub fn get_half_height(&self) -> f32 {
        self.height * 0.5
    }

    pub fn volume(&self) -> f32 {
        PI * self.radius.powi(2) * self.height
    }

    pub fn inertia_tensor(&self, mass: f32) -> Matrix3 {
        let r2 = self.radius.powi(2);
        let h2 = self.height.powi(2);

        let ix = (1.0 / 12.0) * mass * (3.0 * r2 + h2);
        let iy = 0.5 * mass * r2;

        Matrix3::from_diagonal(&Vector3::new(ix, iy, ix))
    }

    /// Places the cylinder's axis in world space
    pub fn to_world(&self, transform: &Transform) -> WorldCylinder {
        let half = Vector3::new(0.0, self.get_half_height(), 0.0);
        WorldCylinder {
            axis: Segment::new(transform.transform_point(-half), transform.transform_point(half)),
            radius: self.radius * transform.max_scale(),
        }
    }
}

/// A cylinder in world space; `axis` runs from the bottom cap centre to the top cap centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldCylinder {
    pub axis: Segment,
    pub radius: f32,
}

impl WorldCylinder {
    /// Unit axis direction (bottom to top); +Y for a degenerate axis
    pub fn up(&self) -> Vector3 {
        normalize_or(self.axis.direction(), Vector3::y())
    }

    /// Farthest point of the cylinder along `direction`
    pub fn support(&self, direction: &Vector3) -> Vector3 {
        let up = self.up();
        let cap = if up.dot(direction) >= 0.0 { self.axis.end } else { self.axis.start };
        let radial = direction - up * up.dot(direction);
        cap + normalize_or(radial, Vector3::zeros()) * self.radius
    }
}
