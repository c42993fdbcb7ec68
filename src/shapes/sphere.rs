use crate::math::{normalize_or, Matrix3, Transform, Vector3};

/// A spherical collision shape
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    /// Centre of the sphere in the collider's local space
    center: Vector3,

    /// The radius of the sphere
    radius: f32,
}

impl Sphere {
    /// Creates a new sphere centred on the local origin
    pub fn new(radius: f32) -> Self {
        Self::with_center(Vector3::zeros(), radius)
    }

    /// Creates a new sphere with a local centre offset
    pub fn with_center(center: Vector3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    /// Returns the radius of the sphere
    pub fn get_radius(&self) -> f32 {
        self.radius
    }

    /// Sets the radius of the sphere
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }

    /// Returns the local centre of the sphere
    pub fn get_center(&self) -> Vector3 {
        self.center
    }

    /// Volume of a sphere: (4/3) * π * r^3
    pub fn volume(&self) -> f32 {
        (4.0 / 3.0) * std::f32::consts::PI * self.radius.powi(3)
    }

    /// I = (2/5) * mass * radius^2 about every axis
    pub fn inertia_tensor(&self, mass: f32) -> Matrix3 {
        let inertia = (2.0 / 5.0) * mass * self.radius.powi(2);
        Matrix3::from_diagonal_element(inertia)
    }

    /// Places the sphere in world space
    pub fn to_world(&self, transform: &Transform) -> WorldSphere {
        WorldSphere {
            center: transform.transform_point(self.center),
            radius: self.radius * transform.max_scale(),
        }
    }
}

/// A sphere in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldSphere {
    pub center: Vector3,
    pub radius: f32,
}

impl WorldSphere {
    /// Farthest point of the sphere along `direction`
    pub fn support(&self, direction: &Vector3) -> Vector3 {
        self.center + normalize_or(*direction, Vector3::zeros()) * self.radius
    }
}
