use std::fmt;

use crate::math::{Matrix3, Transform, Vector3};
use crate::shapes::{
    BoxShape, Capsule, Cylinder, Polytope, Sphere, WorldCapsule, WorldCylinder, WorldObb,
    WorldPolytope, WorldSphere,
};

/// Discriminant of a collision shape, used to index the narrow-phase table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeType {
    Sphere = 0,
    Box = 1,
    Capsule = 2,
    Cylinder = 3,
    Polytope = 4,
}

impl ShapeType {
    /// Number of shape types
    pub const COUNT: usize = 5;

    /// Row / column of this type in the dispatch table
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeType::Sphere => "Sphere",
            ShapeType::Box => "Box",
            ShapeType::Capsule => "Capsule",
            ShapeType::Cylinder => "Cylinder",
            ShapeType::Polytope => "Polytope",
        };
        f.write_str(name)
    }
}

/// A collision shape in its collider's local space
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    Box(BoxShape),
    Capsule(Capsule),
    Cylinder(Cylinder),
    Polytope(Polytope),
}

impl Shape {
    /// Shorthand for a sphere centred on the local origin
    pub fn sphere(radius: f32) -> Self {
        Shape::Sphere(Sphere::new(radius))
    }

    /// Shorthand for an axis-aligned box
    pub fn cuboid(half_extents: Vector3) -> Self {
        Shape::Box(BoxShape::new(half_extents))
    }

    /// Shorthand for a Y-aligned capsule
    pub fn capsule(radius: f32, height: f32) -> Self {
        Shape::Capsule(Capsule::new(radius, height))
    }

    /// Shorthand for a Y-aligned cylinder
    pub fn cylinder(radius: f32, height: f32) -> Self {
        Shape::Cylinder(Cylinder::new(radius, height))
    }

    /// Shorthand for a polytope over a point cloud
    pub fn polytope(points: &[Vector3]) -> Self {
        Shape::Polytope(Polytope::from_points(points))
    }

    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Sphere(_) => ShapeType::Sphere,
            Shape::Box(_) => ShapeType::Box,
            Shape::Capsule(_) => ShapeType::Capsule,
            Shape::Cylinder(_) => ShapeType::Cylinder,
            Shape::Polytope(_) => ShapeType::Polytope,
        }
    }

    /// Returns the volume of the shape
    pub fn volume(&self) -> f32 {
        match self {
            Shape::Sphere(s) => s.volume(),
            Shape::Box(s) => s.volume(),
            Shape::Capsule(s) => s.volume(),
            Shape::Cylinder(s) => s.volume(),
            Shape::Polytope(s) => s.volume(),
        }
    }

    /// Returns the inertia tensor of the shape with the given mass
    pub fn inertia_tensor(&self, mass: f32) -> Matrix3 {
        match self {
            Shape::Sphere(s) => s.inertia_tensor(mass),
            Shape::Box(s) => s.inertia_tensor(mass),
            Shape::Capsule(s) => s.inertia_tensor(mass),
            Shape::Cylinder(s) => s.inertia_tensor(mass),
            Shape::Polytope(s) => s.inertia_tensor(mass),
        }
    }

    /// Derives the world-space shape under `transform`.
    ///
    /// Pure function of its inputs: equal transforms give bit-identical results.
    pub fn to_world(&self, transform: &Transform) -> WorldShape {
        match self {
            Shape::Sphere(s) => WorldShape::Sphere(s.to_world(transform)),
            Shape::Box(s) => WorldShape::Box(s.to_world(transform)),
            Shape::Capsule(s) => WorldShape::Capsule(s.to_world(transform)),
            Shape::Cylinder(s) => WorldShape::Cylinder(s.to_world(transform)),
            Shape::Polytope(s) => WorldShape::Polytope(s.to_world(transform)),
        }
    }
}

/// A collision shape placed in world space, as consumed by the narrow phase
#[derive(Debug, Clone, PartialEq)]
pub enum WorldShape {
    Sphere(WorldSphere),
    Box(WorldObb),
    Capsule(WorldCapsule),
    Cylinder(WorldCylinder),
    Polytope(WorldPolytope),
}

impl WorldShape {
    pub fn shape_type(&self) -> ShapeType {
        match self {
            WorldShape::Sphere(_) => ShapeType::Sphere,
            WorldShape::Box(_) => ShapeType::Box,
            WorldShape::Capsule(_) => ShapeType::Capsule,
            WorldShape::Cylinder(_) => ShapeType::Cylinder,
            WorldShape::Polytope(_) => ShapeType::Polytope,
        }
    }

    /// A point inside the shape, used as a fallback separation reference
    pub fn center(&self) -> Vector3 {
        match self {
            WorldShape::Sphere(s) => s.center,
            WorldShape::Box(s) => s.center,
            WorldShape::Capsule(s) => s.segment.midpoint(),
            WorldShape::Cylinder(s) => s.axis.midpoint(),
            WorldShape::Polytope(s) => s.centroid(),
        }
    }
}
