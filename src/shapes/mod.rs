mod shape;
mod sphere;
mod box_shape;
mod capsule;
mod cylinder;
mod polytope;

pub use self::shape::{Shape, ShapeType, WorldShape};
pub use self::sphere::{Sphere, WorldSphere};
pub use self::box_shape::{BoxShape, WorldObb};
pub use self::capsule::{Capsule, WorldCapsule};
pub use self::cylinder::{Cylinder, WorldCylinder};
pub use self::polytope::{Polytope, WorldPolytope};
