pub mod math;
pub mod core;
pub mod bodies;
pub mod shapes;
pub mod collision;
pub mod solver;
pub mod debug;

/// Re-export common types for easier usage
pub use crate::core::{PhysicsWorld, SimulationConfig, BodyHandle, ColliderHandle};
pub use crate::bodies::{RigidBody, RigidBodyType, RigidBodyHandle, Material};
pub use crate::collision::{Collider, CollisionSystem, ContactManifold, BroadphaseResult};
pub use crate::shapes::{Shape, ShapeType};
pub use crate::solver::{ContactResolver, ResolverStats};
pub use crate::math::Vector3;

/// Error types for the physics engine
pub mod error {
    use thiserror::Error;

    use crate::core::ColliderHandle;
    use crate::shapes::ShapeType;

    #[derive(Error, Debug)]
    pub enum PhysicsError {
        #[error("Invalid parameter: {0}")]
        InvalidParameter(String),

        #[error("Resource not found: {0}")]
        ResourceNotFound(String),

        #[error("Collider {0:?} is already registered")]
        DuplicateCollider(ColliderHandle),

        #[error("No narrow-phase routine for {a} vs {b}")]
        UnsupportedShapePair { a: ShapeType, b: ShapeType },

        #[error("Invalid contact: {0}")]
        InvalidContact(String),

        #[error("Internal error: {0}")]
        InternalError(String),
    }
}

/// Result type for physics engine operations
pub type Result<T> = std::result::Result<T, error::PhysicsError>;

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
