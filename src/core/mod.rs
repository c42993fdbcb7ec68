pub mod world;
pub mod config;
pub mod storage;

pub use self::world::PhysicsWorld;
pub use self::config::SimulationConfig;
pub use self::storage::{Handle, Storage};

use crate::math::Vector3;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            index: u32,
            generation: u32,
        }

        impl Handle for $name {
            const KIND: &'static str = $kind;

            #[inline]
            fn from_parts(index: u32, generation: u32) -> Self {
                Self { index, generation }
            }

            #[inline]
            fn index(&self) -> u32 {
                self.index
            }

            #[inline]
            fn generation(&self) -> u32 {
                self.generation
            }
        }
    };
}

define_handle!(
    /// A unique identifier for a rigid body in the physics world
    BodyHandle,
    "Body"
);

define_handle!(
    /// A unique identifier for a collider, issued when the collider is added to the world.
    ///
    /// Handles order by slot index, which makes them a deterministic key for
    /// contact manifolds.
    ColliderHandle,
    "Collider"
);

/// Storage for rigid bodies
pub type BodyStorage<T> = Storage<BodyHandle, T>;

/// Storage for colliders
pub type ColliderStorage<T> = Storage<ColliderHandle, T>;

/// The gravity to apply to the physics world
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum GravityType {
    /// No gravity
    None,

    /// Constant gravity in a direction (typically downward along y-axis)
    Constant(Vector3),
}

impl GravityType {
    /// Gravitational acceleration applied to every dynamic body
    pub fn acceleration(&self) -> Vector3 {
        match self {
            GravityType::None => Vector3::zeros(),
            GravityType::Constant(g) => *g,
        }
    }
}

impl Default for GravityType {
    fn default() -> Self {
        // Default gravity is -9.81 in y direction
        Self::Constant(Vector3::new(0.0, -9.81, 0.0))
    }
}
