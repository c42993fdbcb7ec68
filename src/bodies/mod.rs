mod rigid_body;
mod material;
mod body_type;

pub use self::rigid_body::{RigidBody, RigidBodyHandle};
pub use self::material::Material;
pub use self::body_type::RigidBodyType;

/// Flags for controlling body behavior
pub mod body_flags {
    use bitflags::bitflags;

    bitflags! {
        /// Flags for controlling the behavior of rigid bodies
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct BodyFlags: u32 {
            /// Body is simulated this step
            const AWAKE = 0x01;

            /// Body may be put to sleep when its motion settles
            const CAN_SLEEP = 0x02;

            /// Body is affected by gravity
            const AFFECTED_BY_GRAVITY = 0x04;
        }
    }
}
