mod broadphase_result;
mod contact_point;
mod collision_pair;
mod collider;
mod contact_manifold;
mod collision_system;
mod narrow_phase;
mod sphere_sphere;
mod sphere_box;
mod box_box;
mod capsule;
mod capsule_cylinder;
mod convex;
pub mod gjk;
pub mod epa;

pub use self::broadphase_result::{BroadphaseResult, ReferenceSide};
pub use self::contact_point::{push_contact, ContactBuffer, ContactPoint, Feature, FeatureId, MAX_CONTACTS};
pub use self::collision_pair::CollisionPair;
pub use self::collider::Collider;
pub use self::contact_manifold::ContactManifold;
pub use self::collision_system::CollisionSystem;
pub use self::narrow_phase::NarrowPhase;
