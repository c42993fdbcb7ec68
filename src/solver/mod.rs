//! Contact resolution: turns manifold points into solver contacts and
//! resolves their velocities and interpenetration.

mod contact;
mod contact_resolver;

pub use self::contact::{build_contacts, contact_basis, store_impulses, Contact};
pub use self::contact_resolver::{ContactResolver, ResolverStats};
