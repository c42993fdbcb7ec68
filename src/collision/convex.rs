//! Generic convex pairs through GJK and EPA. Produces a single contact point.

use crate::collision::broadphase_result::{BroadphaseResult, ReferenceSide};
use crate::collision::contact_point::{push_contact, ContactBuffer, ContactPoint, FeatureId};
use crate::collision::epa::{Penetration, EPA};
use crate::collision::gjk::{SupportMap, GJK};
use crate::math::{normalize_or, Vector3};

fn penetration<A: SupportMap, B: SupportMap>(a: &A, b: &B) -> Option<Option<Penetration>> {
    GJK::intersect(a, b).map(|simplex| EPA::penetration(&simplex, a, b))
}

/// Overlapping shapes whose depth EPA could not resolve separate along the centre line with zero depth
fn fallback_direction<A: SupportMap, B: SupportMap>(a: &A, b: &B) -> Vector3 {
    normalize_or(b.center() - a.center(), Vector3::y())
}

pub fn collide<A: SupportMap, B: SupportMap>(a: &A, b: &B) -> BroadphaseResult {
    match penetration(a, b) {
        None => BroadphaseResult::separated(),
        Some(Some(p)) => BroadphaseResult::colliding(p.normal, p.depth, ReferenceSide::First),
        Some(None) => BroadphaseResult::colliding(fallback_direction(a, b), 0.0, ReferenceSide::First),
    }
}

pub fn calculate_contacts<A: SupportMap, B: SupportMap>(
    a: &A,
    b: &B,
    result: &BroadphaseResult,
    out: &mut ContactBuffer,
) {
    if !result.collision_found {
        return;
    }

    let point = match penetration(a, b) {
        Some(Some(p)) => ContactPoint::new((p.on_a + p.on_b) * 0.5, p.normal, p.depth, FeatureId::default()),
        _ => {
            let position = (a.center() + b.center()) * 0.5;
            ContactPoint::new(position, result.direction, 0.0, FeatureId::default())
        }
    };

    push_contact(out, point);
}
