use crate::collision::broadphase_result::{BroadphaseResult, ReferenceSide};
use crate::collision::contact_point::{push_contact, ContactBuffer, ContactPoint, FeatureId};
use crate::math::{Vector3, EPSILON};
use crate::shapes::WorldSphere;

/// Overlap test between two balls given by centre and radius.
///
/// Touching balls are not colliding. Coincident centres separate along +Y.
pub(crate) fn ball_overlap(center_a: Vector3, radius_a: f32, center_b: Vector3, radius_b: f32) -> BroadphaseResult {
    let offset = center_b - center_a;
    let dist_sq = offset.norm_squared();
    let sum_radius = radius_a + radius_b;

    if dist_sq >= sum_radius * sum_radius {
        return BroadphaseResult::separated();
    }

    let dist = dist_sq.sqrt();
    let direction = if dist > EPSILON {
        offset / dist
    } else {
        Vector3::y()
    };

    BroadphaseResult::colliding(direction, sum_radius - dist, ReferenceSide::First)
}

/// Contact point half way through the overlap region of two balls
pub(crate) fn ball_contact(center_a: Vector3, radius_a: f32, result: &BroadphaseResult, feature: FeatureId) -> ContactPoint {
    let position = center_a + result.direction * (radius_a - result.penetration * 0.5);
    ContactPoint::new(position, result.direction, result.penetration, feature)
}

pub fn collide(a: &WorldSphere, b: &WorldSphere) -> BroadphaseResult {
    ball_overlap(a.center, a.radius, b.center, b.radius)
}

pub fn calculate_contacts(a: &WorldSphere, _b: &WorldSphere, result: &BroadphaseResult, out: &mut ContactBuffer) {
    if !result.collision_found {
        return;
    }
    push_contact(out, ball_contact(a.center, a.radius, result, FeatureId::default()));
}
