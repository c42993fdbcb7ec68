//! Capsule pairs that reduce to ball tests between closest spine points.

use crate::collision::broadphase_result::BroadphaseResult;
use crate::collision::contact_point::{push_contact, ContactBuffer, Feature, FeatureId};
use crate::collision::sphere_sphere::{ball_contact, ball_overlap};
use crate::math::{closest_points_between_segments, Segment, Vector3, EPSILON};
use crate::shapes::{WorldCapsule, WorldSphere};

/// Feature of a spine that the point at parameter `t` belongs to
fn spine_feature(segment: &Segment, point: &Vector3) -> Feature {
    let t = segment.closest_parameter(point);
    if t <= EPSILON {
        Feature::Vertex(0)
    } else if t >= 1.0 - EPSILON {
        Feature::Vertex(1)
    } else {
        Feature::Edge(0)
    }
}

pub fn collide_sphere_capsule(sphere: &WorldSphere, capsule: &WorldCapsule) -> BroadphaseResult {
    let closest = capsule.segment.closest_point(&sphere.center);
    ball_overlap(sphere.center, sphere.radius, closest, capsule.radius)
}

pub fn sphere_capsule_contacts(
    sphere: &WorldSphere,
    capsule: &WorldCapsule,
    result: &BroadphaseResult,
    out: &mut ContactBuffer,
) {
    if !result.collision_found {
        return;
    }

    let closest = capsule.segment.closest_point(&sphere.center);
    let feature = FeatureId::new(Feature::None, spine_feature(&capsule.segment, &closest));
    push_contact(out, ball_contact(sphere.center, sphere.radius, result, feature));
}

pub fn collide_capsules(a: &WorldCapsule, b: &WorldCapsule) -> BroadphaseResult {
    let (on_a, on_b) = closest_points_between_segments(&a.segment, &b.segment);
    ball_overlap(on_a, a.radius, on_b, b.radius)
}

pub fn capsule_capsule_contacts(a: &WorldCapsule, b: &WorldCapsule, result: &BroadphaseResult, out: &mut ContactBuffer) {
    if !result.collision_found {
        return;
    }

    let (on_a, on_b) = closest_points_between_segments(&a.segment, &b.segment);
    let feature = FeatureId::new(spine_feature(&a.segment, &on_a), spine_feature(&b.segment, &on_b));
    push_contact(out, ball_contact(on_a, a.radius, result, feature));
}
