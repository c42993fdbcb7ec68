//! Sphere against oriented box.
//!
//! Only the six face support planes are tested. A sphere near a box corner or
//! edge can be reported as touching the box while it is actually just outside
//! the corner's rounded region; the contact then lies on the nearest face plane.

use crate::collision::broadphase_result::{BroadphaseResult, ReferenceSide};
use crate::collision::contact_point::{push_contact, ContactBuffer, ContactPoint, Feature, FeatureId};
use crate::math::Vector3;
use crate::shapes::{WorldObb, WorldSphere};

/// Face of `obb` the sphere penetrates least, with that penetration
fn shallowest_face(sphere: &WorldSphere, obb: &WorldObb) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;

    for face in 0..6 {
        let plane = obb.face_plane(face);
        let distance = plane.signed_distance(&sphere.center);

        // Sphere surface entirely on the outside of this face
        if distance - sphere.radius >= 0.0 {
            return None;
        }

        let penetration = sphere.radius - distance;
        if best.map_or(true, |(_, p)| penetration < p) {
            best = Some((face, penetration));
        }
    }

    best
}

pub fn collide(sphere: &WorldSphere, obb: &WorldObb) -> BroadphaseResult {
    match shallowest_face(sphere, obb) {
        Some((face, penetration)) => {
            let normal = obb.face_plane(face).normal;
            BroadphaseResult::colliding(-normal, penetration, ReferenceSide::Second)
        }
        None => BroadphaseResult::separated(),
    }
}

pub fn calculate_contacts(sphere: &WorldSphere, obb: &WorldObb, result: &BroadphaseResult, out: &mut ContactBuffer) {
    if !result.collision_found {
        return;
    }

    let Some((face, penetration)) = shallowest_face(sphere, obb) else {
        return;
    };

    let direction: Vector3 = -obb.face_plane(face).normal;
    let position = sphere.center + direction * (sphere.radius - penetration * 0.5);
    let feature = FeatureId::new(Feature::Face(face as u8), Feature::None);

    push_contact(out, ContactPoint::new(position, direction, penetration, feature));
}
