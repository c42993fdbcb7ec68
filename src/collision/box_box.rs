//! Oriented box against oriented box, using the separating axis theorem over
//! the six face normals. Edge-edge cross axes are not tested, so two boxes
//! meeting edge to edge at an angle can report overlap slightly early.

use crate::collision::broadphase_result::{BroadphaseResult, ReferenceSide};
use crate::collision::contact_point::{push_contact, ContactBuffer, ContactPoint, Feature, FeatureId};
use crate::math::Vector3;
use crate::shapes::WorldObb;

/// Slack allowed when deciding whether a corner lies over the reference face
const FACE_SLOP: f32 = 0.005;

fn project_corners(corners: &[Vector3; 8], axis: &Vector3) -> (f32, f32) {
    corners.iter().fold((f32::MAX, f32::MIN), |(min, max), c| {
        let p = c.dot(axis);
        (min.min(p), max.max(p))
    })
}

pub fn collide(a: &WorldObb, b: &WorldObb) -> BroadphaseResult {
    let corners_a = a.corners();
    let corners_b = b.corners();

    let mut best: Option<(f32, Vector3, ReferenceSide)> = None;

    let axes = a
        .axes
        .iter()
        .map(|axis| (axis, ReferenceSide::First))
        .chain(b.axes.iter().map(|axis| (axis, ReferenceSide::Second)));

    for (axis, side) in axes {
        let (min_a, max_a) = project_corners(&corners_a, axis);
        let (min_b, max_b) = project_corners(&corners_b, axis);

        let overlap = max_a.min(max_b) - min_a.max(min_b);
        if overlap <= 0.0 {
            return BroadphaseResult::separated();
        }

        if best.map_or(true, |(depth, _, _)| overlap < depth) {
            best = Some((overlap, *axis, side));
        }
    }

    match best {
        Some((penetration, axis, reference)) => {
            let direction = if axis.dot(&(b.center - a.center)) < 0.0 { -axis } else { axis };
            BroadphaseResult::colliding(direction, penetration, reference)
        }
        None => BroadphaseResult::separated(),
    }
}

/// Face of `reference` whose outward normal is closest to `toward`
fn reference_face(reference: &WorldObb, toward: &Vector3) -> usize {
    let mut best = (0, f32::MIN);
    for axis in 0..3 {
        let d = reference.axes[axis].dot(toward);
        let (face, score) = if d >= 0.0 { (2 * axis, d) } else { (2 * axis + 1, -d) };
        if score > best.1 {
            best = (face, score);
        }
    }
    best.0
}

pub fn calculate_contacts(a: &WorldObb, b: &WorldObb, result: &BroadphaseResult, out: &mut ContactBuffer) {
    if !result.collision_found {
        return;
    }

    // The reference face looks toward the incident box
    let (reference, incident, toward) = match result.reference {
        ReferenceSide::First => (a, b, result.direction),
        ReferenceSide::Second => (b, a, -result.direction),
    };

    let face = reference_face(reference, &toward);
    let plane = reference.face_plane(face);
    let axis = face / 2;

    let mut deepest: Option<(usize, f32)> = None;
    let mut found = 0;

    for (index, corner) in incident.corners().iter().enumerate() {
        let distance = plane.signed_distance(corner);
        if deepest.map_or(true, |(_, d)| distance < d) {
            deepest = Some((index, distance));
        }

        if distance >= 0.0 {
            continue;
        }

        let local = reference.to_local(corner);
        let over_face = (0..3)
            .filter(|&k| k != axis)
            .all(|k| local[k].abs() <= reference.half_extents[k] + FACE_SLOP);
        if !over_face {
            continue;
        }

        let penetration = -distance;
        let feature = FeatureId::new(Feature::Face(face as u8), Feature::Vertex(index as u8));
        let position = corner + plane.normal * (penetration * 0.5);
        push_contact(out, ContactPoint::new(position, result.direction, penetration, feature));
        found += 1;
    }

    if found == 0 {
        if let Some((index, _)) = deepest {
            let corner = incident.corners()[index];
            let feature = FeatureId::new(Feature::Face(face as u8), Feature::Vertex(index as u8));
            let position = corner + plane.normal * (result.penetration * 0.5);
            push_contact(out, ContactPoint::new(position, result.direction, result.penetration, feature));
        }
    }
}
