//! Capsule against cylinder.
//!
//! Three independent contact regions are evaluated and the one with the
//! smallest positive penetration wins:
//!
//! * vertical: capsule endpoints hovering over a flat end cap
//! * horizontal: the spine beside the curved side
//! * edge: the spine closest to the rim circle of a cap
//!
//! The vertical region yields two contacts when both endpoints rest flush on
//! the same cap, every other region yields one.

use arrayvec::ArrayVec;

use crate::collision::broadphase_result::{BroadphaseResult, ReferenceSide};
use crate::collision::contact_point::{push_contact, ContactBuffer, ContactPoint, Feature, FeatureId};
use crate::math::{
    any_perpendicular, closest_points_between_segments, line_circle_intersection, normalize_or,
    Vector2, Vector3, EPSILON,
};
use crate::shapes::{WorldCapsule, WorldCylinder};

/// Endpoint depths closer than this count as resting flush on a cap
const FLUSH_TOLERANCE: f32 = 1.0e-3;

/// Spine / axis alignment above which the two are treated as parallel
const PARALLEL_TOLERANCE: f32 = 1.0e-3;

/// Side face index used in feature ids; caps are 0 (top) and 1 (bottom)
const SIDE_FACE: u8 = 2;

#[derive(Debug, Clone, Copy)]
struct Cap {
    center: Vector3,
    normal: Vector3,
    index: u8,
}

/// Winning contact region: direction from capsule toward cylinder and its contacts
#[derive(Debug, Clone)]
struct RegionContact {
    direction: Vector3,
    penetration: f32,
    points: ArrayVec<ContactPoint, 2>,
}

impl RegionContact {
    fn single(position: Vector3, direction: Vector3, penetration: f32, feature: FeatureId) -> Self {
        let mut points = ArrayVec::new();
        points.push(ContactPoint::new(position, direction, penetration, feature));
        Self {
            direction,
            penetration,
            points,
        }
    }
}

fn caps(cylinder: &WorldCylinder, up: &Vector3) -> [Cap; 2] {
    [
        Cap {
            center: cylinder.axis.end,
            normal: *up,
            index: 0,
        },
        Cap {
            center: cylinder.axis.start,
            normal: -up,
            index: 1,
        },
    ]
}

/// Component of `point - origin` perpendicular to `up`
fn radial(point: &Vector3, origin: &Vector3, up: &Vector3) -> Vector3 {
    let rel = point - origin;
    rel - up * rel.dot(up)
}

fn vertical(capsule: &WorldCapsule, cylinder: &WorldCylinder, up: &Vector3) -> Option<RegionContact> {
    let endpoints = [capsule.segment.start, capsule.segment.end];
    let mut best: Option<RegionContact> = None;

    for cap in caps(cylinder, up) {
        let mut hits: ArrayVec<(usize, f32), 2> = ArrayVec::new();
        for (index, point) in endpoints.iter().enumerate() {
            if radial(point, &cap.center, up).norm() > cylinder.radius {
                continue;
            }

            let height = (point - cap.center).dot(&cap.normal);
            let penetration = capsule.radius - height;
            if penetration > 0.0 {
                hits.push((index, penetration));
            }
        }

        let Some(&(deepest, penetration)) = hits.iter().max_by(|a, b| a.1.total_cmp(&b.1)) else {
            continue;
        };

        if best.as_ref().map_or(false, |b| b.penetration <= penetration) {
            continue;
        }

        let flush = hits.len() == 2 && (hits[0].1 - hits[1].1).abs() <= FLUSH_TOLERANCE;
        let direction = -cap.normal;
        let mut points = ArrayVec::new();
        for &(index, depth) in hits.iter().filter(|(index, _)| flush || *index == deepest) {
            let position = endpoints[index] + direction * (capsule.radius - depth * 0.5);
            let feature = FeatureId::new(Feature::Face(cap.index), Feature::Vertex(index as u8));
            points.push(ContactPoint::new(position, direction, depth, feature));
        }

        best = Some(RegionContact {
            direction,
            penetration,
            points,
        });
    }

    best
}

/// Spine point to test against the curved side
fn side_sample_point(capsule: &WorldCapsule, cylinder: &WorldCylinder, up: &Vector3) -> Vector3 {
    let spine = capsule.segment;
    let spine_dir = spine.direction();
    let length = cylinder.axis.length();

    let parallel = spine_dir.norm_squared() > EPSILON
        && spine_dir.normalize().dot(up).abs() > 1.0 - PARALLEL_TOLERANCE;

    if parallel {
        // Midpoint of the spine portion lying between the cap planes
        let h0 = (spine.start - cylinder.axis.start).dot(up);
        let h1 = (spine.end - cylinder.axis.start).dot(up);
        let lo = h0.min(h1).max(0.0);
        let hi = h0.max(h1).min(length);
        if lo <= hi && (h1 - h0).abs() > EPSILON {
            let t = ((lo + hi) * 0.5 - h0) / (h1 - h0);
            return spine.point_at(t.clamp(0.0, 1.0));
        }
    }

    closest_points_between_segments(&spine, &cylinder.axis).0
}

fn horizontal(capsule: &WorldCapsule, cylinder: &WorldCylinder, up: &Vector3) -> Option<RegionContact> {
    let spine_point = side_sample_point(capsule, cylinder, up);

    let height = (spine_point - cylinder.axis.start).dot(up);
    if height <= 0.0 || height >= cylinder.axis.length() {
        return None;
    }

    let offset = radial(&spine_point, &cylinder.axis.start, up);
    let distance = offset.norm();
    let penetration = capsule.radius + cylinder.radius - distance;
    if penetration <= 0.0 {
        return None;
    }

    let direction = normalize_or(-offset, -any_perpendicular(up));
    let position = spine_point + direction * (capsule.radius - penetration * 0.5);
    let feature = FeatureId::new(Feature::Face(SIDE_FACE), Feature::Edge(0));

    Some(RegionContact::single(position, direction, penetration, feature))
}

fn edge(capsule: &WorldCapsule, cylinder: &WorldCylinder, up: &Vector3) -> Option<RegionContact> {
    let spine = capsule.segment;
    let mut best: Option<RegionContact> = None;

    for cap in caps(cylinder, up) {
        let e1 = any_perpendicular(&cap.normal);
        let e2 = cap.normal.cross(&e1);
        let to_plane = |p: &Vector3| {
            let rel = p - cap.center;
            Vector2::new(rel.dot(&e1), rel.dot(&e2))
        };

        let origin = to_plane(&spine.start);
        let dir = to_plane(&spine.end) - origin;

        let mut params: ArrayVec<f32, 5> = ArrayVec::new();
        params.push(0.0);
        params.push(1.0);
        if let Some((t0, t1)) = line_circle_intersection(origin, dir, Vector2::zeros(), cylinder.radius) {
            params.push(t0.clamp(0.0, 1.0));
            params.push(t1.clamp(0.0, 1.0));
        }
        let dir_sq = dir.norm_squared();
        if dir_sq > EPSILON {
            params.push((-origin.dot(&dir) / dir_sq).clamp(0.0, 1.0));
        }

        for t in params {
            let point = spine.point_at(t);
            let height = (point - cap.center).dot(&cap.normal);
            let outward = radial(&point, &cap.center, &cap.normal);
            let reach = outward.norm();

            // Only the region above the cap plane and outside the disc belongs to the rim
            if height < 0.0 || reach < cylinder.radius - 1.0e-4 || reach <= EPSILON {
                continue;
            }

            let rim = cap.center + outward * (cylinder.radius / reach);
            let to_rim = rim - point;
            let distance = to_rim.norm();
            let penetration = capsule.radius - distance;
            if penetration <= 0.0 {
                continue;
            }

            if best.as_ref().map_or(false, |b| b.penetration >= penetration) {
                continue;
            }

            let direction = normalize_or(to_rim, -cap.normal);
            let position = point + direction * (capsule.radius - penetration * 0.5);
            let feature = FeatureId::new(Feature::Edge(cap.index), Feature::Edge(0));
            best = Some(RegionContact::single(position, direction, penetration, feature));
        }
    }

    best
}

fn evaluate(capsule: &WorldCapsule, cylinder: &WorldCylinder) -> Option<RegionContact> {
    let up = cylinder.up();

    [
        vertical(capsule, cylinder, &up),
        horizontal(capsule, cylinder, &up),
        edge(capsule, cylinder, &up),
    ]
    .into_iter()
    .flatten()
    .min_by(|a, b| a.penetration.total_cmp(&b.penetration))
}

pub fn collide(capsule: &WorldCapsule, cylinder: &WorldCylinder) -> BroadphaseResult {
    match evaluate(capsule, cylinder) {
        Some(region) => BroadphaseResult::colliding(region.direction, region.penetration, ReferenceSide::Second),
        None => BroadphaseResult::separated(),
    }
}

pub fn calculate_contacts(
    capsule: &WorldCapsule,
    cylinder: &WorldCylinder,
    result: &BroadphaseResult,
    out: &mut ContactBuffer,
) {
    if !result.collision_found {
        return;
    }

    if let Some(region) = evaluate(capsule, cylinder) {
        for point in region.points {
            push_contact(out, point);
        }
    }
}
