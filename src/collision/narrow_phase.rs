//! Narrow-phase dispatch.
//!
//! A static table indexed by the ordered pair of shape types. Each unordered
//! pair has one canonical routine; the mirrored cell calls it with the
//! arguments swapped and flips the result so directions and contact normals
//! always point from the first shape toward the second. Pairs without a
//! routine fail with [`PhysicsError::UnsupportedShapePair`].

use crate::collision::broadphase_result::BroadphaseResult;
use crate::collision::contact_point::ContactBuffer;
use crate::collision::{box_box, capsule, capsule_cylinder, convex, sphere_box, sphere_sphere};
use crate::error::PhysicsError;
use crate::shapes::{ShapeType, WorldShape};
use crate::Result;

type CollideFn = fn(&WorldShape, &WorldShape) -> Result<BroadphaseResult>;
type ContactsFn = fn(&WorldShape, &WorldShape, &BroadphaseResult, &mut ContactBuffer) -> Result<()>;

#[derive(Clone, Copy)]
struct PairRoutine {
    collide: CollideFn,
    contacts: ContactsFn,
}

#[derive(Clone, Copy)]
enum Cell {
    Canonical(PairRoutine),
    Mirrored(PairRoutine),
    Unsupported,
}

fn mismatch(a: &WorldShape, b: &WorldShape) -> PhysicsError {
    PhysicsError::InternalError(format!(
        "narrow-phase routine called with {} vs {}",
        a.shape_type(),
        b.shape_type()
    ))
}

/// Generates type-checked adapters from `WorldShape` to a concrete pair routine
macro_rules! pair_routine {
    ($name:ident: $va:ident, $vb:ident => $collide:path, $contacts:path) => {
        mod $name {
            use super::*;

            fn collide(a: &WorldShape, b: &WorldShape) -> Result<BroadphaseResult> {
                match (a, b) {
                    (WorldShape::$va(a), WorldShape::$vb(b)) => Ok($collide(a, b)),
                    _ => Err(mismatch(a, b)),
                }
            }

            fn contacts(
                a: &WorldShape,
                b: &WorldShape,
                result: &BroadphaseResult,
                out: &mut ContactBuffer,
            ) -> Result<()> {
                match (a, b) {
                    (WorldShape::$va(a), WorldShape::$vb(b)) => {
                        $contacts(a, b, result, out);
                        Ok(())
                    }
                    _ => Err(mismatch(a, b)),
                }
            }

            pub(super) const ROUTINE: PairRoutine = PairRoutine { collide, contacts };
        }
    };
}

pair_routine!(sphere_sphere_pair: Sphere, Sphere => sphere_sphere::collide, sphere_sphere::calculate_contacts);
pair_routine!(sphere_box_pair: Sphere, Box => sphere_box::collide, sphere_box::calculate_contacts);
pair_routine!(sphere_capsule_pair: Sphere, Capsule => capsule::collide_sphere_capsule, capsule::sphere_capsule_contacts);
pair_routine!(sphere_cylinder_pair: Sphere, Cylinder => convex::collide, convex::calculate_contacts);
pair_routine!(sphere_polytope_pair: Sphere, Polytope => convex::collide, convex::calculate_contacts);
pair_routine!(box_box_pair: Box, Box => box_box::collide, box_box::calculate_contacts);
pair_routine!(box_capsule_pair: Box, Capsule => convex::collide, convex::calculate_contacts);
pair_routine!(box_cylinder_pair: Box, Cylinder => convex::collide, convex::calculate_contacts);
pair_routine!(box_polytope_pair: Box, Polytope => convex::collide, convex::calculate_contacts);
pair_routine!(capsule_capsule_pair: Capsule, Capsule => capsule::collide_capsules, capsule::capsule_capsule_contacts);
pair_routine!(capsule_cylinder_pair: Capsule, Cylinder => capsule_cylinder::collide, capsule_cylinder::calculate_contacts);
pair_routine!(polytope_polytope_pair: Polytope, Polytope => convex::collide, convex::calculate_contacts);

use Cell::{Canonical as C, Mirrored as M, Unsupported as U};

/// Rows are the first shape, columns the second, in `ShapeType` order:
/// sphere, box, capsule, cylinder, polytope.
static TABLE: [[Cell; ShapeType::COUNT]; ShapeType::COUNT] = [
    [
        C(sphere_sphere_pair::ROUTINE),
        C(sphere_box_pair::ROUTINE),
        C(sphere_capsule_pair::ROUTINE),
        C(sphere_cylinder_pair::ROUTINE),
        C(sphere_polytope_pair::ROUTINE),
    ],
    [
        M(sphere_box_pair::ROUTINE),
        C(box_box_pair::ROUTINE),
        C(box_capsule_pair::ROUTINE),
        C(box_cylinder_pair::ROUTINE),
        C(box_polytope_pair::ROUTINE),
    ],
    [
        M(sphere_capsule_pair::ROUTINE),
        M(box_capsule_pair::ROUTINE),
        C(capsule_capsule_pair::ROUTINE),
        C(capsule_cylinder_pair::ROUTINE),
        U,
    ],
    [
        M(sphere_cylinder_pair::ROUTINE),
        M(box_cylinder_pair::ROUTINE),
        M(capsule_cylinder_pair::ROUTINE),
        U,
        U,
    ],
    [
        M(sphere_polytope_pair::ROUTINE),
        M(box_polytope_pair::ROUTINE),
        U,
        U,
        C(polytope_polytope_pair::ROUTINE),
    ],
];

/// Entry point to the per-pair narrow-phase routines
pub struct NarrowPhase;

impl NarrowPhase {
    fn cell(a: ShapeType, b: ShapeType) -> Result<(PairRoutine, bool)> {
        match TABLE[a.index()][b.index()] {
            Cell::Canonical(routine) => Ok((routine, false)),
            Cell::Mirrored(routine) => Ok((routine, true)),
            Cell::Unsupported => Err(PhysicsError::UnsupportedShapePair { a, b }),
        }
    }

    /// Returns whether a routine exists for the ordered pair
    pub fn is_supported(a: ShapeType, b: ShapeType) -> bool {
        !matches!(TABLE[a.index()][b.index()], Cell::Unsupported)
    }

    /// Overlap test between two world shapes.
    ///
    /// The direction of a colliding result is unit length and points from `a` toward `b`.
    pub fn collide(a: &WorldShape, b: &WorldShape) -> Result<BroadphaseResult> {
        let (routine, mirrored) = Self::cell(a.shape_type(), b.shape_type())?;

        if mirrored {
            Ok((routine.collide)(b, a)?.mirrored())
        } else {
            (routine.collide)(a, b)
        }
    }

    /// Appends the contact points of a colliding pair to `out`.
    ///
    /// `result` must come from [`NarrowPhase::collide`] with the same argument order.
    pub fn calculate_contacts(
        a: &WorldShape,
        b: &WorldShape,
        result: &BroadphaseResult,
        out: &mut ContactBuffer,
    ) -> Result<()> {
        let (routine, mirrored) = Self::cell(a.shape_type(), b.shape_type())?;

        if !mirrored {
            return (routine.contacts)(a, b, result, out);
        }

        let start = out.len();
        (routine.contacts)(b, a, &result.mirrored(), out)?;
        for point in out[start..].iter_mut() {
            point.normal = -point.normal;
        }

        Ok(())
    }
}
