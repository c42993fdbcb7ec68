use crate::math::Vector3;

/// Which of the two tested shapes acts as the reference for contact generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceSide {
    First,
    Second,
}

impl ReferenceSide {
    /// The opposite side
    pub fn flipped(self) -> Self {
        match self {
            ReferenceSide::First => ReferenceSide::Second,
            ReferenceSide::Second => ReferenceSide::First,
        }
    }
}

/// Outcome of a narrow-phase overlap test between shapes A and B.
///
/// When `collision_found` is set, `direction` is a unit vector pointing from
/// A toward B and `penetration` is the overlap along it. A penetration of
/// `f32::MAX` means no depth was computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BroadphaseResult {
    pub collision_found: bool,
    pub direction: Vector3,
    pub penetration: f32,
    pub reference: ReferenceSide,
}

impl BroadphaseResult {
    /// Result for shapes that do not overlap
    pub fn separated() -> Self {
        Self {
            collision_found: false,
            direction: Vector3::zeros(),
            penetration: f32::MAX,
            reference: ReferenceSide::First,
        }
    }

    /// Result for overlapping shapes
    pub fn colliding(direction: Vector3, penetration: f32, reference: ReferenceSide) -> Self {
        Self {
            collision_found: true,
            direction,
            penetration,
            reference,
        }
    }

    /// The same result seen from B's side: direction negated, reference swapped
    pub fn mirrored(&self) -> Self {
        Self {
            collision_found: self.collision_found,
            direction: -self.direction,
            penetration: self.penetration,
            reference: self.reference.flipped(),
        }
    }
}

impl Default for BroadphaseResult {
    fn default() -> Self {
        Self::separated()
    }
}
