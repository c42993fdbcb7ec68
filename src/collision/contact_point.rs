use arrayvec::ArrayVec;

use crate::math::{is_finite, Vector2, Vector3};

/// Maximum number of contact points held by a manifold
pub const MAX_CONTACTS: usize = 8;

/// Fixed-capacity inline buffer of contact points
pub type ContactBuffer = ArrayVec<ContactPoint, MAX_CONTACTS>;

/// A geometric feature of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Feature {
    #[default]
    None,
    Vertex(u8),
    Edge(u8),
    Face(u8),
}

/// Identifies which pair of features produced a contact, so the contact can be
/// matched across frames despite positional drift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FeatureId {
    /// Feature on the reference shape
    pub reference: Feature,

    /// Feature on the incident shape
    pub incident: Feature,
}

impl FeatureId {
    pub fn new(reference: Feature, incident: Feature) -> Self {
        Self { reference, incident }
    }
}

/// A single point of contact between two shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    /// Contact position in world space
    pub position: Vector3,

    /// Unit contact normal, pointing from shape A toward shape B
    pub normal: Vector3,

    /// Depth of penetration along the normal
    pub penetration: f32,

    pub feature: FeatureId,

    /// Accumulated normal impulse (warm starting)
    pub normal_impulse: f32,

    /// Accumulated friction impulse along the tangent and bitangent
    pub tangent_impulse: Vector2,

    /// Penetration removed by the position pass during the last step.
    /// Starts from zero every time the manifold is refreshed.
    pub bias_impulse: f32,
}

impl ContactPoint {
    /// Creates a contact with no accumulated impulse
    pub fn new(position: Vector3, normal: Vector3, penetration: f32, feature: FeatureId) -> Self {
        Self {
            position,
            normal,
            penetration,
            feature,
            normal_impulse: 0.0,
            tangent_impulse: Vector2::zeros(),
            bias_impulse: 0.0,
        }
    }

    /// Zeroes the accumulated impulses
    pub fn clear_impulses(&mut self) {
        self.normal_impulse = 0.0;
        self.tangent_impulse = Vector2::zeros();
        self.bias_impulse = 0.0;
    }

    /// Takes over the velocity impulses of `other` for warm starting; the
    /// positional correction is per step and is not carried over
    pub fn warm_start_from(&mut self, other: &ContactPoint) {
        self.normal_impulse = other.normal_impulse;
        self.tangent_impulse = other.tangent_impulse;
    }

    /// Copies every accumulated value of `other`
    pub fn copy_impulses(&mut self, other: &ContactPoint) {
        self.normal_impulse = other.normal_impulse;
        self.tangent_impulse = other.tangent_impulse;
        self.bias_impulse = other.bias_impulse;
    }

    /// Whether every geometric field is a finite number
    pub fn is_finite(&self) -> bool {
        is_finite(&self.position) && is_finite(&self.normal) && self.penetration.is_finite()
    }
}

/// Adds `point` to `buffer`.
///
/// When the buffer is full the shallowest point is replaced, but only if the
/// new point penetrates deeper; otherwise the new point is dropped.
pub fn push_contact(buffer: &mut ContactBuffer, point: ContactPoint) {
    if let Err(overflow) = buffer.try_push(point) {
        let point = overflow.element();
        let shallowest = buffer
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.penetration.total_cmp(&b.penetration))
            .map(|(i, c)| (i, c.penetration));

        if let Some((index, depth)) = shallowest {
            if point.penetration > depth {
                buffer[index] = point;
            }
        }
    }
}
