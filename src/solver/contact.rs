use approx::relative_eq;

use crate::bodies::RigidBody;
use crate::collision::{Collider, CollisionPair, CollisionSystem, ContactPoint};
use crate::core::{BodyHandle, BodyStorage, ColliderStorage};
use crate::math::{is_finite, Matrix3, Vector3};

/// Normals closer than this to the world Y axis build their basis from X instead
const NEARLY_VERTICAL: f32 = 0.9;

/// Builds a right-handed contact basis whose first column is `normal`.
///
/// The tangent comes from crossing a world reference axis (Y, or X when the
/// normal is nearly Y) with the normal; the bitangent completes the frame.
pub fn contact_basis(normal: &Vector3) -> Matrix3 {
    debug_assert!(
        relative_eq!(normal.norm(), 1.0, epsilon = 1.0e-3),
        "contact normal must be unit length, got {normal:?}"
    );

    let reference = if normal.y.abs() > NEARLY_VERTICAL {
        Vector3::x()
    } else {
        Vector3::y()
    };

    let tangent = reference.cross(normal).normalize();
    let bitangent = normal.cross(&tangent);

    Matrix3::from_columns(&[*normal, tangent, bitangent])
}

/// A contact point prepared for the resolver.
///
/// The normal points from `bodies[1]` toward `bodies[0]`; applying a positive
/// impulse along it pushes the bodies apart. `bodies[1]` is absent when the
/// other collider is not attached to a body.
#[derive(Debug, Clone)]
pub struct Contact {
    /// Manifold the point came from
    pub pair: CollisionPair,

    /// Index of the point inside its manifold
    pub index: usize,

    pub bodies: [Option<BodyHandle>; 2],

    /// The manifold point, carrying the accumulated impulses
    pub point: ContactPoint,

    pub normal: Vector3,
    pub penetration: f32,
    pub restitution: f32,
    pub friction: f32,

    pub(crate) contact_to_world: Matrix3,

    /// Contact position relative to each body's centre of mass
    pub(crate) relative_position: [Vector3; 2],

    /// Closing velocity in contact space at preparation time
    pub(crate) contact_velocity: Vector3,

    /// Change in normal velocity the velocity pass aims for
    pub(crate) desired_delta_velocity: f32,
}

impl Contact {
    /// Creates an unprepared contact
    pub fn new(
        pair: CollisionPair,
        index: usize,
        bodies: [Option<BodyHandle>; 2],
        point: ContactPoint,
        normal: Vector3,
        restitution: f32,
        friction: f32,
    ) -> Self {
        Self {
            pair,
            index,
            bodies,
            penetration: point.penetration,
            point,
            normal,
            restitution,
            friction,
            contact_to_world: Matrix3::identity(),
            relative_position: [Vector3::zeros(); 2],
            contact_velocity: Vector3::zeros(),
            desired_delta_velocity: 0.0,
        }
    }

    /// Contact-to-world basis (columns: normal, tangent, bitangent)
    pub fn basis(&self) -> &Matrix3 {
        &self.contact_to_world
    }

    /// Closing velocity in contact space computed by [`Contact::prepare`]
    pub fn contact_velocity(&self) -> Vector3 {
        self.contact_velocity
    }

    pub fn desired_delta_velocity(&self) -> f32 {
        self.desired_delta_velocity
    }

    /// Whether position, normal and penetration are finite numbers
    pub fn is_finite(&self) -> bool {
        self.point.is_finite() && is_finite(&self.normal) && self.penetration.is_finite()
    }

    /// Sign applied to quantities of body `i` (the second body sees the contact reversed)
    #[inline]
    pub(crate) fn sign(i: usize) -> f32 {
        if i == 0 { 1.0 } else { -1.0 }
    }

    /// Computes the basis, lever arms, closing velocity and desired velocity change
    pub fn prepare(&mut self, bodies: [Option<&RigidBody>; 2], dt: f32, restitution_threshold: f32) {
        self.contact_to_world = contact_basis(&self.normal);

        self.contact_velocity = Vector3::zeros();
        for (i, body) in bodies.iter().enumerate() {
            if let Some(body) = body {
                self.relative_position[i] = self.point.position - body.get_position();
                self.contact_velocity += self.local_velocity(body, i, dt) * Self::sign(i);
            }
        }

        self.desired_delta_velocity = self.compute_desired_delta_velocity(bodies, dt, restitution_threshold);
    }

    /// Velocity of body `i`'s material point at the contact, in contact space.
    ///
    /// The planar part of last frame's acceleration is included so friction
    /// can cancel it.
    fn local_velocity(&self, body: &RigidBody, i: usize, dt: f32) -> Vector3 {
        let world_to_contact = self.contact_to_world.transpose();
        let velocity = body.get_angular_velocity().cross(&self.relative_position[i]) + body.get_linear_velocity();

        let mut contact_velocity = world_to_contact * velocity;

        let mut acc_velocity = world_to_contact * (body.get_last_frame_acceleration() * dt);
        acc_velocity.x = 0.0;
        contact_velocity += acc_velocity;

        contact_velocity
    }

    /// `-vn - e * (vn - v_acc)`, where `v_acc` is the normal velocity built up
    /// by last frame's acceleration alone. Restitution is dropped for slow
    /// contacts so resting bodies do not jitter.
    fn compute_desired_delta_velocity(&self, bodies: [Option<&RigidBody>; 2], dt: f32, threshold: f32) -> f32 {
        let mut velocity_from_acc = 0.0;
        for (i, body) in bodies.iter().enumerate() {
            if let Some(body) = body {
                if body.is_awake() {
                    velocity_from_acc += Self::sign(i) * (body.get_last_frame_acceleration() * dt).dot(&self.normal);
                }
            }
        }

        let closing = self.contact_velocity.x;
        let restitution = if closing.abs() < threshold { 0.0 } else { self.restitution };

        -closing - restitution * (closing - velocity_from_acc)
    }

    /// Current relative velocity at the contact in contact space (no acceleration term)
    pub(crate) fn relative_velocity(&self, bodies: &[Option<&mut RigidBody>; 2]) -> Vector3 {
        let world_to_contact = self.contact_to_world.transpose();
        let mut velocity = Vector3::zeros();
        for (i, body) in bodies.iter().enumerate() {
            if let Some(body) = body {
                let v = body.get_linear_velocity() + body.get_angular_velocity().cross(&self.relative_position[i]);
                velocity += v * Self::sign(i);
            }
        }
        world_to_contact * velocity
    }
}

/// Builds one solver contact per manifold point.
///
/// Pairs where neither collider rides on a body are skipped. When only the
/// second collider has a body, it becomes `bodies[0]`.
pub fn build_contacts(
    system: &CollisionSystem,
    colliders: &ColliderStorage<Collider>,
    bodies: &BodyStorage<RigidBody>,
) -> Vec<Contact> {
    let mut contacts = Vec::new();

    for manifold in system.manifolds() {
        let pair = manifold.pair();
        let (Some(a), Some(b)) = (colliders.get(pair.first()), colliders.get(pair.second())) else {
            continue;
        };

        let live_body = |c: &Collider| c.body().filter(|h| bodies.contains(*h));
        let (body_a, body_b) = (live_body(a), live_body(b));

        let material_a = a.material(bodies);
        let material_b = b.material(bodies);
        let restitution = material_a.combined_restitution(&material_b);
        let friction = material_a.combined_friction(&material_b);

        for (index, point) in manifold.contacts().iter().enumerate() {
            // Manifold normals run from A to B; the solver wants them toward bodies[0]
            let (handles, normal) = match (body_a, body_b) {
                (Some(_), _) => ([body_a, body_b], -point.normal),
                (None, Some(_)) => ([body_b, None], point.normal),
                (None, None) => continue,
            };

            contacts.push(Contact::new(pair, index, handles, *point, normal, restitution, friction));
        }
    }

    contacts
}

/// Copies the impulses accumulated by the resolver back into the manifolds
pub fn store_impulses(contacts: &[Contact], system: &mut CollisionSystem) {
    for contact in contacts {
        if let Some(point) = system
            .manifold_mut(&contact.pair)
            .and_then(|manifold| manifold.contacts_mut().get_mut(contact.index))
        {
            point.copy_impulses(&contact.point);
        }
    }
}
