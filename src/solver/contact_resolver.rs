use crate::bodies::RigidBody;
use crate::core::{BodyHandle, BodyStorage, SimulationConfig};
use crate::error::PhysicsError;
use crate::math::{is_finite, Vector2, Vector3};
use crate::solver::contact::Contact;
use crate::Result;

/// Summary of one resolver run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResolverStats {
    /// Number of contacts processed
    pub contacts: usize,

    /// Velocity passes actually performed
    pub velocity_iterations: u32,

    /// Penetration corrections actually performed
    pub position_iterations: u32,

    /// Deepest penetration left after the position pass
    pub max_penetration: f32,
}

/// Iterative contact resolver.
///
/// Velocities are solved first with warm-started sequential impulses
/// (Gauss-Seidel over the contacts in order). Interpenetration is then removed
/// by moving and rotating bodies directly, always working on the deepest
/// contact next. Both passes stop early once the remaining error falls below
/// the configured epsilons.
#[derive(Debug, Clone)]
pub struct ContactResolver {
    velocity_iterations: u32,
    position_iterations: u32,
    velocity_epsilon: f32,
    position_epsilon: f32,
    angular_move_limit: f32,
    restitution_threshold: f32,
    warm_starting: bool,
}

type BodyPair<'a> = [Option<&'a mut RigidBody>; 2];

fn bodies_mut<'a>(bodies: &'a mut BodyStorage<RigidBody>, handles: &[Option<BodyHandle>; 2]) -> BodyPair<'a> {
    match *handles {
        [Some(a), Some(b)] => {
            let (first, second) = bodies.get_pair_mut(a, b);
            [first, second]
        }
        [Some(a), None] => [bodies.get_mut(a), None],
        [None, Some(b)] => [None, bodies.get_mut(b)],
        [None, None] => [None, None],
    }
}

fn bodies_ref<'a>(bodies: &'a BodyStorage<RigidBody>, handles: &[Option<BodyHandle>; 2]) -> [Option<&'a RigidBody>; 2] {
    [
        handles[0].and_then(|h| bodies.get(h)),
        handles[1].and_then(|h| bodies.get(h)),
    ]
}

/// Velocity change along `direction` per unit impulse applied at the contact
fn inverse_effective_mass(pair: &BodyPair<'_>, contact: &Contact, direction: &Vector3) -> f32 {
    pair.iter()
        .enumerate()
        .filter_map(|(i, body)| body.as_ref().map(|b| (i, b)))
        .filter(|(_, body)| body.has_finite_mass())
        .map(|(i, body)| {
            let r = contact.relative_position[i];
            let angular = (body.get_inverse_inertia_tensor_world() * r.cross(direction)).cross(&r);
            body.get_inverse_mass() + angular.dot(direction)
        })
        .sum()
}

fn responds(body: &RigidBody) -> bool {
    body.is_awake() && body.has_finite_mass()
}

/// Whether at least one body of the contact can respond this step
fn is_active(pair: &BodyPair<'_>) -> bool {
    pair.iter().flatten().any(|body| responds(body))
}

/// Same as [`is_active`] without borrowing the bodies mutably
fn can_move(bodies: &BodyStorage<RigidBody>, contact: &Contact) -> bool {
    bodies_ref(bodies, &contact.bodies).into_iter().flatten().any(responds)
}

/// Awake bodies that move wake what they touch; resting static bodies never do
fn wakes_partner(body: &RigidBody) -> bool {
    body.is_awake()
        && (body.has_finite_mass()
            || body.get_linear_velocity().norm_squared() > 0.0
            || body.get_angular_velocity().norm_squared() > 0.0)
}

fn apply_impulse(pair: &mut BodyPair<'_>, contact: &Contact, impulse: Vector3) {
    for (i, body) in pair.iter_mut().enumerate() {
        if let Some(body) = body {
            body.apply_impulse_at_point(impulse * Contact::sign(i), contact.point.position);
        }
    }
}

impl ContactResolver {
    /// Creates a resolver using the solver settings of `config`
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            velocity_iterations: config.velocity_iterations,
            position_iterations: config.position_iterations,
            velocity_epsilon: config.velocity_epsilon,
            position_epsilon: config.position_epsilon,
            angular_move_limit: config.angular_move_limit,
            restitution_threshold: config.restitution_velocity_threshold,
            warm_starting: config.warm_starting,
        }
    }

    /// Sets the iteration caps of both passes
    pub fn set_iterations(&mut self, velocity_iterations: u32, position_iterations: u32) {
        self.velocity_iterations = velocity_iterations;
        self.position_iterations = position_iterations;
    }

    /// Sets the early-exit epsilons of both passes
    pub fn set_epsilons(&mut self, velocity_epsilon: f32, position_epsilon: f32) {
        self.velocity_epsilon = velocity_epsilon;
        self.position_epsilon = position_epsilon;
    }

    pub fn set_warm_starting(&mut self, warm_starting: bool) {
        self.warm_starting = warm_starting;
    }

    pub fn warm_starting(&self) -> bool {
        self.warm_starting
    }

    /// Resolves every contact, mutating body velocities and transforms.
    ///
    /// Contacts carrying non-finite data are rejected before any body is
    /// touched. Accumulated impulses are left in each contact's `point` for
    /// the caller to store back into the manifolds.
    pub fn resolve_contacts(
        &self,
        contacts: &mut [Contact],
        bodies: &mut BodyStorage<RigidBody>,
        dt: f32,
    ) -> Result<ResolverStats> {
        Self::validate(contacts, bodies)?;

        if contacts.is_empty() {
            return Ok(ResolverStats::default());
        }

        self.prepare_contacts(contacts, bodies, dt);
        self.warm_start(contacts, bodies);

        let velocity_iterations = self.adjust_velocities(contacts, bodies);
        let position_iterations = self.adjust_positions(contacts, bodies);

        let stats = ResolverStats {
            contacts: contacts.len(),
            velocity_iterations,
            position_iterations,
            max_penetration: contacts.iter().map(|c| c.penetration).fold(0.0, f32::max),
        };

        tracing::trace!(
            contacts = stats.contacts,
            velocity_iterations,
            position_iterations,
            max_penetration = stats.max_penetration,
            "contacts resolved"
        );

        Ok(stats)
    }

    fn validate(contacts: &[Contact], bodies: &BodyStorage<RigidBody>) -> Result<()> {
        for contact in contacts {
            if !contact.is_finite() {
                return Err(PhysicsError::InvalidContact(format!(
                    "point {} of {:?} has non-finite geometry",
                    contact.index, contact.pair
                )));
            }

            for body in bodies_ref(bodies, &contact.bodies).into_iter().flatten() {
                if !is_finite(&body.get_linear_velocity()) || !is_finite(&body.get_angular_velocity()) {
                    return Err(PhysicsError::InvalidContact(format!(
                        "point {} of {:?} involves a body with non-finite velocity",
                        contact.index, contact.pair
                    )));
                }
            }
        }

        Ok(())
    }

    fn prepare_contacts(&self, contacts: &mut [Contact], bodies: &mut BodyStorage<RigidBody>, dt: f32) {
        for contact in contacts.iter_mut() {
            if let [Some(a), Some(b)] = bodies_mut(bodies, &contact.bodies) {
                if wakes_partner(a) && !b.is_awake() && b.has_finite_mass() {
                    b.set_awake(true);
                } else if wakes_partner(b) && !a.is_awake() && a.has_finite_mass() {
                    a.set_awake(true);
                }
            }

            contact.prepare(bodies_ref(bodies, &contact.bodies), dt, self.restitution_threshold);
        }
    }

    fn warm_start(&self, contacts: &mut [Contact], bodies: &mut BodyStorage<RigidBody>) {
        for contact in contacts.iter_mut() {
            if !self.warm_starting {
                contact.point.clear_impulses();
                continue;
            }

            let mut pair = bodies_mut(bodies, &contact.bodies);
            if !is_active(&pair) {
                continue;
            }

            let basis = contact.contact_to_world;
            let impulse = basis.column(0) * contact.point.normal_impulse
                + basis.column(1) * contact.point.tangent_impulse.x
                + basis.column(2) * contact.point.tangent_impulse.y;

            apply_impulse(&mut pair, contact, impulse);
        }
    }

    /// Sequential impulse passes; returns the number of passes run
    fn adjust_velocities(&self, contacts: &mut [Contact], bodies: &mut BodyStorage<RigidBody>) -> u32 {
        let mut iterations = 0;

        while iterations < self.velocity_iterations {
            iterations += 1;
            let mut largest_change: f32 = 0.0;

            for contact in contacts.iter_mut() {
                let mut pair = bodies_mut(bodies, &contact.bodies);
                if !is_active(&pair) {
                    continue;
                }

                let change = Self::solve_velocity(contact, &mut pair);
                largest_change = largest_change.max(change);
            }

            if largest_change < self.velocity_epsilon {
                break;
            }
        }

        iterations
    }

    /// Applies one normal and friction impulse update; returns the impulse magnitude applied
    fn solve_velocity(contact: &mut Contact, pair: &mut BodyPair<'_>) -> f32 {
        let basis = contact.contact_to_world;
        let normal: Vector3 = basis.column(0).into_owned();
        let tangent: Vector3 = basis.column(1).into_owned();
        let bitangent: Vector3 = basis.column(2).into_owned();

        let k_normal = inverse_effective_mass(pair, contact, &normal);
        if k_normal <= 0.0 {
            return 0.0;
        }

        // Normal impulse, accumulated value kept non-negative
        let velocity = contact.relative_velocity(pair);
        let target = contact.contact_velocity.x + contact.desired_delta_velocity;
        let old_normal = contact.point.normal_impulse;
        let new_normal = (old_normal + (target - velocity.x) / k_normal).max(0.0);
        let normal_change = new_normal - old_normal;
        contact.point.normal_impulse = new_normal;
        apply_impulse(pair, contact, normal * normal_change);

        // Friction, clamped to the circular cone
        let velocity = contact.relative_velocity(pair);
        let k_tangent = inverse_effective_mass(pair, contact, &tangent);
        let k_bitangent = inverse_effective_mass(pair, contact, &bitangent);

        let old_friction = contact.point.tangent_impulse;
        let mut new_friction = old_friction
            + Vector2::new(
                if k_tangent > 0.0 { -velocity.y / k_tangent } else { 0.0 },
                if k_bitangent > 0.0 { -velocity.z / k_bitangent } else { 0.0 },
            );

        let max_friction = contact.friction * new_normal;
        let magnitude = new_friction.norm();
        if magnitude > max_friction {
            new_friction *= if magnitude > 0.0 { max_friction / magnitude } else { 0.0 };
        }

        let friction_change = new_friction - old_friction;
        contact.point.tangent_impulse = new_friction;
        apply_impulse(pair, contact, tangent * friction_change.x + bitangent * friction_change.y);

        normal_change.abs() + friction_change.norm()
    }

    /// Penetration passes, deepest contact first; returns the number of corrections made.
    ///
    /// Contacts where neither body can move keep their depth and are never picked.
    fn adjust_positions(&self, contacts: &mut [Contact], bodies: &mut BodyStorage<RigidBody>) -> u32 {
        let mut iterations = 0;

        while iterations < self.position_iterations {
            let deepest = contacts
                .iter()
                .enumerate()
                .filter(|(_, c)| c.penetration > self.position_epsilon && can_move(bodies, c))
                .max_by(|(_, a), (_, b)| a.penetration.total_cmp(&b.penetration))
                .map(|(i, _)| i);

            let Some(index) = deepest else {
                break;
            };

            let resolved = contacts[index].penetration;
            let (linear, angular) = self.resolve_penetration(&contacts[index], bodies);
            contacts[index].point.bias_impulse += resolved;

            // Moving a body changes the depth of every contact it takes part in
            let moved = contacts[index].bodies;
            for contact in contacts.iter_mut() {
                for b in 0..2 {
                    let Some(handle) = contact.bodies[b] else {
                        continue;
                    };

                    for d in 0..2 {
                        if moved[d] == Some(handle) {
                            let delta = linear[d] + angular[d].cross(&contact.relative_position[b]);
                            contact.penetration += delta.dot(&contact.normal) * -Contact::sign(b);
                        }
                    }
                }
            }

            iterations += 1;
        }

        iterations
    }

    /// Removes the penetration of one contact by moving its bodies.
    ///
    /// Each body takes a share of the correction proportional to its inertia
    /// at the contact (inverse mass for the linear part, the rotational
    /// response for the angular part). Immovable bodies take no share. The
    /// angular part is capped relative to the lever arm, with the excess moved
    /// linearly. Returns the linear and angular change applied to each body.
    pub fn resolve_penetration(
        &self,
        contact: &Contact,
        bodies: &mut BodyStorage<RigidBody>,
    ) -> ([Vector3; 2], [Vector3; 2]) {
        let mut linear_change = [Vector3::zeros(); 2];
        let mut angular_change = [Vector3::zeros(); 2];

        let mut pair = bodies_mut(bodies, &contact.bodies);
        let normal = contact.normal;

        let mut linear_inertia = [0.0f32; 2];
        let mut angular_inertia = [0.0f32; 2];
        let mut total_inertia = 0.0;

        for (i, body) in pair.iter().enumerate() {
            let Some(body) = body.as_ref().filter(|b| b.has_finite_mass()) else {
                continue;
            };

            let r = contact.relative_position[i];
            let per_impulse = (body.get_inverse_inertia_tensor_world() * r.cross(&normal)).cross(&r);
            angular_inertia[i] = per_impulse.dot(&normal).max(0.0);
            linear_inertia[i] = body.get_inverse_mass();
            total_inertia += linear_inertia[i] + angular_inertia[i];
        }

        if total_inertia <= 0.0 {
            return (linear_change, angular_change);
        }

        for (i, body) in pair.iter_mut().enumerate() {
            let Some(body) = body.as_mut().filter(|b| b.has_finite_mass()) else {
                continue;
            };

            let sign = Contact::sign(i);
            let mut angular_move = sign * contact.penetration * (angular_inertia[i] / total_inertia);
            let mut linear_move = sign * contact.penetration * (linear_inertia[i] / total_inertia);

            // Limit the rotation so long lever arms do not over-rotate
            let r = contact.relative_position[i];
            let projection = r - normal * r.dot(&normal);
            let max_magnitude = self.angular_move_limit * projection.norm();

            if angular_move.abs() > max_magnitude {
                let total_move = angular_move + linear_move;
                angular_move = angular_move.clamp(-max_magnitude, max_magnitude);
                linear_move = total_move - angular_move;
            }

            if angular_move != 0.0 && angular_inertia[i] > 0.0 {
                let impulse_per_move = body.get_inverse_inertia_tensor_world() * r.cross(&normal);
                angular_change[i] = impulse_per_move * (angular_move / angular_inertia[i]);
            }

            linear_change[i] = normal * linear_move;

            body.translate(linear_change[i]);
            body.rotate_by(angular_change[i]);
        }

        (linear_change, angular_change)
    }
}

impl Default for ContactResolver {
    fn default() -> Self {
        Self::new(&SimulationConfig::default())
    }
}
