use crate::bodies::{body_flags::BodyFlags, Material, RigidBodyType};
use crate::core::BodyHandle;
use crate::math::{Vector3, Transform, Matrix3, Quaternion};
use crate::shapes::Shape;

/// Type alias for a handle to a rigid body
pub type RigidBodyHandle = BodyHandle;

/// A rigid body for physics simulation.
///
/// An inverse mass of zero marks an immovable body: forces and impulses are
/// ignored and it contributes no inertia to contact resolution.
#[derive(Debug, Clone)]
pub struct RigidBody {
    /// The body's transform in world space, shared with its colliders
    transform: Transform,

    /// The body's linear velocity
    linear_velocity: Vector3,

    /// The body's angular velocity
    angular_velocity: Vector3,

    /// The body's material properties
    material: Material,

    /// The body's type (dynamic, kinematic, or static)
    body_type: RigidBodyType,

    /// The body's mass
    mass: f32,

    /// Inverse of the body's mass (zero for immovable bodies)
    inv_mass: f32,

    /// The body's inertia tensor in local space
    inertia_tensor: Matrix3,

    /// Inverse of the body's inertia tensor in local space
    inv_inertia_tensor: Matrix3,

    /// Inverse of the body's inertia tensor in world space
    inv_inertia_tensor_world: Matrix3,

    /// The body's linear damping
    linear_damping: f32,

    /// The body's angular damping
    angular_damping: f32,

    /// Force accumulated since the last integration
    force_accum: Vector3,

    /// Torque accumulated since the last integration
    torque_accum: Vector3,

    /// Linear acceleration applied during the last integration
    last_frame_acceleration: Vector3,

    /// The body's flags
    flags: BodyFlags,

    /// Recency-weighted average of the body's kinetic motion (for sleeping)
    motion: f32,
}

impl RigidBody {
    /// Creates a new rigid body with unit mass properties
    pub fn new(transform: Transform, body_type: RigidBodyType) -> Self {
        let mut body = Self {
            transform,
            linear_velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            material: Material::default(),
            body_type,
            mass: 1.0,
            inv_mass: 1.0,
            inertia_tensor: Matrix3::identity(),
            inv_inertia_tensor: Matrix3::identity(),
            inv_inertia_tensor_world: Matrix3::identity(),
            linear_damping: 0.0,
            angular_damping: 0.0,
            force_accum: Vector3::zeros(),
            torque_accum: Vector3::zeros(),
            last_frame_acceleration: Vector3::zeros(),
            flags: BodyFlags::AWAKE | BodyFlags::CAN_SLEEP | BodyFlags::AFFECTED_BY_GRAVITY,
            motion: f32::MAX,
        };

        if body_type != RigidBodyType::Dynamic {
            body.make_immovable();
        }
        body.update_inertia_tensor_world();

        body
    }

    /// Creates a new dynamic rigid body at the given position
    pub fn new_dynamic(position: Vector3) -> Self {
        Self::new(Transform::from_position(position), RigidBodyType::Dynamic)
    }

    /// Creates a new kinematic rigid body at the given position
    pub fn new_kinematic(position: Vector3) -> Self {
        Self::new(Transform::from_position(position), RigidBodyType::Kinematic)
    }

    /// Creates a new static rigid body at the given position
    pub fn new_static(position: Vector3) -> Self {
        Self::new(Transform::from_position(position), RigidBodyType::Static)
    }

    /// Returns the body's transform
    pub fn get_transform(&self) -> Transform {
        self.transform
    }

    /// Returns a reference to the body's transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Sets the body's transform
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.update_inertia_tensor_world();
    }

    /// Returns the body's position (its centre of mass)
    pub fn get_position(&self) -> Vector3 {
        self.transform.position
    }

    /// Sets the body's position
    pub fn set_position(&mut self, position: Vector3) {
        self.transform.position = position;
    }

    /// Returns the body's orientation
    pub fn get_rotation(&self) -> Quaternion {
        self.transform.rotation
    }

    /// Sets the body's orientation
    pub fn set_rotation(&mut self, rotation: Quaternion) {
        self.transform.rotation = rotation;
        self.update_inertia_tensor_world();
    }

    /// Returns the body's linear velocity
    pub fn get_linear_velocity(&self) -> Vector3 {
        self.linear_velocity
    }

    /// Sets the body's linear velocity
    pub fn set_linear_velocity(&mut self, velocity: Vector3) {
        self.linear_velocity = velocity;
        self.set_awake(true);
    }

    /// Returns the body's angular velocity
    pub fn get_angular_velocity(&self) -> Vector3 {
        self.angular_velocity
    }

    /// Sets the body's angular velocity
    pub fn set_angular_velocity(&mut self, velocity: Vector3) {
        self.angular_velocity = velocity;
        self.set_awake(true);
    }

    /// Velocity of the material point at `point` (world space)
    pub fn velocity_at_point(&self, point: &Vector3) -> Vector3 {
        self.linear_velocity + self.angular_velocity.cross(&(point - self.transform.position))
    }

    /// Returns the linear acceleration integrated during the last step
    pub fn get_last_frame_acceleration(&self) -> Vector3 {
        self.last_frame_acceleration
    }

    /// Returns the body's material
    pub fn get_material(&self) -> &Material {
        &self.material
    }

    /// Sets the body's material
    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    /// Returns the body type
    pub fn get_body_type(&self) -> RigidBodyType {
        self.body_type
    }

    /// Returns the body's mass (zero for immovable bodies)
    pub fn get_mass(&self) -> f32 {
        self.mass
    }

    /// Sets the body's mass (and inverse mass). Ignored for non-dynamic bodies.
    pub fn set_mass(&mut self, mass: f32) {
        if self.body_type != RigidBodyType::Dynamic {
            return;
        }

        if mass > 0.0 && mass.is_finite() {
            self.mass = mass;
            self.inv_mass = 1.0 / mass;
        } else {
            self.make_immovable();
        }
    }

    /// Returns the body's inverse mass
    pub fn get_inverse_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Returns whether the body has finite mass and can be moved by contacts
    pub fn has_finite_mass(&self) -> bool {
        self.inv_mass > 0.0
    }

    /// Returns the body's inertia tensor in local space
    pub fn get_inertia_tensor(&self) -> &Matrix3 {
        &self.inertia_tensor
    }

    /// Sets the body's inertia tensor in local space
    pub fn set_inertia_tensor(&mut self, tensor: Matrix3) {
        if self.body_type != RigidBodyType::Dynamic {
            return;
        }

        self.inertia_tensor = tensor;
        self.inv_inertia_tensor = tensor.try_inverse().unwrap_or_else(Matrix3::zeros);
        self.update_inertia_tensor_world();
    }

    /// Derives mass and inertia from a shape and the body's material density
    pub fn set_mass_properties_from_shape(&mut self, shape: &Shape) {
        if self.body_type != RigidBodyType::Dynamic {
            return;
        }

        let mass = shape.volume() * self.material.density;
        self.set_mass(mass);
        if self.has_finite_mass() {
            self.set_inertia_tensor(shape.inertia_tensor(mass));
        }
    }

    /// Returns the body's inverse inertia tensor in world space
    pub fn get_inverse_inertia_tensor_world(&self) -> &Matrix3 {
        &self.inv_inertia_tensor_world
    }

    /// Sets the body's linear damping
    pub fn set_linear_damping(&mut self, damping: f32) {
        self.linear_damping = damping.max(0.0);
    }

    /// Returns the body's linear damping
    pub fn get_linear_damping(&self) -> f32 {
        self.linear_damping
    }

    /// Sets the body's angular damping
    pub fn set_angular_damping(&mut self, damping: f32) {
        self.angular_damping = damping.max(0.0);
    }

    /// Returns the body's angular damping
    pub fn get_angular_damping(&self) -> f32 {
        self.angular_damping
    }

    /// Returns whether the body is affected by gravity
    pub fn is_affected_by_gravity(&self) -> bool {
        self.flags.contains(BodyFlags::AFFECTED_BY_GRAVITY)
    }

    /// Sets whether the body is affected by gravity
    pub fn set_affected_by_gravity(&mut self, affected: bool) {
        self.flags.set(BodyFlags::AFFECTED_BY_GRAVITY, affected);
    }

    /// Returns whether the body is awake
    pub fn is_awake(&self) -> bool {
        self.flags.contains(BodyFlags::AWAKE)
    }

    /// Wakes the body up or puts it to sleep. Sleeping bodies lose their velocity.
    pub fn set_awake(&mut self, awake: bool) {
        if awake {
            if !self.is_awake() {
                self.flags.insert(BodyFlags::AWAKE);
                // Start above the threshold so the body is not put straight back to sleep
                self.motion = f32::MAX;
            }
        } else {
            self.flags.remove(BodyFlags::AWAKE);
            self.linear_velocity = Vector3::zeros();
            self.angular_velocity = Vector3::zeros();
        }
    }

    /// Returns whether the body can sleep
    pub fn can_sleep(&self) -> bool {
        self.flags.contains(BodyFlags::CAN_SLEEP)
    }

    /// Sets whether the body can sleep
    pub fn set_can_sleep(&mut self, can_sleep: bool) {
        self.flags.set(BodyFlags::CAN_SLEEP, can_sleep);
        if !can_sleep {
            self.set_awake(true);
        }
    }

    /// Returns the averaged motion used for sleep decisions
    pub fn get_motion(&self) -> f32 {
        self.motion
    }

    /// Applies a force at the center of mass
    pub fn apply_force(&mut self, force: Vector3) {
        if !self.has_finite_mass() {
            return;
        }
        self.force_accum += force;
        self.set_awake(true);
    }

    /// Applies a force at a world-space point, producing torque
    pub fn apply_force_at_point(&mut self, force: Vector3, point: Vector3) {
        if !self.has_finite_mass() {
            return;
        }
        self.force_accum += force;
        self.torque_accum += (point - self.transform.position).cross(&force);
        self.set_awake(true);
    }

    /// Applies a torque to the body
    pub fn apply_torque(&mut self, torque: Vector3) {
        if !self.has_finite_mass() {
            return;
        }
        self.torque_accum += torque;
        self.set_awake(true);
    }

    /// Applies an impulse at the center of mass (instantaneous velocity change)
    pub fn apply_impulse(&mut self, impulse: Vector3) {
        if !self.has_finite_mass() {
            return;
        }
        self.linear_velocity += impulse * self.inv_mass;
    }

    /// Applies an impulse at a world-space point
    pub fn apply_impulse_at_point(&mut self, impulse: Vector3, point: Vector3) {
        if !self.has_finite_mass() {
            return;
        }
        let torque_impulse = (point - self.transform.position).cross(&impulse);
        self.linear_velocity += impulse * self.inv_mass;
        self.angular_velocity += self.inv_inertia_tensor_world * torque_impulse;
    }

    /// Displaces the body's position, used by penetration resolution
    pub fn translate(&mut self, delta: Vector3) {
        if !self.has_finite_mass() {
            return;
        }
        self.transform.position += delta;
    }

    /// Rotates the body by a scaled-axis rotation (axis * angle in radians)
    pub fn rotate_by(&mut self, scaled_axis: Vector3) {
        if !self.has_finite_mass() || scaled_axis.norm_squared() == 0.0 {
            return;
        }
        let delta = Quaternion::from_scaled_axis(scaled_axis);
        self.transform.rotation = delta * self.transform.rotation;
        self.transform.rotation.renormalize();
        self.update_inertia_tensor_world();
    }

    /// Clears the force and torque accumulators
    pub fn clear_accumulators(&mut self) {
        self.force_accum = Vector3::zeros();
        self.torque_accum = Vector3::zeros();
    }

    /// Integrates the body forward by `dt` using explicit Euler.
    ///
    /// Position and orientation advance with the velocities held at the start
    /// of the step, then velocities take the accumulated force and torque.
    /// Global damping is added to the body's own damping.
    pub fn integrate(&mut self, dt: f32, linear_damping: f32, angular_damping: f32) {
        if !self.is_awake() || self.body_type == RigidBodyType::Static {
            self.clear_accumulators();
            return;
        }

        // Kinematic bodies follow their velocity but never receive forces
        self.transform.position += self.linear_velocity * dt;
        if self.angular_velocity.norm_squared() > 0.0 {
            let delta = Quaternion::from_scaled_axis(self.angular_velocity * dt);
            self.transform.rotation = delta * self.transform.rotation;
            self.transform.rotation.renormalize();
        }
        self.update_inertia_tensor_world();

        if self.has_finite_mass() {
            self.last_frame_acceleration = self.force_accum * self.inv_mass;
            let angular_acceleration = self.inv_inertia_tensor_world * self.torque_accum;

            self.linear_velocity += self.last_frame_acceleration * dt;
            self.angular_velocity += angular_acceleration * dt;

            let linear_factor = 1.0 - ((self.linear_damping + linear_damping) * dt).clamp(0.0, 1.0);
            let angular_factor = 1.0 - ((self.angular_damping + angular_damping) * dt).clamp(0.0, 1.0);
            self.linear_velocity *= linear_factor;
            self.angular_velocity *= angular_factor;
        }

        self.clear_accumulators();
    }

    /// Updates the motion average and puts the body to sleep once it settles
    pub fn update_sleep(&mut self, bias: f32, sleep_epsilon: f32) {
        if !self.is_awake() || !self.can_sleep() || !self.has_finite_mass() {
            return;
        }

        let current = self.linear_velocity.norm_squared() + self.angular_velocity.norm_squared();
        self.motion = if self.motion == f32::MAX {
            current.max(sleep_epsilon * 2.0)
        } else {
            bias * self.motion + (1.0 - bias) * current
        };
        self.motion = self.motion.min(10.0 * sleep_epsilon);

        if self.motion < sleep_epsilon {
            self.set_awake(false);
        }
    }

    fn make_immovable(&mut self) {
        self.mass = 0.0;
        self.inv_mass = 0.0;
        self.inertia_tensor = Matrix3::zeros();
        self.inv_inertia_tensor = Matrix3::zeros();
        self.inv_inertia_tensor_world = Matrix3::zeros();
    }

    /// Updates the inverse inertia tensor in world space (R * I^-1 * R^T)
    fn update_inertia_tensor_world(&mut self) {
        let rotation = self.transform.rotation_matrix();
        self.inv_inertia_tensor_world = rotation * self.inv_inertia_tensor * rotation.transpose();
    }
}
