use crate::bodies::{RigidBody, RigidBodyType};
use crate::collision::{Collider, CollisionSystem};
use crate::core::{BodyHandle, BodyStorage, ColliderHandle, ColliderStorage, GravityType, SimulationConfig};
use crate::debug::DebugDraw;
use crate::math::Transform;
use crate::solver::{build_contacts, store_impulses, ContactResolver, ResolverStats};
use crate::Result;

/// The physics driver: owns bodies, colliders, the collision system and the resolver
pub struct PhysicsWorld {
    /// All rigid bodies in the world
    bodies: BodyStorage<RigidBody>,

    /// All colliders in the world
    colliders: ColliderStorage<Collider>,

    collision_system: CollisionSystem,

    resolver: ContactResolver,

    /// Configuration for the simulation
    config: SimulationConfig,

    /// Statistics of the last resolver run
    last_stats: ResolverStats,

    /// The total elapsed simulation time
    time: f32,
}

impl PhysicsWorld {
    /// Creates a new physics world with default settings
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default())
    }

    /// Creates a new physics world with the given configuration
    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            bodies: BodyStorage::new(),
            colliders: ColliderStorage::new(),
            collision_system: CollisionSystem::new(),
            resolver: ContactResolver::new(&config),
            config,
            last_stats: ResolverStats::default(),
            time: 0.0,
        }
    }

    /// Returns the current simulation time
    pub fn get_time(&self) -> f32 {
        self.time
    }

    /// Sets the gravity for the simulation
    pub fn set_gravity(&mut self, gravity: GravityType) {
        self.config.gravity = gravity;
    }

    /// Gets the current gravity
    pub fn get_gravity(&self) -> GravityType {
        self.config.gravity
    }

    /// Returns a reference to the simulation configuration
    pub fn get_config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Replaces the configuration and rebuilds the resolver from it
    pub fn set_config(&mut self, config: SimulationConfig) {
        self.resolver = ContactResolver::new(&config);
        self.config = config;
    }

    /// Adds a rigid body to the world and returns its handle
    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        self.bodies.add(body)
    }

    /// Removes a rigid body together with every collider attached to it
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<RigidBody> {
        self.bodies.get_checked(handle)?;

        let attached: Vec<ColliderHandle> = self
            .colliders
            .iter()
            .filter(|(_, collider)| collider.body() == Some(handle))
            .map(|(c_handle, _)| c_handle)
            .collect();

        for c_handle in attached {
            self.remove_collider(c_handle);
        }

        self.bodies
            .remove(handle)
            .ok_or_else(|| crate::error::PhysicsError::InternalError(format!("body {handle:?} vanished during removal")))
    }

    /// Gets a reference to a rigid body by its handle
    pub fn get_body(&self, handle: BodyHandle) -> Result<&RigidBody> {
        self.bodies.get_checked(handle)
    }

    /// Gets a mutable reference to a rigid body by its handle
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody> {
        self.bodies.get_checked_mut(handle)
    }

    /// Gets the transform of a rigid body
    pub fn get_transform(&self, handle: BodyHandle) -> Result<Transform> {
        Ok(self.bodies.get_checked(handle)?.get_transform())
    }

    /// Sets the transform of a rigid body and wakes it
    pub fn set_transform(&mut self, handle: BodyHandle, transform: Transform) -> Result<()> {
        let body = self.bodies.get_checked_mut(handle)?;
        body.set_transform(transform);
        if body.has_finite_mass() {
            body.set_awake(true);
        }
        Ok(())
    }

    /// Adds a collider and registers it with the collision system.
    ///
    /// A collider referring to a body that is not in the world is rejected.
    pub fn add_collider(&mut self, collider: Collider) -> Result<ColliderHandle> {
        if let Some(body) = collider.body() {
            self.bodies.get_checked(body)?;
        }

        let handle = self.colliders.add(collider);
        self.collision_system.add_collider(handle)?;
        Ok(handle)
    }

    /// Removes a collider and its manifolds; returns whether it existed
    pub fn remove_collider(&mut self, handle: ColliderHandle) -> bool {
        let registered = self.collision_system.remove_collider(handle);
        self.colliders.remove(handle).is_some() && registered
    }

    pub fn get_collider(&self, handle: ColliderHandle) -> Result<&Collider> {
        self.colliders.get_checked(handle)
    }

    pub fn get_collider_mut(&mut self, handle: ColliderHandle) -> Result<&mut Collider> {
        self.colliders.get_checked_mut(handle)
    }

    pub fn bodies(&self) -> &BodyStorage<RigidBody> {
        &self.bodies
    }

    pub fn colliders(&self) -> &ColliderStorage<Collider> {
        &self.colliders
    }

    /// The collision system, for manifold queries
    pub fn collision_system(&self) -> &CollisionSystem {
        &self.collision_system
    }

    pub fn resolver_mut(&mut self) -> &mut ContactResolver {
        &mut self.resolver
    }

    /// Statistics of the most recent resolver run
    pub fn last_resolver_stats(&self) -> ResolverStats {
        self.last_stats
    }

    /// Advances the simulation by `time_step`, split into fixed substeps.
    ///
    /// At most `max_substeps` substeps run; time beyond that is dropped. An
    /// error aborts the remaining substeps.
    pub fn step(&mut self, time_step: f32) -> Result<()> {
        let fixed_step = self.config.time_step;
        let max_steps = self.config.max_substeps;

        let mut remaining_time = time_step;
        let mut steps = 0;

        while remaining_time > 0.0 && steps < max_steps {
            let dt = fixed_step.min(remaining_time);

            self.step_simulation(dt)?;

            remaining_time -= dt;
            steps += 1;
        }

        self.time += time_step;
        Ok(())
    }

    /// Performs a single step of the physics simulation
    fn step_simulation(&mut self, dt: f32) -> Result<()> {
        let gravity = self.config.gravity.acceleration();

        for (_, body) in self.bodies.iter_mut() {
            if body.get_body_type() == RigidBodyType::Dynamic && body.is_affected_by_gravity() && body.is_awake() {
                body.apply_force(gravity * body.get_mass());
            }

            body.integrate(dt, self.config.linear_damping, self.config.angular_damping);
        }

        self.collision_system
            .do_collision_step(&self.colliders, &self.bodies, self.config.warm_starting)?;

        let mut contacts = build_contacts(&self.collision_system, &self.colliders, &self.bodies);
        self.last_stats = self.resolver.resolve_contacts(&mut contacts, &mut self.bodies, dt)?;
        store_impulses(&contacts, &mut self.collision_system);

        if self.config.allow_sleeping {
            let bias = self.config.sleep_motion_bias.powf(dt);
            for (_, body) in self.bodies.iter_mut() {
                body.update_sleep(bias, self.config.sleep_epsilon);
            }
        }

        Ok(())
    }

    /// Draws every collider and manifold through `draw`
    pub fn debug_draw(&self, draw: &mut dyn DebugDraw) {
        self.collision_system.debug_draw(&self.colliders, &self.bodies, draw);
    }

    /// Clears the world of all bodies and colliders
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.colliders.clear();
        self.collision_system.clear();
        self.time = 0.0;
    }

    /// Returns the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Returns the number of colliders in the world
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
