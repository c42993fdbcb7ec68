use std::collections::BTreeMap;

use crate::bodies::RigidBody;
use crate::collision::{BroadphaseResult, Collider, CollisionPair, ContactManifold, NarrowPhase};
use crate::core::{BodyStorage, ColliderHandle, ColliderStorage};
use crate::debug::{Color, DebugDraw};
use crate::error::PhysicsError;
use crate::shapes::WorldShape;
use crate::Result;

/// Owns the registered colliders and the contact manifolds between them.
///
/// Collider data lives in the caller's storage; the system only tracks which
/// handles take part in collision detection. Pairs are visited in
/// registration order and manifolds are kept in handle order, so a step is
/// reproducible run to run.
#[derive(Debug, Default)]
pub struct CollisionSystem {
    colliders: Vec<ColliderHandle>,
    manifolds: BTreeMap<CollisionPair, ContactManifold>,
}

impl CollisionSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a collider. Registering the same handle twice is an error.
    pub fn add_collider(&mut self, handle: ColliderHandle) -> Result<()> {
        if self.colliders.contains(&handle) {
            return Err(PhysicsError::DuplicateCollider(handle));
        }

        tracing::debug!(collider = ?handle, "collider registered");
        self.colliders.push(handle);
        Ok(())
    }

    /// Unregisters a collider and drops its manifolds.
    ///
    /// Removing an unregistered collider logs a warning and does nothing.
    pub fn remove_collider(&mut self, handle: ColliderHandle) -> bool {
        let Some(index) = self.colliders.iter().position(|h| *h == handle) else {
            tracing::warn!(collider = ?handle, "attempted to remove a collider that is not registered");
            return false;
        };

        self.colliders.remove(index);
        self.manifolds.retain(|pair, _| !pair.contains(handle));
        tracing::debug!(collider = ?handle, "collider unregistered");
        true
    }

    /// Returns whether the handle is registered
    pub fn contains(&self, handle: ColliderHandle) -> bool {
        self.colliders.contains(&handle)
    }

    /// Registered colliders in registration order
    pub fn colliders(&self) -> &[ColliderHandle] {
        &self.colliders
    }

    /// Current manifolds in pair order
    pub fn manifolds(&self) -> impl Iterator<Item = &ContactManifold> + '_ {
        self.manifolds.values()
    }

    pub fn manifold_count(&self) -> usize {
        self.manifolds.len()
    }

    /// The manifold between two colliders, in either argument order
    pub fn get_manifold_for_colliders(&self, a: ColliderHandle, b: ColliderHandle) -> Option<&ContactManifold> {
        self.manifolds.get(&CollisionPair::new(a, b))
    }

    pub fn manifold_mut(&mut self, pair: &CollisionPair) -> Option<&mut ContactManifold> {
        self.manifolds.get_mut(pair)
    }

    /// Unregisters every collider and drops every manifold
    pub fn clear(&mut self) {
        self.colliders.clear();
        self.manifolds.clear();
    }

    fn world_shape(
        handle: ColliderHandle,
        colliders: &ColliderStorage<Collider>,
        bodies: &BodyStorage<RigidBody>,
    ) -> Result<WorldShape> {
        Ok(colliders.get_checked(handle)?.world_shape(bodies))
    }

    /// Tests every registered pair and creates, updates or erases its manifold.
    ///
    /// Colliders riding on the same body are never paired. Visits
    /// N * (N - 1) / 2 pairs.
    pub fn perform_broad_phase(
        &mut self,
        colliders: &ColliderStorage<Collider>,
        bodies: &BodyStorage<RigidBody>,
    ) -> Result<()> {
        let entries = self
            .colliders
            .iter()
            .map(|&handle| -> Result<_> {
                let collider = colliders.get_checked(handle)?;
                Ok((handle, collider.body(), collider.world_shape(bodies)))
            })
            .collect::<Result<Vec<_>>>()?;

        for (i, (handle_i, body_i, shape_i)) in entries.iter().enumerate() {
            for (handle_j, body_j, shape_j) in entries.iter().skip(i + 1) {
                if body_i.is_some() && body_i == body_j {
                    continue;
                }

                let pair = CollisionPair::new(*handle_i, *handle_j);
                let (a, b) = if pair.first() == *handle_i { (shape_i, shape_j) } else { (shape_j, shape_i) };

                let result = NarrowPhase::collide(a, b)?;
                self.update_manifold(pair, result);
            }
        }

        Ok(())
    }

    fn update_manifold(&mut self, pair: CollisionPair, result: BroadphaseResult) {
        if result.collision_found {
            self.manifolds
                .entry(pair)
                .and_modify(|manifold| manifold.set_broadphase_result(result))
                .or_insert_with(|| {
                    tracing::debug!(?pair, penetration = result.penetration, "manifold created");
                    ContactManifold::new(pair, result)
                });
        } else if self.manifolds.remove(&pair).is_some() {
            tracing::debug!(?pair, "manifold erased");
        }
    }

    /// Generates contact points for every colliding manifold
    pub fn perform_narrow_phase(
        &mut self,
        colliders: &ColliderStorage<Collider>,
        bodies: &BodyStorage<RigidBody>,
        warm_starting: bool,
    ) -> Result<()> {
        for (pair, manifold) in self.manifolds.iter_mut() {
            if !manifold.is_colliding() {
                continue;
            }

            let a = Self::world_shape(pair.first(), colliders, bodies)?;
            let b = Self::world_shape(pair.second(), colliders, bodies)?;
            manifold.generate_contacts(&a, &b, warm_starting)?;
        }

        Ok(())
    }

    /// Broad phase followed by narrow phase
    pub fn do_collision_step(
        &mut self,
        colliders: &ColliderStorage<Collider>,
        bodies: &BodyStorage<RigidBody>,
        warm_starting: bool,
    ) -> Result<()> {
        self.perform_broad_phase(colliders, bodies)?;
        self.perform_narrow_phase(colliders, bodies, warm_starting)
    }

    /// Draws every registered collider and every manifold
    pub fn debug_draw(
        &self,
        colliders: &ColliderStorage<Collider>,
        bodies: &BodyStorage<RigidBody>,
        draw: &mut dyn DebugDraw,
    ) {
        for collider in self.colliders.iter().filter_map(|&h| colliders.get(h)) {
            collider.debug_draw(bodies, draw, Color::GREEN);
        }

        for manifold in self.manifolds.values() {
            manifold.debug_draw(draw, Color::RED);
        }
    }
}
