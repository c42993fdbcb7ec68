use crate::collision::broadphase_result::BroadphaseResult;
use crate::collision::collision_pair::CollisionPair;
use crate::collision::contact_point::{push_contact, ContactBuffer, ContactPoint};
use crate::collision::narrow_phase::NarrowPhase;
use crate::debug::{Color, DebugDraw};
use crate::shapes::WorldShape;
use crate::Result;

/// Length of the normals drawn by [`ContactManifold::debug_draw`]
const DEBUG_NORMAL_LENGTH: f32 = 0.25;

/// The persistent set of contact points between one pair of colliders.
///
/// A manifold exists only while its pair collides. It is updated in place
/// every step so accumulated impulses can be carried over to contacts that
/// persist (matched by feature id).
#[derive(Debug, Clone)]
pub struct ContactManifold {
    /// The collision pair this manifold belongs to
    pair: CollisionPair,

    /// Latest overlap test, A = `pair.first()`, B = `pair.second()`
    result: BroadphaseResult,

    contacts: ContactBuffer,
}

impl ContactManifold {
    /// Creates a new contact manifold with no contact points
    pub fn new(pair: CollisionPair, result: BroadphaseResult) -> Self {
        Self {
            pair,
            result,
            contacts: ContactBuffer::new(),
        }
    }

    pub fn pair(&self) -> CollisionPair {
        self.pair
    }

    pub fn broadphase_result(&self) -> &BroadphaseResult {
        &self.result
    }

    pub fn set_broadphase_result(&mut self, result: BroadphaseResult) {
        self.result = result;
    }

    /// Whether the last overlap test reported a collision
    pub fn is_colliding(&self) -> bool {
        self.result.collision_found
    }

    /// The contact points
    pub fn contacts(&self) -> &[ContactPoint] {
        &self.contacts
    }

    pub fn contacts_mut(&mut self) -> &mut [ContactPoint] {
        &mut self.contacts
    }

    /// Returns whether the manifold has no contact points
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Adds a contact point, replacing the shallowest point when full
    pub fn add_contact(&mut self, contact: ContactPoint) {
        push_contact(&mut self.contacts, contact);
    }

    /// Clears all contacts from the manifold
    pub fn clear(&mut self) {
        self.contacts.clear();
    }

    /// Replaces the contact set with `new_contacts`.
    ///
    /// A new point whose feature id matches an existing point takes the new
    /// geometry; with warm starting it keeps the old accumulated impulses,
    /// otherwise they are zeroed. Unmatched new points start from zero and
    /// old points missing from `new_contacts` are dropped.
    pub fn update_contacts(&mut self, new_contacts: &[ContactPoint], warm_starting: bool) {
        let mut merged = ContactBuffer::new();

        for contact in new_contacts {
            let mut point = *contact;
            point.clear_impulses();

            if warm_starting {
                if let Some(old) = self.contacts.iter().find(|old| old.feature == contact.feature) {
                    point.warm_start_from(old);
                }
            }

            push_contact(&mut merged, point);
        }

        self.contacts = merged;
    }

    /// Recomputes the contact points for the pair and merges them into the manifold
    pub fn generate_contacts(&mut self, a: &WorldShape, b: &WorldShape, warm_starting: bool) -> Result<()> {
        let mut fresh = ContactBuffer::new();
        NarrowPhase::calculate_contacts(a, b, &self.result, &mut fresh)?;
        self.update_contacts(&fresh, warm_starting);
        Ok(())
    }

    /// Draws each contact point with its normal
    pub fn debug_draw(&self, draw: &mut dyn DebugDraw, color: Color) {
        for contact in &self.contacts {
            draw.draw_point(contact.position, color);
            draw.draw_line(
                contact.position,
                contact.position + contact.normal * DEBUG_NORMAL_LENGTH,
                color,
            );
        }
    }
}
