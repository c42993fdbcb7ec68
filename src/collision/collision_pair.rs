use crate::core::ColliderHandle;

/// An unordered pair of colliders, stored with the smaller handle first.
///
/// (A, B) and (B, A) produce the same key; ordering follows handle order,
/// so maps keyed by pairs iterate deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    first: ColliderHandle,
    second: ColliderHandle,
}

impl CollisionPair {
    /// Creates a new collision pair
    pub fn new(a: ColliderHandle, b: ColliderHandle) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    /// The collider treated as shape A
    pub fn first(&self) -> ColliderHandle {
        self.first
    }

    /// The collider treated as shape B
    pub fn second(&self) -> ColliderHandle {
        self.second
    }

    /// Checks if this collision pair contains the specified collider
    pub fn contains(&self, collider: ColliderHandle) -> bool {
        self.first == collider || self.second == collider
    }

    /// Returns the other collider in the pair
    pub fn other(&self, collider: ColliderHandle) -> Option<ColliderHandle> {
        if self.first == collider {
            Some(self.second)
        } else if self.second == collider {
            Some(self.first)
        } else {
            None
        }
    }
}
