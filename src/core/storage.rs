use std::marker::PhantomData;

use crate::error::PhysicsError;
use crate::Result;

/// A stable generational handle issued by a [`Storage`]
pub trait Handle: Copy + Eq + Ord + std::fmt::Debug {
    /// Human readable name of the handled resource, used in error messages
    const KIND: &'static str;

    /// Builds a handle from its slot index and generation
    fn from_parts(index: u32, generation: u32) -> Self;

    /// Slot index of the handle
    fn index(&self) -> u32;

    /// Generation of the slot when the handle was issued
    fn generation(&self) -> u32;
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

impl<T> Slot<T> {
    fn live_mut<H: Handle>(&mut self, handle: H) -> Option<&mut T> {
        if self.generation == handle.generation() {
            self.value.as_mut()
        } else {
            None
        }
    }
}

/// Generational arena storage for physics objects.
///
/// Handles stay valid until their item is removed; a removed slot is reused
/// with a bumped generation so stale handles never alias a new item.
/// Iteration always runs in slot order, which keeps simulation order
/// reproducible between runs.
#[derive(Debug)]
pub struct Storage<H: Handle, T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
    _handle: PhantomData<H>,
}

impl<H: Handle, T> Storage<H, T> {
    /// Creates a new empty storage
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
            _handle: PhantomData,
        }
    }

    /// Adds an item to the storage and returns its handle
    pub fn add(&mut self, item: T) -> H {
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(item);
            return H::from_parts(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(item),
        });
        H::from_parts(index, 0)
    }

    /// Returns whether the handle refers to a live item
    pub fn contains(&self, handle: H) -> bool {
        self.get(handle).is_some()
    }

    /// Gets a reference to an item by its handle
    pub fn get(&self, handle: H) -> Option<&T> {
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.value.as_ref())
    }

    /// Gets a mutable reference to an item by its handle
    pub fn get_mut(&mut self, handle: H) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.value.as_mut())
    }

    /// Gets an item by its handle, returning an error if not found
    pub fn get_checked(&self, handle: H) -> Result<&T> {
        self.get(handle).ok_or_else(|| Self::not_found(handle))
    }

    /// Gets a mutable reference to an item by its handle, returning an error if not found
    pub fn get_checked_mut(&mut self, handle: H) -> Result<&mut T> {
        self.get_mut(handle).ok_or_else(|| Self::not_found(handle))
    }

    /// Gets mutable references to two distinct items at once.
    ///
    /// When both handles are equal only the first reference is returned.
    pub fn get_pair_mut(&mut self, a: H, b: H) -> (Option<&mut T>, Option<&mut T>) {
        if a == b {
            return (self.get_mut(a), None);
        }

        let (ia, ib) = (a.index() as usize, b.index() as usize);
        if ia == ib {
            // Same slot with different generations: at most one of them is live
            let slot = self.slots.get_mut(ia);
            return match slot {
                Some(slot) if slot.generation == a.generation() => (slot.value.as_mut(), None),
                Some(slot) if slot.generation == b.generation() => (None, slot.value.as_mut()),
                _ => (None, None),
            };
        }

        let len = self.slots.len();
        if ia < ib {
            let (lo, hi) = self.slots.split_at_mut(ib.min(len));
            let first = lo.get_mut(ia).and_then(|slot| slot.live_mut(a));
            let second = hi.first_mut().and_then(|slot| slot.live_mut(b));
            (first, second)
        } else {
            let (lo, hi) = self.slots.split_at_mut(ia.min(len));
            let second = lo.get_mut(ib).and_then(|slot| slot.live_mut(b));
            let first = hi.first_mut().and_then(|slot| slot.live_mut(a));
            (first, second)
        }
    }

    /// Removes an item from the storage
    pub fn remove(&mut self, handle: H) -> Option<T> {
        let slot = self.slots.get_mut(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }

        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index());
        self.len -= 1;
        Some(value)
    }

    /// Returns the number of items in the storage
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the storage is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Clears all items from the storage, invalidating every handle
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.len = 0;
    }

    /// Returns all live handles in slot order
    pub fn handles(&self) -> Vec<H> {
        self.iter().map(|(handle, _)| handle).collect()
    }

    /// Returns an iterator over all items in slot order
    pub fn iter(&self) -> impl Iterator<Item = (H, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|value| (H::from_parts(index as u32, slot.generation), value))
        })
    }

    /// Returns a mutable iterator over all items in slot order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (H, &mut T)> + '_ {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(|value| (H::from_parts(index as u32, generation), value))
        })
    }

    fn not_found(handle: H) -> PhysicsError {
        PhysicsError::ResourceNotFound(format!("{} with handle {:?} not found", H::KIND, handle))
    }
}

impl<H: Handle, T> Default for Storage<H, T> {
    fn default() -> Self {
        Self::new()
    }
}
