// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Typed handles and the append-only stores they index.
//!
//! Registries, contacts and broad phases refer to particles and bodies by
//! handle rather than by reference, so a single mutable borrow of the owning
//! store is enough to apply forces or resolve contacts between any two
//! entries.
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};

use crate::body::RigidBody;
use crate::particle::Particle;

/// Stable, typed index into a [`Store<T>`].
///
/// Handles are plain `u32` indices tagged with the element type; they are
/// `Copy`, totally ordered by insertion, and never reused because stores are
/// append-only.
pub struct Handle<T> {
    index: u32,
    _marker: PhantomData<fn() -> T>,
}

/// Handle to a particle in a [`ParticleSet`].
pub type ParticleId = Handle<Particle>;

/// Handle to a rigid body in a [`BodySet`].
pub type BodyId = Handle<RigidBody>;

impl<T> Handle<T> {
    /// Builds a handle from a raw index.
    ///
    /// Handles minted this way are only meaningful against a store that holds
    /// at least `index + 1` entries.
    pub const fn from_raw(index: u32) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    /// Raw index of the handle.
    pub const fn raw(self) -> u32 {
        self.index
    }

    /// Index as `usize` for slice access.
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

// Manual impls: derives would demand the same traits from `T`.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> PartialOrd for Handle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Handle<T> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.index.cmp(&other.index)
    }
}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.index)
    }
}

/// Append-only arena of simulation entities addressed by [`Handle`].
#[derive(Debug, Clone)]
pub struct Store<T> {
    items: Vec<T>,
}

/// Store of particles.
pub type ParticleSet = Store<Particle>;

/// Store of rigid bodies.
pub type BodySet = Store<RigidBody>;

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Store<T> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `item` and returns its handle.
    pub fn insert(&mut self, item: T) -> Handle<T> {
        let index = u32::try_from(self.items.len()).unwrap_or(u32::MAX);
        self.items.push(item);
        Handle::from_raw(index)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` when `handle` addresses an entry of this store.
    pub fn contains(&self, handle: Handle<T>) -> bool {
        handle.index() < self.items.len()
    }

    /// Shared access to an entry.
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.items.get(handle.index())
    }

    /// Exclusive access to an entry.
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.items.get_mut(handle.index())
    }

    /// Exclusive access to two distinct entries at once.
    ///
    /// Returns `None` when the handles are equal or either is out of range.
    pub fn pair_mut(&mut self, a: Handle<T>, b: Handle<T>) -> Option<(&mut T, &mut T)> {
        let (ia, ib) = (a.index(), b.index());
        if ia == ib || ia >= self.items.len() || ib >= self.items.len() {
            return None;
        }
        if ia < ib {
            let (lo, hi) = self.items.split_at_mut(ib);
            Some((&mut lo[ia], &mut hi[0]))
        } else {
            let (lo, hi) = self.items.split_at_mut(ia);
            Some((&mut hi[0], &mut lo[ib]))
        }
    }

    /// Iterates entries with their handles in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> + '_ {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (Handle::from_raw(i as u32), item))
    }

    /// Iterates entries mutably in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.items.iter_mut()
    }

    /// Iterates the handles of every entry in insertion order.
    pub fn handles(&self) -> impl Iterator<Item = Handle<T>> + '_ {
        (0..self.items.len()).map(|i| Handle::from_raw(i as u32))
    }
}

impl<T> Index<Handle<T>> for Store<T> {
    type Output = T;

    fn index(&self, handle: Handle<T>) -> &T {
        &self.items[handle.index()]
    }
}

impl<T> IndexMut<Handle<T>> for Store<T> {
    fn index_mut(&mut self, handle: Handle<T>) -> &mut T {
        &mut self.items[handle.index()]
    }
}
