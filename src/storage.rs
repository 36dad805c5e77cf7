//! Storage traits and a fixed-capacity arena with stable keys.
//!
//! Every linked structure in this crate coordinates keys into a storage
//! that owns the nodes. Storage guarantees:
//!
//! - **Stable keys**: a key remains valid until explicitly removed
//! - **O(1)** insert, remove, get
//! - **Slot reuse**: removed slots are recycled by future inserts
//!
//! Storage is split into bounded and unbounded variants:
//!
//! ```text
//! Storage<T>           - base trait: get, remove, len
//!     │
//!     ├── BoundedStorage<T>   - fixed capacity, try_insert -> Result
//!     │
//!     └── UnboundedStorage<T> - growable, insert -> Key (infallible)
//! ```
//!
//! [`BoxedStorage`] is the bounded arena in this crate; `slab::Slab` is
//! the growable backend and powers the [`owned`](crate::owned) containers.
//!
//! # Storage Invariant
//!
//! A structure must always be used with the same storage instance it was
//! populated through. This is the caller's responsibility (same discipline
//! as the `slab` crate).

use core::fmt;
use core::mem::MaybeUninit;

use crate::Key;

/// Slab-like storage with stable keys.
pub trait Storage<T> {
    /// Key type handed out by this storage.
    type Key: Key;

    /// Returns a reference to the value at `key`, if present.
    fn get(&self, key: Self::Key) -> Option<&T>;

    /// Returns a mutable reference to the value at `key`, if present.
    fn get_mut(&mut self, key: Self::Key) -> Option<&mut T>;

    /// Removes and returns the value at `key`, if present.
    fn remove(&mut self, key: Self::Key) -> Option<T>;

    /// Returns the number of occupied slots.
    fn len(&self) -> usize;

    /// Returns `true` if no slots are occupied.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a reference without bounds checking.
    ///
    /// # Safety
    ///
    /// `key` must be valid and occupied.
    unsafe fn get_unchecked(&self, key: Self::Key) -> &T;

    /// Returns a mutable reference without bounds checking.
    ///
    /// # Safety
    ///
    /// `key` must be valid and occupied.
    unsafe fn get_unchecked_mut(&mut self, key: Self::Key) -> &mut T;
}

/// Fixed-capacity storage; insertion fails when all slots are taken.
pub trait BoundedStorage<T>: Storage<T> {
    /// Inserts a value, returning its stable key.
    ///
    /// # Errors
    ///
    /// Returns `Full(value)` if every slot is occupied.
    fn try_insert(&mut self, value: T) -> Result<Self::Key, Full<T>>;

    /// Returns the total number of slots.
    fn capacity(&self) -> usize;

    /// Returns `true` if all slots are occupied.
    #[inline]
    fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }
}

/// Growable storage; insertion never fails.
pub trait UnboundedStorage<T>: Storage<T> {
    /// Inserts a value, returning its stable key.
    fn insert(&mut self, value: T) -> Self::Key;
}

/// Error returned when fixed-capacity storage is full.
///
/// Carries the rejected value so the caller can recover it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// BoxedStorage - fixed capacity, bitmap occupancy, LIFO free stack
// =============================================================================

/// Fixed-capacity arena with runtime-determined size.
///
/// Holds a boxed slot array, an occupancy bitmap (`u64` words), and a LIFO
/// free stack of recyclable keys. Capacity is rounded up to the next power
/// of two.
///
/// # Example
///
/// ```
/// use arena_collections::{BoundedStorage, BoxedStorage, Storage};
///
/// let mut storage: BoxedStorage<u64> = BoxedStorage::with_capacity(1000);
/// assert_eq!(storage.capacity(), 1024);
///
/// let key = storage.try_insert(42).unwrap();
/// assert_eq!(storage.get(key), Some(&42));
/// ```
pub struct BoxedStorage<T, K: Key = usize> {
    slots: Box<[MaybeUninit<T>]>,
    /// One bit per slot; set = occupied.
    occupied: Box<[u64]>,
    /// Recyclable keys, popped from the top.
    free: Vec<K>,
}

impl<T, K: Key> BoxedStorage<T, K> {
    /// Creates storage with at least `min_capacity` slots.
    ///
    /// Actual capacity is rounded up to the next power of 2.
    ///
    /// # Panics
    ///
    /// Panics if `min_capacity` is 0 or the rounded capacity exceeds the
    /// key type's maximum.
    pub fn with_capacity(min_capacity: usize) -> Self {
        assert!(min_capacity > 0, "capacity must be > 0");

        let capacity = min_capacity.next_power_of_two();
        assert!(
            capacity <= K::NONE.as_usize(),
            "capacity exceeds key type maximum"
        );

        Self {
            slots: (0..capacity).map(|_| MaybeUninit::uninit()).collect(),
            occupied: vec![0u64; bitmap_words(capacity)].into_boxed_slice(),
            free: (0..capacity).rev().map(K::from_usize).collect(),
        }
    }

    /// Returns the capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Returns `true` if no slots are occupied.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.free.len() == self.slots.len()
    }

    /// Returns `true` if all slots are occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.free.is_empty()
    }

    /// Drops all stored values and makes every slot available again.
    ///
    /// Any structure still holding keys into this storage must be cleared
    /// first; its keys dangle after this call.
    pub fn clear(&mut self) {
        for i in 0..self.slots.len() {
            if self.is_occupied(i) {
                // Safety: the bitmap says the slot is initialized
                unsafe { self.slots[i].assume_init_drop() };
            }
        }
        self.occupied.fill(0);
        self.free.clear();
        self.free.extend((0..self.slots.len()).rev().map(K::from_usize));
    }

    #[inline]
    fn is_occupied(&self, i: usize) -> bool {
        self.occupied[i / 64] & (1 << (i % 64)) != 0
    }

    #[inline]
    fn set_occupied(&mut self, i: usize) {
        self.occupied[i / 64] |= 1 << (i % 64);
    }

    #[inline]
    fn set_vacant(&mut self, i: usize) {
        self.occupied[i / 64] &= !(1 << (i % 64));
    }
}

impl<T, K: Key> Storage<T> for BoxedStorage<T, K> {
    type Key = K;

    #[inline]
    fn get(&self, key: K) -> Option<&T> {
        let i = key.as_usize();
        if key.is_none() || i >= self.slots.len() || !self.is_occupied(i) {
            return None;
        }
        // Safety: occupancy checked above
        Some(unsafe { self.slots[i].assume_init_ref() })
    }

    #[inline]
    fn get_mut(&mut self, key: K) -> Option<&mut T> {
        let i = key.as_usize();
        if key.is_none() || i >= self.slots.len() || !self.is_occupied(i) {
            return None;
        }
        // Safety: occupancy checked above
        Some(unsafe { self.slots[i].assume_init_mut() })
    }

    #[inline]
    fn remove(&mut self, key: K) -> Option<T> {
        let i = key.as_usize();
        if key.is_none() || i >= self.slots.len() || !self.is_occupied(i) {
            return None;
        }

        self.set_vacant(i);
        // Safety: the slot was occupied until this call
        let value = unsafe { self.slots[i].assume_init_read() };
        self.free.push(key);
        Some(value)
    }

    #[inline]
    fn len(&self) -> usize {
        self.len()
    }

    #[inline]
    unsafe fn get_unchecked(&self, key: K) -> &T {
        unsafe { self.slots.get_unchecked(key.as_usize()).assume_init_ref() }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, key: K) -> &mut T {
        unsafe {
            self.slots
                .get_unchecked_mut(key.as_usize())
                .assume_init_mut()
        }
    }
}

impl<T, K: Key> BoundedStorage<T> for BoxedStorage<T, K> {
    #[inline]
    fn try_insert(&mut self, value: T) -> Result<K, Full<T>> {
        let Some(key) = self.free.pop() else {
            return Err(Full(value));
        };

        let i = key.as_usize();
        self.slots[i].write(value);
        self.set_occupied(i);
        Ok(key)
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<T, K: Key> Drop for BoxedStorage<T, K> {
    fn drop(&mut self) {
        for i in 0..self.slots.len() {
            if self.is_occupied(i) {
                // Safety: the bitmap says the slot is initialized
                unsafe { self.slots[i].assume_init_drop() };
            }
        }
    }
}

// =============================================================================
// slab::Slab - growable backend
// =============================================================================

impl<T> Storage<T> for slab::Slab<T> {
    type Key = usize;

    #[inline]
    fn get(&self, key: usize) -> Option<&T> {
        self.get(key)
    }

    #[inline]
    fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        self.get_mut(key)
    }

    #[inline]
    fn remove(&mut self, key: usize) -> Option<T> {
        self.try_remove(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.len()
    }

    #[inline]
    unsafe fn get_unchecked(&self, key: usize) -> &T {
        unsafe { self.get(key).unwrap_unchecked() }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, key: usize) -> &mut T {
        unsafe { self.get_mut(key).unwrap_unchecked() }
    }
}

impl<T> UnboundedStorage<T> for slab::Slab<T> {
    #[inline]
    fn insert(&mut self, value: T) -> usize {
        self.insert(value)
    }
}

#[inline]
const fn bitmap_words(capacity: usize) -> usize {
    (capacity + 63) / 64
}
