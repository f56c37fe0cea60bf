//! Storage trait for slab-like containers with stable keys.
//!
//! Storage provides insert/remove/get operations where keys remain valid
//! until explicitly removed. Queues address their nodes through these keys
//! instead of pointers, so relinking is plain index assignment.

use crate::Key;

/// Slab-like storage with stable keys.
///
/// # Requirements
///
/// Implementations must provide:
/// - **Stable keys**: a key remains valid until explicitly removed
/// - **O(1)** insert, remove, get operations
/// - **Slot reuse**: removed slots can be reused by future inserts
/// - **No `NONE` keys**: [`Key::NONE`] is never handed out
///
/// # Implementations
///
/// - [`Arena<T>`] - growable, optionally bounded, free-list reuse (in this crate)
/// - `slab::Slab<T>` - growable, heap allocated (feature `slab`)
pub trait Storage<T> {
    /// Key type for this storage.
    type Key: Key;

    /// Inserts a value, returning its stable key.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if no slot can be provided. The value is
    /// handed back untouched.
    fn try_insert(&mut self, value: T) -> Result<Self::Key, Full<T>>;

    /// Removes and returns the value at `key`, if present.
    fn remove(&mut self, key: Self::Key) -> Option<T>;

    /// Returns a reference to the value at `key`, if present.
    fn get(&self, key: Self::Key) -> Option<&T>;

    /// Returns a mutable reference to the value at `key`, if present.
    fn get_mut(&mut self, key: Self::Key) -> Option<&mut T>;

    /// Returns the number of occupied slots.
    fn len(&self) -> usize;

    /// Returns `true` if no slots are occupied.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Error returned when storage cannot provide another slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> core::fmt::Display for Full<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: core::fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// Arena - growable slots, free list threaded through vacant entries
// =============================================================================

#[derive(Debug)]
enum Slot<T, K> {
    Occupied(T),
    /// Vacant slot holding the next free key.
    Vacant(K),
}

/// Index-addressed arena with a free list.
///
/// Vacant slots form a singly-linked free list, so removal and reuse are
/// O(1) and keys stay stable for the lifetime of the value.
///
/// Growth goes through [`Vec::try_reserve`]: allocator exhaustion and the
/// configured slot limit both surface as [`Full`] rather than aborting.
///
/// # Example
///
/// ```
/// use nexus_ringq::{Arena, Storage};
///
/// let mut arena: Arena<&str> = Arena::bounded(2);
///
/// let a = arena.try_insert("a").unwrap();
/// let _b = arena.try_insert("b").unwrap();
/// assert_eq!(arena.try_insert("c").unwrap_err().into_inner(), "c");
///
/// assert_eq!(arena.remove(a), Some("a"));
/// let c = arena.try_insert("c").unwrap();
/// assert_eq!(c, a); // slot reused
/// ```
#[derive(Debug)]
pub struct Arena<T, K: Key = u32> {
    slots: Vec<Slot<T, K>>,
    /// Head of the free list, `K::NONE` when every slot is occupied.
    free_head: K,
    len: usize,
    /// Maximum number of slots.
    limit: usize,
}

impl<T, K: Key> Arena<T, K> {
    /// Creates an empty arena that grows up to the key type's range.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: K::NONE,
            len: 0,
            limit: K::NONE.as_usize(),
        }
    }

    /// Creates an empty arena with room for `capacity` values before
    /// reallocating.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds the key type's range.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity <= K::NONE.as_usize(),
            "capacity exceeds key type maximum"
        );

        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Creates an arena that never holds more than `limit` values.
    ///
    /// Inserts beyond the limit fail with [`Full`].
    ///
    /// # Panics
    ///
    /// Panics if `limit` is 0.
    pub fn bounded(limit: usize) -> Self {
        assert!(limit > 0, "limit must be > 0");

        let limit = limit.min(K::NONE.as_usize());
        Self {
            slots: Vec::new(),
            free_head: K::NONE,
            len: 0,
            limit,
        }
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slots are occupied.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the slot limit.
    #[inline]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the number of slots allocated, occupied or vacant.
    #[inline]
    pub fn slots(&self) -> usize {
        self.slots.len()
    }

    /// Removes all values from the arena.
    ///
    /// # Warning
    ///
    /// Queues still holding keys into this arena are left dangling. Clear
    /// or destroy them first. [`OwnedQueue`](crate::OwnedQueue) handles this
    /// automatically.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = K::NONE;
        self.len = 0;
    }
}

impl<T, K: Key> Default for Arena<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K: Key> Storage<T> for Arena<T, K> {
    type Key = K;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<K, Full<T>> {
        if self.free_head.is_some() {
            let key = self.free_head;
            let slot = &mut self.slots[key.as_usize()];
            let Slot::Vacant(next_free) = *slot else {
                unreachable!("free list points at an occupied slot");
            };
            *slot = Slot::Occupied(value);
            self.free_head = next_free;
            self.len += 1;
            return Ok(key);
        }

        if self.slots.len() >= self.limit || self.slots.try_reserve(1).is_err() {
            return Err(Full(value));
        }

        let key = K::from_usize(self.slots.len());
        self.slots.push(Slot::Occupied(value));
        self.len += 1;
        Ok(key)
    }

    #[inline]
    fn remove(&mut self, key: K) -> Option<T> {
        let slot = self.slots.get_mut(key.as_usize())?;
        if matches!(slot, Slot::Vacant(_)) {
            return None;
        }

        let Slot::Occupied(value) = core::mem::replace(slot, Slot::Vacant(self.free_head)) else {
            unreachable!("slot checked occupied");
        };
        self.free_head = key;
        self.len -= 1;
        Some(value)
    }

    #[inline]
    fn get(&self, key: K) -> Option<&T> {
        match self.slots.get(key.as_usize()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    #[inline]
    fn get_mut(&mut self, key: K) -> Option<&mut T> {
        match self.slots.get_mut(key.as_usize()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

#[cfg(feature = "slab")]
impl<T> Storage<T> for slab::Slab<T> {
    type Key = usize;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<usize, Full<T>> {
        // usize::MAX is reserved for the sentinel
        if slab::Slab::len(self) >= usize::NONE {
            return Err(Full(value));
        }
        Ok(self.insert(value))
    }

    #[inline]
    fn remove(&mut self, key: usize) -> Option<T> {
        self.try_remove(key)
    }

    #[inline]
    fn get(&self, key: usize) -> Option<&T> {
        slab::Slab::get(self, key)
    }

    #[inline]
    fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        slab::Slab::get_mut(self, key)
    }

    #[inline]
    fn len(&self) -> usize {
        slab::Slab::len(self)
    }
}
