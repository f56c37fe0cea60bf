//! Circular doubly-linked queue with a sentinel, over external storage.
//!
//! Nodes are stored in external storage and addressed by keys. The queue
//! itself holds only the sentinel link and a length, so several queues can
//! share one storage and nodes can be relinked between them without being
//! copied or reallocated.
//!
//! # Ring Layout
//!
//! The sentinel is addressed by the reserved key `K::NONE` and lives inline
//! in the [`Queue`]. It closes the ring:
//!
//! ```text
//!      ┌──────────────────────────────────────┐
//!      ▼                                      │
//!   [sentinel] ⇄ [a] ⇄ [b] ⇄ [c] ⇄ ... ⇄ [z] ─┘
//! ```
//!
//! For every position `L` (sentinel included), `L.next.prev == L` and
//! `L.prev.next == L`. An empty queue is a sentinel pointing at itself.
//! Every public operation restores this before returning.
//!
//! # Storage Invariant
//!
//! A queue instance must always be used with the same storage instance.
//! Passing a different storage is a logic error and will panic on the first
//! key that does not resolve. This is the caller's responsibility (same
//! discipline as the `slab` crate).
//!
//! # Example
//!
//! ```
//! use nexus_ringq::{Queue, QueueStorage};
//!
//! let mut storage: QueueStorage<String> = QueueStorage::new();
//! let mut queue: Queue<String, QueueStorage<String>> = Queue::new();
//!
//! queue.insert_tail(&mut storage, "b".into()).unwrap();
//! queue.insert_tail(&mut storage, "c".into()).unwrap();
//! queue.insert_head(&mut storage, "a".into()).unwrap();
//!
//! assert_eq!(queue.len(), 3);
//! assert_eq!(queue.remove_head(&mut storage).as_deref(), Some("a"));
//! assert_eq!(queue.remove_tail(&mut storage).as_deref(), Some("c"));
//! assert_eq!(queue.size(&storage), 1);
//! ```

use core::marker::PhantomData;

use crate::chain::Chain;
use crate::node::{Link, Node, node, node_mut};
use crate::{Full, Key, QueueError, Storage};

/// A circular doubly-linked queue over external storage.
///
/// # Type Parameters
///
/// - `T`: Element type
/// - `S`: Storage type (e.g., [`QueueStorage<T>`](crate::QueueStorage))
/// - `K`: Key type (default `u32`)
#[derive(Debug)]
pub struct Queue<T, S, K: Key = u32> {
    sentinel: Link<K>,
    len: usize,
    _marker: PhantomData<(T, S)>,
}

impl<T, S, K: Key> Default for Queue<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Ring primitives
// =============================================================================

impl<T, S, K: Key> Queue<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// Creates an empty queue: a sentinel linked to itself.
    #[inline]
    pub const fn new() -> Self {
        Self {
            sentinel: Link::detached(),
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Returns the number of elements, from the maintained counter. O(1).
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the queue is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the first node's key, or `None` if empty.
    #[inline]
    pub fn front_key(&self) -> Option<K> {
        self.sentinel.next.is_some().then_some(self.sentinel.next)
    }

    /// Returns the last node's key, or `None` if empty.
    #[inline]
    pub fn back_key(&self) -> Option<K> {
        self.sentinel.prev.is_some().then_some(self.sentinel.prev)
    }

    #[inline]
    pub(crate) fn link(&self, storage: &S, key: K) -> Link<K> {
        if key.is_none() {
            self.sentinel
        } else {
            node(storage, key).link
        }
    }

    #[inline]
    pub(crate) fn link_mut<'a>(&'a mut self, storage: &'a mut S, key: K) -> &'a mut Link<K> {
        if key.is_none() {
            &mut self.sentinel
        } else {
            &mut node_mut(storage, key).link
        }
    }

    #[inline]
    pub(crate) fn next(&self, storage: &S, key: K) -> K {
        self.link(storage, key).next
    }

    #[inline]
    pub(crate) fn prev(&self, storage: &S, key: K) -> K {
        self.link(storage, key).prev
    }

    #[inline]
    fn set_next(&mut self, storage: &mut S, key: K, next: K) {
        self.link_mut(storage, key).next = next;
    }

    #[inline]
    fn set_prev(&mut self, storage: &mut S, key: K, prev: K) {
        self.link_mut(storage, key).prev = prev;
    }

    /// Links a detached node between two adjacent ring positions.
    #[inline]
    pub(crate) fn splice(&mut self, storage: &mut S, key: K, prev: K, next: K) {
        node_mut(storage, key).link = Link { next, prev };
        self.set_next(storage, prev, key);
        self.set_prev(storage, next, key);
    }

    /// Unlinks a node from the ring, leaving it detached in storage.
    ///
    /// Does not touch the length; callers that drop the node from the queue
    /// for good go through [`release`](Self::release).
    #[inline]
    pub(crate) fn detach(&mut self, storage: &mut S, key: K) {
        let Link { next, prev } = node(storage, key).link;
        self.set_next(storage, prev, next);
        self.set_prev(storage, next, prev);
        node_mut(storage, key).link = Link::detached();
    }

    /// Unlinks a node and frees its slot, returning the value.
    #[inline]
    pub(crate) fn release(&mut self, storage: &mut S, key: K) -> T {
        self.detach(storage, key);
        self.len -= 1;
        storage
            .remove(key)
            .map(Node::into_value)
            .expect("corrupted links: detached node vanished")
    }

    /// Detaches the whole ring as an open chain, leaving the queue empty.
    #[inline]
    pub(crate) fn take_chain(&mut self) -> Chain<K> {
        let chain = Chain {
            head: self.sentinel.next,
            tail: self.sentinel.prev,
            len: self.len,
        };
        self.sentinel = Link::detached();
        self.len = 0;
        chain
    }

    /// Closes an open chain back into a ring under this (empty) sentinel.
    #[inline]
    pub(crate) fn restore_chain(&mut self, chain: Chain<K>) {
        debug_assert!(self.is_empty(), "restoring over a non-empty ring");

        // The chain's ends are NONE-terminated, and NONE is the sentinel.
        self.sentinel = Link {
            next: chain.head,
            prev: chain.tail,
        };
        self.len = chain.len;
    }
}

// =============================================================================
// Insertion and removal
// =============================================================================

impl<T, S, K: Key> Queue<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// Inserts a value at the head of the queue.
    ///
    /// Returns the key of the new node.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage cannot provide a slot. The
    /// queue is unchanged.
    #[inline]
    pub fn insert_head(&mut self, storage: &mut S, value: T) -> Result<K, Full<T>> {
        let key = self.allocate(storage, value)?;
        let first = self.sentinel.next;
        self.splice(storage, key, K::NONE, first);
        self.len += 1;
        Ok(key)
    }

    /// Inserts a value at the tail of the queue.
    ///
    /// Returns the key of the new node.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage cannot provide a slot. The
    /// queue is unchanged.
    #[inline]
    pub fn insert_tail(&mut self, storage: &mut S, value: T) -> Result<K, Full<T>> {
        let key = self.allocate(storage, value)?;
        let last = self.sentinel.prev;
        self.splice(storage, key, last, K::NONE);
        self.len += 1;
        Ok(key)
    }

    #[inline]
    fn allocate(&self, storage: &mut S, value: T) -> Result<K, Full<T>> {
        storage.try_insert(Node::new(value)).map_err(|Full(node)| {
            log::debug!("insert rejected: storage full at {} nodes", storage.len());
            Full(node.value)
        })
    }

    /// Removes and returns the head element.
    ///
    /// Returns `None` if the queue is empty.
    #[inline]
    pub fn remove_head(&mut self, storage: &mut S) -> Option<T> {
        let key = self.front_key()?;
        Some(self.release(storage, key))
    }

    /// Removes and returns the tail element.
    ///
    /// Returns `None` if the queue is empty.
    #[inline]
    pub fn remove_tail(&mut self, storage: &mut S) -> Option<T> {
        let key = self.back_key()?;
        Some(self.release(storage, key))
    }

    /// Removes the head element and copies its bytes into `buf`.
    ///
    /// At most `buf.len() - 1` bytes are copied, followed by a NUL
    /// terminator; longer values are truncated. Nothing is written to an
    /// empty buffer. The removed value is returned whole.
    pub fn remove_head_into(&mut self, storage: &mut S, buf: &mut [u8]) -> Option<T>
    where
        T: AsRef<[u8]>,
    {
        let value = self.remove_head(storage)?;
        copy_truncated(value.as_ref(), buf);
        Some(value)
    }

    /// Removes the tail element and copies its bytes into `buf`.
    ///
    /// Same truncation rules as [`remove_head_into`](Self::remove_head_into).
    pub fn remove_tail_into(&mut self, storage: &mut S, buf: &mut [u8]) -> Option<T>
    where
        T: AsRef<[u8]>,
    {
        let value = self.remove_tail(storage)?;
        copy_truncated(value.as_ref(), buf);
        Some(value)
    }

    /// Removes an element by key.
    ///
    /// Membership is confirmed with [`contains_key`](Self::contains_key)
    /// before anything is relinked, so the cost is the key's distance to the
    /// nearer end.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidArgument`] if `key` does not name a live
    /// node of this queue, including live nodes of other queues sharing the
    /// storage.
    pub fn remove(&mut self, storage: &mut S, key: K) -> Result<T, QueueError> {
        if !self.contains_key(storage, key) {
            return Err(QueueError::InvalidArgument("key does not name a node of this queue"));
        }
        Ok(self.release(storage, key))
    }

    /// Returns `true` if `key` names a node of this queue.
    ///
    /// Walks outward from `key` in both directions at once. Every ring ends
    /// at a `NONE` sentinel, so reaching one says nothing by itself; the
    /// node reached must also be this queue's head or tail. Costs
    /// `O(min(i, n - i))` for a member at index `i`, at most `len` steps
    /// otherwise.
    pub fn contains_key(&self, storage: &S, key: K) -> bool {
        if key.is_none() || self.is_empty() || storage.get(key).is_none() {
            return false;
        }

        let mut forward = key;
        let mut backward = key;
        for _ in 0..self.len {
            let next = node(storage, forward).link.next;
            if next.is_none() {
                return forward == self.sentinel.prev;
            }
            let prev = node(storage, backward).link.prev;
            if prev.is_none() {
                return backward == self.sentinel.next;
            }
            forward = next;
            backward = prev;
        }
        false
    }

    /// Removes the middle element and returns it.
    ///
    /// The middle is at index `⌊n/2⌋`: for an even length, the later of the
    /// two central elements. Found with `slow` stepping from the head while
    /// `fast` takes two steps, stopping before either reaches the sentinel.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Empty`] if the queue is empty.
    pub fn delete_middle(&mut self, storage: &mut S) -> Result<T, QueueError> {
        if self.is_empty() {
            return Err(QueueError::Empty);
        }

        let mut slow = self.sentinel.next;
        let mut fast = slow;
        while fast.is_some() {
            let after = self.next(storage, fast);
            if after.is_none() {
                break;
            }
            slow = self.next(storage, slow);
            fast = self.next(storage, after);
        }

        Ok(self.release(storage, slow))
    }

    /// Removes every element, freeing its slot.
    pub fn clear(&mut self, storage: &mut S) {
        let mut key = self.sentinel.next;
        while key.is_some() {
            let next = node(storage, key).link.next;
            storage.remove(key);
            key = next;
        }

        self.sentinel = Link::detached();
        self.len = 0;
    }

    /// Releases every element and consumes the queue.
    pub fn destroy(mut self, storage: &mut S) {
        self.clear(storage);
    }
}

/// Copies at most `buf.len() - 1` bytes of `src` and NUL-terminates.
fn copy_truncated(src: &[u8], buf: &mut [u8]) {
    let Some(room) = buf.len().checked_sub(1) else {
        return;
    };
    let n = src.len().min(room);
    buf[..n].copy_from_slice(&src[..n]);
    buf[n] = 0;
}

// =============================================================================
// Counting and structural transforms
// =============================================================================

impl<T, S, K: Key> Queue<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// Counts elements by walking the ring. O(n).
    ///
    /// Always equal to [`len`](Self::len) on an intact ring.
    pub fn size(&self, storage: &S) -> usize {
        let mut count = 0;
        let mut key = self.sentinel.next;
        while key.is_some() {
            count += 1;
            key = node(storage, key).link.next;
        }
        count
    }

    /// Swaps every two adjacent elements: 1st with 2nd, 3rd with 4th, and
    /// so on. An odd trailing element stays in place.
    pub fn swap_adjacent(&mut self, storage: &mut S) {
        let mut prev = K::NONE;
        let mut curr = self.sentinel.next;

        while curr.is_some() {
            let next = self.next(storage, curr);
            if next.is_none() {
                break;
            }
            let next_pair = self.next(storage, next);

            // prev → curr → next → next_pair  becomes  prev → next → curr → next_pair
            self.set_next(storage, prev, next);
            *self.link_mut(storage, next) = Link { next: curr, prev };
            *self.link_mut(storage, curr) = Link {
                next: next_pair,
                prev: next,
            };
            self.set_prev(storage, next_pair, curr);

            prev = curr;
            curr = next_pair;
        }
    }

    /// Reverses the queue in place by swapping `next`/`prev` at every
    /// position, sentinel included.
    pub fn reverse(&mut self, storage: &mut S) {
        let mut key = K::NONE;
        loop {
            let link = self.link_mut(storage, key);
            core::mem::swap(&mut link.next, &mut link.prev);
            // prev now holds the old next
            key = link.prev;
            if key.is_none() {
                break;
            }
        }
    }

    /// Reverses each consecutive group of `k` elements, starting at the
    /// head. A trailing group shorter than `k` is left as is.
    ///
    /// `k <= 1` is a no-op.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_ringq::OwnedQueue;
    ///
    /// let mut queue: OwnedQueue<u32> = OwnedQueue::new();
    /// queue.try_extend([1, 2, 3, 4, 5]).unwrap();
    ///
    /// queue.reverse_k(2);
    /// assert_eq!(queue.iter().copied().collect::<Vec<_>>(), [2, 1, 4, 3, 5]);
    /// ```
    pub fn reverse_k(&mut self, storage: &mut S, k: usize) {
        if k <= 1 || self.len < k {
            return;
        }

        let mut groups = 0usize;
        let mut group_prev = K::NONE;
        loop {
            let first = self.next(storage, group_prev);
            let mut kth = first;
            let mut count = 1;
            while kth.is_some() && count < k {
                kth = self.next(storage, kth);
                count += 1;
            }
            if kth.is_none() {
                break;
            }
            let group_next = self.next(storage, kth);

            let mut key = first;
            while key != group_next {
                let link = self.link_mut(storage, key);
                core::mem::swap(&mut link.next, &mut link.prev);
                key = link.prev;
            }

            // group_prev → kth ... first → group_next
            self.set_next(storage, group_prev, kth);
            self.set_prev(storage, kth, group_prev);
            self.set_next(storage, first, group_next);
            self.set_prev(storage, group_next, first);

            group_prev = first;
            groups += 1;
        }

        log::trace!("reverse_k: reversed {groups} groups of {k}");
    }

    /// Walks the ring and checks every link.
    ///
    /// Returns `true` if each node's `prev` names its predecessor, the
    /// sentinel's `prev` names the last node, every key resolves, and the
    /// walk returns to the sentinel after exactly [`len`](Self::len) nodes.
    pub fn check_links(&self, storage: &S) -> bool {
        let mut prev = K::NONE;
        let mut key = self.sentinel.next;
        let mut count = 0;

        while key.is_some() {
            if count == self.len {
                return false;
            }
            let Some(node) = storage.get(key) else {
                return false;
            };
            if node.link.prev != prev {
                return false;
            }
            prev = key;
            key = node.link.next;
            count += 1;
        }

        count == self.len && self.sentinel.prev == prev
    }
}

// =============================================================================
// Access and iteration
// =============================================================================

impl<T, S, K: Key> Queue<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// Returns a reference to the element at the given key.
    #[inline]
    pub fn get<'a>(&self, storage: &'a S, key: K) -> Option<&'a T> {
        storage.get(key).map(|node| &node.value)
    }

    /// Returns a mutable reference to the element at the given key.
    #[inline]
    pub fn get_mut<'a>(&mut self, storage: &'a mut S, key: K) -> Option<&'a mut T> {
        storage.get_mut(key).map(|node| &mut node.value)
    }

    /// Returns a reference to the head element.
    #[inline]
    pub fn front<'a>(&self, storage: &'a S) -> Option<&'a T> {
        let key = self.front_key()?;
        Some(&node(storage, key).value)
    }

    /// Returns a reference to the tail element.
    #[inline]
    pub fn back<'a>(&self, storage: &'a S) -> Option<&'a T> {
        let key = self.back_key()?;
        Some(&node(storage, key).value)
    }

    /// Returns an iterator over references to elements, head to tail.
    #[inline]
    pub fn iter<'a>(&self, storage: &'a S) -> Iter<'a, T, S, K> {
        Iter {
            storage,
            front: self.sentinel.next,
            back: self.sentinel.prev,
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Returns an iterator over keys, head to tail.
    ///
    /// Collect the keys first if the queue is going to be modified.
    #[inline]
    pub fn keys<'a>(&self, storage: &'a S) -> Keys<'a, T, S, K> {
        Keys {
            storage,
            front: self.sentinel.next,
            back: self.sentinel.prev,
            remaining: self.len,
            _marker: PhantomData,
        }
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over references to queue elements.
pub struct Iter<'a, T, S, K: Key> {
    storage: &'a S,
    front: K,
    back: K,
    remaining: usize,
    _marker: PhantomData<T>,
}

impl<'a, T: 'a, S, K: Key> Iterator for Iter<'a, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = node(self.storage, self.front);
        self.front = node.link.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a, S, K: Key> DoubleEndedIterator for Iter<'a, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = node(self.storage, self.back);
        self.back = node.link.prev;
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<'a, T: 'a, S, K: Key> ExactSizeIterator for Iter<'a, T, S, K> where
    S: Storage<Node<T, K>, Key = K>
{
}

/// Iterator over keys in the queue.
pub struct Keys<'a, T, S, K: Key> {
    storage: &'a S,
    front: K,
    back: K,
    remaining: usize,
    _marker: PhantomData<T>,
}

impl<'a, T: 'a, S, K: Key> Iterator for Keys<'a, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let key = self.front;
        self.front = node(self.storage, key).link.next;
        self.remaining -= 1;
        Some(key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a, S, K: Key> DoubleEndedIterator for Keys<'a, T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let key = self.back;
        self.back = node(self.storage, key).link.prev;
        self.remaining -= 1;
        Some(key)
    }
}
