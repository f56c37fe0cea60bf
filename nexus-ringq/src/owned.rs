//! OwnedQueue - a queue that owns its storage.

use core::cmp::Ordering;

use rand_core::RngCore;

use crate::{Full, Iter, Key, Queue, QueueError, QueueStorage};

/// A circular queue that owns its storage.
///
/// This is a convenience wrapper around [`Queue`] + [`QueueStorage`] for
/// cases where the queue doesn't need to share storage with other queues.
/// Use the raw [`Queue`] for [`merge`](Queue::merge) and
/// [`QueueChain`](crate::QueueChain), which relink nodes across queues.
///
/// Dropping an `OwnedQueue` drops every element.
///
/// # Example
///
/// ```
/// use nexus_ringq::OwnedQueue;
///
/// let mut queue: OwnedQueue<String> = OwnedQueue::bounded(4);
///
/// queue.insert_tail("b".to_string()).unwrap();
/// queue.insert_head("a".to_string()).unwrap();
/// queue.try_extend(["c".to_string(), "d".to_string()]).unwrap();
/// assert!(queue.insert_tail("e".to_string()).is_err());
///
/// queue.reverse();
/// assert_eq!(queue.remove_head().as_deref(), Some("d"));
///
/// let mut buf = [0u8; 3];
/// queue.remove_tail_into(&mut buf);
/// assert_eq!(&buf, b"a\0\0");
/// ```
#[derive(Debug)]
pub struct OwnedQueue<T, K: Key = u32> {
    storage: QueueStorage<T, K>,
    queue: Queue<T, QueueStorage<T, K>, K>,
}

impl<T, K: Key> Default for OwnedQueue<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K: Key> OwnedQueue<T, K> {
    /// Creates an empty queue with growable storage.
    pub fn new() -> Self {
        Self::from_storage(QueueStorage::new())
    }

    /// Creates an empty queue with room for `capacity` elements before
    /// reallocating.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds the key type's range.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_storage(QueueStorage::with_capacity(capacity))
    }

    /// Creates an empty queue that never holds more than `limit` elements.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is zero.
    pub fn bounded(limit: usize) -> Self {
        Self::from_storage(QueueStorage::bounded(limit))
    }

    fn from_storage(storage: QueueStorage<T, K>) -> Self {
        Self {
            storage,
            queue: Queue::new(),
        }
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Counts elements by walking the ring.
    #[inline]
    pub fn size(&self) -> usize {
        self.queue.size(&self.storage)
    }

    /// Returns the head node's key, or `None` if empty.
    #[inline]
    pub fn front_key(&self) -> Option<K> {
        self.queue.front_key()
    }

    /// Returns the tail node's key, or `None` if empty.
    #[inline]
    pub fn back_key(&self) -> Option<K> {
        self.queue.back_key()
    }

    /// Inserts a value at the head.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage is full.
    #[inline]
    pub fn insert_head(&mut self, value: T) -> Result<K, Full<T>> {
        self.queue.insert_head(&mut self.storage, value)
    }

    /// Inserts a value at the tail.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if storage is full.
    #[inline]
    pub fn insert_tail(&mut self, value: T) -> Result<K, Full<T>> {
        self.queue.insert_tail(&mut self.storage, value)
    }

    /// Inserts every value at the tail, in order.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::AllocationFailure`] at the first value storage
    /// rejects. Values inserted before it stay; the rest are dropped.
    pub fn try_extend<I>(&mut self, values: I) -> Result<(), QueueError>
    where
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.insert_tail(value)?;
        }
        Ok(())
    }

    /// Removes and returns the head element.
    #[inline]
    pub fn remove_head(&mut self) -> Option<T> {
        self.queue.remove_head(&mut self.storage)
    }

    /// Removes and returns the tail element.
    #[inline]
    pub fn remove_tail(&mut self) -> Option<T> {
        self.queue.remove_tail(&mut self.storage)
    }

    /// Removes the head element, copying its bytes NUL-terminated into
    /// `buf`. See [`Queue::remove_head_into`].
    #[inline]
    pub fn remove_head_into(&mut self, buf: &mut [u8]) -> Option<T>
    where
        T: AsRef<[u8]>,
    {
        self.queue.remove_head_into(&mut self.storage, buf)
    }

    /// Removes the tail element, copying its bytes NUL-terminated into
    /// `buf`. See [`Queue::remove_head_into`].
    #[inline]
    pub fn remove_tail_into(&mut self, buf: &mut [u8]) -> Option<T>
    where
        T: AsRef<[u8]>,
    {
        self.queue.remove_tail_into(&mut self.storage, buf)
    }

    /// Removes an element by key.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidArgument`] if `key` is not an element of
    /// this queue.
    #[inline]
    pub fn remove(&mut self, key: K) -> Result<T, QueueError> {
        self.queue.remove(&mut self.storage, key)
    }

    /// Returns `true` if `key` names an element of this queue.
    #[inline]
    pub fn contains_key(&self, key: K) -> bool {
        self.queue.contains_key(&self.storage, key)
    }

    /// Removes and returns the element at index `⌊n/2⌋`.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Empty`] if the queue is empty.
    #[inline]
    pub fn delete_middle(&mut self) -> Result<T, QueueError> {
        self.queue.delete_middle(&mut self.storage)
    }

    /// Swaps every two adjacent elements.
    #[inline]
    pub fn swap_adjacent(&mut self) {
        self.queue.swap_adjacent(&mut self.storage);
    }

    /// Reverses the queue.
    #[inline]
    pub fn reverse(&mut self) {
        self.queue.reverse(&mut self.storage);
    }

    /// Reverses each consecutive group of `k` elements.
    #[inline]
    pub fn reverse_k(&mut self, k: usize) {
        self.queue.reverse_k(&mut self.storage, k);
    }

    /// Stable sort, ascending or descending.
    #[inline]
    pub fn sort(&mut self, descending: bool)
    where
        T: Ord,
    {
        self.queue.sort(&mut self.storage, descending);
    }

    /// Stable sort with a comparator.
    #[inline]
    pub fn sort_by<F>(&mut self, cmp: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.queue.sort_by(&mut self.storage, cmp);
    }

    /// Removes every value that appears in an adjacent run. Returns the
    /// number of removed elements.
    #[inline]
    pub fn delete_duplicates(&mut self) -> usize
    where
        T: Ord,
    {
        self.queue.delete_duplicates(&mut self.storage)
    }

    /// Keeps elements with no strictly smaller element to their right.
    #[inline]
    pub fn keep_ascending(&mut self) -> usize
    where
        T: Ord,
    {
        self.queue.keep_ascending(&mut self.storage)
    }

    /// Keeps elements with no strictly larger element to their right.
    #[inline]
    pub fn keep_descending(&mut self) -> usize
    where
        T: Ord,
    {
        self.queue.keep_descending(&mut self.storage)
    }

    /// Shuffles the queue uniformly at random.
    #[inline]
    pub fn shuffle<R>(&mut self, rng: &mut R)
    where
        R: RngCore + ?Sized,
    {
        self.queue.shuffle(&mut self.storage, rng);
    }

    /// Removes every element.
    #[inline]
    pub fn clear(&mut self) {
        self.queue.clear(&mut self.storage);
    }

    /// Returns a reference to the element at `key`.
    #[inline]
    pub fn get(&self, key: K) -> Option<&T> {
        self.queue.get(&self.storage, key)
    }

    /// Returns a mutable reference to the element at `key`.
    #[inline]
    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.queue.get_mut(&mut self.storage, key)
    }

    /// Returns a reference to the head element.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.queue.front(&self.storage)
    }

    /// Returns a reference to the tail element.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.queue.back(&self.storage)
    }

    /// Iterates head to tail.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, QueueStorage<T, K>, K> {
        self.queue.iter(&self.storage)
    }

    /// Walks the ring and checks every link.
    #[inline]
    pub fn check_links(&self) -> bool {
        self.queue.check_links(&self.storage)
    }
}

impl<'a, T, K: Key> IntoIterator for &'a OwnedQueue<T, K> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, QueueStorage<T, K>, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
