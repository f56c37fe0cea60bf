//! K-way merge over a chain of queue contexts.
//!
//! A [`QueueChain`] keeps an ordered list of [`QueueContext`]s, each owning
//! one [`Queue`] plus a cached element count and a stable id. All queues in
//! a chain live in the same storage, so merging relinks nodes between them
//! without copying.
//!
//! # Example
//!
//! ```
//! use nexus_ringq::{Queue, QueueChain, QueueStorage};
//!
//! let mut storage: QueueStorage<u32> = QueueStorage::new();
//! let mut chain = QueueChain::new();
//!
//! for values in [[1, 4, 7], [2, 5, 8], [3, 6, 9]] {
//!     let mut queue = Queue::new();
//!     for v in values {
//!         queue.insert_tail(&mut storage, v).unwrap();
//!     }
//!     chain.push(queue);
//! }
//!
//! assert_eq!(chain.merge_all(&mut storage, false), 9);
//! let first = chain.iter().next().unwrap().queue();
//! assert_eq!(
//!     first.iter(&storage).copied().collect::<Vec<_>>(),
//!     (1..=9).collect::<Vec<_>>()
//! );
//! ```

use core::cmp::Ordering;

use crate::node::Node;
use crate::queue::Queue;
use crate::{Key, QueueError, Storage};

/// One queue in a [`QueueChain`], with its cached size and id.
#[derive(Debug)]
pub struct QueueContext<T, S, K: Key = u32> {
    queue: Queue<T, S, K>,
    size: usize,
    id: usize,
}

impl<T, S, K: Key> QueueContext<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// The owned queue.
    #[inline]
    pub fn queue(&self) -> &Queue<T, S, K> {
        &self.queue
    }

    /// Mutable access to the owned queue.
    ///
    /// The cached [`size`](Self::size) is refreshed from the queue's length
    /// when a chain of two or more contexts is merged.
    #[inline]
    pub fn queue_mut(&mut self) -> &mut Queue<T, S, K> {
        &mut self.queue
    }

    /// Cached element count.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Id assigned when the context was pushed.
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }
}

/// Ordered collection of queues sharing one storage.
#[derive(Debug)]
pub struct QueueChain<T, S, K: Key = u32> {
    contexts: Vec<QueueContext<T, S, K>>,
    next_id: usize,
}

impl<T, S, K: Key> Default for QueueChain<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S, K: Key> QueueChain<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// Creates an empty chain.
    pub const fn new() -> Self {
        Self {
            contexts: Vec::new(),
            next_id: 0,
        }
    }

    /// Appends a queue and returns the id of its context.
    ///
    /// Ids are assigned in push order and never reused.
    pub fn push(&mut self, queue: Queue<T, S, K>) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.contexts.push(QueueContext {
            size: queue.len(),
            queue,
            id,
        });
        id
    }

    /// Number of contexts.
    #[inline]
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Returns `true` if the chain holds no contexts.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Looks up a context by id.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidArgument`] if no context has this id.
    pub fn get(&self, id: usize) -> Result<&QueueContext<T, S, K>, QueueError> {
        self.contexts
            .iter()
            .find(|ctx| ctx.id == id)
            .ok_or(QueueError::InvalidArgument("unknown context id"))
    }

    /// Looks up a context by id, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidArgument`] if no context has this id.
    pub fn get_mut(&mut self, id: usize) -> Result<&mut QueueContext<T, S, K>, QueueError> {
        self.contexts
            .iter_mut()
            .find(|ctx| ctx.id == id)
            .ok_or(QueueError::InvalidArgument("unknown context id"))
    }

    /// Removes a context by id and hands back its queue.
    ///
    /// The queue's elements stay in storage; release them with
    /// [`Queue::destroy`].
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidArgument`] if no context has this id.
    pub fn remove(&mut self, id: usize) -> Result<Queue<T, S, K>, QueueError> {
        let index = self
            .contexts
            .iter()
            .position(|ctx| ctx.id == id)
            .ok_or(QueueError::InvalidArgument("unknown context id"))?;
        Ok(self.contexts.remove(index).queue)
    }

    /// Iterates over contexts in chain order.
    pub fn iter(&self) -> impl Iterator<Item = &QueueContext<T, S, K>> {
        self.contexts.iter()
    }

    /// Merges every queue into the first one, ascending or descending.
    ///
    /// Returns the merged size. See [`merge_all_by`](Self::merge_all_by).
    pub fn merge_all(&mut self, storage: &mut S, descending: bool) -> usize
    where
        T: Ord,
    {
        if descending {
            self.merge_all_by(storage, |a, b| b.cmp(a))
        } else {
            self.merge_all_by(storage, T::cmp)
        }
    }

    /// Merges every queue into the first context's queue, ordered by `cmp`.
    ///
    /// Each queue should already be sorted by `cmp`. Merging is a left fold
    /// of two-way merges; merged-away queues are left empty with a cached
    /// size of 0. Empty queues are skipped. Unsorted inputs give an
    /// unspecified order but lose no element.
    ///
    /// Returns 0 for an empty chain. A single-context chain is left alone
    /// and its cached size is returned unchanged. Otherwise every cached
    /// size is refreshed from its queue before folding.
    pub fn merge_all_by<F>(&mut self, storage: &mut S, mut cmp: F) -> usize
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        if let [only] = self.contexts.as_slice() {
            return only.size;
        }

        for ctx in &mut self.contexts {
            ctx.size = ctx.queue.len();
        }

        let Some((first, rest)) = self.contexts.split_first_mut() else {
            return 0;
        };

        let mut merged = 0;
        for ctx in rest.iter_mut().filter(|ctx| !ctx.queue.is_empty()) {
            first.size = first.queue.merge_by(storage, &mut ctx.queue, &mut cmp);
            ctx.size = 0;
            merged += 1;
        }

        log::debug!(
            "merge_all: {merged} of {} queues merged into context {}, {} elements",
            rest.len(),
            first.id,
            first.size
        );
        first.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QueueStorage;

    type Chain = QueueChain<i32, QueueStorage<i32>>;

    fn push(chain: &mut Chain, storage: &mut QueueStorage<i32>, values: &[i32]) -> usize {
        let mut queue = Queue::new();
        for &v in values {
            queue.insert_tail(storage, v).unwrap();
        }
        chain.push(queue)
    }

    fn values(chain: &Chain, storage: &QueueStorage<i32>, id: usize) -> Vec<i32> {
        let queue = chain.get(id).unwrap().queue();
        assert!(queue.check_links(storage));
        queue.iter(storage).copied().collect()
    }

    #[test]
    fn empty_chain_merges_to_zero() {
        let mut storage = QueueStorage::new();
        let mut chain = Chain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.merge_all(&mut storage, false), 0);
    }

    #[test]
    fn single_context_keeps_size() {
        let mut storage = QueueStorage::new();
        let mut chain = Chain::new();
        let id = push(&mut chain, &mut storage, &[3, 1, 2]);

        assert_eq!(chain.merge_all(&mut storage, false), 3);
        // a single queue is left as is, sorted or not
        assert_eq!(values(&chain, &storage, id), vec![3, 1, 2]);
    }

    #[test]
    fn single_context_returns_cached_size() {
        let mut storage = QueueStorage::new();
        let mut chain = Chain::new();
        let id = push(&mut chain, &mut storage, &[1]);

        chain
            .get_mut(id)
            .unwrap()
            .queue_mut()
            .insert_tail(&mut storage, 2)
            .unwrap();

        assert_eq!(chain.merge_all(&mut storage, false), 1);
        assert_eq!(chain.get(id).unwrap().size(), 1);
        assert_eq!(values(&chain, &storage, id), vec![1, 2]);
    }

    #[test]
    fn merge_all_ascending() {
        let mut storage = QueueStorage::new();
        let mut chain = Chain::new();
        let a = push(&mut chain, &mut storage, &[1, 3, 5]);
        let b = push(&mut chain, &mut storage, &[2, 4, 6]);

        assert_eq!(chain.merge_all(&mut storage, false), 6);
        assert_eq!(values(&chain, &storage, a), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(chain.get(a).unwrap().size(), 6);
        assert!(chain.get(b).unwrap().queue().is_empty());
        assert_eq!(chain.get(b).unwrap().size(), 0);
    }

    #[test]
    fn merge_all_descending_skips_empty() {
        let mut storage = QueueStorage::new();
        let mut chain = Chain::new();
        let a = push(&mut chain, &mut storage, &[]);
        push(&mut chain, &mut storage, &[9, 5, 1]);
        push(&mut chain, &mut storage, &[]);
        push(&mut chain, &mut storage, &[8, 2]);

        assert_eq!(chain.merge_all(&mut storage, true), 5);
        assert_eq!(values(&chain, &storage, a), vec![9, 8, 5, 2, 1]);
        assert!(chain.iter().skip(1).all(|ctx| ctx.size() == 0));
    }

    #[test]
    fn merge_all_refreshes_stale_sizes() {
        let mut storage = QueueStorage::new();
        let mut chain = Chain::new();
        let a = push(&mut chain, &mut storage, &[1]);
        let b = push(&mut chain, &mut storage, &[2]);

        chain
            .get_mut(b)
            .unwrap()
            .queue_mut()
            .insert_tail(&mut storage, 3)
            .unwrap();

        assert_eq!(chain.merge_all(&mut storage, false), 3);
        assert_eq!(values(&chain, &storage, a), vec![1, 2, 3]);
    }

    #[test]
    fn ids_and_lookup() {
        let mut storage = QueueStorage::new();
        let mut chain = Chain::new();
        let a = push(&mut chain, &mut storage, &[1]);
        let b = push(&mut chain, &mut storage, &[2, 2]);
        assert_ne!(a, b);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.get(b).unwrap().id(), b);

        let queue = chain.remove(a).unwrap();
        assert_eq!(queue.len(), 1);
        queue.destroy(&mut storage);

        assert_eq!(
            chain.get(a).unwrap_err(),
            QueueError::InvalidArgument("unknown context id")
        );
        assert!(chain.remove(a).is_err());

        let c = push(&mut chain, &mut storage, &[]);
        assert_ne!(c, a);
        assert_eq!(storage.len(), 2);
    }
}
