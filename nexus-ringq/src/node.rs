//! Nodes and links.

use crate::{Arena, Key, Storage};

/// Storage of queue nodes backed by an [`Arena`].
pub type QueueStorage<T, K = u32> = Arena<Node<T, K>, K>;

/// Storage of queue nodes backed by `slab::Slab`.
#[cfg(feature = "slab")]
pub type SlabQueueStorage<T> = slab::Slab<Node<T, usize>>;

/// Forward and backward keys of one ring position.
///
/// `K::NONE` addresses the sentinel while the link is part of a ring, and
/// terminates the ends while it is part of an open chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Link<K> {
    pub(crate) next: K,
    pub(crate) prev: K,
}

impl<K: Key> Link<K> {
    /// A link pointing at the sentinel in both directions.
    #[inline]
    pub(crate) const fn detached() -> Self {
        Self {
            next: K::NONE,
            prev: K::NONE,
        }
    }
}

/// A payload node: one value plus its link.
///
/// Users interact with `&T` and `&mut T` through the queue's accessors;
/// the link is an implementation detail.
#[derive(Debug)]
pub struct Node<T, K: Key = u32> {
    pub(crate) value: T,
    pub(crate) link: Link<K>,
}

impl<T, K: Key> Node<T, K> {
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Self {
            value,
            link: Link::detached(),
        }
    }

    /// Returns the value held by this node.
    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consumes the node, returning its value.
    #[inline]
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Resolves a key that a ring or chain walk reached.
///
/// # Panics
///
/// Panics if `key` does not name a node, which means the links are corrupt.
#[inline]
#[track_caller]
pub(crate) fn node<T, K, S>(storage: &S, key: K) -> &Node<T, K>
where
    K: Key,
    S: Storage<Node<T, K>, Key = K>,
{
    storage
        .get(key)
        .expect("corrupted links: key does not resolve to a node")
}

/// Mutable counterpart of [`node`].
#[inline]
#[track_caller]
pub(crate) fn node_mut<T, K, S>(storage: &mut S, key: K) -> &mut Node<T, K>
where
    K: Key,
    S: Storage<Node<T, K>, Key = K>,
{
    storage
        .get_mut(key)
        .expect("corrupted links: key does not resolve to a node")
}
