//! Open chains: the transient, non-circular form of a queue.
//!
//! Sorting and merging detach a ring from its sentinel, work on a plain
//! `NONE`-terminated chain, and hand the result back to the sentinel before
//! returning. Keeping the open form in its own type means nothing outside
//! this module ever sees a ring with a broken sentinel.
//!
//! ```text
//! ring:   S ⇄ a ⇄ b ⇄ c ⇄ S        (S = sentinel, addressed by NONE)
//! chain:  NONE ← a ⇄ b ⇄ c → NONE  (head = a, tail = c)
//! ```
//!
//! Because the sentinel is addressed by `K::NONE`, the first and last nodes
//! of a ring already carry `NONE` in their outer links. Detaching a ring is
//! therefore O(1): the chain takes the sentinel's endpoints and the sentinel
//! is reset.

use core::cmp::Ordering;

use crate::Key;
use crate::Storage;
use crate::node::{Node, node, node_mut};

/// A `NONE`-terminated doubly-linked run of nodes.
///
/// Invariant: `head.prev == NONE`, `tail.next == NONE`, and walking `next`
/// from `head` visits exactly `len` nodes ending at `tail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Chain<K> {
    pub(crate) head: K,
    pub(crate) tail: K,
    pub(crate) len: usize,
}

impl<K: Key> Chain<K> {
    pub(crate) const fn empty() -> Self {
        Self {
            head: K::NONE,
            tail: K::NONE,
            len: 0,
        }
    }

    #[inline]
    fn push_back<T, S>(&mut self, storage: &mut S, key: K)
    where
        S: Storage<Node<T, K>, Key = K>,
    {
        let link = &mut node_mut(storage, key).link;
        link.prev = self.tail;
        link.next = K::NONE;

        if self.tail.is_none() {
            self.head = key;
        } else {
            node_mut(storage, self.tail).link.next = key;
        }
        self.tail = key;
        self.len += 1;
    }

    #[inline]
    fn append<T, S>(&mut self, storage: &mut S, other: Self)
    where
        S: Storage<Node<T, K>, Key = K>,
    {
        if other.head.is_none() {
            return;
        }

        node_mut(storage, other.head).link.prev = self.tail;
        if self.tail.is_none() {
            self.head = other.head;
        } else {
            node_mut(storage, self.tail).link.next = other.head;
        }
        self.tail = other.tail;
        self.len += other.len;
    }
}

/// Splits a chain of at least two nodes into halves of `⌈n/2⌉` and `⌊n/2⌋`.
///
/// `slow` advances one node per two of `fast`, with `fast` starting one
/// ahead so that a two-node chain splits evenly.
fn split<T, K, S>(chain: Chain<K>, storage: &mut S) -> (Chain<K>, Chain<K>)
where
    K: Key,
    S: Storage<Node<T, K>, Key = K>,
{
    debug_assert!(chain.len >= 2);

    let mut slow = chain.head;
    let mut fast = node(storage, chain.head).link.next;
    while fast.is_some() {
        let after = node(storage, fast).link.next;
        if after.is_none() {
            break;
        }
        slow = node(storage, slow).link.next;
        fast = node(storage, after).link.next;
    }

    let mid = node(storage, slow).link.next;
    node_mut(storage, slow).link.next = K::NONE;
    node_mut(storage, mid).link.prev = K::NONE;

    let left_len = chain.len.div_ceil(2);
    let left = Chain {
        head: chain.head,
        tail: slow,
        len: left_len,
    };
    let right = Chain {
        head: mid,
        tail: chain.tail,
        len: chain.len - left_len,
    };
    (left, right)
}

/// Merges two chains, each ordered by `cmp`, into one.
///
/// On ties the node from `left` is taken first, which makes the merge (and
/// the sort built on it) stable.
pub(crate) fn merge<T, K, S, F>(
    left: Chain<K>,
    right: Chain<K>,
    storage: &mut S,
    cmp: &mut F,
) -> Chain<K>
where
    K: Key,
    S: Storage<Node<T, K>, Key = K>,
    F: FnMut(&T, &T) -> Ordering,
{
    let mut out = Chain::empty();
    let mut l = left.head;
    let mut r = right.head;

    while l.is_some() && r.is_some() {
        let take_left = cmp(&node(storage, l).value, &node(storage, r).value) != Ordering::Greater;
        let key = if take_left {
            let key = l;
            l = node(storage, l).link.next;
            key
        } else {
            let key = r;
            r = node(storage, r).link.next;
            key
        };
        out.push_back(storage, key);
    }

    // At most one side has nodes left; they are already ordered and linked.
    let rest = if l.is_some() {
        Chain {
            head: l,
            tail: left.tail,
            len: left.len + right.len - out.len,
        }
    } else if r.is_some() {
        Chain {
            head: r,
            tail: right.tail,
            len: left.len + right.len - out.len,
        }
    } else {
        Chain::empty()
    };
    out.append(storage, rest);

    debug_assert_eq!(out.len, left.len + right.len);
    out
}

/// Stable top-down merge sort of a chain.
///
/// Recursion depth is `⌈log2 n⌉`. Nodes are relinked, never copied.
pub(crate) fn merge_sort<T, K, S, F>(chain: Chain<K>, storage: &mut S, cmp: &mut F) -> Chain<K>
where
    K: Key,
    S: Storage<Node<T, K>, Key = K>,
    F: FnMut(&T, &T) -> Ordering,
{
    if chain.len < 2 {
        return chain;
    }

    let (left, right) = split(chain, storage);
    let left = merge_sort(left, storage, cmp);
    let right = merge_sort(right, storage, cmp);
    merge(left, right, storage, cmp)
}
