//! Circular doubly-linked queues with external storage.
//!
//! This crate provides a sentinel-closed ring queue whose nodes live in an
//! index-addressed arena. The key insight: separate storage from structure.
//!
//! # Design Philosophy
//!
//! A pointer-based ring needs a heap node per element and `unsafe` for
//! every splice. This crate addresses nodes by key instead:
//!
//! ```text
//! Storage (Arena)    - owns nodes, provides stable keys, free-list reuse
//! Queue              - holds the sentinel link and a length, nothing else
//! ```
//!
//! Benefits:
//! - **Relinking is assignment**: every transformation moves keys, never values
//! - **No `unsafe`**: the sentinel is the reserved key `K::NONE`
//! - **Shared storage**: many queues can live in one arena, which is what lets
//!   [`QueueChain::merge_all`] splice nodes across queues
//! - **Fallible growth**: storage exhaustion is a [`Full`] error, not an abort
//!
//! # Quick Start
//!
//! ```
//! use nexus_ringq::{Queue, QueueStorage};
//!
//! let mut storage: QueueStorage<u64> = QueueStorage::with_capacity(1000);
//! let mut queue: Queue<u64, QueueStorage<u64>> = Queue::new();
//!
//! for v in [5, 3, 8, 1] {
//!     queue.insert_tail(&mut storage, v).unwrap();
//! }
//!
//! queue.sort(&mut storage, false);
//! assert_eq!(queue.remove_head(&mut storage), Some(1));
//!
//! queue.reverse(&mut storage);
//! assert_eq!(queue.iter(&storage).copied().collect::<Vec<_>>(), [8, 5, 3]);
//! ```
//!
//! For a single queue that doesn't share storage, [`OwnedQueue`] bundles the
//! two and drops the `storage` argument from every call.
//!
//! # Critical Invariant: Same Storage Instance
//!
//! All operations on a queue must use the storage its nodes were inserted
//! into. This is the caller's responsibility (same discipline as the `slab`
//! crate). Passing a different storage panics on the first key that does not
//! resolve, or silently walks unrelated nodes if it does.
//!
//! # Operations
//!
//! | Operation | Cost | Notes |
//! |-----------|------|-------|
//! | `insert_head` / `insert_tail` | O(1) | `Err(Full)` when storage is exhausted |
//! | `remove_head` / `remove_tail` | O(1) | `None` when empty |
//! | `remove` / `contains_key` | O(min(i, n-i)) | rejects keys of other queues |
//! | `size` | O(n) | `len` is O(1) |
//! | `delete_middle` | O(n) | removes index `⌊n/2⌋` |
//! | `swap_adjacent` / `reverse` / `reverse_k` | O(n) | relink only |
//! | `sort` / `sort_by` | O(n log n) | stable merge sort |
//! | `delete_duplicates` | O(n log n) | removes every value seen in an adjacent run |
//! | `keep_ascending` / `keep_descending` | O(n) | single right-to-left pass |
//! | `merge` / `QueueChain::merge_all` | O(total) per merge | left fold of two-way merges |
//! | `shuffle` | O(n²) | Fisher–Yates by relinking |
//!
//! # Feature Flags
//!
//! - `slab` - Enable [`Storage`] impl for `slab::Slab`

#![warn(missing_docs)]

mod chain;
pub mod error;
mod filter;
pub mod key;
pub mod merge;
pub mod node;
pub mod owned;
pub mod queue;
mod shuffle;
mod sort;
pub mod storage;

pub use error::QueueError;
pub use key::Key;
pub use merge::{QueueChain, QueueContext};
pub use node::{Node, QueueStorage};
pub use owned::OwnedQueue;
pub use queue::{Iter, Keys, Queue};
pub use storage::{Arena, Full, Storage};

#[cfg(feature = "slab")]
pub use node::SlabQueueStorage;
