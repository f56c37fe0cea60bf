//! Error types for queue operations.

use thiserror::Error;

use crate::Full;

/// Errors reported by queue operations that can fail.
///
/// Removing from an empty queue is not an error: `remove_head` and
/// `remove_tail` return `None`. [`QueueError::Empty`] is reserved for
/// operations that must name an element, like `delete_middle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Storage could not provide a slot. Nothing was mutated.
    #[error("allocation failed: storage is full")]
    AllocationFailure,

    /// The queue holds no element to operate on.
    #[error("queue is empty")]
    Empty,

    /// A key or context id that does not name anything live.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

impl<T> From<Full<T>> for QueueError {
    fn from(_: Full<T>) -> Self {
        QueueError::AllocationFailure
    }
}
