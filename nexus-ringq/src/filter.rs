//! Value-aware removal: duplicate runs and monotonic filtering.

use core::cmp::Ordering;

use crate::node::{Node, node};
use crate::queue::Queue;
use crate::{Key, Storage};

impl<T, S, K: Key> Queue<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// Removes every value that appears in a run of adjacent equal
    /// elements.
    ///
    /// A run of length two or more marks its value as duplicated, and then
    /// *every* occurrence of that value is removed, including occurrences
    /// outside the run. A value that only repeats non-adjacently is never
    /// detected, so sort first for full duplicate elimination.
    ///
    /// Returns the number of removed elements.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_ringq::OwnedQueue;
    ///
    /// let mut queue: OwnedQueue<u8> = OwnedQueue::new();
    /// queue.try_extend([1, 2, 2, 1, 1, 3]).unwrap();
    ///
    /// assert_eq!(queue.delete_duplicates(), 5);
    /// assert_eq!(queue.iter().copied().collect::<Vec<_>>(), [3]);
    /// ```
    pub fn delete_duplicates(&mut self, storage: &mut S) -> usize
    where
        T: Ord,
    {
        if self.len() < 2 {
            return 0;
        }

        // One representative key per duplicated value, ordered by value.
        let mut runs: Vec<K> = Vec::new();
        let mut key = self.next(storage, K::NONE);
        while key.is_some() {
            let next = self.next(storage, key);
            if next.is_some() && node(storage, key).value == node(storage, next).value {
                runs.push(key);
            }
            key = next;
        }
        if runs.is_empty() {
            return 0;
        }

        let value = |key: K| &node(storage, key).value;
        runs.sort_by(|&a, &b| value(a).cmp(value(b)));
        runs.dedup_by(|a, b| value(*a) == value(*b));

        // Resolve every doomed key before freeing any, since representatives
        // are themselves doomed.
        let doomed: Vec<K> = self
            .keys(storage)
            .filter(|&key| {
                runs.binary_search_by(|&run| value(run).cmp(value(key)))
                    .is_ok()
            })
            .collect();

        for &key in &doomed {
            self.release(storage, key);
        }

        log::trace!(
            "delete_duplicates: {} values, {} elements removed",
            runs.len(),
            doomed.len()
        );
        doomed.len()
    }

    /// Keeps only elements with no strictly smaller element to their right.
    ///
    /// The survivors form a non-decreasing sequence ending at the tail.
    /// Returns the resulting length.
    pub fn keep_ascending(&mut self, storage: &mut S) -> usize
    where
        T: Ord,
    {
        self.retain_extrema(storage, Ordering::Greater)
    }

    /// Keeps only elements with no strictly larger element to their right.
    ///
    /// The survivors form a non-increasing sequence ending at the tail.
    /// Returns the resulting length.
    pub fn keep_descending(&mut self, storage: &mut S) -> usize
    where
        T: Ord,
    {
        self.retain_extrema(storage, Ordering::Less)
    }

    /// Single right-to-left pass. `kept` is always the extremum of the
    /// suffix; its predecessor goes when it compares to it as `drop_when`.
    fn retain_extrema(&mut self, storage: &mut S, drop_when: Ordering) -> usize
    where
        T: Ord,
    {
        let before = self.len();
        let Some(mut kept) = self.back_key() else {
            return 0;
        };

        let mut pred = self.prev(storage, kept);
        while pred.is_some() {
            let next_pred = self.prev(storage, pred);
            if node(storage, pred).value.cmp(&node(storage, kept).value) == drop_when {
                self.release(storage, pred);
            } else {
                kept = pred;
            }
            pred = next_pred;
        }

        log::trace!(
            "retain_extrema({drop_when:?}): {} of {before} kept",
            self.len()
        );
        self.len()
    }
}
