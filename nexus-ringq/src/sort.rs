//! Stable merge sort and two-way merge.

use core::cmp::Ordering;

use crate::chain::{merge, merge_sort};
use crate::node::Node;
use crate::queue::Queue;
use crate::{Key, Storage};

impl<T, S, K: Key> Queue<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// Sorts the queue in ascending order, or descending if `descending`.
    ///
    /// The sort is stable: equal elements keep their relative order in
    /// either direction. Nodes are relinked, values never move.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_ringq::OwnedQueue;
    ///
    /// let mut queue: OwnedQueue<i32> = OwnedQueue::new();
    /// queue.try_extend([3, 1, 2]).unwrap();
    ///
    /// queue.sort(false);
    /// assert_eq!(queue.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
    /// queue.sort(true);
    /// assert_eq!(queue.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
    /// ```
    pub fn sort(&mut self, storage: &mut S, descending: bool)
    where
        T: Ord,
    {
        if descending {
            self.sort_by(storage, |a, b| b.cmp(a));
        } else {
            self.sort_by(storage, T::cmp);
        }
    }

    /// Sorts the queue with a comparator. Stable.
    pub fn sort_by<F>(&mut self, storage: &mut S, mut cmp: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        if self.len() < 2 {
            return;
        }

        let chain = self.take_chain();
        let len = chain.len;
        let sorted = merge_sort(chain, storage, &mut cmp);
        self.restore_chain(sorted);

        log::trace!("sort: {len} elements");
    }

    /// Merges every element of `other` into this queue.
    ///
    /// Both queues should already be sorted in the requested direction; the
    /// result is then sorted too. Unsorted inputs still produce a queue
    /// holding every element of both, in unspecified order. `other` is left
    /// empty. On ties, elements from `self` come first.
    ///
    /// Both queues must live in `storage`. Returns the merged length.
    pub fn merge(&mut self, storage: &mut S, other: &mut Self, descending: bool) -> usize
    where
        T: Ord,
    {
        if descending {
            self.merge_by(storage, other, |a, b| b.cmp(a))
        } else {
            self.merge_by(storage, other, T::cmp)
        }
    }

    /// Merges every element of `other` into this queue, ordered by `cmp`.
    ///
    /// See [`merge`](Self::merge).
    pub fn merge_by<F>(&mut self, storage: &mut S, other: &mut Self, mut cmp: F) -> usize
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        if other.is_empty() {
            return self.len();
        }

        let left = self.take_chain();
        let right = other.take_chain();
        let merged = merge(left, right, storage, &mut cmp);
        self.restore_chain(merged);
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Queue, QueueStorage};

    type Pair = (u32, usize);

    fn filled<T: Copy + core::fmt::Debug>(
        storage: &mut QueueStorage<T>,
        values: &[T],
    ) -> Queue<T, QueueStorage<T>> {
        let mut queue = Queue::new();
        for &v in values {
            queue.insert_tail(storage, v).unwrap();
        }
        queue
    }

    fn values<T: Copy>(queue: &Queue<T, QueueStorage<T>>, storage: &QueueStorage<T>) -> Vec<T> {
        assert!(queue.check_links(storage));
        queue.iter(storage).copied().collect()
    }

    #[test]
    fn sort_ascending_and_descending() {
        let mut storage = QueueStorage::new();
        let mut queue = filled(&mut storage, &[5u32, 3, 8, 1, 9, 2, 7]);

        queue.sort(&mut storage, false);
        assert_eq!(values(&queue, &storage), vec![1, 2, 3, 5, 7, 8, 9]);

        queue.sort(&mut storage, true);
        assert_eq!(values(&queue, &storage), vec![9, 8, 7, 5, 3, 2, 1]);
    }

    #[test]
    fn sort_empty_and_single() {
        let mut storage = QueueStorage::<u32>::new();
        let mut queue = filled(&mut storage, &[]);
        queue.sort(&mut storage, false);
        assert!(queue.check_links(&storage));

        queue.insert_tail(&mut storage, 4).unwrap();
        queue.sort(&mut storage, true);
        assert_eq!(values(&queue, &storage), vec![4]);
    }

    #[test]
    fn sort_is_stable_both_directions() {
        let input: Vec<Pair> = vec![(2, 0), (1, 1), (2, 2), (1, 3), (3, 4), (2, 5)];
        let by_key = |a: &Pair, b: &Pair| a.0.cmp(&b.0);

        let mut storage = QueueStorage::new();
        let mut queue = filled(&mut storage, &input);
        queue.sort_by(&mut storage, by_key);
        assert_eq!(
            values(&queue, &storage),
            vec![(1, 1), (1, 3), (2, 0), (2, 2), (2, 5), (3, 4)]
        );

        let mut storage = QueueStorage::new();
        let mut queue = filled(&mut storage, &input);
        queue.sort_by(&mut storage, |a, b| b.0.cmp(&a.0));
        assert_eq!(
            values(&queue, &storage),
            vec![(3, 4), (2, 0), (2, 2), (2, 5), (1, 1), (1, 3)]
        );
    }

    #[test]
    fn sort_strings_bytewise() {
        let mut storage: QueueStorage<String> = QueueStorage::new();
        let mut queue: Queue<String, _> = Queue::new();
        for s in ["pear", "Apple", "apple", "banana"] {
            queue.insert_tail(&mut storage, s.to_string()).unwrap();
        }

        queue.sort(&mut storage, false);
        let sorted: Vec<_> = queue.iter(&storage).map(String::as_str).collect();
        assert_eq!(sorted, ["Apple", "apple", "banana", "pear"]);
    }

    #[test]
    fn merge_two_sorted() {
        let mut storage = QueueStorage::new();
        let mut a = filled(&mut storage, &[1u32, 3, 5]);
        let mut b = filled(&mut storage, &[2, 4, 6]);

        assert_eq!(a.merge(&mut storage, &mut b, false), 6);
        assert_eq!(values(&a, &storage), vec![1, 2, 3, 4, 5, 6]);
        assert!(b.is_empty());
        assert!(b.check_links(&storage));
    }

    #[test]
    fn merge_descending() {
        let mut storage = QueueStorage::new();
        let mut a = filled(&mut storage, &[9u32, 4, 1]);
        let mut b = filled(&mut storage, &[8, 5]);

        assert_eq!(a.merge(&mut storage, &mut b, true), 5);
        assert_eq!(values(&a, &storage), vec![9, 8, 5, 4, 1]);
    }

    #[test]
    fn merge_into_empty_and_from_empty() {
        let mut storage = QueueStorage::new();
        let mut a = filled(&mut storage, &[]);
        let mut b = filled(&mut storage, &[1u32, 2]);

        assert_eq!(a.merge(&mut storage, &mut b, false), 2);
        assert_eq!(values(&a, &storage), vec![1, 2]);

        assert_eq!(a.merge(&mut storage, &mut b, false), 2);
        assert_eq!(values(&a, &storage), vec![1, 2]);
    }

    #[test]
    fn merge_unsorted_keeps_every_element() {
        let mut storage = QueueStorage::new();
        let mut a = filled(&mut storage, &[5u32, 1, 4]);
        let mut b = filled(&mut storage, &[3, 2]);

        assert_eq!(a.merge(&mut storage, &mut b, false), 5);
        let mut merged = values(&a, &storage);
        merged.sort_unstable();
        assert_eq!(merged, vec![1, 2, 3, 4, 5]);
    }
}
