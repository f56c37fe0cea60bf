//! In-place Fisher–Yates shuffle by relinking.

use rand::Rng;
use rand_core::RngCore;

use crate::node::Node;
use crate::queue::Queue;
use crate::{Key, Storage};

impl<T, S, K: Key> Queue<T, S, K>
where
    S: Storage<Node<T, K>, Key = K>,
{
    /// Shuffles the queue uniformly at random.
    ///
    /// The queue is split into an unshuffled prefix and a shuffled suffix,
    /// separated by a boundary that starts at the sentinel. For `i` from
    /// `n - 1` down to `1`, a uniform `r` in `[0, i]` picks a node from the
    /// prefix, which is moved to just before the boundary and becomes the
    /// new boundary. Every permutation is equally likely given a uniform
    /// source.
    ///
    /// The chosen node is reached from whichever end of the prefix is
    /// closer. No values are moved and nothing is allocated.
    ///
    /// # Example
    ///
    /// ```
    /// use nexus_ringq::OwnedQueue;
    /// use rand::SeedableRng;
    /// use rand::rngs::SmallRng;
    ///
    /// let mut rng = SmallRng::seed_from_u64(7);
    /// let mut queue: OwnedQueue<u32> = OwnedQueue::new();
    /// queue.try_extend(0..10).unwrap();
    ///
    /// queue.shuffle(&mut rng);
    ///
    /// let mut values: Vec<_> = queue.iter().copied().collect();
    /// values.sort_unstable();
    /// assert_eq!(values, (0..10).collect::<Vec<_>>());
    /// ```
    pub fn shuffle<R>(&mut self, storage: &mut S, rng: &mut R)
    where
        R: RngCore + ?Sized,
    {
        let n = self.len();
        if n < 2 {
            return;
        }

        let mut boundary = K::NONE;
        let mut moved = 0usize;
        for i in (1..n).rev() {
            let r = rng.random_range(0..=i);
            let last = self.prev(storage, boundary);

            let chosen = if r <= i / 2 {
                let mut key = self.next(storage, K::NONE);
                for _ in 0..r {
                    key = self.next(storage, key);
                }
                key
            } else {
                let mut key = last;
                for _ in r..i {
                    key = self.prev(storage, key);
                }
                key
            };

            if chosen != last {
                self.detach(storage, chosen);
                self.splice(storage, chosen, last, boundary);
                moved += 1;
            }
            boundary = chosen;
        }

        log::trace!("shuffle: {n} elements, {moved} relinked");
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use crate::{Queue, QueueStorage};

    fn filled(storage: &mut QueueStorage<u32>, n: u32) -> Queue<u32, QueueStorage<u32>> {
        let mut queue = Queue::new();
        for v in 0..n {
            queue.insert_tail(storage, v).unwrap();
        }
        queue
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let mut storage = QueueStorage::new();
        let mut queue = filled(&mut storage, 100);

        for _ in 0..20 {
            queue.shuffle(&mut storage, &mut rng);
            assert!(queue.check_links(&storage));
            assert_eq!(queue.size(&storage), 100);

            let mut values: Vec<_> = queue.iter(&storage).copied().collect();
            values.sort_unstable();
            assert_eq!(values, (0..100).collect::<Vec<_>>());
        }
    }

    #[test]
    fn shuffle_trivial() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut storage = QueueStorage::new();

        let mut queue = filled(&mut storage, 0);
        queue.shuffle(&mut storage, &mut rng);
        assert!(queue.is_empty());
        assert!(queue.check_links(&storage));

        queue.insert_tail(&mut storage, 42).unwrap();
        queue.shuffle(&mut storage, &mut rng);
        assert_eq!(queue.front(&storage), Some(&42));
    }

    #[test]
    fn shuffle_is_deterministic_for_a_seed() {
        let run = |seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut storage = QueueStorage::new();
            let mut queue = filled(&mut storage, 16);
            queue.shuffle(&mut storage, &mut rng);
            queue.iter(&storage).copied().collect::<Vec<_>>()
        };

        assert_eq!(run(99), run(99));
    }

    #[test]
    fn shuffle_accepts_dyn_rng() {
        let mut rng = SmallRng::seed_from_u64(3);
        let rng: &mut dyn rand_core::RngCore = &mut rng;
        let mut storage = QueueStorage::new();
        let mut queue = filled(&mut storage, 8);

        queue.shuffle(&mut storage, rng);
        assert!(queue.check_links(&storage));
    }

    #[test]
    fn shuffle_is_uniform_over_three() {
        const TRIALS: usize = 60_000;
        // chi-square critical value, 5 degrees of freedom, p = 0.001
        const CRITICAL: f64 = 20.52;

        let mut rng = SmallRng::seed_from_u64(0xC0FFEE);
        let mut storage = QueueStorage::new();
        let mut queue = filled(&mut storage, 3);
        let mut counts = [0usize; 6];

        for _ in 0..TRIALS {
            queue.shuffle(&mut storage, &mut rng);
            let perm: Vec<_> = queue.iter(&storage).copied().collect();
            let index = match perm.as_slice() {
                [0, 1, 2] => 0,
                [0, 2, 1] => 1,
                [1, 0, 2] => 2,
                [1, 2, 0] => 3,
                [2, 0, 1] => 4,
                [2, 1, 0] => 5,
                other => panic!("not a permutation: {other:?}"),
            };
            counts[index] += 1;
        }

        let expected = TRIALS as f64 / 6.0;
        let chi_square: f64 = counts
            .iter()
            .map(|&c| {
                let d = c as f64 - expected;
                d * d / expected
            })
            .sum();

        assert!(
            chi_square < CRITICAL,
            "chi-square {chi_square:.2} over {counts:?}"
        );
    }
}
