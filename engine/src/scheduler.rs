//! Time-ordered queue of pending actor turns.

use std::{cmp::Reverse, collections::BinaryHeap, hash::Hash};

use crate::prelude::*;

/// Priority queue of actors keyed by the absolute time of their next
/// action.
///
/// Each actor has at most one live entry. Re-scheduling an actor leaves its
/// old heap entry in place as a stale entry that gets dropped when it comes
/// up, so does scheduling an actor that later becomes inactive. Entries with
/// equal times come out in insertion order, but callers should not build
/// game logic on that.
#[derive(Clone, Debug)]
pub struct Scheduler<T> {
    now: Instant,
    seq: u64,
    heap: BinaryHeap<Reverse<(Instant, u64, T)>>,
    live: HashMap<T, (Instant, u64)>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Scheduler {
            now: Default::default(),
            seq: 0,
            heap: Default::default(),
            live: Default::default(),
        }
    }
}

impl<T: Copy + Eq + Ord + Hash> Scheduler<T> {
    /// Current scheduler time, the time of the last popped entry.
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Schedule the item to act `delay` ticks from now.
    pub fn schedule(&mut self, item: T, delay: i64) {
        self.schedule_at(item, self.now + delay.max(0));
    }

    /// Schedule the item at an absolute time, replacing any pending entry.
    pub fn schedule_at(&mut self, item: T, at: Instant) {
        self.seq += 1;
        self.live.insert(item, (at, self.seq));
        self.heap.push(Reverse((at, self.seq, item)));
    }

    /// Drop the pending entry of an item.
    pub fn unschedule(&mut self, item: &T) {
        self.live.remove(item);
    }

    /// Time of the item's pending entry.
    pub fn scheduled_at(&self, item: &T) -> Option<Instant> {
        self.live.get(item).map(|(t, _)| *t)
    }

    /// Number of pending entries, including ones that will be skipped as
    /// inactive.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Remove and return the next item for which `is_live` holds and
    /// advance time to its scheduled instant.
    pub fn pop_next(&mut self, is_live: impl Fn(&T) -> bool) -> Option<T> {
        self.skip_dead(is_live);
        let Reverse((at, _, item)) = self.heap.pop()?;
        self.live.remove(&item);
        debug_assert!(at >= self.now);
        self.now = self.now.max(at);
        Some(item)
    }

    /// Return the next item for which `is_live` holds without removing it.
    pub fn peek_next(
        &mut self,
        is_live: impl Fn(&T) -> bool,
    ) -> Option<(T, Instant)> {
        self.skip_dead(is_live);
        self.heap.peek().map(|Reverse((at, _, item))| (*item, *at))
    }

    /// Drop stale and dead entries from the top of the heap.
    fn skip_dead(&mut self, is_live: impl Fn(&T) -> bool) {
        while let Some(&Reverse((at, seq, item))) = self.heap.peek() {
            // Entries superseded by a later schedule call are stale.
            let current = self.live.get(&item) == Some(&(at, seq));
            if current {
                if is_live(&item) {
                    return;
                }
                log::debug!("Scheduler: skipping inactive entry");
                self.live.remove(&item);
            }
            self.heap.pop();
        }
    }
}

#[cfg(test)]
mod test {
    use quickcheck_macros::quickcheck;

    use super::*;

    #[test]
    fn pops_in_time_order() {
        let mut s = Scheduler::default();
        s.schedule(1, 50);
        s.schedule(2, 10);
        s.schedule(3, 30);

        assert_eq!(s.pop_next(|_| true), Some(2));
        assert_eq!(s.now(), Instant(10));
        assert_eq!(s.pop_next(|_| true), Some(3));
        assert_eq!(s.pop_next(|_| true), Some(1));
        assert_eq!(s.now(), Instant(50));
        assert_eq!(s.pop_next(|_| true), None);
        assert_eq!(s.now(), Instant(50));
    }

    #[test]
    fn ties_by_insertion() {
        let mut s = Scheduler::default();
        for i in [5, 3, 9] {
            s.schedule(i, 100);
        }
        let order: Vec<i32> =
            std::iter::from_fn(|| s.pop_next(|_| true)).collect();
        assert_eq!(order, vec![5, 3, 9]);
    }

    #[test]
    fn lazy_skipping() {
        let mut s = Scheduler::default();
        s.schedule(1, 10);
        s.schedule(2, 20);
        s.schedule(3, 30);

        // Item 2 is dead, it's skipped without being returned.
        assert_eq!(s.pop_next(|&i| i != 1 && i != 2), Some(3));
        assert_eq!(s.now(), Instant(30));
        assert!(s.is_empty());
    }

    #[test]
    fn reschedule_replaces_entry() {
        let mut s = Scheduler::default();
        s.schedule(1, 10);
        s.schedule(2, 20);
        s.schedule(1, 30);
        assert_eq!(s.len(), 2);
        assert_eq!(s.scheduled_at(&1), Some(Instant(30)));

        assert_eq!(s.peek_next(|_| true), Some((2, Instant(20))));
        assert_eq!(s.pop_next(|_| true), Some(2));
        assert_eq!(s.pop_next(|_| true), Some(1));
        assert_eq!(s.pop_next(|_| true), None);
    }

    #[test]
    fn unschedule() {
        let mut s = Scheduler::default();
        s.schedule(1, 10);
        s.schedule(2, 20);
        s.unschedule(&1);
        assert_eq!(s.pop_next(|_| true), Some(2));
    }

    #[quickcheck]
    fn time_never_runs_backwards(delays: Vec<(u8, u8)>) -> bool {
        let mut s = Scheduler::default();
        for (i, &(d, _)) in delays.iter().enumerate() {
            s.schedule(i, d as i64);
        }

        let mut prev = s.now();
        let mut popped = 0;
        while let Some(i) = s.pop_next(|_| true) {
            if s.now() < prev {
                return false;
            }
            prev = s.now();
            popped += 1;
            // Reschedule some items to interleave with the rest.
            if popped < delays.len() * 2 {
                s.schedule(i, delays[i].1 as i64);
            }
        }
        true
    }
}
