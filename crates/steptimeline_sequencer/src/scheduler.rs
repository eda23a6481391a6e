// SPDX-License-Identifier: MIT OR Apache-2.0
//! Logical clock and deferred-effect queue.
//!
//! Nothing here reads wall-clock time. The owner advances the clock and
//! drains whatever effects have come due, in deadline order.

use crate::config::Millis;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Monotonic millisecond clock driven by the owner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogicalClock {
    now: Millis,
}

impl LogicalClock {
    /// Create a clock at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Move forward by `delta`
    pub fn advance(&mut self, delta: Millis) -> Millis {
        self.now += delta;
        self.now
    }

    /// Move forward to `time`; earlier times are ignored
    pub fn advance_to(&mut self, time: Millis) -> Millis {
        self.now = self.now.max(time);
        self.now
    }
}

/// Queue entry
#[derive(Debug)]
struct Timer<E> {
    fire_at: Millis,
    seq: u64,
    effect: E,
}

impl<E> PartialEq for Timer<E> {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.seq == other.seq
    }
}

impl<E> Eq for Timer<E> {}

impl<E> PartialOrd for Timer<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Timer<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Earliest deadline first, then insertion order
        other
            .fire_at
            .cmp(&self.fire_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Priority queue of effects keyed by fire time
#[derive(Debug)]
pub struct TimerQueue<E> {
    heap: BinaryHeap<Timer<E>>,
    next_seq: u64,
}

impl<E> TimerQueue<E> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Schedule `effect` to fire at `fire_at`
    pub fn push(&mut self, fire_at: Millis, effect: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Timer { fire_at, seq, effect });
    }

    /// Pop the earliest effect if it is due at `now`
    pub fn pop_due(&mut self, now: Millis) -> Option<(Millis, E)> {
        if self.heap.peek()?.fire_at > now {
            return None;
        }
        self.heap.pop().map(|t| (t.fire_at, t.effect))
    }

    /// Deadline of the earliest effect
    pub fn next_deadline(&self) -> Option<Millis> {
        self.heap.peek().map(|t| t.fire_at)
    }

    /// Number of queued effects
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_monotonic() {
        let mut clock = LogicalClock::new();
        assert_eq!(clock.advance(Millis(16)), Millis(16));
        assert_eq!(clock.advance_to(Millis(10)), Millis(16));
        assert_eq!(clock.advance_to(Millis(40)), Millis(40));
    }

    #[test]
    fn test_deadline_order() {
        let mut queue = TimerQueue::new();
        queue.push(Millis(300), "c");
        queue.push(Millis(100), "a");
        queue.push(Millis(200), "b");

        assert_eq!(queue.next_deadline(), Some(Millis(100)));
        assert_eq!(queue.pop_due(Millis(50)), None);

        let mut fired = Vec::new();
        while let Some((_, effect)) = queue.pop_due(Millis(250)) {
            fired.push(effect);
        }
        assert_eq!(fired, vec!["a", "b"]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_ties_fire_in_insertion_order() {
        let mut queue = TimerQueue::new();
        for effect in 0..5 {
            queue.push(Millis(10), effect);
        }
        let fired: Vec<_> = std::iter::from_fn(|| queue.pop_due(Millis(10)).map(|(_, e)| e)).collect();
        assert_eq!(fired, vec![0, 1, 2, 3, 4]);
        assert!(queue.is_empty());
    }
}
