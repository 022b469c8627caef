//! One-shot deferred events on a simulated clock.
//!
//! The session owns a [`Scheduler`] and advances it by one tick duration per
//! frame. Every scheduled event gets a [`TimerId`]; cancelling that id
//! guarantees the event is never delivered.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Timer<E> {
    id: TimerId,
    due: Duration,
    event: E,
}

#[derive(Debug)]
pub struct Scheduler<E> {
    now: Duration,
    next_id: u64,
    pending: Vec<Timer<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Current simulated time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queue `event` to fire once `delay` has elapsed
    pub fn schedule(&mut self, delay: Duration, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Timer {
            id,
            due: self.now + delay,
            event,
        });
        id
    }

    /// Returns false if the timer already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Moves the clock forward and hands back every event now due, earliest
    /// first (ties in scheduling order).
    pub fn advance(&mut self, elapsed: Duration) -> Vec<E> {
        self.now += elapsed;

        let mut due = Vec::new();
        let mut idx = 0;
        while idx < self.pending.len() {
            if self.pending[idx].due <= self.now {
                due.push(self.pending.swap_remove(idx));
            } else {
                idx += 1;
            }
        }

        due.sort_by_key(|t| (t.due, t.id.0));
        due.into_iter().map(|t| t.event).collect()
    }
}
