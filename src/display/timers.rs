// Cooperative one-shot timers for the display loop

use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct Pending<T> {
    id: TimerId,
    due: Instant,
    task: T,
}

/// Deadline-ordered one-shot timers, fired by polling `take_due`
pub struct TimerQueue<T> {
    next_id: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Instant, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        // Keep sorted by deadline; ties fire in scheduling order
        let index = self.pending.partition_point(|p| p.due <= due);
        self.pending.insert(index, Pending { id, due, task });
        id
    }

    /// Returns true if the timer was still pending
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.first().map(|p| p.due)
    }

    /// Remove and return every timer due at `now`, earliest first
    pub fn take_due(&mut self, now: Instant) -> Vec<(TimerId, T)> {
        let count = self.pending.partition_point(|p| p.due <= now);
        self.pending
            .drain(..count)
            .map(|p| (p.id, p.task))
            .collect()
    }
}
