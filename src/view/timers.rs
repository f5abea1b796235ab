//! Virtual clock for deferred controller work.
//!
//! Controllers never sleep. They schedule a [`Timer`] and the page fires it
//! when its clock passes the due time. Ties fire in scheduling order.

use std::collections::BTreeMap;
use std::time::Duration;

/// Deferred work items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// A shown gallery item reaches its settled look.
    GallerySettle { item: usize, generation: u64 },
    /// A faded gallery item leaves the layout.
    GalleryHide { item: usize, generation: u64 },
    /// Simulated delivery of the contact form finished.
    DeliveryComplete,
    /// Remove the form result banner.
    BannerDismiss { generation: u64 },
    /// Advance a stat counter by one frame.
    CounterTick { counter: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_seq: u64,
    pending: BTreeMap<(Duration, u64), Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since the page was mounted.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, timer: Timer) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert((self.now + delay, seq), timer);
        TimerId(seq)
    }

    /// Drop a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let key = self.pending.keys().find(|(_, seq)| *seq == id.0).copied();
        key.and_then(|k| self.pending.remove(&k)).is_some()
    }

    /// Remove and return the earliest timer due at or before `until`,
    /// moving the clock to its due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<Timer> {
        let (&(due, seq), _) = self.pending.first_key_value()?;
        if due > until {
            return None;
        }
        self.now = self.now.max(due);
        self.pending.remove(&(due, seq))
    }

    /// Move the clock forward without firing anything.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(due, _)| *due)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
