#![forbid(unsafe_code)]

//! Keyed deadline queue on a host-driven clock.
//!
//! The engine never sleeps. Every delayed continuation (debounces, the
//! scroll-lock fallback, announcement expiry) is a deadline in a
//! [`TimerQueue`]; the host asks for [`TimerQueue::next_deadline`], arms one
//! platform timer for it, and hands control back when it fires.
//!
//! Timers are keyed. Scheduling a key that is already pending replaces the
//! old deadline, which gives debounce its "latest wins" behavior without a
//! separate cancel step.

use core::time::Duration;

use crate::a11y::AnnouncementId;

/// Convert a host timestamp in milliseconds into a clock reading.
///
/// Host clocks can be noisy (NaN, infinities, negative values); those
/// samples are rejected rather than clamped so they never move time.
#[must_use]
pub fn millis_to_duration(ms: f64) -> Option<Duration> {
    if !ms.is_finite() || ms < 0.0 {
        return None;
    }
    let nanos = (ms * 1_000_000.0).round();
    if nanos >= u64::MAX as f64 {
        return None;
    }
    Some(Duration::from_nanos(nanos as u64))
}

/// Identity of a pending continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// Re-evaluate the scroll spy after scrolling pauses.
    SpyDebounce,
    /// Clear lingering card emphasis after resizing pauses.
    ResizeDebounce,
    /// Fallback release of the programmatic-scroll lock.
    ScrollLockRelease,
    /// Prepare section reveal animations after page load.
    RevealStart,
    /// Restore the special-text animation after clearing it.
    AnimationRestore,
    /// Remove one announcement node.
    AnnouncementExpiry(AnnouncementId),
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    key: TimerKey,
    deadline: Duration,
    /// Insertion order; breaks ties between equal deadlines.
    seq: u64,
}

/// Pending deadlines, at most one per key.
///
/// The queue holds a handful of entries at a time, so a flat vector with
/// linear scans is enough.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    pending: Vec<Pending>,
    next_seq: u64,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key` at `deadline`, replacing any pending deadline for it.
    pub fn schedule(&mut self, key: TimerKey, deadline: Duration) {
        self.cancel(key);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending { key, deadline, seq });
    }

    /// Drop the pending deadline for `key`. Returns whether one existed.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.key != key);
        self.pending.len() != before
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|p| p.deadline).min()
    }

    /// Remove and return the earliest timer due at `now`, if any.
    ///
    /// Callers loop on this so that timers scheduled while firing an earlier
    /// one are honored in deadline order.
    pub fn pop_due(&mut self, now: Duration) -> Option<TimerKey> {
        let (idx, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.deadline <= now)
            .min_by_key(|(_, p)| (p.deadline, p.seq))?;
        Some(self.pending.swap_remove(idx).key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
