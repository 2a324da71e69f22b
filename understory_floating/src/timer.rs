// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-slot timers driven by host timestamps.

/// A timer holding at most one pending deadline and its action.
///
/// Scheduling replaces whatever was pending. The host supplies time; nothing
/// fires until [`TimerSlot::take_due`] is called with a timestamp at or past
/// the deadline.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimerSlot<A> {
    pending: Option<(u64, A)>,
}

impl<A> Default for TimerSlot<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> TimerSlot<A> {
    /// An idle timer.
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Fire `action` at `now + delay`, cancelling anything pending.
    pub fn schedule(&mut self, now: u64, delay: u64, action: A) {
        self.pending = Some((now.saturating_add(delay), action));
    }

    /// Cancel the pending action. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Deadline of the pending action.
    pub fn deadline(&self) -> Option<u64> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    /// True if an action is pending.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending action if its deadline has passed.
    pub fn take_due(&mut self, now: u64) -> Option<A> {
        match self.pending {
            Some((at, _)) if at <= now => self.pending.take().map(|(_, a)| a),
            _ => None,
        }
    }
}

/// Earliest of a set of optional deadlines.
pub(crate) fn earliest(deadlines: impl IntoIterator<Item = Option<u64>>) -> Option<u64> {
    deadlines.into_iter().flatten().min()
}
