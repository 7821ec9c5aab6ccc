//! Refresh throttling around writes.
//!
//! The vendor API lags a little behind writes: a poll that lands right after
//! a change may still report the previous state. The gate keeps such polls
//! from overwriting what the user just set.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Vendor timestamp in milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// How long after a confirmed write polled state is ignored.
pub const THROTTLE_WINDOW_MS: Timestamp = 1000;

/// Tracks outstanding writes and the last confirmed write for one device.
#[derive(Debug, Default)]
pub struct ThrottleGate {
    in_flight: AtomicUsize,
    last_confirmed: Mutex<Option<Timestamp>>,
}

impl ThrottleGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a write is currently outstanding.
    pub fn is_updating(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Vendor timestamp of the last confirmed write, if any.
    pub fn last_confirmed(&self) -> Option<Timestamp> {
        *self
            .last_confirmed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Decide whether a snapshot taken at `timestamp` may refresh state.
    ///
    /// # Examples
    ///
    /// ```
    /// use wyze_lights_rs::ThrottleGate;
    ///
    /// let gate = ThrottleGate::new();
    /// assert!(gate.should_refresh(5_000));
    ///
    /// gate.begin_write().confirm(5_000);
    /// assert!(!gate.should_refresh(5_500));
    /// assert!(!gate.should_refresh(6_000));
    /// assert!(gate.should_refresh(6_001));
    /// ```
    pub fn should_refresh(&self, timestamp: Timestamp) -> bool {
        if self.is_updating() {
            return false;
        }

        match self.last_confirmed() {
            Some(last) => timestamp > last.saturating_add(THROTTLE_WINDOW_MS),
            None => true,
        }
    }

    /// Mark a write as outstanding until the returned guard is dropped.
    ///
    /// Dropping the guard without calling [`WriteGuard::confirm`] releases
    /// the gate without recording a timestamp, which is what happens on
    /// every error path.
    pub fn begin_write(&self) -> WriteGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        WriteGuard {
            gate: self,
            confirmed: None,
        }
    }

    /// Finish an outstanding write, recording the vendor confirmation if given.
    ///
    /// The newest confirmation wins, whatever order overlapping writes
    /// finish in.
    ///
    /// Prefer [`ThrottleGate::begin_write`], whose guard calls this for you.
    pub fn end_write(&self, confirmed: Option<Timestamp>) {
        if let Some(ts) = confirmed {
            let mut last = self
                .last_confirmed
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *last = Some(last.map_or(ts, |previous| previous.max(ts)));
        }

        // Never underflow, even if end_write is called without a begin.
        let _ = self
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }
}

/// An outstanding write on a [`ThrottleGate`].
#[must_use = "dropping the guard immediately ends the write"]
#[derive(Debug)]
pub struct WriteGuard<'a> {
    gate: &'a ThrottleGate,
    confirmed: Option<Timestamp>,
}

impl WriteGuard<'_> {
    /// Record the vendor confirmation timestamp and end the write.
    pub fn confirm(mut self, timestamp: Timestamp) {
        self.confirmed = Some(timestamp);
    }
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        self.gate.end_write(self.confirmed.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_gate_refreshes() {
        let gate = ThrottleGate::new();
        assert!(!gate.is_updating());
        assert_eq!(gate.last_confirmed(), None);
        assert!(gate.should_refresh(0));
    }

    #[test]
    fn test_refuses_while_writing() {
        let gate = ThrottleGate::new();
        let guard = gate.begin_write();
        assert!(gate.is_updating());
        assert!(!gate.should_refresh(u64::MAX));
        drop(guard);
        assert!(!gate.is_updating());
        assert!(gate.should_refresh(u64::MAX));
    }

    #[test]
    fn test_dropped_guard_records_nothing() {
        let gate = ThrottleGate::new();
        {
            let _guard = gate.begin_write();
        }
        assert!(!gate.is_updating());
        assert_eq!(gate.last_confirmed(), None);
    }

    #[test]
    fn test_window_after_confirmation() {
        let gate = ThrottleGate::new();
        gate.begin_write().confirm(10_000);
        assert_eq!(gate.last_confirmed(), Some(10_000));

        for offset in [0, 1, 500, 999, 1000] {
            assert!(!gate.should_refresh(10_000 + offset), "offset {offset}");
        }
        assert!(gate.should_refresh(11_001));
        assert!(gate.should_refresh(11_500));
    }

    #[test]
    fn test_suppression_holds_for_close_timestamps() {
        let gate = ThrottleGate::new();
        for t1 in (0..50_000).step_by(7_919) {
            gate.begin_write().confirm(t1);
            for delta in [1, 250, 999] {
                assert!(!gate.should_refresh(t1 + delta));
            }
        }
    }

    #[test]
    fn test_overlapping_writes() {
        let gate = ThrottleGate::new();
        let first = gate.begin_write();
        let second = gate.begin_write();
        first.confirm(1_000);
        assert!(gate.is_updating());
        second.confirm(2_000);
        assert!(!gate.is_updating());
        assert_eq!(gate.last_confirmed(), Some(2_000));
    }

    #[test]
    fn test_late_older_confirmation_keeps_newest() {
        let gate = ThrottleGate::new();
        let first = gate.begin_write();
        let second = gate.begin_write();
        second.confirm(5_000);
        first.confirm(1_000);

        assert_eq!(gate.last_confirmed(), Some(5_000));
        assert!(!gate.should_refresh(5_500));
        assert!(!gate.should_refresh(6_000));
        assert!(gate.should_refresh(6_001));
    }

    #[test]
    fn test_end_write_without_begin() {
        let gate = ThrottleGate::new();
        gate.end_write(Some(42));
        assert!(!gate.is_updating());
        assert_eq!(gate.last_confirmed(), Some(42));
    }
}
