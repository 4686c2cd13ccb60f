// Copyright 2026 the Scrollfade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timer-based frame pacing.
//!
//! Hosts without a native animation-frame primitive emulate one with a plain
//! timer. [`FallbackPacer`] decides how long each timer should wait so that
//! callbacks land on slots at least one interval apart.

use crate::time::{Duration, HostTime, Timebase};

/// Interval between emulated frames, in milliseconds.
pub const FALLBACK_INTERVAL_MS: u64 = 16;

/// Spaces timer-driven frames one interval apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FallbackPacer {
    interval: Duration,
    last_slot: Option<HostTime>,
}

impl FallbackPacer {
    /// Creates a pacer with the given interval.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_slot: None,
        }
    }

    /// Creates a pacer with [`FALLBACK_INTERVAL_MS`] on `timebase`.
    #[must_use]
    pub const fn with_timebase(timebase: Timebase) -> Self {
        Self::new(Duration::from_millis(FALLBACK_INTERVAL_MS, timebase))
    }

    /// Returns the pacing interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns how long a timer started at `now` should wait, and reserves
    /// the resulting slot.
    ///
    /// The first request fires immediately. A request made while a slot is
    /// still ahead shares that slot; otherwise the wait is whatever remains
    /// of the interval since the last slot.
    pub fn next_delay(&mut self, now: HostTime) -> Duration {
        let delay = match self.last_slot {
            None => Duration::ZERO,
            Some(slot) if slot.ticks() > now.ticks() => return slot - now,
            Some(slot) => self
                .interval
                .saturating_sub(now.saturating_duration_since(slot)),
        };
        self.last_slot = Some(now.saturating_add(delay));
        delay
    }
}

impl Default for FallbackPacer {
    fn default() -> Self {
        Self::with_timebase(Timebase::MICROS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: u64 = 1_000;

    fn pacer() -> FallbackPacer {
        FallbackPacer::default()
    }

    #[test]
    fn default_interval_is_sixteen_ms_in_micros() {
        assert_eq!(pacer().interval(), Duration(16 * MS));
    }

    #[test]
    fn first_request_fires_immediately() {
        let mut p = pacer();
        assert_eq!(p.next_delay(HostTime(5 * MS)), Duration::ZERO);
    }

    #[test]
    fn waits_out_the_rest_of_the_interval() {
        let mut p = pacer();
        p.next_delay(HostTime(0));
        assert_eq!(p.next_delay(HostTime(10 * MS)), Duration(6 * MS));
    }

    #[test]
    fn long_gap_fires_immediately() {
        let mut p = pacer();
        p.next_delay(HostTime(0));
        assert_eq!(p.next_delay(HostTime(100 * MS)), Duration::ZERO);
    }

    #[test]
    fn requests_before_a_pending_slot_share_it() {
        let mut p = pacer();
        p.next_delay(HostTime(0));
        assert_eq!(p.next_delay(HostTime(4 * MS)), Duration(12 * MS));
        // Slot reserved at 16 ms.
        assert_eq!(p.next_delay(HostTime(8 * MS)), Duration(8 * MS));
        // Once the slot has passed, the next one is an interval later.
        assert_eq!(p.next_delay(HostTime(20 * MS)), Duration(12 * MS));
    }

    #[test]
    fn nanosecond_timebase_scales_the_interval() {
        let p = FallbackPacer::with_timebase(Timebase::NANOS);
        assert_eq!(p.interval(), Duration(16_000_000));
    }
}
