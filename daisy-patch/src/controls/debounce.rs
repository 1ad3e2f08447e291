//! Tick-counting debouncer for a single digital input.
//!
//! A transition is accepted only after the new level has been sampled on
//! `threshold` consecutive ticks. Any sample matching the stable level resets
//! the count, so a line that bounces faster than the window never commits.

use crate::constants::DEBOUNCE_TIME_S;

/// Stable level of a debounced input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Nothing sampled yet.
    Unknown,
    Low,
    High,
}

impl Level {
    fn from_high(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Ticks needed to span [`DEBOUNCE_TIME_S`] at `update_rate` Hz (at least 1).
pub fn threshold_for(update_rate: f32) -> u16 {
    if !(update_rate.is_finite() && update_rate > 0.0) {
        return 1;
    }
    let ticks = libm::roundf(DEBOUNCE_TIME_S * update_rate);
    if ticks < 1.0 {
        1
    } else if ticks > u16::MAX as f32 {
        u16::MAX
    } else {
        ticks as u16
    }
}

/// Per-pin debounce state machine.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    stable: Level,
    pending: u16,
    threshold: u16,
}

impl Debouncer {
    /// `threshold` is clamped to at least one tick.
    pub const fn new(threshold: u16) -> Self {
        Debouncer {
            stable: Level::Unknown,
            pending: 0,
            threshold: if threshold == 0 { 1 } else { threshold },
        }
    }

    /// Feed one sample. Returns `Some(level_is_high)` on the tick a
    /// transition is committed.
    ///
    /// The very first sample is adopted as the stable level without
    /// reporting a transition.
    pub fn update(&mut self, high: bool) -> Option<bool> {
        let sampled = Level::from_high(high);
        if self.stable == Level::Unknown {
            self.stable = sampled;
            self.pending = 0;
            return None;
        }
        if sampled == self.stable {
            self.pending = 0;
            return None;
        }

        self.pending += 1;
        if self.pending >= self.threshold {
            self.stable = sampled;
            self.pending = 0;
            Some(high)
        } else {
            None
        }
    }

    pub fn level(&self) -> Level {
        self.stable
    }

    /// `None` until the first sample.
    pub fn is_high(&self) -> Option<bool> {
        match self.stable {
            Level::Unknown => None,
            Level::Low => Some(false),
            Level::High => Some(true),
        }
    }

    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    /// Change the window. A transition already pending stays pending.
    pub fn set_threshold(&mut self, threshold: u16) {
        self.threshold = threshold.max(1);
        if self.pending >= self.threshold {
            self.pending = self.threshold - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_is_adopted_silently() {
        let mut d = Debouncer::new(3);
        assert_eq!(d.level(), Level::Unknown);
        assert_eq!(d.update(false), None);
        assert_eq!(d.level(), Level::Low);
    }

    #[test]
    fn bounce_shorter_than_window_never_commits() {
        let mut d = Debouncer::new(4);
        d.update(true);

        // Flip every tick
        for tick in 0..100 {
            assert_eq!(d.update(tick % 2 == 0), None);
        }
        assert_eq!(d.update(true), None);
        assert_eq!(d.level(), Level::High);

        // Three low ticks, then back high
        for _ in 0..3 {
            assert_eq!(d.update(false), None);
        }
        assert_eq!(d.update(true), None);
        assert_eq!(d.level(), Level::High);
    }

    #[test]
    fn stable_level_commits_exactly_once() {
        let mut d = Debouncer::new(4);
        d.update(true);

        let mut commits = 0;
        for _ in 0..20 {
            if d.update(false).is_some() {
                commits += 1;
            }
        }
        assert_eq!(commits, 1);
        assert_eq!(d.level(), Level::Low);
    }

    #[test]
    fn commit_lands_on_threshold_tick() {
        let mut d = Debouncer::new(3);
        d.update(false);
        assert_eq!(d.update(true), None);
        assert_eq!(d.update(true), None);
        assert_eq!(d.update(true), Some(true));
    }

    #[test]
    fn zero_threshold_is_one_tick() {
        let mut d = Debouncer::new(0);
        assert_eq!(d.threshold(), 1);
        d.update(false);
        assert_eq!(d.update(true), Some(true));
    }

    #[test]
    fn shrinking_threshold_keeps_pending_below_it() {
        let mut d = Debouncer::new(10);
        d.update(false);
        for _ in 0..6 {
            d.update(true);
        }
        d.set_threshold(3);
        // Pending clamped to 2: next differing sample commits
        assert_eq!(d.update(true), Some(true));
    }

    #[test]
    fn threshold_scales_with_rate() {
        assert_eq!(threshold_for(1000.0), 2);
        assert_eq!(threshold_for(500.0), 1);
        assert_eq!(threshold_for(4000.0), 8);
        assert_eq!(threshold_for(10.0), 1);
        assert_eq!(threshold_for(0.0), 1);
        assert_eq!(threshold_for(f32::INFINITY), 1);
    }
}
