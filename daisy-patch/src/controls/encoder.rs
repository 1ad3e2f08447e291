//! Rotary encoder with push switch.
//!
//! All three pins are active low with pull-ups. Each is debounced on its own
//! [`Debouncer`]; the quadrature state is rebuilt from the two committed
//! levels after every tick and decoded through the 2-bit Gray-code table.
//! Four quarter-steps in one direction make one detent. Arriving back at the
//! rest state (both lines inactive) past the halfway point also counts as a
//! detent, and always realigns the step count, so a line whose bounce delays
//! its commit onto the same tick as the other line's costs no detent.
//!
//! Rotation and click edges are read-once: as long as the consumer polls at
//! least once per debounce window, every detent and every press is reported
//! exactly once.

use embedded_hal::digital::InputPin;

use super::debounce::{threshold_for, Debouncer};
use super::read_high;
use crate::constants::STEPS_PER_DETENT;

/// Quarter-step direction indexed by `(previous << 2) | current`, where each
/// state is `(A << 1) | B` in logical (active) levels. Zero for no change or
/// a double transition.
const QUADRATURE_TABLE: [i8; 16] = [
    0, 1, -1, 0, //
    -1, 0, 0, 1, //
    1, 0, 0, -1, //
    0, -1, 1, 0, //
];

/// Both lines inactive: where the Patch encoder sits between detents.
const REST_STATE: u8 = 0b00;

pub struct Encoder<A, B, C> {
    pin_a: A,
    pin_b: B,
    pin_click: C,
    a: Debouncer,
    b: Debouncer,
    click: Debouncer,
    /// Last committed `(A << 1) | B`, once both lines have been sampled.
    quadrature: Option<u8>,
    sub_steps: i8,
    increment: i32,
    rising: bool,
    falling: bool,
    held_ticks: u32,
    update_rate: f32,
    faults: u32,
}

impl<A, B, C> Encoder<A, B, C>
where
    A: InputPin,
    B: InputPin,
    C: InputPin,
{
    /// Build an encoder polled `update_rate` times per second. The debounce
    /// window spans [`DEBOUNCE_TIME_S`](crate::constants::DEBOUNCE_TIME_S).
    pub fn new(pin_a: A, pin_b: B, pin_click: C, update_rate: f32) -> Self {
        Self::with_threshold(pin_a, pin_b, pin_click, update_rate, threshold_for(update_rate))
    }

    /// Build an encoder with an explicit debounce window in ticks.
    pub fn with_threshold(
        pin_a: A,
        pin_b: B,
        pin_click: C,
        update_rate: f32,
        threshold: u16,
    ) -> Self {
        Encoder {
            pin_a,
            pin_b,
            pin_click,
            a: Debouncer::new(threshold),
            b: Debouncer::new(threshold),
            click: Debouncer::new(threshold),
            quadrature: None,
            sub_steps: 0,
            increment: 0,
            rising: false,
            falling: false,
            held_ticks: 0,
            update_rate,
            faults: 0,
        }
    }

    /// Advance the debounce state machines by one tick.
    pub fn debounce(&mut self) {
        if let Some(high) = read_high(&mut self.pin_a, &mut self.faults) {
            self.a.update(high);
        }
        if let Some(high) = read_high(&mut self.pin_b, &mut self.faults) {
            self.b.update(high);
        }
        self.decode();

        if let Some(high) = read_high(&mut self.pin_click, &mut self.faults) {
            match self.click.update(high) {
                Some(false) => {
                    self.rising = true;
                    // The press began a full window before it committed
                    self.held_ticks = u32::from(self.click.threshold()) - 1;
                }
                Some(true) => self.falling = true,
                None => {}
            }
        }
        if self.pressed() {
            self.held_ticks = self.held_ticks.saturating_add(1);
        }
    }

    fn decode(&mut self) {
        let (Some(a_high), Some(b_high)) = (self.a.is_high(), self.b.is_high()) else {
            return;
        };
        let state = ((!a_high as u8) << 1) | (!b_high as u8);

        let previous = match self.quadrature.replace(state) {
            Some(previous) if previous != state => previous,
            _ => return,
        };
        self.sub_steps += QUADRATURE_TABLE[((previous << 2) | state) as usize];

        if self.sub_steps >= STEPS_PER_DETENT {
            self.sub_steps = 0;
            self.increment += 1;
        } else if self.sub_steps <= -STEPS_PER_DETENT {
            self.sub_steps = 0;
            self.increment -= 1;
        } else if state == REST_STATE {
            if self.sub_steps >= STEPS_PER_DETENT / 2 {
                self.increment += 1;
            } else if self.sub_steps <= -STEPS_PER_DETENT / 2 {
                self.increment -= 1;
            }
            self.sub_steps = 0;
        }
    }

    /// Detents turned since the last call (clockwise positive). Resets to 0.
    pub fn increment(&mut self) -> i32 {
        core::mem::take(&mut self.increment)
    }

    /// `true` once per committed press.
    pub fn rising_edge(&mut self) -> bool {
        core::mem::take(&mut self.rising)
    }

    /// `true` once per committed release.
    pub fn falling_edge(&mut self) -> bool {
        core::mem::take(&mut self.falling)
    }

    /// Debounced switch state.
    pub fn pressed(&self) -> bool {
        self.click.is_high() == Some(false)
    }

    /// How long the switch has been held, or 0 when released.
    pub fn time_held_ms(&self) -> f32 {
        if self.pressed() && self.update_rate > 0.0 {
            self.held_ticks as f32 * 1000.0 / self.update_rate
        } else {
            0.0
        }
    }

    /// Re-derive the debounce window for a new poll rate.
    pub fn set_update_rate(&mut self, update_rate: f32) {
        let threshold = threshold_for(update_rate);
        self.a.set_threshold(threshold);
        self.b.set_threshold(threshold);
        self.click.set_threshold(threshold);
        // Keep the held time in wall-clock terms
        if self.update_rate > 0.0 && update_rate > 0.0 {
            self.held_ticks = (self.held_ticks as f32 * update_rate / self.update_rate) as u32;
        }
        self.update_rate = update_rate;
    }

    /// Debounce window in ticks.
    pub fn threshold(&self) -> u16 {
        self.a.threshold()
    }

    /// Failed pin reads since construction.
    pub fn faults(&self) -> u32 {
        self.faults
    }

    /// Release the pins.
    pub fn release(self) -> (A, B, C) {
        (self.pin_a, self.pin_b, self.pin_click)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use embedded_hal::digital::{self, ErrorType};

    #[derive(Debug)]
    struct MockError;

    impl digital::Error for MockError {
        fn kind(&self) -> digital::ErrorKind {
            digital::ErrorKind::Other
        }
    }

    /// Input pin reading a test-controlled logical level (active low).
    struct MockPin<'a> {
        active: &'a Cell<bool>,
        fail: &'a Cell<bool>,
    }

    impl ErrorType for MockPin<'_> {
        type Error = MockError;
    }

    impl InputPin for MockPin<'_> {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            if self.fail.get() {
                return Err(MockError);
            }
            Ok(!self.active.get())
        }
        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|h| !h)
        }
    }

    struct Rig {
        a: Cell<bool>,
        b: Cell<bool>,
        click: Cell<bool>,
        fail: Cell<bool>,
    }

    impl Rig {
        fn new() -> Self {
            Rig {
                a: Cell::new(false),
                b: Cell::new(false),
                click: Cell::new(false),
                fail: Cell::new(false),
            }
        }

        fn encoder(&self, threshold: u16) -> Encoder<MockPin<'_>, MockPin<'_>, MockPin<'_>> {
            let mut enc = Encoder::with_threshold(
                MockPin { active: &self.a, fail: &self.fail },
                MockPin { active: &self.b, fail: &self.fail },
                MockPin { active: &self.click, fail: &self.fail },
                1000.0,
                threshold,
            );
            // Settle on the initial levels
            enc.debounce();
            enc
        }

        fn set_ab(&self, state: u8) {
            self.a.set(state & 0b10 != 0);
            self.b.set(state & 0b01 != 0);
        }
    }

    fn hold(enc: &mut Encoder<MockPin<'_>, MockPin<'_>, MockPin<'_>>, ticks: u16) {
        for _ in 0..ticks {
            enc.debounce();
        }
    }

    const CLOCKWISE: [u8; 4] = [0b01, 0b11, 0b10, 0b00];
    const COUNTER_CLOCKWISE: [u8; 4] = [0b10, 0b11, 0b01, 0b00];

    #[test]
    fn full_cycle_clockwise_is_plus_one() {
        let rig = Rig::new();
        let mut enc = rig.encoder(3);
        for state in CLOCKWISE {
            rig.set_ab(state);
            hold(&mut enc, 3);
        }
        assert_eq!(enc.increment(), 1);
        assert_eq!(enc.increment(), 0);
    }

    #[test]
    fn full_cycle_counter_clockwise_is_minus_one() {
        let rig = Rig::new();
        let mut enc = rig.encoder(3);
        for state in COUNTER_CLOCKWISE {
            rig.set_ab(state);
            hold(&mut enc, 3);
        }
        assert_eq!(enc.increment(), -1);
        assert_eq!(enc.increment(), 0);
    }

    #[test]
    fn detents_accumulate_until_read() {
        let rig = Rig::new();
        let mut enc = rig.encoder(2);
        for _ in 0..3 {
            for state in CLOCKWISE {
                rig.set_ab(state);
                hold(&mut enc, 2);
            }
        }
        assert_eq!(enc.increment(), 3);
    }

    #[test]
    fn partial_cycle_reports_nothing() {
        let rig = Rig::new();
        let mut enc = rig.encoder(2);
        for state in &CLOCKWISE[..3] {
            rig.set_ab(*state);
            hold(&mut enc, 2);
        }
        assert_eq!(enc.increment(), 0);
    }

    #[test]
    fn bouncing_line_produces_no_rotation() {
        let rig = Rig::new();
        let mut enc = rig.encoder(3);
        for tick in 0..50 {
            rig.a.set(tick % 2 == 0);
            enc.debounce();
        }
        rig.a.set(false);
        hold(&mut enc, 5);
        assert_eq!(enc.increment(), 0);
    }

    #[test]
    fn short_glitch_is_filtered() {
        let rig = Rig::new();
        let mut enc = rig.encoder(4);
        rig.set_ab(0b01);
        hold(&mut enc, 3);
        rig.set_ab(0b00);
        hold(&mut enc, 10);
        // Complete a real cycle afterwards
        for state in CLOCKWISE {
            rig.set_ab(state);
            hold(&mut enc, 4);
        }
        assert_eq!(enc.increment(), 1);
    }

    /// B goes active, bounces once, then commits on the same tick as A.
    fn turn_with_b_bounce(rig: &Rig, enc: &mut Encoder<MockPin<'_>, MockPin<'_>, MockPin<'_>>) {
        rig.set_ab(0b01);
        enc.debounce();
        rig.set_ab(0b00);
        enc.debounce();
        rig.set_ab(0b11);
        hold(enc, 2);
        for state in &CLOCKWISE[2..] {
            rig.set_ab(*state);
            hold(enc, 2);
        }
    }

    #[test]
    fn simultaneous_commit_still_counts_the_detent() {
        let rig = Rig::new();
        let mut enc = rig.encoder(2);

        turn_with_b_bounce(&rig, &mut enc);
        assert_eq!(enc.increment(), 1);
        assert_eq!(enc.sub_steps, 0);

        for _ in 0..3 {
            for state in CLOCKWISE {
                rig.set_ab(state);
                hold(&mut enc, 2);
            }
        }
        assert_eq!(enc.increment(), 3);
        assert_eq!(enc.sub_steps, 0);
    }

    #[test]
    fn double_transition_mid_cycle_keeps_alignment() {
        let rig = Rig::new();
        let mut enc = rig.encoder(2);
        // 01 -> 10 skips 11
        for state in [0b01, 0b10, 0b00] {
            rig.set_ab(state);
            hold(&mut enc, 2);
        }
        assert_eq!(enc.increment(), 1);

        for state in COUNTER_CLOCKWISE {
            rig.set_ab(state);
            hold(&mut enc, 2);
        }
        assert_eq!(enc.increment(), -1);
    }

    #[test]
    fn wiggle_around_rest_reports_nothing() {
        let rig = Rig::new();
        let mut enc = rig.encoder(2);
        for state in [0b01, 0b00, 0b10, 0b00, 0b01, 0b11, 0b01, 0b00] {
            rig.set_ab(state);
            hold(&mut enc, 2);
        }
        assert_eq!(enc.increment(), 0);
        assert_eq!(enc.sub_steps, 0);
    }

    #[test]
    fn click_edge_reads_once() {
        let rig = Rig::new();
        let mut enc = rig.encoder(2);

        rig.click.set(true);
        hold(&mut enc, 2);
        assert!(enc.pressed());
        assert!(enc.rising_edge());
        assert!(!enc.rising_edge());

        hold(&mut enc, 10);
        assert!(!enc.rising_edge());

        rig.click.set(false);
        hold(&mut enc, 2);
        assert!(!enc.pressed());
        assert!(enc.falling_edge());
        assert!(!enc.falling_edge());
        assert!(!enc.rising_edge());

        // Second press
        rig.click.set(true);
        hold(&mut enc, 2);
        assert!(enc.rising_edge());
    }

    #[test]
    fn click_bounce_is_ignored() {
        let rig = Rig::new();
        let mut enc = rig.encoder(3);
        for tick in 0..30 {
            rig.click.set(tick % 2 == 0);
            enc.debounce();
        }
        assert!(!enc.rising_edge());
        assert!(!enc.pressed());
    }

    #[test]
    fn time_held_counts_ticks() {
        let rig = Rig::new();
        let mut enc = rig.encoder(1);
        rig.click.set(true);
        hold(&mut enc, 1);
        assert!(enc.pressed());
        hold(&mut enc, 99);
        // 100 ticks at 1 kHz
        assert_eq!(enc.time_held_ms(), 100.0);

        rig.click.set(false);
        hold(&mut enc, 1);
        assert_eq!(enc.time_held_ms(), 0.0);
    }

    #[test]
    fn time_held_includes_debounce_window() {
        let rig = Rig::new();
        let mut enc = rig.encoder(2);
        rig.click.set(true);
        hold(&mut enc, 2);
        assert!(enc.pressed());
        assert_eq!(enc.time_held_ms(), 2.0);
        hold(&mut enc, 8);
        assert_eq!(enc.time_held_ms(), 10.0);
    }

    #[test]
    fn failed_reads_keep_last_state() {
        let rig = Rig::new();
        let mut enc = rig.encoder(2);
        rig.fail.set(true);
        rig.click.set(true);
        hold(&mut enc, 5);
        assert!(!enc.pressed());
        assert_eq!(enc.faults(), 15);

        rig.fail.set(false);
        hold(&mut enc, 2);
        assert!(enc.pressed());
    }

    #[test]
    fn update_rate_sets_threshold() {
        let rig = Rig::new();
        let mut enc = Encoder::new(
            MockPin { active: &rig.a, fail: &rig.fail },
            MockPin { active: &rig.b, fail: &rig.fail },
            MockPin { active: &rig.click, fail: &rig.fail },
            1000.0,
        );
        assert_eq!(enc.threshold(), 2);
        enc.set_update_rate(4000.0);
        assert_eq!(enc.threshold(), 8);
        enc.set_update_rate(500.0);
        assert_eq!(enc.threshold(), 1);
    }
}
