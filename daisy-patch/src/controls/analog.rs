//! Smoothed analog controls.
//!
//! Each [`AnalogControl`] reads one oversampled ADC slot per control tick,
//! normalizes it to `0.0..1.0` and runs it through a one-pole low-pass. The
//! filter coefficient is derived from the tick rate so the smoothing time in
//! seconds stays the same whatever the audio block size is.

use crate::adc::{AdcDriver, AdcSlot};
use crate::constants::{CTRL_COUNT, SMOOTHING_TIME_S};

/// Full-scale divisor for a left-justified 16-bit conversion.
const RAW_FULL_SCALE: f32 = 65536.0;

/// One-pole coefficient for a [`SMOOTHING_TIME_S`] time constant evaluated
/// `update_rate` times per second.
fn smoothing_coefficient(update_rate: f32) -> f32 {
    if !(update_rate.is_finite() && update_rate > 0.0) {
        return 1.0;
    }
    let coeff = 1.0 - libm::expf(-1.0 / (SMOOTHING_TIME_S * update_rate));
    // Very high rates round to zero; keep the filter moving.
    coeff.clamp(f32::EPSILON, 1.0)
}

/// Analog control inputs on the Patch, in ADC conversion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ctrl {
    Ctrl1 = 0,
    Ctrl2 = 1,
    Ctrl3 = 2,
    Ctrl4 = 3,
}

impl Ctrl {
    pub const COUNT: usize = CTRL_COUNT;

    pub const ALL: [Ctrl; CTRL_COUNT] = [Ctrl::Ctrl1, Ctrl::Ctrl2, Ctrl::Ctrl3, Ctrl::Ctrl4];

    /// ADC slot / array index of this control.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Ctrl {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "CTRL_{}", self.index() + 1)
    }
}

/// A single smoothed analog input.
pub struct AnalogControl {
    slot: &'static AdcSlot,
    value: f32,
    coeff: f32,
    flip: bool,
    scale: f32,
    offset: f32,
}

impl AnalogControl {
    /// Bind a control to its ADC slot.
    ///
    /// `update_rate` is how often [`process()`](Self::process) will be
    /// called, in Hz. `flip` inverts the reading (`1.0 - x`) for inputs wired
    /// with reversed polarity.
    pub fn new(slot: &'static AdcSlot, update_rate: f32, flip: bool) -> Self {
        AnalogControl {
            slot,
            value: 0.0,
            coeff: smoothing_coefficient(update_rate),
            flip,
            scale: 1.0,
            offset: 0.0,
        }
    }

    /// Apply `value * scale + offset` after normalization and inversion.
    pub fn with_range(mut self, scale: f32, offset: f32) -> Self {
        self.scale = scale;
        self.offset = offset;
        self
    }

    /// Recompute the filter for a new tick rate. The current value is kept.
    pub fn set_update_rate(&mut self, update_rate: f32) {
        self.coeff = smoothing_coefficient(update_rate);
    }

    /// Read the slot and advance the filter by one tick. Returns the new value.
    pub fn process(&mut self) -> f32 {
        let target = self.target();
        self.value += self.coeff * (target - self.value);
        self.value
    }

    /// Last smoothed value. Does not touch the ADC.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Unsmoothed conversion currently in the slot.
    #[inline]
    pub fn raw(&self) -> u16 {
        self.slot.load()
    }

    /// Current filter coefficient.
    pub fn coefficient(&self) -> f32 {
        self.coeff
    }

    fn target(&self) -> f32 {
        let normalized = self.slot.load() as f32 / RAW_FULL_SCALE;
        let oriented = if self.flip { 1.0 - normalized } else { normalized };
        oriented * self.scale + self.offset
    }
}

/// The four analog controls, indexed by [`Ctrl`].
pub struct AnalogControls {
    controls: [AnalogControl; CTRL_COUNT],
}

impl AnalogControls {
    /// Bind control `i` to ADC slot `i`. Every Patch control is inverted.
    pub fn new<A: AdcDriver>(adc: &A, update_rate: f32) -> Self {
        AnalogControls {
            controls: core::array::from_fn(|i| AnalogControl::new(adc.slot(i), update_rate, true)),
        }
    }

    /// Advance every control by one tick.
    pub fn process_all(&mut self) {
        for control in self.controls.iter_mut() {
            control.process();
        }
    }

    /// Last smoothed value of `ctrl`.
    #[inline]
    pub fn value(&self, ctrl: Ctrl) -> f32 {
        self.controls[ctrl.index()].value()
    }

    /// Unsmoothed conversion behind `ctrl`.
    pub fn value_raw(&self, ctrl: Ctrl) -> u16 {
        self.controls[ctrl.index()].raw()
    }

    pub fn control(&self, ctrl: Ctrl) -> &AnalogControl {
        &self.controls[ctrl.index()]
    }

    pub fn control_mut(&mut self, ctrl: Ctrl) -> &mut AnalogControl {
        &mut self.controls[ctrl.index()]
    }

    /// Re-derive every filter for a new tick rate.
    pub fn set_update_rate(&mut self, update_rate: f32) {
        for control in self.controls.iter_mut() {
            control.set_update_rate(update_rate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adc::Oversampling;
    use crate::pins::AdcChannel;

    fn close(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn constant_input_converges_and_holds() {
        static SLOT: AdcSlot = AdcSlot::new();
        SLOT.store(16384); // 0.25 full scale
        let mut ctrl = AnalogControl::new(&SLOT, 1000.0, false);

        for _ in 0..100 {
            ctrl.process();
        }
        assert!(close(ctrl.value(), 0.25, 1e-4));

        // Further ticks keep it there
        for _ in 0..1000 {
            ctrl.process();
            assert!(close(ctrl.value(), 0.25, 1e-4));
        }
    }

    #[test]
    fn flipped_control_inverts() {
        static SLOT: AdcSlot = AdcSlot::new();
        SLOT.store(16384);
        let mut ctrl = AnalogControl::new(&SLOT, 1000.0, true);
        for _ in 0..100 {
            ctrl.process();
        }
        assert!(close(ctrl.value(), 0.75, 1e-4));
    }

    #[test]
    fn smoothing_is_gradual() {
        static SLOT: AdcSlot = AdcSlot::new();
        SLOT.store(u16::MAX);
        let mut ctrl = AnalogControl::new(&SLOT, 1000.0, false);
        let first = ctrl.process();
        assert!(first > 0.0);
        assert!(first < 0.5);
        // Monotonic rise toward the target
        let second = ctrl.process();
        assert!(second > first);
    }

    #[test]
    fn smoothing_time_independent_of_rate() {
        static SLOT: AdcSlot = AdcSlot::new();
        SLOT.store(32768);

        // 10 ms of wall-clock time at 1 kHz and at 500 Hz
        let mut fast = AnalogControl::new(&SLOT, 1000.0, false);
        for _ in 0..10 {
            fast.process();
        }
        let mut slow = AnalogControl::new(&SLOT, 500.0, false);
        for _ in 0..5 {
            slow.process();
        }
        assert!(close(fast.value(), slow.value(), 1e-4));
    }

    #[test]
    fn set_update_rate_changes_coefficient() {
        static SLOT: AdcSlot = AdcSlot::new();
        let mut ctrl = AnalogControl::new(&SLOT, 1000.0, false);
        let at_1k = ctrl.coefficient();
        ctrl.set_update_rate(500.0);
        let at_500 = ctrl.coefficient();
        assert!(at_500 > at_1k);
        assert!(at_500 <= 1.0);
    }

    #[test]
    fn degenerate_rate_disables_smoothing() {
        assert_eq!(smoothing_coefficient(0.0), 1.0);
        assert_eq!(smoothing_coefficient(-5.0), 1.0);
        assert_eq!(smoothing_coefficient(f32::NAN), 1.0);
    }

    #[test]
    fn range_applied_after_flip() {
        static SLOT: AdcSlot = AdcSlot::new();
        SLOT.store(0);
        let mut ctrl = AnalogControl::new(&SLOT, 1000.0, true).with_range(2.0, -1.0);
        for _ in 0..100 {
            ctrl.process();
        }
        // flip(0.0) = 1.0 -> 1.0 * 2.0 - 1.0 = 1.0
        assert!(close(ctrl.value(), 1.0, 1e-4));
    }

    #[test]
    fn value_does_not_read_adc() {
        static SLOT: AdcSlot = AdcSlot::new();
        SLOT.store(0);
        let ctrl = AnalogControl::new(&SLOT, 1000.0, false);
        SLOT.store(40000);
        assert_eq!(ctrl.value(), 0.0);
        assert_eq!(ctrl.raw(), 40000);
    }

    struct SlotAdc {
        slots: &'static [AdcSlot; CTRL_COUNT],
    }

    impl AdcDriver for SlotAdc {
        fn configure(&mut self, _order: &[AdcChannel], _oversampling: Oversampling) {}
        fn start(&mut self) {}
        fn slot(&self, index: usize) -> &'static AdcSlot {
            &self.slots[index]
        }
    }

    #[test]
    fn bank_maps_ctrl_to_slot() {
        #[allow(clippy::declare_interior_mut_const)]
        const EMPTY: AdcSlot = AdcSlot::new();
        static SLOTS: [AdcSlot; CTRL_COUNT] = [EMPTY; CTRL_COUNT];
        SLOTS[0].store(0);
        SLOTS[1].store(16384);
        SLOTS[2].store(32768);
        SLOTS[3].store(49152);

        let adc = SlotAdc { slots: &SLOTS };
        let mut bank = AnalogControls::new(&adc, 1000.0);
        for _ in 0..200 {
            bank.process_all();
        }

        // All Patch controls are inverted
        assert!(close(bank.value(Ctrl::Ctrl1), 1.0, 1e-4));
        assert!(close(bank.value(Ctrl::Ctrl2), 0.75, 1e-4));
        assert!(close(bank.value(Ctrl::Ctrl3), 0.5, 1e-4));
        assert!(close(bank.value(Ctrl::Ctrl4), 0.25, 1e-4));
        assert_eq!(bank.control(Ctrl::Ctrl3).raw(), 32768);

        // Raw reads bypass the filter
        SLOTS[3].store(0);
        assert_eq!(bank.value_raw(Ctrl::Ctrl4), 0);
        assert!(close(bank.value(Ctrl::Ctrl4), 0.25, 1e-4));
    }

    #[test]
    fn ctrl_indices_are_dense() {
        for (i, ctrl) in Ctrl::ALL.iter().enumerate() {
            assert_eq!(ctrl.index(), i);
        }
        assert_eq!(Ctrl::COUNT, Ctrl::ALL.len());
    }
}
