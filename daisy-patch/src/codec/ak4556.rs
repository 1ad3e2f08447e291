//! AK4556 reset-line driver.
//!
//! The driver is generic over any [`embedded_hal::digital::OutputPin`]; the
//! delay provider is borrowed for the duration of the pulse only.
//!
//! # Example
//!
//! ```ignore
//! let mut codec = Ak4556::new(reset_pin);
//! codec.reset(&mut delay);   // low, 10 ms, high
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::constants::CODEC_RESET_PULSE_MS;

/// AK4556 codec, controlled through its reset pin.
pub struct Ak4556<RST> {
    reset: RST,
    faults: u32,
    reset_ok: bool,
}

impl<RST: OutputPin> Ak4556<RST> {
    /// Take ownership of the (already push-pull configured) reset pin.
    /// The line is not touched until [`reset()`](Self::reset).
    pub fn new(reset: RST) -> Self {
        Ak4556 { reset, faults: 0, reset_ok: false }
    }

    /// Pulse reset: drive low, block for [`CODEC_RESET_PULSE_MS`], drive high.
    ///
    /// The codec needs a minimum low time; the wait is a plain blocking delay
    /// and cannot be cut short. A pin error is counted, not returned, and the
    /// sequence still runs to the end.
    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) {
        let before = self.faults;
        self.hold_in_reset();
        delay.delay_ms(CODEC_RESET_PULSE_MS);
        self.run();
        self.reset_ok = self.faults == before;
    }

    /// `true` once a [`reset()`](Self::reset) pulse has gone out with both
    /// edges written; cleared again by a pulse that hit a pin error.
    pub fn reset_ok(&self) -> bool {
        self.reset_ok
    }

    /// Drive the reset line low and leave it there.
    pub fn hold_in_reset(&mut self) {
        if self.reset.set_low().is_err() {
            self.fault();
        }
    }

    /// Drive the reset line high.
    pub fn run(&mut self) {
        if self.reset.set_high().is_err() {
            self.fault();
        }
    }

    /// Failed pin writes since construction.
    pub fn faults(&self) -> u32 {
        self.faults
    }

    /// Release the reset pin.
    pub fn release(self) -> RST {
        self.reset
    }

    fn fault(&mut self) {
        self.faults = self.faults.saturating_add(1);
        #[cfg(feature = "defmt")]
        defmt::warn!("AK4556 reset line write failed");
    }
}
