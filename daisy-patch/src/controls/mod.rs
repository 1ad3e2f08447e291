//! Conditioned control inputs.
//!
//! | Input | Type | Conditioning |
//! |-------|------|--------------|
//! | Knobs / CV in | [`AnalogControls`] | Oversampled ADC, one-pole smoothing |
//! | Encoder + click | [`Encoder`] | Per-pin debounce, quadrature decode |
//! | Gate in 1/2 | [`GateIn`] | None (instantaneous level) |
//! | Gate out | [`GateOut`] | None |
//!
//! Everything here is driven once per audio block by
//! [`Platform`](crate::platform::Platform) and never blocks.
//!
//! Pin errors are not propagated: a failed read or write is counted and the
//! component carries on with its last known state.

pub mod analog;
pub mod debounce;
pub mod encoder;
pub mod gate;

pub use analog::{AnalogControl, AnalogControls, Ctrl};
pub use debounce::{Debouncer, Level};
pub use encoder::Encoder;
pub use gate::{GateIn, GateInput, GateOut};

use embedded_hal::digital::InputPin;

/// Sample `pin`, counting a failed read in `faults`.
pub(crate) fn read_high<P: InputPin>(pin: &mut P, faults: &mut u32) -> Option<bool> {
    match pin.is_high() {
        Ok(high) => Some(high),
        Err(_) => {
            *faults = faults.saturating_add(1);
            #[cfg(feature = "defmt")]
            defmt::warn!("pin read failed ({} faults)", *faults);
            None
        }
    }
}
