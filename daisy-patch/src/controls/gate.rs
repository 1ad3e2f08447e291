//! Gate jacks: one push-pull output, two inputs.
//!
//! Neither side keeps history or debounces. Callers that need edges compare
//! successive [`GateIn::state`] reads themselves.

use embedded_hal::digital::{InputPin, OutputPin, PinState};

use super::read_high;

/// Gate input jacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateInput {
    In1 = 0,
    In2 = 1,
}

impl GateInput {
    pub const ALL: [GateInput; crate::constants::GATE_IN_COUNT] = [GateInput::In1, GateInput::In2];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A gate input behind the Patch's inverting input stage: a low pin is a
/// high gate.
pub struct GateIn<P> {
    pin: P,
    faults: u32,
}

impl<P: InputPin> GateIn<P> {
    pub fn new(pin: P) -> Self {
        GateIn { pin, faults: 0 }
    }

    /// Instantaneous gate level. A failed read reports the gate as low.
    pub fn state(&mut self) -> bool {
        match read_high(&mut self.pin, &mut self.faults) {
            Some(high) => !high,
            None => false,
        }
    }

    /// Failed pin reads since construction.
    pub fn faults(&self) -> u32 {
        self.faults
    }

    pub fn release(self) -> P {
        self.pin
    }
}

/// Push-pull gate output.
pub struct GateOut<P> {
    pin: P,
    level: bool,
    faults: u32,
}

impl<P: OutputPin> GateOut<P> {
    /// Takes the pin as configured; nothing is written until [`write`](Self::write).
    pub fn new(pin: P) -> Self {
        GateOut {
            pin,
            level: false,
            faults: 0,
        }
    }

    /// Drive the gate high or low immediately.
    pub fn write(&mut self, level: bool) {
        if self.pin.set_state(PinState::from(level)).is_err() {
            self.faults = self.faults.saturating_add(1);
            #[cfg(feature = "defmt")]
            defmt::warn!("gate out write failed ({} faults)", self.faults);
        }
        self.level = level;
    }

    /// Last level passed to [`write`](Self::write).
    pub fn level(&self) -> bool {
        self.level
    }

    /// Failed pin writes since construction.
    pub fn faults(&self) -> u32 {
        self.faults
    }

    pub fn release(self) -> P {
        self.pin
    }
}
