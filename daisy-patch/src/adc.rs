//! ADC driver contract and the shared raw-sample slot.
//!
//! The ADC driver runs a continuous, DMA-fed conversion loop and writes the
//! oversampled result for each configured channel into an [`AdcSlot`].
//! [`AnalogControl`](crate::controls::AnalogControl) holds a reference to its
//! slot and reads it once per control tick.
//!
//! # Sharing contract
//!
//! - Only the ADC driver (interrupt / DMA-complete context) calls
//!   [`store()`](AdcSlot::store).
//! - Only the main control path calls [`load()`](AdcSlot::load).
//! - The value may be one conversion stale; it is never torn.

use core::sync::atomic::{AtomicU16, Ordering};

use crate::pins::AdcChannel;

/// Single-writer, single-reader cell holding the latest oversampled
/// conversion for one channel, left-justified to 16 bits.
pub struct AdcSlot {
    raw: AtomicU16,
}

impl AdcSlot {
    /// A slot reading zero until the first conversion lands.
    pub const fn new() -> Self {
        AdcSlot {
            raw: AtomicU16::new(0),
        }
    }

    /// Publish a new conversion (producer side).
    #[inline]
    pub fn store(&self, raw: u16) {
        self.raw.store(raw, Ordering::Relaxed);
    }

    /// Read the latest conversion (consumer side). Never blocks.
    #[inline]
    pub fn load(&self) -> u16 {
        self.raw.load(Ordering::Relaxed)
    }
}

impl Default for AdcSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Hardware oversampling ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Oversampling {
    None,
    X4,
    X8,
    X16,
    X32,
    X64,
}

impl Oversampling {
    /// Conversions averaged per reported sample.
    pub const fn ratio(self) -> u32 {
        match self {
            Oversampling::None => 1,
            Oversampling::X4 => 4,
            Oversampling::X8 => 8,
            Oversampling::X16 => 16,
            Oversampling::X32 => 32,
            Oversampling::X64 => 64,
        }
    }
}

/// Continuous-conversion ADC driver.
pub trait AdcDriver {
    /// Set the conversion sequence. Slot `i` receives channel `order[i]`.
    fn configure(&mut self, order: &[AdcChannel], oversampling: Oversampling);

    /// Start the background conversion loop.
    fn start(&mut self);

    /// The slot continuously updated for sequence position `index`.
    fn slot(&self, index: usize) -> &'static AdcSlot;
}
