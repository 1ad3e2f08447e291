//! Daisy Patch pin map and ADC channel ordering.
//!
//! Pin numbers refer to the Daisy Seed header. The live GPIO objects are
//! created by the HAL and handed to [`Hardware`](crate::platform::Hardware);
//! these constants describe where each of them is wired, and are passed
//! through to collaborators that take raw pin numbers (display, MIDI).

/// A Daisy Seed header pin number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinId(pub u8);

impl PinId {
    /// Header pin number.
    pub const fn number(self) -> u8 {
        self.0
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PinId {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "D{}", self.0)
    }
}

// ── Controls ──────────────────────────────────────────────────────────────

/// Encoder push switch, active low.
pub const ENC_CLICK: PinId = PinId(0);
/// Encoder quadrature line B, active low.
pub const ENC_B: PinId = PinId(11);
/// Encoder quadrature line A, active low.
pub const ENC_A: PinId = PinId(12);

// ── Display ───────────────────────────────────────────────────────────────

/// OLED data/command select.
pub const OLED_DC: PinId = PinId(9);
/// OLED reset.
pub const OLED_RESET: PinId = PinId(30);

// ── MIDI (UART1) ──────────────────────────────────────────────────────────

/// UART1 TX.
pub const MIDI_OUT: PinId = PinId(13);
/// UART1 RX.
pub const MIDI_IN: PinId = PinId(14);

// ── Gates ─────────────────────────────────────────────────────────────────

/// Gate output, push-pull.
pub const GATE_OUT: PinId = PinId(17);
/// Gate input 1. The input stage inverts.
pub const GATE_IN_1: PinId = PinId(20);
/// Gate input 2. The input stage inverts.
pub const GATE_IN_2: PinId = PinId(19);

// ── SAI2 (external codec) ─────────────────────────────────────────────────

// Driven by the audio transport, not by this crate.

pub const SAI2_MCLK: PinId = PinId(24);
pub const SAI2_SD_B: PinId = PinId(25);
pub const SAI2_SD_A: PinId = PinId(26);
pub const SAI2_FS_A: PinId = PinId(27);
pub const SAI2_SCK_A: PinId = PinId(28);

/// AK4556 active-low reset line.
pub const AK4556_RESET: PinId = PinId(29);

// ── ADC ───────────────────────────────────────────────────────────────────

/// An STM32H7 ADC input channel number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdcChannel(pub u8);

#[cfg(feature = "defmt")]
impl defmt::Format for AdcChannel {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ADC_CHN{}", self.0)
    }
}

/// Conversion order of the analog controls. Slot `i` of the ADC driver holds
/// the sample for `Ctrl` index `i`.
pub const ADC_CHANNEL_ORDER: [AdcChannel; crate::constants::CTRL_COUNT] = [
    AdcChannel(10), // CTRL_1
    AdcChannel(15), // CTRL_2
    AdcChannel(4),  // CTRL_3
    AdcChannel(7),  // CTRL_4
];
