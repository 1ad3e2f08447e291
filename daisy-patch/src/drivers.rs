//! Contracts for the collaborators the platform brings up but does not
//! implement: board support, CV DAC, display and MIDI UART.
//!
//! GPIO and delays use the `embedded-hal` traits directly; ADC and audio
//! transport contracts live in [`adc`](crate::adc) and [`audio`](crate::audio).
//! All of these are synchronous and report no errors: a peripheral that does
//! not respond shows up as silent malfunction, not as a value.

use crate::pins::PinId;

/// Clock tree and board support package.
pub trait SystemSupport {
    /// Commit clock and bus configuration. Runs before any peripheral setup.
    fn configure(&mut self);

    /// Finish low-level bring-up using the committed configuration.
    fn init(&mut self);
}

/// DAC output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvChannel {
    One,
    Two,
}

impl CvChannel {
    pub const ALL: [CvChannel; 2] = [CvChannel::One, CvChannel::Two];
}

/// Two-channel CV output (12-bit DAC).
pub trait CvOutput {
    /// Enable both channels.
    fn init(&mut self);

    /// Write a raw DAC code.
    fn write(&mut self, channel: CvChannel, value: u16);
}

/// Control pins of the SSD1309 OLED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayPins {
    pub data_command: PinId,
    pub reset: PinId,
}

/// OLED display. Rendering is outside this crate.
pub trait DisplayDriver {
    fn init(&mut self, pins: DisplayPins);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiInputMode {
    None,
    Uart1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiOutputMode {
    None,
    Uart1,
}

/// Serial MIDI port. Message parsing is outside this crate.
pub trait MidiPort {
    fn init(&mut self, input: MidiInputMode, output: MidiOutputMode);
}
