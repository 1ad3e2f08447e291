//! Board bring-up and the runtime facade.
//!
//! [`Platform::init`] consumes a [`Hardware`] bundle, brings every peripheral
//! up in dependency order and returns the [`Platform`] that owns them from
//! then on. There is no global instance: the application keeps the value and
//! passes it where it is needed.
//!
//! ## Initialization order
//!
//! | # | Step | Depends on |
//! |---|------|-----------|
//! | 1 | [`InitStep::SystemConfigure`] | none |
//! | 2 | [`InitStep::AudioConfig`] | clock configuration |
//! | 3 | [`InitStep::SystemInit`] | committed configuration |
//! | 4 | [`InitStep::Display`] | none |
//! | 5 | [`InitStep::CvOutputs`] | zeroed before anything else can write |
//! | 6 | [`InitStep::Encoder`] | block size (callback rate) |
//! | 7 | [`InitStep::Gates`] | none |
//! | 8 | [`InitStep::Midi`] | none |
//! | 9 | [`InitStep::Controls`] | block size, ADC channel order |
//! | 10 | [`InitStep::CodecReset`] | SAI clocks running |
//!
//! ## Per-block usage
//!
//! ```ignore
//! let mut patch = Platform::init(hardware);
//! patch.start_adc();
//! patch.start_audio(audio_callback);
//!
//! loop {
//!     // once per audio block
//!     patch.update_controls();
//!     patch.debounce_controls();
//!     let cutoff = patch.get_ctrl_value(Ctrl::Ctrl1);
//!     let turn = patch.encoder_mut().increment();
//! }
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::adc::{AdcDriver, Oversampling};
use crate::audio::{AudioCallback, AudioConfig, AudioEngine, AudioTransport, TransportConfig};
use crate::codec::Ak4556;
use crate::constants::GATE_IN_COUNT;
use crate::controls::{AnalogControls, Ctrl, Encoder, GateIn, GateInput, GateOut};
use crate::drivers::{
    CvChannel, CvOutput, DisplayDriver, DisplayPins, MidiInputMode, MidiOutputMode, MidiPort,
    SystemSupport,
};
use crate::error::Error;
use crate::pins;

/// Names the concrete driver and pin types of a board build.
pub trait Board {
    type System: SystemSupport;
    type Adc: AdcDriver;
    type Cv: CvOutput;
    type Audio: AudioTransport;
    type Display: DisplayDriver;
    type Midi: MidiPort;
    type EncoderA: InputPin;
    type EncoderB: InputPin;
    type EncoderClick: InputPin;
    type GateOut: OutputPin;
    type GateIn: InputPin;
    type CodecReset: OutputPin;
    type Delay: DelayNs;
}

/// Everything [`Platform::init`] needs, as handed over by the HAL.
///
/// Pins are expected to be configured already (inputs with pull-ups, outputs
/// push-pull, no pull), wired as listed in [`pins`].
pub struct Hardware<B: Board> {
    pub system: B::System,
    pub adc: B::Adc,
    pub cv: B::Cv,
    pub audio: B::Audio,
    pub display: B::Display,
    pub midi: B::Midi,
    /// [`pins::ENC_A`].
    pub encoder_a: B::EncoderA,
    /// [`pins::ENC_B`].
    pub encoder_b: B::EncoderB,
    /// [`pins::ENC_CLICK`].
    pub encoder_click: B::EncoderClick,
    /// [`pins::GATE_OUT`].
    pub gate_out: B::GateOut,
    /// [`pins::GATE_IN_1`], [`pins::GATE_IN_2`].
    pub gate_in: [B::GateIn; GATE_IN_COUNT],
    /// [`pins::AK4556_RESET`].
    pub codec_reset: B::CodecReset,
    pub delay: B::Delay,
}

/// Bring-up steps, in the order [`Platform::init`] runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitStep {
    SystemConfigure,
    AudioConfig,
    SystemInit,
    Display,
    CvOutputs,
    Encoder,
    Gates,
    Midi,
    Controls,
    CodecReset,
}

impl InitStep {
    pub const ORDER: [InitStep; 10] = [
        InitStep::SystemConfigure,
        InitStep::AudioConfig,
        InitStep::SystemInit,
        InitStep::Display,
        InitStep::CvOutputs,
        InitStep::Encoder,
        InitStep::Gates,
        InitStep::Midi,
        InitStep::Controls,
        InitStep::CodecReset,
    ];
}

/// Hardware fault counters. Nothing in the platform fails loudly; this is
/// where silent failures become visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Diagnostics {
    /// Failed encoder and gate pin accesses.
    pub pin_faults: u32,
    /// Failed writes to the codec reset line.
    pub codec_faults: u32,
    /// The codec reset pulse went out cleanly.
    pub codec_reset_ok: bool,
}

/// The Daisy Patch, brought up.
pub struct Platform<B: Board> {
    system: B::System,
    adc: B::Adc,
    cv: B::Cv,
    audio: B::Audio,
    display: B::Display,
    midi: B::Midi,
    codec: Ak4556<B::CodecReset>,
    delay: B::Delay,
    config: AudioConfig,
    encoder: Encoder<B::EncoderA, B::EncoderB, B::EncoderClick>,
    gate_out: GateOut<B::GateOut>,
    gate_in: [GateIn<B::GateIn>; GATE_IN_COUNT],
    controls: AnalogControls,
}

impl<B: Board> Platform<B> {
    /// Bring up every peripheral. See the [module docs](self) for the order.
    ///
    /// Blocks for the codec reset pulse (10 ms). Must finish before the audio
    /// callback or the control path runs.
    pub fn init(hardware: Hardware<B>) -> Self {
        Self::init_with(hardware, |_| {})
    }

    /// [`init`](Self::init), calling `hook` as each step begins.
    pub fn init_with<F: FnMut(InitStep)>(hardware: Hardware<B>, mut hook: F) -> Self {
        let Hardware {
            mut system,
            mut adc,
            mut cv,
            mut audio,
            mut display,
            mut midi,
            encoder_a,
            encoder_b,
            encoder_click,
            gate_out,
            gate_in,
            codec_reset,
            mut delay,
        } = hardware;

        let mut step = |s: InitStep| {
            #[cfg(feature = "defmt")]
            defmt::debug!("init: {}", s);
            hook(s);
        };

        step(InitStep::SystemConfigure);
        system.configure();

        // Block size must be fixed before anything derives timing from it
        step(InitStep::AudioConfig);
        let config = AudioConfig::new();
        audio.configure(&TransportConfig::patch());
        config.apply(&mut audio);
        let mut codec = Ak4556::new(codec_reset);

        step(InitStep::SystemInit);
        system.init();

        step(InitStep::Display);
        display.init(DisplayPins {
            data_command: pins::OLED_DC,
            reset: pins::OLED_RESET,
        });

        step(InitStep::CvOutputs);
        cv.init();
        for channel in CvChannel::ALL {
            cv.write(channel, 0);
        }

        step(InitStep::Encoder);
        let encoder = Encoder::new(encoder_a, encoder_b, encoder_click, config.callback_rate());

        step(InitStep::Gates);
        let gate_out = GateOut::new(gate_out);
        let gate_in = gate_in.map(GateIn::new);

        step(InitStep::Midi);
        midi.init(MidiInputMode::Uart1, MidiOutputMode::Uart1);

        step(InitStep::Controls);
        adc.configure(&pins::ADC_CHANNEL_ORDER, Oversampling::X32);
        let controls = AnalogControls::new(&adc, config.callback_rate());

        step(InitStep::CodecReset);
        codec.reset(&mut delay);

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Patch up: {} Hz, block {}, control rate {} Hz",
            config.sample_rate(),
            config.block_size(),
            config.callback_rate()
        );

        Platform {
            system,
            adc,
            cv,
            audio,
            display,
            midi,
            codec,
            delay,
            config,
            encoder,
            gate_out,
            gate_in,
            controls,
        }
    }

    // ── Timing ────────────────────────────────────────────────────────

    /// Blocking wait.
    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    // ── Audio ─────────────────────────────────────────────────────────

    /// Change the block size on both transport queues and re-derive control
    /// smoothing and encoder debounce timing for the new callback rate.
    ///
    /// Rejects 0 and sizes above [`MAX_BLOCK_SIZE`](crate::constants::MAX_BLOCK_SIZE);
    /// nothing changes on error.
    pub fn set_audio_block_size(&mut self, size: usize) -> Result<(), Error> {
        self.config.set_block_size(size)?;
        self.config.apply(&mut self.audio);

        let rate = self.config.callback_rate();
        self.controls.set_update_rate(rate);
        self.encoder.set_update_rate(rate);

        #[cfg(feature = "defmt")]
        defmt::debug!("block size {} -> control rate {} Hz", size, rate);
        Ok(())
    }

    /// Install `callback` on the internal engine and start streaming.
    pub fn start_audio(&mut self, callback: AudioCallback) {
        self.audio.set_callback(AudioEngine::Internal, callback);
        self.audio.start(AudioEngine::Internal);
    }

    /// Swap the running callback. Takes effect at the next block boundary.
    pub fn change_audio_callback(&mut self, callback: AudioCallback) {
        self.audio.set_callback(AudioEngine::Internal, callback);
    }

    pub fn audio_sample_rate(&self) -> f32 {
        self.config.sample_rate()
    }

    pub fn audio_block_size(&self) -> usize {
        self.config.block_size()
    }

    /// Audio callbacks per second; also the control update rate.
    pub fn audio_callback_rate(&self) -> f32 {
        self.config.callback_rate()
    }

    // ── Controls ──────────────────────────────────────────────────────

    /// Start the background ADC conversion loop. Call before the first
    /// [`update_controls`](Self::update_controls).
    pub fn start_adc(&mut self) {
        self.adc.start();
    }

    /// Advance every analog control by one tick. Call once per audio block.
    pub fn update_analog_controls(&mut self) {
        self.controls.process_all();
    }

    /// Same as [`update_analog_controls`](Self::update_analog_controls).
    pub fn update_controls(&mut self) {
        self.update_analog_controls();
    }

    /// Last smoothed value of `ctrl`, `0.0..1.0`.
    pub fn get_ctrl_value(&self, ctrl: Ctrl) -> f32 {
        self.controls.value(ctrl)
    }

    /// Advance the encoder debounce by one tick. Call once per audio block.
    pub fn debounce_controls(&mut self) {
        self.encoder.debounce();
    }

    pub fn controls(&self) -> &AnalogControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut AnalogControls {
        &mut self.controls
    }

    pub fn encoder(&self) -> &Encoder<B::EncoderA, B::EncoderB, B::EncoderClick> {
        &self.encoder
    }

    pub fn encoder_mut(&mut self) -> &mut Encoder<B::EncoderA, B::EncoderB, B::EncoderClick> {
        &mut self.encoder
    }

    // ── Gates and CV ──────────────────────────────────────────────────

    /// Instantaneous level of a gate input.
    pub fn gate_in(&mut self, gate: GateInput) -> bool {
        self.gate_in[gate.index()].state()
    }

    pub fn gate_out(&mut self) -> &mut GateOut<B::GateOut> {
        &mut self.gate_out
    }

    /// Write a raw DAC code to a CV output.
    pub fn write_cv(&mut self, channel: CvChannel, value: u16) {
        self.cv.write(channel, value);
    }

    pub fn cv(&self) -> &B::Cv {
        &self.cv
    }

    pub fn cv_mut(&mut self) -> &mut B::Cv {
        &mut self.cv
    }

    // ── Pass-through ──────────────────────────────────────────────────

    pub fn display(&self) -> &B::Display {
        &self.display
    }

    pub fn midi(&self) -> &B::Midi {
        &self.midi
    }

    pub fn display_mut(&mut self) -> &mut B::Display {
        &mut self.display
    }

    pub fn midi_mut(&mut self) -> &mut B::Midi {
        &mut self.midi
    }

    pub fn system_mut(&mut self) -> &mut B::System {
        &mut self.system
    }

    /// Fault counters accumulated since [`init`](Self::init).
    pub fn diagnostics(&self) -> Diagnostics {
        let gate_in_faults = self
            .gate_in
            .iter()
            .fold(0u32, |acc, gate| acc.saturating_add(gate.faults()));
        Diagnostics {
            pin_faults: self
                .encoder
                .faults()
                .saturating_add(self.gate_out.faults())
                .saturating_add(gate_in_faults),
            codec_faults: self.codec.faults(),
            codec_reset_ok: self.codec.reset_ok(),
        }
    }
}
