//! Audio engine configuration and transport contract.
//!
//! [`AudioConfig`] owns the relationship between block size, sample rate and
//! the derived callback rate. Every control-conditioning component is
//! parameterized by [`AudioConfig::callback_rate`], so the block size is fixed
//! before any of them is built (see [`Platform::init`](crate::platform::Platform::init)).
//!
//! Sample transport itself (SAI + DMA double-buffering) lives behind
//! [`AudioTransport`].

use crate::constants::{AUDIO_SAMPLE_RATE, DEFAULT_BLOCK_SIZE, MAX_BLOCK_SIZE};
use crate::error::Error;

/// Per-block audio entry point: `(inputs, outputs)`, one slice per channel,
/// each `block_size` samples long.
pub type AudioCallback = fn(input: &[&[f32]], output: &mut [&mut [f32]]);

/// The two audio engines of the Daisy Seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEngine {
    /// SAI1, onboard codec.
    Internal,
    /// SAI2, AK4556 on the Patch.
    External,
}

/// Codec attached to a SAI block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecDevice {
    Ak4556,
}

/// SAI bit depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDepth {
    Bits16,
    Bits24,
}

/// Data direction of a SAI sub-block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Transmit,
    Receive,
}

/// SAI clock role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncConfig {
    Master,
    Slave,
}

/// Transport format for the external engine, programmed before the board
/// support package finishes bring-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportConfig {
    pub device: CodecDevice,
    pub sample_rate: f32,
    pub bit_depth: BitDepth,
    pub a_direction: Direction,
    pub b_direction: Direction,
    pub sync: SyncConfig,
}

impl TransportConfig {
    /// AK4556 on SAI2: 48 kHz, 24-bit, block A out, block B in, master clock.
    pub const fn patch() -> Self {
        TransportConfig {
            device: CodecDevice::Ak4556,
            sample_rate: AUDIO_SAMPLE_RATE,
            bit_depth: BitDepth::Bits24,
            a_direction: Direction::Transmit,
            b_direction: Direction::Receive,
            sync: SyncConfig::Master,
        }
    }
}

/// Audio transport driver (SAI + DMA).
///
/// A new callback installed with [`set_callback`](Self::set_callback) takes
/// effect at the next block boundary; only one callback is active per engine.
pub trait AudioTransport {
    /// Program the sample format for the external engine.
    fn configure(&mut self, config: &TransportConfig);

    /// Set the DMA queue depth, in samples per channel.
    fn set_block_size(&mut self, engine: AudioEngine, size: usize);

    /// Install the per-block processing callback.
    fn set_callback(&mut self, engine: AudioEngine, callback: AudioCallback);

    /// Start streaming.
    fn start(&mut self, engine: AudioEngine);
}

/// Block size / sample rate pair and the derived control callback rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioConfig {
    sample_rate: f32,
    block_size: usize,
}

impl AudioConfig {
    /// 48 kHz with the default block size.
    pub const fn new() -> Self {
        AudioConfig {
            sample_rate: AUDIO_SAMPLE_RATE,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Samples per callback.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Callbacks per second: `sample_rate / block_size`.
    pub fn callback_rate(&self) -> f32 {
        self.sample_rate / self.block_size as f32
    }

    /// Change the block size. Rejects zero and sizes above [`MAX_BLOCK_SIZE`].
    pub fn set_block_size(&mut self, size: usize) -> Result<(), Error> {
        if size == 0 || size > MAX_BLOCK_SIZE {
            return Err(Error::InvalidBlockSize {
                requested: size,
                max: MAX_BLOCK_SIZE,
            });
        }
        self.block_size = size;
        Ok(())
    }

    /// Push the block size to both transport queues.
    pub fn apply<T: AudioTransport>(&self, transport: &mut T) {
        transport.set_block_size(AudioEngine::Internal, self.block_size);
        transport.set_block_size(AudioEngine::External, self.block_size);
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self::new()
    }
}
