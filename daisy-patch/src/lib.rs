//! # daisy-patch
//!
//! A `no_std`, zero-allocation bring-up and control-conditioning layer for
//! the [Electrosmith Daisy Patch](https://electro-smith.com/products/patch)
//! (Daisy Seed, STM32H750) written in pure Rust.
//!
//! It brings the Patch's peripherals up in the order their shared clocks and
//! pins require, then conditions the control inputs once per audio block so
//! the rest of the firmware reads stable values at a rate tied to the audio
//! engine.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Config | [`constants`] / [`pins`] | Rates, timing constants, pin map, ADC order |
//! | Contracts | [`drivers`] / [`adc`] / [`audio`] | Collaborator traits, ADC slot, block size |
//! | Codec | [`codec`] | AK4556 reset pulse |
//! | Controls | [`controls`] | Smoothed knobs/CV, debounced encoder, gates |
//! | Facade | [`platform`] | Ordered bring-up and per-block operations |
//!
//! Low-level drivers (SAI/DMA transport, ADC/DAC registers, OLED rendering,
//! MIDI parsing) are not part of this crate; they are plugged in through the
//! traits in [`drivers`], [`adc`] and [`audio`] and the `embedded-hal` pin and
//! delay traits, collected by a [`platform::Board`] implementation.
//!
//! ## Quick start
//!
//! ```ignore
//! use daisy_patch::controls::Ctrl;
//! use daisy_patch::platform::{Hardware, Platform};
//!
//! let mut patch = Platform::init(Hardware::<MyBoard> { /* HAL objects */ });
//! patch.start_adc();
//! patch.start_audio(process_block);
//!
//! // Once per audio block:
//! patch.update_controls();
//! patch.debounce_controls();
//! let level = patch.get_ctrl_value(Ctrl::Ctrl1);
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `defmt` | no | Bring-up and fault logging, `defmt::Format` on public types |
//!
//! ## Timing
//!
//! - **Sample rate:** 48 kHz ([`constants::AUDIO_SAMPLE_RATE`])
//! - **Block size:** 48 samples by default ([`constants::DEFAULT_BLOCK_SIZE`])
//! - **Control rate:** sample rate / block size (1 kHz by default)

#![no_std]

pub mod constants;
pub mod pins;
pub mod error;
pub mod drivers;
pub mod adc;
pub mod audio;
pub mod codec;
pub mod controls;
pub mod platform;

pub use error::Error;
pub use platform::{Board, Diagnostics, Hardware, InitStep, Platform};
