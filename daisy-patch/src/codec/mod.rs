//! Audio codec control.
//!
//! The Patch's external codec (AK4556) has no control bus: its only control
//! input is an active-low reset line, which must be pulsed once after the
//! SAI clocks are running. Sample transport is handled by
//! [`AudioTransport`](crate::audio::AudioTransport).

mod ak4556;

pub use ak4556::Ak4556;
