/// Audio sample rate in Hz (SAI2 + AK4556 at 48 kHz).
pub const AUDIO_SAMPLE_RATE: f32 = 48_000.0;

/// Samples per audio callback after [`Platform::init`](crate::platform::Platform::init).
pub const DEFAULT_BLOCK_SIZE: usize = 48;

/// Largest block size the transport queues accept.
pub const MAX_BLOCK_SIZE: usize = 256;

/// Number of analog control channels (4 knob/CV pairs).
pub const CTRL_COUNT: usize = 4;

/// Number of gate inputs.
pub const GATE_IN_COUNT: usize = 2;

/// One-pole time constant for analog control smoothing, in seconds.
pub const SMOOTHING_TIME_S: f32 = 0.002;

/// Minimum stable time before an encoder pin transition is accepted, in seconds.
pub const DEBOUNCE_TIME_S: f32 = 0.002;

/// Quadrature quarter-steps per encoder detent.
pub const STEPS_PER_DETENT: i8 = 4;

/// Minimum low time of the AK4556 reset pulse, in milliseconds.
pub const CODEC_RESET_PULSE_MS: u32 = 10;
