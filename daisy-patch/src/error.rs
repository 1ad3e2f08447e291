//! Error types for the platform facade.

use core::fmt;

/// Errors returned by [`Platform`](crate::platform::Platform) operations.
///
/// Hardware faults are not reported here; they are counted in
/// [`Diagnostics`](crate::platform::Diagnostics) instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Requested audio block size is zero or larger than the transport allows.
    InvalidBlockSize {
        /// The rejected size.
        requested: usize,
        /// Largest accepted size.
        max: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidBlockSize { requested, max } => {
                write!(f, "Invalid audio block size {} (must be 1-{})", requested, max)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::InvalidBlockSize { requested, max } => {
                defmt::write!(f, "Invalid audio block size {} (max {})", requested, max)
            }
        }
    }
}
