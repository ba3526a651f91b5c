//! Error type shared by the interfaces and both display backends.

use core::fmt;

/// Things that can go wrong while talking to a panel.
///
/// Drawing outside the canvas is never an error: out-of-range pixels are silently dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// A transfer on the SPI or I2C bus failed.
    Bus,
    /// The data/command select line could not be driven.
    DataCommand,
    /// The chip-select line could not be driven.
    ChipSelect,
    /// The reset line could not be driven.
    Reset,
    /// The monochrome controller only knows how to multiplex 32, 64 or 128 rows.
    UnsupportedHeight(u16),
    /// A command parameter was outside the range the controller accepts.
    InvalidArgument,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus => f.write_str("bus transfer failed"),
            Error::DataCommand => f.write_str("failed to drive the D/C line"),
            Error::ChipSelect => f.write_str("failed to drive the chip-select line"),
            Error::Reset => f.write_str("failed to drive the reset line"),
            Error::UnsupportedHeight(h) => write!(f, "unsupported panel height {}", h),
            Error::InvalidArgument => f.write_str("command argument out of range"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
