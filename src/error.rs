//! Error handling primitives for the sampling core.

use core::fmt;

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by a single bus transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// Any error reported by the underlying bus interface.
    Interface(E),
    /// The device answered, but the response violated the wire protocol.
    Protocol(ProtocolError),
    /// ADC channel outside `0..=7`; rejected before touching the bus.
    InvalidChannel(u8),
    /// The bus handle has already been released.
    Closed,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interface(err) => write!(f, "bus transfer failed: {err:?}"),
            Self::Protocol(err) => write!(f, "{err}"),
            Self::InvalidChannel(channel) => write!(f, "adc channel {channel} out of range 0..=7"),
            Self::Closed => f.write_str("bus handle is closed"),
        }
    }
}

/// Validation failures detected while decoding a response frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// A bit that must read back as zero was set.
    FramingMismatch,
    /// The null bit was set, the conversion is not complete yet.
    NotReady,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FramingMismatch => f.write_str("response framing mismatch"),
            Self::NotReady => f.write_str("device not ready, null bit set"),
        }
    }
}

/// The bus endpoint could not be opened; the session does not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenError<E> {
    /// Bus number that was requested.
    pub bus: u8,
    /// Device address or chip-select that was requested.
    pub address: u8,
    /// Error reported by the bus provider.
    pub source: E,
}

impl<E: fmt::Debug> fmt::Display for OpenError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to open bus {} device {:#04x}: {:?}",
            self.bus, self.address, self.source
        )
    }
}
