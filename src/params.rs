//! Strongly typed parameter enumerations shared by both device variants.
//!
//! These map directly to datasheet or bus-driver encodings and are used across
//! [`config`](crate::config) and the codecs. Prefer these types over raw integers
//! to keep configuration values valid and explicit.
//!
//! # Examples
//!
//! ```rust
//! use sensor_sampler::params::{AdcChannel, BitOrder, SpiMode};
//!
//! let channel = AdcChannel::try_from(3).unwrap();
//! assert_eq!(channel, AdcChannel::Ch3);
//! let _ = (SpiMode::Mode0, BitOrder::MsbFirst);
//! ```

/// Single-ended MCP3008 input channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AdcChannel {
    /// CH0.
    Ch0 = 0,
    /// CH1.
    Ch1 = 1,
    /// CH2.
    Ch2 = 2,
    /// CH3.
    Ch3 = 3,
    /// CH4.
    Ch4 = 4,
    /// CH5.
    Ch5 = 5,
    /// CH6.
    Ch6 = 6,
    /// CH7.
    Ch7 = 7,
}

impl AdcChannel {
    /// All channels in index order.
    pub const ALL: [Self; 8] = [
        Self::Ch0,
        Self::Ch1,
        Self::Ch2,
        Self::Ch3,
        Self::Ch4,
        Self::Ch5,
        Self::Ch6,
        Self::Ch7,
    ];

    /// Returns the zero-based channel index.
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for AdcChannel {
    /// The rejected channel number.
    type Error = u8;

    fn try_from(value: u8) -> core::result::Result<Self, Self::Error> {
        Self::ALL.get(value as usize).copied().ok_or(value)
    }
}

impl From<AdcChannel> for u8 {
    fn from(value: AdcChannel) -> Self {
        value as u8
    }
}

/// Accelerometer axes in register order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

impl Axis {
    /// All axes in the order they are read from the device.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Returns the zero-based axis index.
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// SPI clock polarity/phase selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiMode {
    /// CPOL = 0, CPHA = 0.
    Mode0,
    /// CPOL = 0, CPHA = 1.
    Mode1,
    /// CPOL = 1, CPHA = 0.
    Mode2,
    /// CPOL = 1, CPHA = 1.
    Mode3,
}

/// Bit order on the SPI wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Most significant bit first.
    MsbFirst,
    /// Least significant bit first.
    LsbFirst,
}

/// I2C bus clock selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cSpeed {
    /// 100 kHz standard mode.
    Standard,
    /// 400 kHz fast mode.
    Fast,
}

impl I2cSpeed {
    /// Returns the bus clock in hertz.
    pub const fn hz(self) -> u32 {
        match self {
            Self::Standard => 100_000,
            Self::Fast => 400_000,
        }
    }
}
