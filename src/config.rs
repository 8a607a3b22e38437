//! Configuration primitives for the two sampling sessions.
//!
//! Bus numbers, addresses and clocks are fixed per device variant; the defaults
//! below match the reference wiring and only need overriding on other boards.

use crate::interface::{BusSettings, Endpoint};
use crate::params::{AdcChannel, BitOrder, I2cSpeed, SpiMode};
use crate::registers::{ADXL345_ADDRESS, RX_FRAMING_MASK};

/// Default accelerometer tick period.
pub const ACCELEROMETER_INTERVAL_MS: u32 = 300;
/// Default ADC tick period.
pub const ADC_INTERVAL_MS: u32 = 50;
/// MCP3008 maximum SCLK at 5 V.
pub const MCP3008_MAX_CLOCK_HZ: u32 = 3_600_000;

/// Validation errors generated while verifying a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The tick interval is zero.
    ZeroInterval,
    /// Only 8-bit SPI words are supported by the frame codec.
    UnsupportedWordSize,
    /// SPI clock is zero or above the device limit.
    ClockOutOfRange,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ZeroInterval => f.write_str("tick interval must be non-zero"),
            Self::UnsupportedWordSize => f.write_str("only 8-bit spi words are supported"),
            Self::ClockOutOfRange => f.write_str("spi clock out of range"),
        }
    }
}

// ======================================================================
// == Accelerometer =====================================================
// ======================================================================

/// Session configuration for the ADXL345 on I2C.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelerometerConfig {
    /// I2C bus number.
    pub bus: u8,
    /// 7-bit device address.
    pub address: u8,
    /// Bus clock.
    pub speed: I2cSpeed,
    /// Tick period in milliseconds.
    pub interval_ms: u32,
}

impl AccelerometerConfig {
    /// Begins building an [`AccelerometerConfig`] using the builder pattern.
    pub fn new() -> AccelerometerConfigBuilder {
        AccelerometerConfigBuilder::new()
    }

    /// Checks whether this configuration can start a session.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        Ok(())
    }

    /// Bus endpoint opened by the session.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            bus: self.bus,
            address: self.address,
            settings: BusSettings::I2c { speed: self.speed },
        }
    }
}

impl Default for AccelerometerConfig {
    fn default() -> Self {
        Self {
            bus: 1,
            address: ADXL345_ADDRESS,
            speed: I2cSpeed::Standard,
            interval_ms: ACCELEROMETER_INTERVAL_MS,
        }
    }
}

/// Builder for [`AccelerometerConfig`].
#[derive(Debug, Clone, Copy)]
pub struct AccelerometerConfigBuilder {
    config: AccelerometerConfig,
}

impl AccelerometerConfigBuilder {
    /// Creates a new builder seeded with [`AccelerometerConfig::default()`].
    pub fn new() -> Self {
        Self {
            config: AccelerometerConfig::default(),
        }
    }

    /// Overrides the bus number.
    pub fn bus(mut self, bus: u8) -> Self {
        self.config.bus = bus;
        self
    }

    /// Overrides the device address.
    pub fn address(mut self, address: u8) -> Self {
        self.config.address = address;
        self
    }

    /// Overrides the bus clock.
    pub fn speed(mut self, speed: I2cSpeed) -> Self {
        self.config.speed = speed;
        self
    }

    /// Overrides the tick period.
    pub fn interval_ms(mut self, interval_ms: u32) -> Self {
        self.config.interval_ms = interval_ms;
        self
    }

    /// Finalizes the builder and returns the [`AccelerometerConfig`].
    pub fn build(self) -> AccelerometerConfig {
        self.config
    }
}

impl Default for AccelerometerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ======================================================================
// == ADC ===============================================================
// ======================================================================

/// Session configuration for the MCP3008 on SPI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcConfig {
    /// SPI bus number.
    pub bus: u8,
    /// Chip-select index on the bus.
    pub chip_select: u8,
    /// SCLK frequency in hertz.
    pub clock_hz: u32,
    /// Clock polarity/phase.
    pub mode: SpiMode,
    /// Wire bit order.
    pub bit_order: BitOrder,
    /// Word size in bits.
    pub bits_per_word: u8,
    /// Channel converted on every tick.
    pub channel: AdcChannel,
    /// Mask applied to response byte 0 (`0x00` ignores it).
    pub framing_mask: u8,
    /// Tick period in milliseconds.
    pub interval_ms: u32,
}

impl AdcConfig {
    /// Begins building an [`AdcConfig`] using the builder pattern.
    pub fn new() -> AdcConfigBuilder {
        AdcConfigBuilder::new()
    }

    /// Checks whether this configuration can start a session.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        if self.bits_per_word != 8 {
            return Err(ConfigError::UnsupportedWordSize);
        }

        if self.clock_hz == 0 || self.clock_hz > MCP3008_MAX_CLOCK_HZ {
            return Err(ConfigError::ClockOutOfRange);
        }

        Ok(())
    }

    /// Bus endpoint opened by the session.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            bus: self.bus,
            address: self.chip_select,
            settings: BusSettings::Spi {
                clock_hz: self.clock_hz,
                mode: self.mode,
                bit_order: self.bit_order,
                bits_per_word: self.bits_per_word,
            },
        }
    }
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            bus: 0,
            chip_select: 0,
            clock_hz: MCP3008_MAX_CLOCK_HZ,
            mode: SpiMode::Mode0,
            bit_order: BitOrder::MsbFirst,
            bits_per_word: 8,
            channel: AdcChannel::Ch0,
            framing_mask: RX_FRAMING_MASK,
            interval_ms: ADC_INTERVAL_MS,
        }
    }
}

/// Builder for [`AdcConfig`].
#[derive(Debug, Clone, Copy)]
pub struct AdcConfigBuilder {
    config: AdcConfig,
}

impl AdcConfigBuilder {
    /// Creates a new builder seeded with [`AdcConfig::default()`].
    pub fn new() -> Self {
        Self {
            config: AdcConfig::default(),
        }
    }

    /// Overrides the bus number.
    pub fn bus(mut self, bus: u8) -> Self {
        self.config.bus = bus;
        self
    }

    /// Overrides the chip-select index.
    pub fn chip_select(mut self, chip_select: u8) -> Self {
        self.config.chip_select = chip_select;
        self
    }

    /// Overrides the SCLK frequency.
    pub fn clock_hz(mut self, clock_hz: u32) -> Self {
        self.config.clock_hz = clock_hz;
        self
    }

    /// Overrides the clock polarity/phase.
    pub fn mode(mut self, mode: SpiMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Overrides the wire bit order.
    pub fn bit_order(mut self, bit_order: BitOrder) -> Self {
        self.config.bit_order = bit_order;
        self
    }

    /// Overrides the word size.
    pub fn bits_per_word(mut self, bits_per_word: u8) -> Self {
        self.config.bits_per_word = bits_per_word;
        self
    }

    /// Selects the sampled channel.
    pub fn channel(mut self, channel: AdcChannel) -> Self {
        self.config.channel = channel;
        self
    }

    /// Sets the mask applied to response byte 0.
    pub fn framing_mask(mut self, framing_mask: u8) -> Self {
        self.config.framing_mask = framing_mask;
        self
    }

    /// Overrides the tick period.
    pub fn interval_ms(mut self, interval_ms: u32) -> Self {
        self.config.interval_ms = interval_ms;
        self
    }

    /// Finalizes the builder and returns the [`AdcConfig`].
    pub fn build(self) -> AdcConfig {
        self.config
    }
}

impl Default for AdcConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
