//! Bus providers backed by Linux `i2c-dev` and `spidev` character devices.

use std::format;
use std::io;

use linux_embedded_hal::i2cdev::linux::LinuxI2CError;
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{I2cdev, SPIError, SpidevDevice};

use super::{BusProvider, BusSettings, Endpoint};
use crate::params::{BitOrder, SpiMode};

/// Why a Linux bus endpoint could not be opened.
#[derive(Debug)]
pub enum LinuxOpenError {
    /// `/dev/i2c-N` could not be opened.
    I2c(LinuxI2CError),
    /// `/dev/spidevB.C` could not be opened.
    Spi(SPIError),
    /// The spidev node rejected the requested settings.
    Configure(io::Error),
    /// The endpoint carries settings for a different bus type.
    WrongBus,
}

/// Opens `/dev/i2c-{bus}`. The device address is sent with every transaction.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinuxI2cProvider;

impl BusProvider for LinuxI2cProvider {
    type Handle = I2cdev;
    type Error = LinuxOpenError;

    fn open(&mut self, endpoint: &Endpoint) -> Result<I2cdev, LinuxOpenError> {
        // i2c-dev has no per-handle clock control; the bus speed is set by the kernel.
        let BusSettings::I2c { .. } = endpoint.settings else {
            return Err(LinuxOpenError::WrongBus);
        };

        I2cdev::new(format!("/dev/i2c-{}", endpoint.bus)).map_err(LinuxOpenError::I2c)
    }
}

/// Opens `/dev/spidev{bus}.{chip_select}` and applies the endpoint's SPI settings.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinuxSpiProvider;

impl BusProvider for LinuxSpiProvider {
    type Handle = SpidevDevice;
    type Error = LinuxOpenError;

    fn open(&mut self, endpoint: &Endpoint) -> Result<SpidevDevice, LinuxOpenError> {
        let BusSettings::Spi {
            clock_hz,
            mode,
            bit_order,
            bits_per_word,
        } = endpoint.settings
        else {
            return Err(LinuxOpenError::WrongBus);
        };

        let mut device = SpidevDevice::open(format!("/dev/spidev{}.{}", endpoint.bus, endpoint.address))
            .map_err(LinuxOpenError::Spi)?;

        let options = SpidevOptions::new()
            .bits_per_word(bits_per_word)
            .max_speed_hz(clock_hz)
            .lsb_first(bit_order == BitOrder::LsbFirst)
            .mode(mode_flags(mode))
            .build();
        device.0.configure(&options).map_err(LinuxOpenError::Configure)?;

        Ok(device)
    }
}

fn mode_flags(mode: SpiMode) -> SpiModeFlags {
    match mode {
        SpiMode::Mode0 => SpiModeFlags::SPI_MODE_0,
        SpiMode::Mode1 => SpiModeFlags::SPI_MODE_1,
        SpiMode::Mode2 => SpiModeFlags::SPI_MODE_2,
        SpiMode::Mode3 => SpiModeFlags::SPI_MODE_3,
    }
}
