//! Bus handle lifecycle and the low-level access helpers used by the codecs.

pub mod i2c;
#[cfg(feature = "linux")]
pub mod linux;
pub mod spi;

use crate::error::{Error, OpenError};
use crate::log::debug;
use crate::params::{BitOrder, I2cSpeed, SpiMode};

/// Bus-specific settings applied when an endpoint is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusSettings {
    /// Register-addressed I2C device.
    I2c {
        /// Bus clock.
        speed: I2cSpeed,
    },
    /// Full-duplex SPI device.
    Spi {
        /// SCLK frequency in hertz.
        clock_hz: u32,
        /// Clock polarity/phase.
        mode: SpiMode,
        /// Wire bit order.
        bit_order: BitOrder,
        /// Word size in bits.
        bits_per_word: u8,
    },
}

/// Identifies one device on one bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Endpoint {
    /// Bus number (`/dev/i2c-N`, `/dev/spidevN.x`).
    pub bus: u8,
    /// 7-bit I2C address, or SPI chip-select index.
    pub address: u8,
    /// Settings applied on open.
    pub settings: BusSettings,
}

/// Source of bus handles.
///
/// Implementations acquire the OS or HAL resource on [`open`](Self::open) and
/// release it on [`close`](Self::close). The returned handle implements the
/// `embedded-hal` transfer trait the codec needs (`I2c` or `SpiDevice`).
pub trait BusProvider {
    /// Opened device handle.
    type Handle;
    /// Error produced when the endpoint is unavailable.
    type Error: core::fmt::Debug;

    /// Acquires exclusive access to `endpoint`.
    fn open(&mut self, endpoint: &Endpoint) -> core::result::Result<Self::Handle, Self::Error>;

    /// Releases a handle previously returned by [`open`](Self::open).
    fn close(&mut self, handle: Self::Handle) {
        drop(handle);
    }
}

impl<P: BusProvider + ?Sized> BusProvider for &mut P {
    type Handle = P::Handle;
    type Error = P::Error;

    fn open(&mut self, endpoint: &Endpoint) -> core::result::Result<Self::Handle, Self::Error> {
        (**self).open(endpoint)
    }

    fn close(&mut self, handle: Self::Handle) {
        (**self).close(handle);
    }
}

/// An opened bus endpoint with explicit open/closed state.
///
/// The handle cannot be reached once closed, and closing twice is a no-op.
pub struct BusHandle<H> {
    endpoint: Endpoint,
    device: Option<H>,
}

impl<H> BusHandle<H> {
    /// Opens `endpoint` through `provider`.
    pub fn open<P>(provider: &mut P, endpoint: Endpoint) -> core::result::Result<Self, OpenError<P::Error>>
    where
        P: BusProvider<Handle = H>,
    {
        let device = provider.open(&endpoint).map_err(|source| OpenError {
            bus: endpoint.bus,
            address: endpoint.address,
            source,
        })?;

        debug!("bus {} device {} opened", endpoint.bus, endpoint.address);
        Ok(Self {
            endpoint,
            device: Some(device),
        })
    }

    /// Returns the endpoint this handle was opened for.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns `true` until [`close`](Self::close) has been called.
    pub fn is_open(&self) -> bool {
        self.device.is_some()
    }

    /// Provides mutable access to the device for one transaction.
    pub fn device_mut<E>(&mut self) -> core::result::Result<&mut H, Error<E>> {
        self.device.as_mut().ok_or(Error::Closed)
    }

    /// Returns the device to `provider`. Idempotent.
    pub fn close<P>(&mut self, provider: &mut P)
    where
        P: BusProvider<Handle = H>,
    {
        if let Some(device) = self.device.take() {
            provider.close(device);
            debug!("bus {} device {} closed", self.endpoint.bus, self.endpoint.address);
        }
    }
}

/// Register-level access required by register-mapped devices.
pub trait RegisterInterface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Writes a single register.
    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error>;

    /// Reads a 16-bit little-endian word starting at `register`.
    fn read_word(&mut self, register: u8) -> core::result::Result<u16, Self::Error>;
}
