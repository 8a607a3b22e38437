//! SPI frame exchange built on top of `embedded-hal` `SpiDevice`.

use embedded_hal::spi::SpiDevice;

/// Full-duplex frame access over a borrowed SPI device.
pub struct SpiInterface<'a, SPI> {
    spi: &'a mut SPI,
}

impl<'a, SPI> SpiInterface<'a, SPI> {
    /// Creates a new interface from the provided SPI device abstraction.
    pub fn new(spi: &'a mut SPI) -> Self {
        Self { spi }
    }

    /// Provides mutable access to the wrapped SPI device.
    pub fn spi_mut(&mut self) -> &mut SPI {
        self.spi
    }
}

impl<SPI> SpiInterface<'_, SPI>
where
    SPI: SpiDevice,
{
    /// Clocks `request` out while clocking the same number of bytes in, inside one
    /// chip-select assertion.
    pub fn exchange<const N: usize>(&mut self, request: &[u8; N]) -> core::result::Result<[u8; N], SPI::Error> {
        let mut response = [0u8; N];
        self.spi.transfer(&mut response, request)?;
        Ok(response)
    }
}
