//! I2C register access built on top of `embedded-hal` `I2c`.

use embedded_hal::i2c::I2c;

use super::RegisterInterface;

/// Register-addressed view of one I2C device on a borrowed bus handle.
pub struct I2cInterface<'a, I2C> {
    i2c: &'a mut I2C,
    address: u8,
}

impl<'a, I2C> I2cInterface<'a, I2C> {
    /// Creates a view of the device at the 7-bit `address`.
    pub fn new(i2c: &'a mut I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Returns the 7-bit device address.
    pub fn address(&self) -> u8 {
        self.address
    }
}

impl<I2C> RegisterInterface for I2cInterface<'_, I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        self.i2c.write(self.address, &[register, value])
    }

    fn read_word(&mut self, register: u8) -> core::result::Result<u16, Self::Error> {
        let mut word = [0u8; 2];
        self.i2c.write_read(self.address, &[register], &mut word)?;
        Ok(u16::from_le_bytes(word))
    }
}
