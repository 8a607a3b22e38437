//! ADXL345 accelerometer codec over I2C.

use embedded_hal::i2c::I2c;

use crate::calibration;
use crate::error::Result;
use crate::interface::RegisterInterface;
use crate::interface::i2c::I2cInterface;
use crate::log::{debug, warning};
use crate::params::Axis;
use crate::registers::{ADXL345_ADDRESS, PowerControl, REG_POWER_CTL, axis_register};
use crate::sample::{Acceleration, AxisCounts};
use crate::sampler::Sensor;

/// Register-level codec for one ADXL345.
///
/// Holds no bus; every operation borrows the handle owned by the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adxl345 {
    address: u8,
}

impl Default for Adxl345 {
    fn default() -> Self {
        Self::new(ADXL345_ADDRESS)
    }
}

impl Adxl345 {
    /// Creates a codec for the device at the 7-bit `address`.
    pub const fn new(address: u8) -> Self {
        Self { address }
    }

    /// Returns the 7-bit device address.
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Enables continuous measurement (`POWER_CTL = 0x08`).
    pub fn arm<I2C: I2c>(&self, i2c: &mut I2C) -> Result<(), I2C::Error> {
        I2cInterface::new(i2c, self.address).write_register(REG_POWER_CTL, PowerControl::measuring().into())?;
        Ok(())
    }

    /// Reads one axis word.
    pub fn read_axis<I2C: I2c>(&self, i2c: &mut I2C, axis: Axis) -> Result<i16, I2C::Error> {
        let word = I2cInterface::new(i2c, self.address).read_word(axis_register(axis))?;
        Ok(word as i16)
    }

    /// Reads X, Y and Z in register order.
    ///
    /// The data registers carry no status or framing bits, so every word the bus
    /// returns is accepted as-is.
    pub fn read_raw<I2C: I2c>(&self, i2c: &mut I2C) -> Result<AxisCounts, I2C::Error> {
        let mut counts = [0i16; 3];
        for axis in Axis::ALL {
            counts[axis.index()] = self.read_axis(i2c, axis)?;
        }
        Ok(AxisCounts::from_array(counts))
    }
}

impl<I2C: I2c> Sensor<I2C> for Adxl345 {
    type Raw = AxisCounts;
    type Sample = Acceleration;
    type BusError = I2C::Error;

    fn initialize(&mut self, handle: &mut I2C) -> Result<(), I2C::Error> {
        match self.arm(handle) {
            Ok(()) => {
                debug!("adxl345 {} measurement enabled", self.address);
                Ok(())
            }
            Err(err) => {
                warning!("adxl345 {} arm write failed, continuing", self.address);
                Err(err)
            }
        }
    }

    fn read_raw(&mut self, handle: &mut I2C) -> Result<AxisCounts, I2C::Error> {
        let counts = Adxl345::read_raw(self, handle)?;
        debug!("adxl345 raw x={} y={} z={}", counts.x, counts.y, counts.z);
        Ok(counts)
    }

    fn calibrate(&self, raw: AxisCounts) -> Acceleration {
        let g = calibration::acceleration(raw);
        debug!("adxl345 g x={} y={} z={}", g.x, g.y, g.z);
        g
    }
}
