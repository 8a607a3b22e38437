//! Register maps and wire constants for the ADXL345 accelerometer and the MCP3008 ADC.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{AdcChannel, Axis};

// ======================================================================
// == ADXL345 ===========================================================
// ======================================================================

/// Default 7-bit I2C address (ALT ADDRESS pin tied low).
pub const ADXL345_ADDRESS: u8 = 0x53;
/// Register address of `POWER_CTL`.
pub const REG_POWER_CTL: u8 = 0x2D;
/// Register address of `DATAX0`.
pub const REG_DATAX0: u8 = 0x32;
/// Register address of `DATAY0`.
pub const REG_DATAY0: u8 = 0x34;
/// Register address of `DATAZ0`.
pub const REG_DATAZ0: u8 = 0x36;

/// First data register of each axis, indexed by [`Axis::index`].
pub const AXIS_DATA_REGISTERS: [u8; 3] = [REG_DATAX0, REG_DATAY0, REG_DATAZ0];

/// Returns the low-byte data register for `axis`.
pub const fn axis_register(axis: Axis) -> u8 {
    AXIS_DATA_REGISTERS[axis.index()]
}

/// Bitfield representation of the `POWER_CTL` register (address `0x2D`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerControl {
    // Sleep-mode reading frequency (bits 1:0).
    pub wakeup: B2,
    // Sleep mode (bit 2).
    pub sleep: bool,
    // Measurement mode (bit 3).
    pub measure: bool,
    // Auto-sleep enable (bit 4).
    pub auto_sleep: bool,
    // Activity/inactivity link (bit 5).
    pub link: bool,
    #[skip]
    __: B2,
}

impl PowerControl {
    /// `POWER_CTL` value with only the measurement bit set (`0x08`).
    pub fn measuring() -> Self {
        Self::new().with_measure(true)
    }
}

impl From<u8> for PowerControl {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<PowerControl> for u8 {
    fn from(value: PowerControl) -> Self {
        value.into_bytes()[0]
    }
}

// ======================================================================
// == MCP3008 ===========================================================
// ======================================================================

/// Length of one full-duplex conversion frame.
pub const FRAME_LEN: usize = 3;
/// First request byte: seven leading zeros and the start bit.
pub const TX_START: u8 = 0x01;
/// Third request byte, clocked only to shift the result out.
pub const TX_PADDING: u8 = 0x00;
/// Second request byte per channel: SGL/DIFF = 1, D2..D0 = channel, low nibble unused.
pub const CHANNEL_SELECT: [u8; 8] = [0x80, 0x90, 0xA0, 0xB0, 0xC0, 0xD0, 0xE0, 0xF0];

/// Default mask applied to response byte 0. The device output is high impedance
/// while this byte is clocked, so nothing is checked.
pub const RX_FRAMING_MASK: u8 = 0x00;
/// Mask that rejects any set bit in response byte 0.
pub const RX_FRAMING_MASK_STRICT: u8 = 0xFF;
/// Largest 10-bit code.
pub const ADC_CODE_MASK: u16 = 0x3FF;

/// Returns the channel-select request byte for `channel`.
pub const fn channel_select(channel: AdcChannel) -> u8 {
    CHANNEL_SELECT[channel.index()]
}

/// Bitfield view of response byte 1.
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHigh {
    // Result bits B9..B8 (bits 1:0).
    pub data_high: B2,
    // Null bit, driven low before B9 when the conversion is valid (bit 2).
    pub null_bit: bool,
    #[skip]
    __: B5,
}

impl From<u8> for ResponseHigh {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<ResponseHigh> for u8 {
    fn from(value: ResponseHigh) -> Self {
        value.into_bytes()[0]
    }
}
