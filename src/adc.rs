//! MCP3008 10-bit ADC codec over SPI.
//!
//! One conversion is a single 3-byte full-duplex frame:
//!
//! ```text
//! MOSI  0000_0001  SDDD_xxxx  xxxx_xxxx
//! MISO  ????_????  ????_?0BB  BBBB_BBBB
//! ```
//!
//! `S` selects single-ended mode, `DDD` the channel, `0` is the null bit and `B` the
//! ten result bits, most significant first.

use embedded_hal::spi::SpiDevice;

use crate::calibration;
use crate::error::{Error, ProtocolError, Result};
use crate::interface::spi::SpiInterface;
use crate::log::debug;
use crate::params::AdcChannel;
use crate::registers::{
    ADC_CODE_MASK, FRAME_LEN, RX_FRAMING_MASK, ResponseHigh, TX_PADDING, TX_START,
    channel_select,
};
use crate::sample::AdcCode;
use crate::sampler::Sensor;

/// Builds the request frame for `channel`.
pub const fn encode_request(channel: AdcChannel) -> [u8; FRAME_LEN] {
    [TX_START, channel_select(channel), TX_PADDING]
}

/// Validates a response frame and extracts the 10-bit code.
///
/// Byte 0 must be zero under `framing_mask`; the null bit in byte 1 must be clear.
pub fn decode_response(frame: [u8; FRAME_LEN], framing_mask: u8) -> core::result::Result<AdcCode, ProtocolError> {
    if frame[0] & framing_mask != 0 {
        return Err(ProtocolError::FramingMismatch);
    }

    let high = ResponseHigh::from(frame[1]);
    if high.null_bit() {
        return Err(ProtocolError::NotReady);
    }

    let code = (u16::from(high.data_high()) << 8) | u16::from(frame[2]);
    debug_assert!(code <= ADC_CODE_MASK);
    Ok(code & ADC_CODE_MASK)
}

/// Frame codec for one MCP3008.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mcp3008 {
    channel: AdcChannel,
    framing_mask: u8,
}

impl Default for Mcp3008 {
    fn default() -> Self {
        Self::new(AdcChannel::Ch0)
    }
}

impl Mcp3008 {
    /// Creates a codec sampling `channel`, ignoring response byte 0.
    pub const fn new(channel: AdcChannel) -> Self {
        Self {
            channel,
            framing_mask: RX_FRAMING_MASK,
        }
    }

    /// Replaces the mask applied to response byte 0.
    pub const fn with_framing_mask(mut self, framing_mask: u8) -> Self {
        self.framing_mask = framing_mask;
        self
    }

    /// Channel converted on every tick.
    pub const fn channel(&self) -> AdcChannel {
        self.channel
    }

    /// Mask applied to response byte 0.
    pub const fn framing_mask(&self) -> u8 {
        self.framing_mask
    }

    /// Converts `channel` (`0..=7`).
    ///
    /// An out-of-range channel returns [`Error::InvalidChannel`] without touching the bus.
    pub fn read_raw<SPI: SpiDevice>(&self, spi: &mut SPI, channel: u8) -> Result<AdcCode, SPI::Error> {
        let channel = AdcChannel::try_from(channel).map_err(Error::InvalidChannel)?;
        self.read_channel(spi, channel)
    }

    /// Converts a channel that is already known to be valid.
    pub fn read_channel<SPI: SpiDevice>(&self, spi: &mut SPI, channel: AdcChannel) -> Result<AdcCode, SPI::Error> {
        let response = SpiInterface::new(spi).exchange(&encode_request(channel))?;
        decode_response(response, self.framing_mask).map_err(Error::Protocol)
    }
}

impl<SPI: SpiDevice> Sensor<SPI> for Mcp3008 {
    type Raw = AdcCode;
    type Sample = AdcCode;
    type BusError = SPI::Error;

    fn initialize(&mut self, _handle: &mut SPI) -> Result<(), SPI::Error> {
        Ok(())
    }

    fn read_raw(&mut self, handle: &mut SPI) -> Result<AdcCode, SPI::Error> {
        let code = self.read_channel(handle, self.channel)?;
        debug!("mcp3008 ch{} code {}", self.channel as u8, code);
        Ok(code)
    }

    fn calibrate(&self, raw: AdcCode) -> AdcCode {
        calibration::adc_code(raw)
    }
}
