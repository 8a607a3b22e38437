#![no_std]

#[cfg(any(test, feature = "linux"))]
extern crate std;

mod error;

pub mod accelerometer;
pub mod adc;
pub mod calibration;
pub mod config;
pub mod interface;
mod log;
pub mod params;
pub mod registers;
pub mod sample;
pub mod sampler;
#[cfg(test)]
mod testing;

pub use crate::accelerometer::Adxl345;
pub use crate::adc::Mcp3008;
pub use crate::error::{Error, OpenError, ProtocolError, Result};
pub use crate::sampler::{
    AccelerometerSampler, AdcSampler, FailureKind, SampleSink, Sampler, Sensor, SessionState, TickOutcome,
};
