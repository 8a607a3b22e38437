//! Conversion of validated raw readings into calibrated values.

use crate::sample::{Acceleration, AdcCode, AxisCounts};

/// ADXL345 scale in the default ±2 g, 10-bit range.
pub const ACCEL_LSB_PER_G: f32 = 256.0;

/// Converts one axis reading to g.
#[inline]
pub fn counts_to_g(raw: i16) -> f32 {
    f32::from(raw) / ACCEL_LSB_PER_G
}

/// Converts a raw triple to g per axis.
pub fn acceleration(raw: AxisCounts) -> Acceleration {
    Acceleration {
        x: counts_to_g(raw.x),
        y: counts_to_g(raw.y),
        z: counts_to_g(raw.z),
    }
}

/// ADC codes are published as-is; unit mapping belongs to the caller.
#[inline]
pub const fn adc_code(raw: AdcCode) -> AdcCode {
    raw
}
