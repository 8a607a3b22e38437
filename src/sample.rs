//! Raw and calibrated sample types.

/// Raw accelerometer counts, one signed word per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisCounts {
    /// X-axis reading.
    pub x: i16,
    /// Y-axis reading.
    pub y: i16,
    /// Z-axis reading.
    pub z: i16,
}

impl AxisCounts {
    /// Builds counts from an `[x, y, z]` array.
    pub const fn from_array([x, y, z]: [i16; 3]) -> Self {
        Self { x, y, z }
    }

    /// Returns the counts as `[x, y, z]`.
    pub const fn to_array(self) -> [i16; 3] {
        [self.x, self.y, self.z]
    }
}

/// Acceleration in g.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Acceleration {
    /// X-axis acceleration.
    pub x: f32,
    /// Y-axis acceleration.
    pub y: f32,
    /// Z-axis acceleration.
    pub z: f32,
}

/// A 10-bit ADC conversion result in `0..=1023`.
pub type AdcCode = u16;
