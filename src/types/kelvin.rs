//! Vendor color temperature.

use serde::{Deserialize, Serialize};

use crate::convert::TemperatureRange;

/// Color temperature in Kelvin as the vendor API reports it, from 1800K to
/// 6500K.
///
/// Lower values produce warmer light, higher values cooler light.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Kelvin {
    pub(crate) kelvin: u16,
}

impl Kelvin {
    const MIN: u16 = TemperatureRange::VENDOR.min;
    const MAX: u16 = TemperatureRange::VENDOR.max;

    /// Create a new Kelvin with the warmest supported value (1800K).
    pub fn new() -> Self {
        Kelvin { kelvin: Self::MIN }
    }

    pub fn kelvin(&self) -> u16 {
        self.kelvin
    }

    /// Create a new Kelvin with the given value.
    ///
    /// Returns `None` if value is outside the valid range (1800-6500).
    ///
    /// # Examples
    ///
    /// ```
    /// use wyze_lights_rs::Kelvin;
    ///
    /// assert!(Kelvin::create(1799).is_none());
    /// assert!(Kelvin::create(1800).is_some());
    /// assert!(Kelvin::create(6500).is_some());
    /// assert!(Kelvin::create(6501).is_none());
    /// ```
    pub fn create(kelvin: u16) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&kelvin) {
            Some(Kelvin { kelvin })
        } else {
            None
        }
    }

    pub fn clamped(kelvin: i64) -> Self {
        Kelvin {
            kelvin: kelvin.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u16,
        }
    }

    /// Decode a vendor property value such as `"2700"`.
    pub fn from_property(value: &str) -> Option<Self> {
        value.trim().parse::<i64>().ok().map(Self::clamped)
    }
}
