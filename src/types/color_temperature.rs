//! Accessory-side color temperature.

use serde::{Deserialize, Serialize};

use crate::convert::{self, TemperatureRange};
use crate::types::Kelvin;

/// Color temperature on the accessory scale (reciprocal megakelvin), from
/// 140 (coolest) to 500 (warmest).
///
/// This runs in the opposite direction of [`Kelvin`]: larger values are
/// warmer here and cooler there.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ColorTemperature {
    pub(crate) value: u16,
}

impl Default for ColorTemperature {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorTemperature {
    const MIN: u16 = TemperatureRange::NORMALIZED.max;
    const MAX: u16 = TemperatureRange::NORMALIZED.min;

    /// Create a new ColorTemperature with the coolest value (140).
    pub fn new() -> Self {
        ColorTemperature { value: Self::MIN }
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    /// Returns None if value is outside valid range (140-500).
    ///
    /// # Examples
    ///
    /// ```
    /// use wyze_lights_rs::ColorTemperature;
    ///
    /// assert!(ColorTemperature::create(139).is_none());
    /// assert!(ColorTemperature::create(140).is_some());
    /// assert!(ColorTemperature::create(500).is_some());
    /// assert!(ColorTemperature::create(501).is_none());
    /// ```
    pub fn create(value: u16) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Some(ColorTemperature { value })
        } else {
            None
        }
    }

    pub fn clamped(value: i64) -> Self {
        ColorTemperature {
            value: value.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u16,
        }
    }

    /// Convert to the vendor Kelvin scale.
    ///
    /// # Examples
    ///
    /// ```
    /// use wyze_lights_rs::ColorTemperature;
    ///
    /// assert_eq!(ColorTemperature::create(500).unwrap().to_kelvin().kelvin(), 1800);
    /// assert_eq!(ColorTemperature::create(140).unwrap().to_kelvin().kelvin(), 6500);
    /// ```
    pub fn to_kelvin(&self) -> Kelvin {
        Kelvin {
            kelvin: convert::normalized_temperature_to_vendor(self.value),
        }
    }
}

impl From<Kelvin> for ColorTemperature {
    fn from(kelvin: Kelvin) -> Self {
        ColorTemperature {
            value: convert::vendor_temperature_to_normalized(kelvin.kelvin()),
        }
    }
}

impl From<ColorTemperature> for Kelvin {
    fn from(temperature: ColorTemperature) -> Self {
        temperature.to_kelvin()
    }
}
