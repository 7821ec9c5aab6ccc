//! Brightness control.

use serde::{Deserialize, Serialize};

/// Brightness level from 0 to 100 percent.
///
/// The vendor API and the accessory model share this scale, so the value is
/// sent as-is without conversion.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Brightness {
    pub(crate) value: u8,
}

impl Brightness {
    const MAX: u8 = 100;

    pub fn new() -> Self {
        Brightness { value: Self::MAX }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Returns None if value is outside valid range (0-100).
    ///
    /// # Examples
    ///
    /// ```
    /// use wyze_lights_rs::Brightness;
    ///
    /// assert!(Brightness::create(0).is_some());
    /// assert!(Brightness::create(100).is_some());
    /// assert!(Brightness::create(101).is_none());
    /// ```
    pub fn create(value: u8) -> Option<Self> {
        if value <= Self::MAX {
            Some(Brightness { value })
        } else {
            None
        }
    }

    /// Clamps any integer into the valid range.
    ///
    /// # Examples
    ///
    /// ```
    /// use wyze_lights_rs::Brightness;
    ///
    /// assert_eq!(Brightness::clamped(-5).value(), 0);
    /// assert_eq!(Brightness::clamped(42).value(), 42);
    /// assert_eq!(Brightness::clamped(250).value(), 100);
    /// ```
    pub fn clamped(value: i64) -> Self {
        Brightness {
            value: value.clamp(0, i64::from(Self::MAX)) as u8,
        }
    }

    /// Decode a vendor property value such as `"75"`.
    ///
    /// Returns None when the value is not an integer.
    pub fn from_property(value: &str) -> Option<Self> {
        value.trim().parse::<i64>().ok().map(Self::clamped)
    }
}
