//! Hue, saturation and brightness color representation.

use serde::{Deserialize, Serialize};

/// Hue, saturation and brightness color representation.
///
/// - Hue: The color angle on the color wheel (0-360 degrees)
/// - Saturation: The intensity of the color (0-100 percent)
/// - Brightness: The color value (0-100 percent)
///
/// The default is full saturation and brightness at hue 0, which is also
/// what an unreadable vendor color decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hsb {
    pub(crate) hue: u16,
    pub(crate) saturation: u8,
    pub(crate) brightness: u8,
}

impl Default for Hsb {
    fn default() -> Self {
        Hsb {
            hue: 0,
            saturation: 100,
            brightness: 100,
        }
    }
}

impl Hsb {
    const MAX_HUE: u16 = 360;
    const MAX_PERCENT: u8 = 100;

    /// Create a new Hsb with the given values.
    ///
    /// Returns `None` if values are outside valid ranges.
    ///
    /// # Examples
    ///
    /// ```
    /// use wyze_lights_rs::Hsb;
    ///
    /// assert!(Hsb::create(0, 100, 100).is_some());
    /// assert!(Hsb::create(120, 50, 10).is_some());
    /// assert!(Hsb::create(361, 50, 50).is_none());
    /// assert!(Hsb::create(180, 101, 50).is_none());
    /// assert!(Hsb::create(180, 50, 101).is_none());
    /// ```
    pub fn create(hue: u16, saturation: u8, brightness: u8) -> Option<Self> {
        if hue <= Self::MAX_HUE
            && saturation <= Self::MAX_PERCENT
            && brightness <= Self::MAX_PERCENT
        {
            Some(Hsb {
                hue,
                saturation,
                brightness,
            })
        } else {
            None
        }
    }

    /// Create an Hsb, clamping each component into its range.
    ///
    /// # Examples
    ///
    /// ```
    /// use wyze_lights_rs::Hsb;
    ///
    /// let hsb = Hsb::clamped(400, -3, 120);
    /// assert_eq!((hsb.hue(), hsb.saturation(), hsb.brightness()), (360, 0, 100));
    /// ```
    pub fn clamped(hue: i64, saturation: i64, brightness: i64) -> Self {
        let percent = |v: i64| v.clamp(0, i64::from(Self::MAX_PERCENT)) as u8;
        Hsb {
            hue: hue.clamp(0, i64::from(Self::MAX_HUE)) as u16,
            saturation: percent(saturation),
            brightness: percent(brightness),
        }
    }

    pub fn hue(&self) -> u16 {
        self.hue
    }

    pub fn saturation(&self) -> u8 {
        self.saturation
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }
}
