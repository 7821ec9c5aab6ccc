//! Conversions between vendor units and accessory units.
//!
//! Every function here is total: out-of-range input is clamped and
//! unreadable input decodes to a fixed default, so callers never deal with
//! an error path.

use crate::types::Hsb;

/// Prefix written in front of a packed color. The vendor ignores it.
pub const PACKED_COLOR_PREFIX: &str = "000000";

/// Packed color used when the vendor reports nothing usable.
pub const DEFAULT_PACKED_COLOR: &str = "0000000000ffff";

const PACKED_COLOR_SUFFIX_LEN: usize = 8;
const CHANNEL_SCALE: f64 = 2.55;

/// A color temperature scale as an interval from `min` to `max`.
///
/// `min` may be larger than `max`; the accessory scale is inverted relative
/// to the vendor one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureRange {
    pub min: u16,
    pub max: u16,
}

impl TemperatureRange {
    /// Vendor color temperature in Kelvin.
    pub const VENDOR: Self = Self {
        min: 1800,
        max: 6500,
    };

    /// Accessory color temperature, warmest first.
    pub const NORMALIZED: Self = Self { min: 500, max: 140 };

    fn to_fraction(self, value: u16) -> f64 {
        let span = f64::from(self.max) - f64::from(self.min);
        if span == 0.0 {
            return 0.0;
        }
        ((f64::from(value) - f64::from(self.min)) / span).clamp(0.0, 1.0)
    }

    fn from_fraction(self, fraction: f64) -> u16 {
        let span = f64::from(self.max) - f64::from(self.min);
        (fraction * span + f64::from(self.min)).round() as u16
    }
}

/// Map `value` from one temperature scale onto another.
///
/// # Examples
///
/// ```
/// use wyze_lights_rs::convert::{convert_temperature, TemperatureRange};
///
/// let mid = convert_temperature(4150, TemperatureRange::VENDOR, TemperatureRange::NORMALIZED);
/// assert_eq!(mid, 320);
/// ```
pub fn convert_temperature(value: u16, from: TemperatureRange, to: TemperatureRange) -> u16 {
    to.from_fraction(from.to_fraction(value))
}

/// Vendor Kelvin to the accessory scale. 1800 maps to 500 and 6500 to 140.
pub fn vendor_temperature_to_normalized(raw: u16) -> u16 {
    convert_temperature(raw, TemperatureRange::VENDOR, TemperatureRange::NORMALIZED)
}

/// Accessory scale to vendor Kelvin. 500 maps to 1800 and 140 to 6500.
pub fn normalized_temperature_to_vendor(value: u16) -> u16 {
    convert_temperature(value, TemperatureRange::NORMALIZED, TemperatureRange::VENDOR)
}

/// Decode a vendor packed color.
///
/// The last eight hex digits carry hue (four digits, 0-360), saturation and
/// brightness (two digits each, 0-255). Anything before them is ignored.
/// Missing or malformed input decodes to hue 0 at full saturation and
/// brightness.
///
/// # Examples
///
/// ```
/// use wyze_lights_rs::convert::packed_color_to_hsb;
///
/// let hsb = packed_color_to_hsb(Some("000000007880ff"));
/// assert_eq!((hsb.hue(), hsb.saturation(), hsb.brightness()), (120, 50, 100));
///
/// let fallback = packed_color_to_hsb(None);
/// assert_eq!((fallback.hue(), fallback.saturation(), fallback.brightness()), (0, 100, 100));
/// ```
pub fn packed_color_to_hsb(value: Option<&str>) -> Hsb {
    value
        .and_then(decode_packed_color)
        .unwrap_or_default()
}

fn decode_packed_color(value: &str) -> Option<Hsb> {
    let start = value.len().checked_sub(PACKED_COLOR_SUFFIX_LEN)?;
    let suffix = value.get(start..)?;
    if !suffix.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let hue = u16::from_str_radix(&suffix[0..4], 16).ok()?;
    let saturation = u8::from_str_radix(&suffix[4..6], 16).ok()?;
    let brightness = u8::from_str_radix(&suffix[6..8], 16).ok()?;

    Some(Hsb::clamped(
        i64::from(hue),
        channel_to_percent(saturation),
        channel_to_percent(brightness),
    ))
}

/// Pack hue, saturation and brightness into the vendor color encoding.
///
/// Inverse of [`packed_color_to_hsb`] for in-range values.
///
/// # Examples
///
/// ```
/// use wyze_lights_rs::Hsb;
/// use wyze_lights_rs::convert::{hsb_to_packed_color, packed_color_to_hsb};
///
/// let hsb = Hsb::create(240, 75, 40).unwrap();
/// let packed = hsb_to_packed_color(&hsb);
/// assert_eq!(packed, "00000000f0bf66");
/// assert_eq!(packed_color_to_hsb(Some(&packed)), hsb);
/// ```
pub fn hsb_to_packed_color(hsb: &Hsb) -> String {
    format!(
        "{PACKED_COLOR_PREFIX}{:04x}{:02x}{:02x}",
        hsb.hue(),
        percent_to_channel(hsb.saturation()),
        percent_to_channel(hsb.brightness()),
    )
}

fn channel_to_percent(channel: u8) -> i64 {
    (f64::from(channel) / CHANNEL_SCALE).round() as i64
}

fn percent_to_channel(percent: u8) -> u8 {
    (f64::from(percent) * CHANNEL_SCALE).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_endpoints() {
        assert_eq!(vendor_temperature_to_normalized(1800), 500);
        assert_eq!(vendor_temperature_to_normalized(6500), 140);
        assert_eq!(normalized_temperature_to_vendor(500), 1800);
        assert_eq!(normalized_temperature_to_vendor(140), 6500);
    }

    #[test]
    fn test_temperature_clamps_out_of_range() {
        assert_eq!(vendor_temperature_to_normalized(0), 500);
        assert_eq!(vendor_temperature_to_normalized(10_000), 140);
        assert_eq!(normalized_temperature_to_vendor(600), 1800);
        assert_eq!(normalized_temperature_to_vendor(100), 6500);
    }

    #[test]
    fn test_normalized_round_trip() {
        for value in 140..=500 {
            let back = vendor_temperature_to_normalized(normalized_temperature_to_vendor(value));
            assert!(back.abs_diff(value) <= 1, "{value} came back as {back}");
        }
    }

    #[test]
    fn test_vendor_round_trip_within_one_step() {
        // One accessory step covers roughly 13K on the vendor scale.
        let step = (6500 - 1800) / (500 - 140) + 1;
        for raw in 1800..=6500 {
            let back = normalized_temperature_to_vendor(vendor_temperature_to_normalized(raw));
            assert!(back.abs_diff(raw) <= step / 2 + 1, "{raw} came back as {back}");
            assert_eq!(
                vendor_temperature_to_normalized(back),
                vendor_temperature_to_normalized(raw)
            );
        }
    }

    #[test]
    fn test_temperature_is_monotonic_and_inverted() {
        let mut previous = vendor_temperature_to_normalized(1800);
        for raw in (1900..=6500).step_by(100) {
            let current = vendor_temperature_to_normalized(raw);
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn test_packed_color_default() {
        assert_eq!(packed_color_to_hsb(Some(DEFAULT_PACKED_COLOR)), Hsb::default());
        assert_eq!(packed_color_to_hsb(None), Hsb::default());
    }

    #[test]
    fn test_packed_color_malformed() {
        assert_eq!(packed_color_to_hsb(Some("")), Hsb::default());
        assert_eq!(packed_color_to_hsb(Some("000000")), Hsb::default());
        assert_eq!(packed_color_to_hsb(Some("000000zz00ffff")), Hsb::default());
        assert_eq!(packed_color_to_hsb(Some("héllo wörld")), Hsb::default());
    }

    #[test]
    fn test_packed_color_suffix_match() {
        let expected = Hsb::create(300, 100, 50).unwrap();
        // exactly the eight significant digits
        assert_eq!(packed_color_to_hsb(Some("012cff80")), expected);
        // longer vendor strings only use the tail
        assert_eq!(packed_color_to_hsb(Some("abcdef012CFF80")), expected);
        assert_eq!(packed_color_to_hsb(Some("ffffffffff012cff80")), expected);
    }

    #[test]
    fn test_packed_color_clamps_hue() {
        let hsb = packed_color_to_hsb(Some("00000fffff0000"));
        assert_eq!(hsb.hue(), 360);
        assert_eq!(hsb.saturation(), 0);
    }

    #[test]
    fn test_packing_round_trip() {
        for hue in (0..=360).step_by(15) {
            for percent in 0..=100 {
                let hsb = Hsb::create(hue, percent, 100 - percent).unwrap();
                let packed = hsb_to_packed_color(&hsb);
                assert_eq!(packed.len(), 14);
                assert_eq!(packed_color_to_hsb(Some(&packed)), hsb);
            }
        }
    }
}
