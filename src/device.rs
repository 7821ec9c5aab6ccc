//! Device snapshots as reported by the vendor API.

use serde::{Deserialize, Serialize};
use serde_with::formats::Flexible;
use serde_with::{BoolFromInt, serde_as};
use strum_macros::{Display, EnumString};

/// Product families that have an accessory implementation.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use wyze_lights_rs::ProductType;
///
/// assert_eq!(ProductType::from_str("MeshLight").unwrap(), ProductType::MeshLight);
/// assert!(ProductType::from_str("Camera").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum ProductType {
    /// Tunable white bulb
    Light,
    /// Color bulb on the vendor mesh
    MeshLight,
}

/// A device record from the vendor device list.
///
/// The `mac` is the only stable identity; everything else may change between
/// polls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub mac: String,
    pub product_type: String,
    pub product_model: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub device_params: DeviceParams,
}

impl Device {
    /// The product type, if it is one this crate knows how to drive.
    pub fn kind(&self) -> Option<ProductType> {
        self.product_type.parse().ok()
    }
}

/// Parameters reported alongside a device in the device list.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceParams {
    /// Whether the light is on. The vendor sends `0` or `1`.
    #[serde_as(as = "BoolFromInt<Flexible>")]
    #[serde(default)]
    pub switch_state: bool,
}

/// One entry of a device's property list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub pid: String,
    pub value: String,
}

impl Property {
    pub fn new(pid: &str, value: &str) -> Self {
        Property {
            pid: pid.to_string(),
            value: value.to_string(),
        }
    }
}

/// The full property list of a device, undecoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyList {
    #[serde(default)]
    pub property_list: Vec<Property>,
}

impl PropertyList {
    pub fn new(property_list: Vec<Property>) -> Self {
        PropertyList { property_list }
    }

    /// Look up the raw value of a property.
    pub fn get(&self, pid: &str) -> Option<&str> {
        self.property_list
            .iter()
            .find(|p| p.pid == pid)
            .map(|p| p.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_from_vendor_json() {
        let device: Device = serde_json::from_str(
            r#"{
                "mac": "7C78B2000001",
                "product_type": "MeshLight",
                "product_model": "WLPA19C",
                "nickname": "Desk",
                "device_params": {"switch_state": 1, "ssid": "home"},
                "firmware_ver": "1.0.5"
            }"#,
        )
        .unwrap();

        assert_eq!(device.mac, "7C78B2000001");
        assert_eq!(device.kind(), Some(ProductType::MeshLight));
        assert!(device.device_params.switch_state);
    }

    #[test]
    fn test_device_defaults() {
        let device: Device = serde_json::from_str(
            r#"{"mac": "A", "product_type": "Camera", "product_model": "WYZEC1"}"#,
        )
        .unwrap();

        assert_eq!(device.kind(), None);
        assert!(!device.device_params.switch_state);
        assert!(device.nickname.is_empty());
    }

    #[test]
    fn test_property_lookup() {
        let list: PropertyList = serde_json::from_str(
            r#"{"property_list": [{"pid": "P1501", "value": "80"}, {"pid": "P3", "value": "1"}]}"#,
        )
        .unwrap();

        assert_eq!(list.get("P1501"), Some("80"));
        assert_eq!(list.get("P1502"), None);
    }
}
