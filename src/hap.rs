//! The local accessory model that device state is mirrored into.
//!
//! A [`PlatformAccessory`] owns a set of [`Service`]s, each holding typed
//! [`Characteristic`] values, plus the [`AccessoryContext`] bag that survives
//! restarts. Accessories in this crate write into it; whatever serves the
//! accessory to clients reads from it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};
use uuid::Uuid;

/// Services an accessory can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum ServiceType {
    AccessoryInformation,
    Lightbulb,
}

/// Characteristics a service can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum CharacteristicType {
    Name,
    Manufacturer,
    Model,
    SerialNumber,
    On,
    Brightness,
    ColorTemperature,
    Hue,
    Saturation,
}

impl CharacteristicType {
    /// Inclusive bounds for numeric characteristics.
    pub fn bounds(&self) -> Option<(i64, i64)> {
        match self {
            CharacteristicType::Brightness | CharacteristicType::Saturation => Some((0, 100)),
            CharacteristicType::ColorTemperature => Some((140, 500)),
            CharacteristicType::Hue => Some((0, 360)),
            _ => None,
        }
    }
}

/// A characteristic value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl CharacteristicValue {
    /// Booleans, and integers as 0/1 the way HAP clients sometimes send them.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CharacteristicValue::Bool(b) => Some(*b),
            CharacteristicValue::Int(i) => Some(*i != 0),
            CharacteristicValue::String(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            CharacteristicValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CharacteristicValue::String(s) => Some(s),
            _ => None,
        }
    }

    fn clamp_to(self, bounds: Option<(i64, i64)>) -> Self {
        match (self, bounds) {
            (CharacteristicValue::Int(i), Some((min, max))) => {
                CharacteristicValue::Int(i.clamp(min, max))
            }
            (value, _) => value,
        }
    }
}

impl From<bool> for CharacteristicValue {
    fn from(value: bool) -> Self {
        CharacteristicValue::Bool(value)
    }
}

impl From<u8> for CharacteristicValue {
    fn from(value: u8) -> Self {
        CharacteristicValue::Int(i64::from(value))
    }
}

impl From<u16> for CharacteristicValue {
    fn from(value: u16) -> Self {
        CharacteristicValue::Int(i64::from(value))
    }
}

impl From<i64> for CharacteristicValue {
    fn from(value: i64) -> Self {
        CharacteristicValue::Int(value)
    }
}

impl From<&str> for CharacteristicValue {
    fn from(value: &str) -> Self {
        CharacteristicValue::String(value.to_string())
    }
}

impl From<String> for CharacteristicValue {
    fn from(value: String) -> Self {
        CharacteristicValue::String(value)
    }
}

/// A single characteristic and its displayed value.
#[derive(Debug, Clone, PartialEq)]
pub struct Characteristic {
    kind: CharacteristicType,
    value: Option<CharacteristicValue>,
    set_handler: bool,
}

impl Characteristic {
    pub fn new(kind: CharacteristicType) -> Self {
        Characteristic {
            kind,
            value: None,
            set_handler: false,
        }
    }

    pub fn kind(&self) -> CharacteristicType {
        self.kind
    }

    pub fn value(&self) -> Option<&CharacteristicValue> {
        self.value.as_ref()
    }

    /// Replace the displayed value. Numeric values are clamped to the
    /// characteristic's bounds.
    pub fn update_value(&mut self, value: impl Into<CharacteristicValue>) -> &mut Self {
        self.value = Some(value.into().clamp_to(self.kind.bounds()));
        self
    }

    /// Route client writes of this characteristic to the owning accessory.
    pub fn on_set(&mut self) -> &mut Self {
        self.set_handler = true;
        self
    }

    pub fn has_set_handler(&self) -> bool {
        self.set_handler
    }
}

/// A service and its characteristics.
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    kind: ServiceType,
    characteristics: HashMap<CharacteristicType, Characteristic>,
}

impl Service {
    pub fn new(kind: ServiceType) -> Self {
        Service {
            kind,
            characteristics: HashMap::new(),
        }
    }

    pub fn kind(&self) -> ServiceType {
        self.kind
    }

    pub fn characteristic(&self, kind: CharacteristicType) -> Option<&Characteristic> {
        self.characteristics.get(&kind)
    }

    /// Get a characteristic, adding it first if the service lacks it.
    pub fn characteristic_mut(&mut self, kind: CharacteristicType) -> &mut Characteristic {
        self.characteristics
            .entry(kind)
            .or_insert_with(|| Characteristic::new(kind))
    }

    /// Set a characteristic value, returning the service for chaining.
    ///
    /// # Examples
    ///
    /// ```
    /// use wyze_lights_rs::hap::{CharacteristicType, Service, ServiceType};
    ///
    /// let mut info = Service::new(ServiceType::AccessoryInformation);
    /// info.set_characteristic(CharacteristicType::Name, "Desk")
    ///     .set_characteristic(CharacteristicType::Manufacturer, "Wyze");
    ///
    /// assert_eq!(info.value(CharacteristicType::Name).and_then(|v| v.as_str()), Some("Desk"));
    /// ```
    pub fn set_characteristic(
        &mut self,
        kind: CharacteristicType,
        value: impl Into<CharacteristicValue>,
    ) -> &mut Self {
        self.characteristic_mut(kind).update_value(value);
        self
    }

    pub fn value(&self, kind: CharacteristicType) -> Option<&CharacteristicValue> {
        self.characteristic(kind).and_then(Characteristic::value)
    }

    pub fn int_value(&self, kind: CharacteristicType) -> Option<i64> {
        self.value(kind).and_then(CharacteristicValue::as_int)
    }
}

/// Identity of the mirrored device, persisted with the accessory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryContext {
    pub mac: String,
    pub product_type: String,
    pub product_model: String,
    pub nickname: String,
}

/// An accessory as the local framework sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformAccessory {
    display_name: String,
    uuid: Uuid,
    context: AccessoryContext,
    services: HashMap<ServiceType, Service>,
}

impl PlatformAccessory {
    /// Create an accessory with an empty information service.
    pub fn new(display_name: &str, uuid: Uuid) -> Self {
        PlatformAccessory {
            display_name: display_name.to_string(),
            uuid,
            context: AccessoryContext::default(),
            services: HashMap::from([(
                ServiceType::AccessoryInformation,
                Service::new(ServiceType::AccessoryInformation),
            )]),
        }
    }

    /// Stable accessory UUID for a device MAC address.
    ///
    /// # Examples
    ///
    /// ```
    /// use wyze_lights_rs::PlatformAccessory;
    ///
    /// let a = PlatformAccessory::uuid_for("7C78B2000001");
    /// assert_eq!(a, PlatformAccessory::uuid_for("7C78B2000001"));
    /// assert_ne!(a, PlatformAccessory::uuid_for("7C78B2000002"));
    /// ```
    pub fn uuid_for(mac: &str) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, mac.as_bytes())
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn context(&self) -> &AccessoryContext {
        &self.context
    }

    pub fn set_context(&mut self, context: AccessoryContext) {
        self.context = context;
    }

    pub fn service(&self, kind: ServiceType) -> Option<&Service> {
        self.services.get(&kind)
    }

    pub fn service_mut(&mut self, kind: ServiceType) -> Option<&mut Service> {
        self.services.get_mut(&kind)
    }

    /// Get a service, adding it first if the accessory lacks it.
    pub fn add_service(&mut self, kind: ServiceType) -> &mut Service {
        self.services
            .entry(kind)
            .or_insert_with(|| Service::new(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_values_are_clamped() {
        let mut service = Service::new(ServiceType::Lightbulb);
        service
            .set_characteristic(CharacteristicType::Brightness, 250i64)
            .set_characteristic(CharacteristicType::ColorTemperature, 20i64)
            .set_characteristic(CharacteristicType::Hue, -4i64);

        assert_eq!(service.int_value(CharacteristicType::Brightness), Some(100));
        assert_eq!(service.int_value(CharacteristicType::ColorTemperature), Some(140));
        assert_eq!(service.int_value(CharacteristicType::Hue), Some(0));
    }

    #[test]
    fn test_set_handler_flag() {
        let mut service = Service::new(ServiceType::Lightbulb);
        assert!(service.characteristic(CharacteristicType::On).is_none());

        service.characteristic_mut(CharacteristicType::On).on_set();
        let on = service.characteristic(CharacteristicType::On).unwrap();
        assert!(on.has_set_handler());
        assert!(on.value().is_none());
    }

    #[test]
    fn test_add_service_is_idempotent() {
        let mut accessory = PlatformAccessory::new("Desk", PlatformAccessory::uuid_for("AA"));
        accessory
            .add_service(ServiceType::Lightbulb)
            .set_characteristic(CharacteristicType::On, true);
        accessory.add_service(ServiceType::Lightbulb);

        let bulb = accessory.service(ServiceType::Lightbulb).unwrap();
        assert_eq!(bulb.value(CharacteristicType::On), Some(&CharacteristicValue::Bool(true)));
        assert!(accessory.service(ServiceType::AccessoryInformation).is_some());
    }

    #[test]
    fn test_value_coercions() {
        assert_eq!(CharacteristicValue::Int(1).as_bool(), Some(true));
        assert_eq!(CharacteristicValue::Int(0).as_bool(), Some(false));
        assert_eq!(CharacteristicValue::from("x").as_bool(), None);
        assert_eq!(CharacteristicValue::Bool(true).as_int(), None);
    }
}
