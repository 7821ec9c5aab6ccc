//! Normalized light state decoded from the vendor.

use serde::{Deserialize, Serialize};

use crate::hap::{CharacteristicType, Service};
use crate::types::{Brightness, ColorTemperature, Hsb, PowerMode};

/// Light attributes in accessory units.
///
/// Every field is optional: a refresh only fills in what the vendor actually
/// reported, and only those fields are pushed to the accessory.
#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
pub struct LightState {
    power: Option<PowerMode>,
    brightness: Option<Brightness>,
    color_temperature: Option<ColorTemperature>,
    color: Option<Hsb>,
}

impl LightState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn power(&self) -> Option<PowerMode> {
        self.power
    }

    pub fn brightness(&self) -> Option<Brightness> {
        self.brightness
    }

    pub fn color_temperature(&self) -> Option<ColorTemperature> {
        self.color_temperature
    }

    pub fn color(&self) -> Option<Hsb> {
        self.color
    }

    pub fn set_power(&mut self, power: PowerMode) {
        self.power = Some(power);
    }

    pub fn set_brightness(&mut self, brightness: Brightness) {
        self.brightness = Some(brightness);
    }

    pub fn set_color_temperature(&mut self, temperature: ColorTemperature) {
        self.color_temperature = Some(temperature);
    }

    pub fn set_color(&mut self, color: Hsb) {
        self.color = Some(color);
    }

    /// Whether nothing has been decoded.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Update this state with values from another state.
    ///
    /// Values set in `other` overwrite values in `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wyze_lights_rs::{Brightness, LightState, PowerMode};
    ///
    /// let mut state = LightState::new();
    /// state.set_power(PowerMode::On);
    ///
    /// let mut other = LightState::new();
    /// other.set_brightness(Brightness::create(30).unwrap());
    ///
    /// state.update(&other);
    /// assert_eq!(state.power(), Some(PowerMode::On));
    /// assert_eq!(state.brightness().unwrap().value(), 30);
    /// ```
    pub fn update(&mut self, other: &Self) {
        if let Some(power) = other.power {
            self.power = Some(power);
        }
        if let Some(brightness) = other.brightness {
            self.brightness = Some(brightness);
        }
        if let Some(temperature) = other.color_temperature {
            self.color_temperature = Some(temperature);
        }
        if let Some(color) = other.color {
            self.color = Some(color);
        }
    }

    /// Push the decoded values into a lightbulb service.
    pub fn apply_to(&self, service: &mut Service) {
        if let Some(power) = self.power {
            service.set_characteristic(CharacteristicType::On, power.is_on());
        }
        if let Some(brightness) = self.brightness {
            service.set_characteristic(CharacteristicType::Brightness, brightness.value());
        }
        if let Some(temperature) = self.color_temperature {
            service.set_characteristic(CharacteristicType::ColorTemperature, temperature.value());
        }
        if let Some(color) = self.color {
            service
                .set_characteristic(CharacteristicType::Hue, color.hue())
                .set_characteristic(CharacteristicType::Saturation, color.saturation());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hap::{CharacteristicValue, ServiceType};

    #[test]
    fn test_apply_only_set_fields() {
        let mut service = Service::new(ServiceType::Lightbulb);
        service.set_characteristic(CharacteristicType::Hue, 200u16);

        let mut state = LightState::new();
        state.set_power(PowerMode::Off);
        state.set_color_temperature(ColorTemperature::create(320).unwrap());
        state.apply_to(&mut service);

        assert_eq!(service.value(CharacteristicType::On), Some(&CharacteristicValue::Bool(false)));
        assert_eq!(service.int_value(CharacteristicType::ColorTemperature), Some(320));
        assert_eq!(service.int_value(CharacteristicType::Hue), Some(200));
        assert!(service.value(CharacteristicType::Brightness).is_none());
    }

    #[test]
    fn test_color_sets_hue_and_saturation() {
        let mut service = Service::new(ServiceType::Lightbulb);
        let mut state = LightState::new();
        state.set_color(Hsb::create(90, 40, 100).unwrap());
        state.apply_to(&mut service);

        assert_eq!(service.int_value(CharacteristicType::Hue), Some(90));
        assert_eq!(service.int_value(CharacteristicType::Saturation), Some(40));
    }

    #[test]
    fn test_is_empty() {
        let mut state = LightState::new();
        assert!(state.is_empty());
        state.set_brightness(Brightness::new());
        assert!(!state.is_empty());
    }
}
