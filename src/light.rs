//! Tunable white lights: power, brightness and color temperature.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::{debug, info};

use crate::accessory::{Accessory, DeviceAccessory};
use crate::action::{ActionList, MESH_PROPERTY_ACTION_KEY, pid};
use crate::client::DeviceApi;
use crate::device::{Device, Property};
use crate::errors::Error;
use crate::hap::{CharacteristicType, CharacteristicValue, PlatformAccessory, ServiceType};
use crate::runtime::BoxFuture;
use crate::status::LightState;
use crate::types::{Brightness, ColorTemperature, Kelvin, PowerMode};

type Result<T> = std::result::Result<T, Error>;

/// Decodes one vendor property value into a [`LightState`].
///
/// Decoders never fail; a value they cannot read leaves the state untouched.
pub type PropertyDecoder = fn(&mut LightState, &str);

/// Lookup table from vendor property code to decoder.
///
/// Codes without an entry are ignored, so new vendor properties never break
/// a refresh.
///
/// # Examples
///
/// ```
/// use wyze_lights_rs::{Property, PropertyTable};
///
/// let table = PropertyTable::light();
/// let state = table.decode(&[
///     Property::new("P1501", "35"),
///     Property::new("P1502", "6500"),
///     Property::new("P1234", "unknown"),
/// ]);
///
/// assert_eq!(state.brightness().unwrap().value(), 35);
/// assert_eq!(state.color_temperature().unwrap().value(), 140);
/// ```
#[derive(Clone, Default)]
pub struct PropertyTable {
    decoders: HashMap<&'static str, PropertyDecoder>,
}

impl PropertyTable {
    /// A table that decodes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Brightness and color temperature.
    pub fn light() -> Self {
        Self::new()
            .with(pid::BRIGHTNESS, decode_brightness)
            .with(pid::COLOR_TEMPERATURE, decode_color_temperature)
    }

    /// Add or replace the decoder for a property code.
    pub fn with(mut self, pid: &'static str, decoder: PropertyDecoder) -> Self {
        self.decoders.insert(pid, decoder);
        self
    }

    pub fn handles(&self, pid: &str) -> bool {
        self.decoders.contains_key(pid)
    }

    pub fn decode(&self, properties: &[Property]) -> LightState {
        let mut state = LightState::new();
        for property in properties {
            if let Some(decoder) = self.decoders.get(property.pid.as_str()) {
                decoder(&mut state, &property.value);
            }
        }
        state
    }
}

impl fmt::Debug for PropertyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pids: Vec<_> = self.decoders.keys().collect();
        pids.sort();
        f.debug_struct("PropertyTable").field("pids", &pids).finish()
    }
}

fn decode_brightness(state: &mut LightState, value: &str) {
    if let Some(brightness) = Brightness::from_property(value) {
        state.set_brightness(brightness);
    }
}

fn decode_color_temperature(state: &mut LightState, value: &str) {
    if let Some(kelvin) = Kelvin::from_property(value) {
        state.set_color_temperature(ColorTemperature::from(kelvin));
    }
}

/// A vendor light mirrored as a lightbulb with power, brightness and color
/// temperature.
pub struct LightAccessory {
    device: DeviceAccessory,
    properties: PropertyTable,
}

impl LightAccessory {
    pub fn new(client: Arc<dyn DeviceApi>, accessory: PlatformAccessory) -> Self {
        Self::with_properties(client, accessory, PropertyTable::light())
    }

    /// Build a light that decodes refreshes with `properties`.
    ///
    /// On, Brightness and ColorTemperature are always wired; callers extend
    /// the set with [`LightAccessory::wire_set_handlers`].
    pub fn with_properties(
        client: Arc<dyn DeviceApi>,
        accessory: PlatformAccessory,
        properties: PropertyTable,
    ) -> Self {
        let light = LightAccessory {
            device: DeviceAccessory::new(client, accessory),
            properties,
        };
        light.wire_set_handlers(&[
            CharacteristicType::On,
            CharacteristicType::Brightness,
            CharacteristicType::ColorTemperature,
        ]);
        light
    }

    pub fn properties(&self) -> &PropertyTable {
        &self.properties
    }

    pub fn wire_set_handlers(&self, characteristics: &[CharacteristicType]) {
        self.device.with_accessory(|a| {
            let service = a.add_service(ServiceType::Lightbulb);
            for characteristic in characteristics {
                service.characteristic_mut(*characteristic).on_set();
            }
        });
    }

    /// Currently displayed value of a numeric lightbulb characteristic.
    pub fn displayed(&self, characteristic: CharacteristicType) -> Option<i64> {
        self.device.with_accessory(|a| {
            a.service(ServiceType::Lightbulb)
                .and_then(|s| s.int_value(characteristic))
        })
    }

    pub async fn set_on(&self, on: bool) -> Result<()> {
        let power = PowerMode::from(on);
        info!(
            "Setting power for {} ({}) to {power:?}",
            self.device.mac(),
            self.device.nickname()
        );
        self.device
            .run_actions(&ActionList::from(power), MESH_PROPERTY_ACTION_KEY)
            .await
    }

    pub async fn set_brightness(&self, brightness: Brightness) -> Result<()> {
        info!(
            "Setting brightness for {} ({}) to {}",
            self.device.mac(),
            self.device.nickname(),
            brightness.value()
        );
        self.device
            .run_actions(&ActionList::from(&brightness), MESH_PROPERTY_ACTION_KEY)
            .await
    }

    /// Leave color mode and set the white temperature.
    pub async fn set_color_temperature(&self, temperature: ColorTemperature) -> Result<()> {
        info!(
            "Setting color temperature for {} ({}) to {} ({}K)",
            self.device.mac(),
            self.device.nickname(),
            temperature.value(),
            temperature.to_kelvin().kelvin()
        );
        self.device
            .run_actions(&ActionList::from(&temperature), MESH_PROPERTY_ACTION_KEY)
            .await
    }

    /// Read power from the snapshot and the rest from the property list.
    pub async fn refresh(&self, device: &Device) -> Result<()> {
        let mut state = LightState::new();
        state.set_power(PowerMode::from(device.device_params.switch_state));
        self.apply(&state);

        let list = self.device.get_property_list().await?;
        let decoded = self.properties.decode(&list.property_list);
        if decoded.is_empty() {
            debug!("No known properties for {} ({})", device.mac, device.nickname);
            return Ok(());
        }

        state.update(&decoded);
        debug!("Decoded {} for {}: {state:?}", device.mac, device.nickname);
        self.apply(&state);
        Ok(())
    }

    fn apply(&self, state: &LightState) {
        self.device
            .with_accessory(|a| state.apply_to(a.add_service(ServiceType::Lightbulb)));
    }

    async fn dispatch_set(
        &self,
        characteristic: CharacteristicType,
        value: CharacteristicValue,
    ) -> Result<CharacteristicValue> {
        let int = || {
            value
                .as_int()
                .ok_or_else(|| Error::invalid_value(characteristic, &value))
        };

        match characteristic {
            CharacteristicType::On => {
                let on = value
                    .as_bool()
                    .ok_or_else(|| Error::invalid_value(characteristic, &value))?;
                self.set_on(on).await?;
                Ok(on.into())
            }
            CharacteristicType::Brightness => {
                let brightness = Brightness::clamped(int()?);
                self.set_brightness(brightness).await?;
                Ok(brightness.value().into())
            }
            CharacteristicType::ColorTemperature => {
                let temperature = ColorTemperature::clamped(int()?);
                self.set_color_temperature(temperature).await?;
                Ok(temperature.value().into())
            }
            other => Err(Error::UnsupportedCharacteristic(other)),
        }
    }
}

impl Accessory for LightAccessory {
    fn device(&self) -> &DeviceAccessory {
        &self.device
    }

    fn service_type(&self) -> ServiceType {
        ServiceType::Lightbulb
    }

    fn refresh_characteristics<'a>(&'a self, device: &'a Device) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.refresh(device))
    }

    fn handle_set(
        &self,
        characteristic: CharacteristicType,
        value: CharacteristicValue,
    ) -> BoxFuture<'_, Result<CharacteristicValue>> {
        Box::pin(self.dispatch_set(characteristic, value))
    }
}
