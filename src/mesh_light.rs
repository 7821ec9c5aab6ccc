//! Mesh lights: a [`LightAccessory`] with full color.

use std::sync::Arc;

use log::info;

use crate::accessory::{Accessory, DeviceAccessory};
use crate::action::{ActionList, MESH_PROPERTY_ACTION_KEY, pid};
use crate::client::DeviceApi;
use crate::convert;
use crate::device::Device;
use crate::errors::Error;
use crate::hap::{CharacteristicType, CharacteristicValue, PlatformAccessory, ServiceType};
use crate::light::{LightAccessory, PropertyTable};
use crate::runtime::BoxFuture;
use crate::status::LightState;
use crate::types::Hsb;

type Result<T> = std::result::Result<T, Error>;

fn decode_color(state: &mut LightState, value: &str) {
    state.set_color(convert::packed_color_to_hsb(Some(value)));
}

/// A color-capable light.
///
/// Everything a plain light does is delegated to the inner
/// [`LightAccessory`]; this type only adds the color property.
pub struct MeshLightAccessory {
    light: LightAccessory,
}

impl MeshLightAccessory {
    pub fn new(client: Arc<dyn DeviceApi>, accessory: PlatformAccessory) -> Self {
        let properties = PropertyTable::light().with(pid::COLOR, decode_color);
        let light = LightAccessory::with_properties(client, accessory, properties);
        light.wire_set_handlers(&[CharacteristicType::Hue]);
        MeshLightAccessory { light }
    }

    pub fn light(&self) -> &LightAccessory {
        &self.light
    }

    /// Send `hue` together with the saturation and brightness currently
    /// displayed. Missing values count as 100.
    ///
    /// Returns the color that was sent.
    pub async fn set_color(&self, hue: i64) -> Result<Hsb> {
        let saturation = self
            .light
            .displayed(CharacteristicType::Saturation)
            .unwrap_or(100);
        let brightness = self
            .light
            .displayed(CharacteristicType::Brightness)
            .unwrap_or(100);
        let color = Hsb::clamped(hue, saturation, brightness);

        let device = self.light.device();
        info!(
            "Setting color for {} ({}) to {color:?}",
            device.mac(),
            device.nickname()
        );
        device
            .run_actions(&ActionList::from(&color), MESH_PROPERTY_ACTION_KEY)
            .await?;
        Ok(color)
    }
}

impl Accessory for MeshLightAccessory {
    fn device(&self) -> &DeviceAccessory {
        self.light.device()
    }

    fn service_type(&self) -> ServiceType {
        self.light.service_type()
    }

    fn refresh_characteristics<'a>(&'a self, device: &'a Device) -> BoxFuture<'a, Result<()>> {
        self.light.refresh_characteristics(device)
    }

    fn handle_set(
        &self,
        characteristic: CharacteristicType,
        value: CharacteristicValue,
    ) -> BoxFuture<'_, Result<CharacteristicValue>> {
        match characteristic {
            CharacteristicType::Hue => Box::pin(async move {
                let hue = value
                    .as_int()
                    .ok_or_else(|| Error::invalid_value(characteristic, &value))?;
                let color = self.set_color(hue).await?;
                Ok(color.hue().into())
            }),
            other => self.light.handle_set(other, value),
        }
    }
}
