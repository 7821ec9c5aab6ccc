//! Base accessory: identity, write throttling and generic device API access.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info};
use serde::Serialize;
use serde_json::{Value, json};
use strum::IntoEnumIterator;
use uuid::Uuid;

use crate::action::ActionList;
use crate::client::DeviceApi;
use crate::device::{Device, PropertyList};
use crate::errors::Error;
use crate::hap::{
    AccessoryContext, Characteristic, CharacteristicType, CharacteristicValue, PlatformAccessory,
    ServiceType,
};
use crate::history::{HistorySummary, MessageHistory, MessageType};
use crate::response::WriteResponse;
use crate::runtime::{self, BoxFuture};
use crate::throttle::{ThrottleGate, Timestamp, WriteGuard};

type Result<T> = std::result::Result<T, Error>;

/// Manufacturer shown on every accessory.
pub const MANUFACTURER: &str = "Wyze";

/// State shared by every kind of mirrored device.
///
/// A `DeviceAccessory` is created once per device and lives as long as the
/// device is reported by the vendor. It owns the framework object the device
/// is mirrored into and the [`ThrottleGate`] that keeps polls from racing
/// writes.
pub struct DeviceAccessory {
    client: Arc<dyn DeviceApi>,
    accessory: Mutex<PlatformAccessory>,
    gate: ThrottleGate,
    history: runtime::Mutex<MessageHistory>,
}

impl DeviceAccessory {
    pub fn new(client: Arc<dyn DeviceApi>, accessory: PlatformAccessory) -> Self {
        DeviceAccessory {
            client,
            accessory: Mutex::new(accessory),
            gate: ThrottleGate::new(),
            history: runtime::Mutex::new(MessageHistory::new()),
        }
    }

    pub fn display_name(&self) -> String {
        self.with_accessory(|a| a.display_name().to_string())
    }

    pub fn uuid(&self) -> Uuid {
        self.with_accessory(|a| a.uuid())
    }

    pub fn context(&self) -> AccessoryContext {
        self.with_accessory(|a| a.context().clone())
    }

    pub fn mac(&self) -> String {
        self.with_accessory(|a| a.context().mac.clone())
    }

    pub fn product_type(&self) -> String {
        self.with_accessory(|a| a.context().product_type.clone())
    }

    pub fn product_model(&self) -> String {
        self.with_accessory(|a| a.context().product_model.clone())
    }

    pub fn nickname(&self) -> String {
        self.with_accessory(|a| a.context().nickname.clone())
    }

    pub fn gate(&self) -> &ThrottleGate {
        &self.gate
    }

    /// A copy of the framework object, e.g. for persisting between runs.
    pub fn snapshot(&self) -> PlatformAccessory {
        self.with_accessory(|a| a.clone())
    }

    /// Run `f` with exclusive access to the framework object.
    ///
    /// The lock is released before `f` returns; never call back into the
    /// accessory from inside `f`.
    pub fn with_accessory<R>(&self, f: impl FnOnce(&mut PlatformAccessory) -> R) -> R {
        let mut accessory = self
            .accessory
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut accessory)
    }

    /// Whether this accessory mirrors `device`. Only the MAC is compared.
    pub fn matches(&self, device: &Device) -> bool {
        self.with_accessory(|a| a.context().mac == device.mac)
    }

    /// Overwrite identity and accessory information from a device snapshot.
    pub fn refresh_identity(&self, device: &Device) {
        self.with_accessory(|accessory| {
            accessory.set_context(AccessoryContext {
                mac: device.mac.clone(),
                product_type: device.product_type.clone(),
                product_model: device.product_model.clone(),
                nickname: device.nickname.clone(),
            });

            accessory
                .add_service(ServiceType::AccessoryInformation)
                .set_characteristic(CharacteristicType::Name, device.nickname.as_str())
                .set_characteristic(CharacteristicType::Manufacturer, MANUFACTURER)
                .set_characteristic(CharacteristicType::Model, device.product_model.as_str())
                .set_characteristic(CharacteristicType::SerialNumber, device.mac.as_str());
        });
    }

    pub fn should_refresh(&self, timestamp: Timestamp) -> bool {
        self.gate.should_refresh(timestamp)
    }

    /// Fetch the raw vendor property list. Decoding is up to the caller.
    pub async fn get_property_list(&self) -> Result<PropertyList> {
        let AccessoryContext {
            mac, product_model, ..
        } = self.context();

        let result = self.client.get_property_list(&mac, &product_model).await;
        match &result {
            Ok(list) => {
                self.history.lock().await.record(
                    MessageType::Receive,
                    "get_property_list",
                    serde_json::to_value(list).unwrap_or(Value::Null),
                );
            }
            Err(e) => self.history.lock().await.record_error(&e.to_string()),
        }
        result
    }

    /// Write a single vendor property.
    pub async fn set_property(&self, pid: &str, value: &str) -> Result<()> {
        let AccessoryContext {
            mac, product_model, ..
        } = self.context();
        info!("Setting property {pid} of {mac} to {value}");

        self.history.lock().await.record(
            MessageType::Send,
            "set_property",
            json!({"pid": pid, "value": value}),
        );

        let guard = self.gate.begin_write();
        let result = self
            .client
            .set_property(&mac, &product_model, pid, value)
            .await;
        self.finish_write(guard, result).await
    }

    /// Apply a list of vendor property writes in one call.
    pub async fn run_actions(&self, actions: &ActionList, action_key: &str) -> Result<()> {
        let AccessoryContext {
            mac, product_model, ..
        } = self.context();
        info!(
            "Running {} action(s) on {mac} with key {action_key}: {:?}",
            actions.len(),
            actions.actions()
        );

        self.history.lock().await.record(
            MessageType::Send,
            action_key,
            serde_json::to_value(actions).unwrap_or(Value::Null),
        );

        let guard = self.gate.begin_write();
        let result = self
            .client
            .run_actions(&mac, &product_model, actions, action_key)
            .await;
        self.finish_write(guard, result).await
    }

    async fn finish_write(
        &self,
        guard: WriteGuard<'_>,
        result: Result<WriteResponse>,
    ) -> Result<()> {
        match result {
            Ok(response) => {
                guard.confirm(response.ts);
                debug!("Write confirmed at {}", response.ts);
                self.history.lock().await.record(
                    MessageType::Receive,
                    "write",
                    json!({"ts": response.ts}),
                );
                Ok(())
            }
            Err(err) => {
                drop(guard);
                self.history.lock().await.record_error(&err.to_string());
                Err(err)
            }
        }
    }

    pub async fn history(&self) -> MessageHistory {
        self.history.lock().await.clone()
    }

    /// Returns diagnostics including identity, throttle state, displayed
    /// values and history.
    pub async fn diagnostics(&self) -> Result<Value> {
        let (display_name, uuid, context, lightbulb) = self.with_accessory(|a| {
            let lightbulb: Option<BTreeMap<String, CharacteristicValue>> =
                a.service(ServiceType::Lightbulb).map(|service| {
                    CharacteristicType::iter()
                        .filter_map(|c| service.value(c).map(|v| (c.to_string(), v.clone())))
                        .collect()
                });
            (
                a.display_name().to_string(),
                a.uuid(),
                a.context().clone(),
                lightbulb,
            )
        });

        let diagnostics = Diagnostics {
            display_name,
            uuid,
            context,
            updating: self.gate.is_updating(),
            last_confirmed: self.gate.last_confirmed(),
            lightbulb,
            history: self.history.lock().await.summary(),
        };
        serde_json::to_value(&diagnostics).map_err(Error::JsonDump)
    }
}

#[derive(Serialize)]
struct Diagnostics {
    display_name: String,
    uuid: Uuid,
    context: AccessoryContext,
    updating: bool,
    last_confirmed: Option<Timestamp>,
    lightbulb: Option<BTreeMap<String, CharacteristicValue>>,
    history: HistorySummary,
}

/// A mirrored device as seen by the poller and the local framework.
///
/// Implementors provide the characteristic refresh and set handling; the
/// reconciliation flow around them is shared.
pub trait Accessory: Send + Sync {
    fn device(&self) -> &DeviceAccessory;

    /// The service whose characteristics this accessory drives.
    fn service_type(&self) -> ServiceType;

    /// Read the device and push its state into the characteristics.
    fn refresh_characteristics<'a>(&'a self, device: &'a Device) -> BoxFuture<'a, Result<()>>;

    /// Send a client write of a wired characteristic to the device.
    ///
    /// Returns the value as it was sent, which is what gets displayed.
    fn handle_set(
        &self,
        characteristic: CharacteristicType,
        value: CharacteristicValue,
    ) -> BoxFuture<'_, Result<CharacteristicValue>>;

    fn display_name(&self) -> String {
        self.device().display_name()
    }

    fn matches(&self, device: &Device) -> bool {
        self.device().matches(device)
    }

    /// Reconcile with a device snapshot taken at `timestamp`.
    ///
    /// Identity is always refreshed. Characteristics are refreshed only when
    /// the throttle gate allows it; the return value says whether they were.
    fn update<'a>(&'a self, device: &'a Device, timestamp: Timestamp) -> BoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            let base = self.device();
            base.refresh_identity(device);

            if !base.should_refresh(timestamp) {
                debug!("Skipping refresh of {} at {timestamp}", device.mac);
                return Ok(false);
            }

            self.refresh_characteristics(device).await?;
            Ok(true)
        })
    }

    /// Entry point for a client writing a characteristic.
    ///
    /// Wired characteristics go through [`Accessory::handle_set`] first; the
    /// displayed value only changes once that succeeds, and then shows what
    /// was actually sent. Characteristics without a handler are stored as-is.
    fn set_characteristic(
        &self,
        characteristic: CharacteristicType,
        value: CharacteristicValue,
    ) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let service_type = self.service_type();
            let wired = self.device().with_accessory(|a| {
                a.service(service_type).map(|service| {
                    service
                        .characteristic(characteristic)
                        .is_some_and(Characteristic::has_set_handler)
                })
            });

            let Some(wired) = wired else {
                return Err(Error::ServiceNotFound(service_type));
            };

            let value = if wired {
                self.handle_set(characteristic, value).await?
            } else {
                value
            };

            self.device().with_accessory(|a| {
                a.add_service(service_type)
                    .set_characteristic(characteristic, value);
            });
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, MESH_PROPERTY_ACTION_KEY};
    use crate::testing::{Call, MockClient, device, platform_accessory};

    fn base(client: &Arc<MockClient>) -> DeviceAccessory {
        let accessory = DeviceAccessory::new(client.clone(), platform_accessory("7C78B2000001"));
        accessory.refresh_identity(&device("7C78B2000001", "MeshLight"));
        accessory
    }

    #[test]
    fn test_matches_by_mac_only() {
        let client = MockClient::new();
        let accessory = base(&client);

        let mut other = device("7C78B2000001", "Light");
        other.nickname = "Somewhere else".to_string();
        other.product_model = "WLPA19".to_string();
        assert!(accessory.matches(&other));

        assert!(!accessory.matches(&device("7c78b2000001", "MeshLight")));
        assert!(!accessory.matches(&device("7C78B2000002", "MeshLight")));
    }

    #[test]
    fn test_refresh_identity() {
        let client = MockClient::new();
        let accessory = base(&client);

        let mut renamed = device("7C78B2000001", "MeshLight");
        renamed.nickname = "Kitchen".to_string();
        accessory.refresh_identity(&renamed);

        assert_eq!(accessory.nickname(), "Kitchen");
        assert_eq!(accessory.product_model(), "WLPA19C");
        accessory.with_accessory(|a| {
            let info = a.service(ServiceType::AccessoryInformation).unwrap();
            let text = |c| info.value(c).and_then(|v| v.as_str()).map(String::from);
            assert_eq!(text(CharacteristicType::Name).as_deref(), Some("Kitchen"));
            assert_eq!(text(CharacteristicType::Manufacturer).as_deref(), Some("Wyze"));
            assert_eq!(text(CharacteristicType::Model).as_deref(), Some("WLPA19C"));
            assert_eq!(text(CharacteristicType::SerialNumber).as_deref(), Some("7C78B2000001"));
        });
    }

    #[tokio::test]
    async fn test_get_property_list_is_raw() {
        let client = MockClient::new();
        client.set_properties(&[("P1501", "80"), ("P9999", "whatever")]);
        let accessory = base(&client);

        let list = accessory.get_property_list().await.unwrap();
        assert_eq!(list.get("P9999"), Some("whatever"));
        assert_eq!(
            client.calls(),
            vec![Call::GetPropertyList {
                mac: "7C78B2000001".to_string(),
                model: "WLPA19C".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_set_property_records_confirmation() {
        let client = MockClient::new();
        client.set_write_ts(42_000);
        let accessory = base(&client);

        accessory.set_property("P3", "1").await.unwrap();

        assert!(!accessory.gate().is_updating());
        assert_eq!(accessory.gate().last_confirmed(), Some(42_000));
        assert_eq!(
            client.calls(),
            vec![Call::SetProperty {
                mac: "7C78B2000001".to_string(),
                model: "WLPA19C".to_string(),
                pid: "P3".to_string(),
                value: "1".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_failed_write_releases_gate() {
        let client = MockClient::new();
        client.fail_with("access token expired");
        let accessory = base(&client);

        let mut actions = ActionList::new();
        actions.push(Action::new("P3", "0"));
        let err = accessory
            .run_actions(&actions, MESH_PROPERTY_ACTION_KEY)
            .await
            .unwrap_err();

        assert_eq!(err, Error::api("run_actions", "access token expired"));
        assert!(!accessory.gate().is_updating());
        assert_eq!(accessory.gate().last_confirmed(), None);

        let err = accessory.set_property("P3", "0").await.unwrap_err();
        assert_eq!(err, Error::api("set_property", "access token expired"));
        assert!(!accessory.gate().is_updating());
        assert!(accessory.should_refresh(0));

        let history = accessory.history().await;
        assert_eq!(history.last_error(), Some(err.to_string().as_str()));
    }

    #[tokio::test]
    async fn test_diagnostics() {
        let client = MockClient::new();
        client.set_write_ts(7);
        let accessory = base(&client);
        accessory.set_property("P3", "1").await.unwrap();

        let diag = accessory.diagnostics().await.unwrap();
        assert_eq!(diag["context"]["mac"], "7C78B2000001");
        assert_eq!(diag["updating"], false);
        assert_eq!(diag["last_confirmed"], 7);
        assert_eq!(diag["history"]["send_count"], 1);
        assert_eq!(diag["history"]["receive_count"], 1);
        assert_eq!(
            diag["uuid"],
            PlatformAccessory::uuid_for("7C78B2000001").to_string()
        );
        assert!(diag["lightbulb"].is_null());

        accessory.with_accessory(|a| {
            a.add_service(ServiceType::Lightbulb)
                .set_characteristic(CharacteristicType::On, true)
                .set_characteristic(CharacteristicType::Brightness, 45u8);
        });
        let diag = accessory.diagnostics().await.unwrap();
        assert_eq!(diag["lightbulb"]["On"], true);
        assert_eq!(diag["lightbulb"]["Brightness"], 45);
    }
}
