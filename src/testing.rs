//! In-memory device API for unit tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::action::ActionList;
use crate::client::DeviceApi;
use crate::device::{Device, DeviceParams, Property, PropertyList};
use crate::errors::Error;
use crate::hap::PlatformAccessory;
use crate::response::{DeviceList, WriteResponse};
use crate::runtime::BoxFuture;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    GetDeviceList,
    GetPropertyList {
        mac: String,
        model: String,
    },
    SetProperty {
        mac: String,
        model: String,
        pid: String,
        value: String,
    },
    RunActions {
        mac: String,
        model: String,
        actions: ActionList,
        action_key: String,
    },
}

/// Records every call, answers from canned data, and can fail or hold writes.
#[derive(Default)]
pub(crate) struct MockClient {
    devices: Mutex<DeviceList>,
    properties: Mutex<PropertyList>,
    write_ts: AtomicU64,
    failure: Mutex<Option<String>>,
    hold: Mutex<Option<Arc<Notify>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_devices(&self, devices: DeviceList) {
        *self.devices.lock().unwrap() = devices;
    }

    pub fn set_properties(&self, properties: &[(&str, &str)]) {
        *self.properties.lock().unwrap() = PropertyList::new(
            properties
                .iter()
                .map(|(pid, value)| Property::new(pid, value))
                .collect(),
        );
    }

    pub fn set_write_ts(&self, ts: u64) {
        self.write_ts.store(ts, Ordering::SeqCst);
    }

    /// Make every following call fail with an API error.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn succeed(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// Park writes until the returned handle is notified.
    pub fn hold_writes(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.hold.lock().unwrap() = Some(notify.clone());
        notify
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn property_reads(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::GetPropertyList { .. }))
            .count()
    }

    /// Action lists sent so far, in order.
    pub fn sent_actions(&self) -> Vec<ActionList> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::RunActions { actions, .. } => Some(actions),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, method: &str) -> Result<()> {
        match self.failure.lock().unwrap().as_deref() {
            Some(message) => Err(Error::api(method, message)),
            None => Ok(()),
        }
    }

    async fn write(&self, method: &str) -> Result<WriteResponse> {
        let hold = self.hold.lock().unwrap().clone();
        if let Some(notify) = hold {
            notify.notified().await;
        }
        self.check(method)?;
        Ok(WriteResponse::new(self.write_ts.load(Ordering::SeqCst)))
    }
}

impl DeviceApi for MockClient {
    fn get_device_list(&self) -> BoxFuture<'_, Result<DeviceList>> {
        Box::pin(async move {
            self.record(Call::GetDeviceList);
            self.check("get_device_list")?;
            Ok(self.devices.lock().unwrap().clone())
        })
    }

    fn get_property_list<'a>(
        &'a self,
        mac: &'a str,
        model: &'a str,
    ) -> BoxFuture<'a, Result<PropertyList>> {
        Box::pin(async move {
            self.record(Call::GetPropertyList {
                mac: mac.to_string(),
                model: model.to_string(),
            });
            self.check("get_property_list")?;
            Ok(self.properties.lock().unwrap().clone())
        })
    }

    fn set_property<'a>(
        &'a self,
        mac: &'a str,
        model: &'a str,
        pid: &'a str,
        value: &'a str,
    ) -> BoxFuture<'a, Result<WriteResponse>> {
        Box::pin(async move {
            self.record(Call::SetProperty {
                mac: mac.to_string(),
                model: model.to_string(),
                pid: pid.to_string(),
                value: value.to_string(),
            });
            self.write("set_property").await
        })
    }

    fn run_actions<'a>(
        &'a self,
        mac: &'a str,
        model: &'a str,
        actions: &'a ActionList,
        action_key: &'a str,
    ) -> BoxFuture<'a, Result<WriteResponse>> {
        Box::pin(async move {
            self.record(Call::RunActions {
                mac: mac.to_string(),
                model: model.to_string(),
                actions: actions.clone(),
                action_key: action_key.to_string(),
            });
            self.write("run_actions").await
        })
    }
}

pub(crate) fn device(mac: &str, product_type: &str) -> Device {
    Device {
        mac: mac.to_string(),
        product_type: product_type.to_string(),
        product_model: "WLPA19C".to_string(),
        nickname: "Desk".to_string(),
        device_params: DeviceParams { switch_state: true },
    }
}

pub(crate) fn platform_accessory(mac: &str) -> PlatformAccessory {
    PlatformAccessory::new("Desk", PlatformAccessory::uuid_for(mac))
}
