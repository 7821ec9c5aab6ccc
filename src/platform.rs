//! Device list polling and accessory lifecycle.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::join_all;
use log::{debug, info, warn};
use serde::Serialize;
use uuid::Uuid;

use crate::accessory::Accessory;
use crate::client::DeviceApi;
use crate::config::PlatformConfig;
use crate::device::{Device, ProductType};
use crate::errors::Error;
use crate::hap::PlatformAccessory;
use crate::light::LightAccessory;
use crate::mesh_light::MeshLightAccessory;
use crate::response::DeviceList;
use crate::runtime;

type Result<T> = std::result::Result<T, Error>;

fn build_accessory(
    client: Arc<dyn DeviceApi>,
    product_type: ProductType,
    accessory: PlatformAccessory,
) -> Arc<dyn Accessory> {
    match product_type {
        ProductType::Light => Arc::new(LightAccessory::new(client, accessory)),
        ProductType::MeshLight => Arc::new(MeshLightAccessory::new(client, accessory)),
    }
}

/// Create the accessory for a newly reported device.
///
/// Fails with [`Error::UnsupportedDevice`] for product types that have no
/// accessory implementation.
pub fn create_accessory(client: Arc<dyn DeviceApi>, device: &Device) -> Result<Arc<dyn Accessory>> {
    let product_type = device
        .kind()
        .ok_or_else(|| Error::unsupported_device(&device.mac, &device.product_type))?;

    let platform_accessory =
        PlatformAccessory::new(&device.nickname, PlatformAccessory::uuid_for(&device.mac));
    let accessory = build_accessory(client, product_type, platform_accessory);
    accessory.device().refresh_identity(device);
    Ok(accessory)
}

/// Outcome of reconciling one device list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PollReport {
    /// MACs of accessories created by this poll.
    pub added: Vec<String>,
    /// MACs of accessories dropped because their device disappeared or is
    /// excluded.
    pub removed: Vec<String>,
    pub refreshed: usize,
    pub throttled: usize,
    pub failed: usize,
}

/// Keeps one accessory per reported device and feeds each poll into it.
pub struct Platform {
    client: Arc<dyn DeviceApi>,
    config: PlatformConfig,
    accessories: Mutex<HashMap<Uuid, Arc<dyn Accessory>>>,
}

impl Platform {
    pub fn new(client: Arc<dyn DeviceApi>, config: PlatformConfig) -> Self {
        Platform {
            client,
            config,
            accessories: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Arc<dyn Accessory>>> {
        self.accessories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-attach an accessory persisted by a previous run.
    ///
    /// The product type is read from the accessory context.
    pub fn restore(&self, accessory: PlatformAccessory) -> Result<Arc<dyn Accessory>> {
        let context = accessory.context();
        let product_type: ProductType = context
            .product_type
            .parse()
            .map_err(|_| Error::unsupported_device(&context.mac, &context.product_type))?;

        info!(
            "Restoring {} ({}) from cache",
            accessory.display_name(),
            context.mac
        );
        let uuid = accessory.uuid();
        let restored = build_accessory(self.client.clone(), product_type, accessory);
        self.lock().insert(uuid, restored.clone());
        Ok(restored)
    }

    pub fn accessory(&self, mac: &str) -> Option<Arc<dyn Accessory>> {
        self.lock()
            .values()
            .find(|a| a.device().mac() == mac)
            .cloned()
    }

    pub fn accessories(&self) -> Vec<Arc<dyn Accessory>> {
        self.lock().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Reconcile accessories with a device list.
    ///
    /// Updates run concurrently. A failing update is logged and counted; it
    /// never stops the other accessories from refreshing.
    pub async fn refresh(&self, list: &DeviceList) -> PollReport {
        let mut report = PollReport::default();
        let mut pending: Vec<(Arc<dyn Accessory>, &Device)> = Vec::new();

        {
            let mut accessories = self.lock();
            let mut seen = HashSet::new();

            for device in &list.devices {
                if self.config.is_excluded(&device.mac) {
                    debug!("Ignoring excluded device {}", device.mac);
                    continue;
                }

                let existing = accessories.values().find(|a| a.matches(device)).cloned();
                let accessory = match existing {
                    Some(accessory) => accessory,
                    None => match create_accessory(self.client.clone(), device) {
                        Ok(accessory) => {
                            info!(
                                "Adding {} ({}) as {}",
                                device.nickname, device.mac, device.product_type
                            );
                            accessories.insert(accessory.device().uuid(), accessory.clone());
                            report.added.push(device.mac.clone());
                            accessory
                        }
                        Err(e) => {
                            debug!("Skipping device: {e}");
                            continue;
                        }
                    },
                };

                seen.insert(accessory.device().uuid());
                pending.push((accessory, device));
            }

            accessories.retain(|uuid, accessory| {
                let keep = seen.contains(uuid);
                if !keep {
                    let mac = accessory.device().mac();
                    info!("Removing {} ({mac})", accessory.display_name());
                    report.removed.push(mac);
                }
                keep
            });
        }

        let results = join_all(
            pending
                .iter()
                .map(|(accessory, device)| accessory.update(device, list.ts)),
        )
        .await;

        for ((_, device), result) in pending.iter().zip(results) {
            match result {
                Ok(true) => report.refreshed += 1,
                Ok(false) => report.throttled += 1,
                Err(e) => {
                    warn!("Failed to refresh {} ({}): {e}", device.nickname, device.mac);
                    report.failed += 1;
                }
            }
        }

        debug!("Poll finished: {report:?}");
        report
    }

    /// Fetch the device list once and reconcile with it.
    pub async fn poll_once(&self) -> Result<PollReport> {
        let list = self.client.get_device_list().await?;
        Ok(self.refresh(&list).await)
    }

    /// Poll forever. Failed polls are logged and retried after the next
    /// interval.
    pub async fn run(&self) {
        let interval = self.config.refresh_interval();
        loop {
            if let Err(e) = self.poll_once().await {
                warn!("Failed to fetch device list: {e}");
            }
            runtime::sleep(interval).await;
        }
    }
}
