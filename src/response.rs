//! Vendor API response types.

use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::throttle::Timestamp;

/// Confirmation returned by the vendor for a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteResponse {
    /// When the vendor applied the write.
    pub ts: Timestamp,
}

impl WriteResponse {
    pub fn new(ts: Timestamp) -> Self {
        WriteResponse { ts }
    }
}

/// The device list returned by one poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceList {
    #[serde(default, rename = "device_list")]
    pub devices: Vec<Device>,
    /// When the vendor produced this snapshot.
    pub ts: Timestamp,
}

impl DeviceList {
    pub fn new(devices: Vec<Device>, ts: Timestamp) -> Self {
        DeviceList { devices, ts }
    }
}
