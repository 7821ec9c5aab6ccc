//! The vendor device API as seen by accessories.
//!
//! Talking HTTP to the vendor cloud and keeping a session alive is left to
//! the implementor. Errors returned here reach the caller of the accessory
//! operation untouched.

use crate::action::ActionList;
use crate::device::PropertyList;
use crate::errors::Error;
use crate::response::{DeviceList, WriteResponse};
use crate::runtime::BoxFuture;

type Result<T> = std::result::Result<T, Error>;

/// Vendor cloud device API.
pub trait DeviceApi: Send + Sync {
    /// All devices on the account, with the snapshot timestamp.
    fn get_device_list(&self) -> BoxFuture<'_, Result<DeviceList>>;

    /// Raw property list of one device.
    fn get_property_list<'a>(
        &'a self,
        mac: &'a str,
        model: &'a str,
    ) -> BoxFuture<'a, Result<PropertyList>>;

    /// Write a single property.
    fn set_property<'a>(
        &'a self,
        mac: &'a str,
        model: &'a str,
        pid: &'a str,
        value: &'a str,
    ) -> BoxFuture<'a, Result<WriteResponse>>;

    /// Apply a list of property writes under the given action key.
    fn run_actions<'a>(
        &'a self,
        mac: &'a str,
        model: &'a str,
        actions: &'a ActionList,
        action_key: &'a str,
    ) -> BoxFuture<'a, Result<WriteResponse>>;
}
