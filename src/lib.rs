//! # wyze_lights_rs
//!
//! An async Rust library that mirrors Wyze cloud smart lights into a
//! HomeKit-style accessory model and sends local changes back to the cloud.
//!
//! The crate does not talk HTTP itself. Bring an implementation of
//! [`DeviceApi`] for the vendor cloud; the crate decides what to read, what
//! to write and when a poll is allowed to overwrite what is displayed.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use wyze_lights_rs::{Platform, PlatformConfig};
//!
//! async fn mirror(client: Arc<dyn wyze_lights_rs::DeviceApi>) -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PlatformConfig::from_json(r#"{"refreshInterval": 30000}"#)?;
//!     let platform = Platform::new(client, config);
//!
//!     // One poll: create, refresh and drop accessories to match the account
//!     let report = platform.poll_once().await?;
//!     println!("added {:?}", report.added);
//!
//!     // Or keep polling forever
//!     platform.run().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Runtime Agnostic**: Works with tokio, async-std, or smol async runtimes
//! - **Lights**: Power, brightness and color temperature with [`LightAccessory`]
//! - **Mesh Lights**: Everything a light does plus color with [`MeshLightAccessory`]
//! - **Unit Conversion**: Kelvin and packed colors to accessory units in [`convert`]
//! - **Write Throttling**: Polls never overwrite a fresh write, see [`ThrottleGate`]
//! - **Diagnostics**: Per-accessory [`MessageHistory`] of vendor traffic
//!
//! ## Throttling
//!
//! Every write marks its accessory as updating until the vendor confirms it.
//! A device snapshot is applied only when no write is in flight and it was
//! taken more than one second after the last confirmed write. Older
//! snapshots would show the light flicking back to its previous state.
//!
//! ## Runtime Selection
//!
//! ### Using tokio (default)
//!
//! ```toml
//! [dependencies]
//! wyze-lights-rs = "0.1"
//! tokio = { version = "1", features = ["rt-multi-thread", "macros"] }
//! ```
//!
//! ### Using async-std
//!
//! ```toml
//! [dependencies]
//! wyze-lights-rs = { version = "0.1", default-features = false, features = ["runtime-async-std"] }
//! async-std = { version = "1.12", features = ["attributes"] }
//! ```
//!
//! ### Using smol
//!
//! ```toml
//! [dependencies]
//! wyze-lights-rs = { version = "0.1", default-features = false, features = ["runtime-smol"] }
//! smol = "2"
//! ```
//!
//! ## Feature Flags
//!
//! - `runtime-tokio` (default): Use the tokio async runtime
//! - `runtime-async-std`: Use the async-std runtime
//! - `runtime-smol`: Use the smol runtime

mod accessory;
mod action;
mod client;
mod config;
pub mod convert;
mod device;
mod errors;
pub mod hap;
mod history;
mod light;
mod mesh_light;
mod platform;
mod response;
pub mod runtime;
mod status;
mod throttle;
mod types;

#[cfg(test)]
mod testing;

// Re-export public API
pub use accessory::{Accessory, DeviceAccessory, MANUFACTURER};
pub use action::{Action, ActionList, MESH_PROPERTY_ACTION_KEY, pid};
pub use client::DeviceApi;
pub use config::PlatformConfig;
pub use device::{Device, DeviceParams, ProductType, Property, PropertyList};
pub use errors::Error;
pub use hap::{PlatformAccessory, ServiceType};
pub use history::{HistoryEntry, HistorySummary, MessageHistory, MessageType};
pub use light::{LightAccessory, PropertyDecoder, PropertyTable};
pub use mesh_light::MeshLightAccessory;
pub use platform::{Platform, PollReport, create_accessory};
pub use response::{DeviceList, WriteResponse};
pub use status::LightState;
pub use throttle::{THROTTLE_WINDOW_MS, ThrottleGate, Timestamp, WriteGuard};
pub use types::{Brightness, ColorTemperature, Hsb, Kelvin, PowerMode};
