//! Platform configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Configuration block for the platform, as found in a Homebridge-style
/// `config.json`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use wyze_lights_rs::PlatformConfig;
///
/// let config = PlatformConfig::from_json(r#"{"refreshInterval": 30000}"#).unwrap();
/// assert_eq!(config.refresh_interval(), Duration::from_secs(30));
/// assert!(config.exclude.is_empty());
/// ```
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformConfig {
    /// Display name of the platform instance.
    #[serde(default)]
    pub name: Option<String>,
    /// Milliseconds between device list polls.
    #[serde(default = "PlatformConfig::default_refresh_interval")]
    pub refresh_interval: u64,
    /// MAC addresses that should never become accessories.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        PlatformConfig {
            name: None,
            refresh_interval: Self::default_refresh_interval(),
            exclude: Vec::new(),
        }
    }
}

impl PlatformConfig {
    pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 60_000;
    pub const MIN_REFRESH_INTERVAL_MS: u64 = 1_000;

    fn default_refresh_interval() -> u64 {
        Self::DEFAULT_REFRESH_INTERVAL_MS
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(Error::JsonLoad)
    }

    /// Poll interval, never shorter than one second.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use wyze_lights_rs::PlatformConfig;
    ///
    /// let config = PlatformConfig { refresh_interval: 10, ..Default::default() };
    /// assert_eq!(config.refresh_interval(), Duration::from_secs(1));
    /// ```
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval.max(Self::MIN_REFRESH_INTERVAL_MS))
    }

    pub fn is_excluded(&self, mac: &str) -> bool {
        self.exclude.iter().any(|excluded| excluded == mac)
    }
}
