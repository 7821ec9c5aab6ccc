use crate::hap::{CharacteristicType, CharacteristicValue, ServiceType};

/// All error types that can occur while mirroring Wyze devices.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to serialize data to JSON.
    #[error("failed to dump json: {0:?}")]
    JsonDump(serde_json::Error),

    /// Failed to deserialize JSON data.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// The device API answered with a failure for the given method.
    #[error("device api {method} failed: {message}")]
    Api { method: String, message: String },

    /// The device API could not be reached at all.
    #[error("device api transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// No set handler is wired for the characteristic on this accessory.
    #[error("characteristic {0} cannot be set on this accessory")]
    UnsupportedCharacteristic(CharacteristicType),

    /// The value does not have the type the characteristic expects.
    #[error("invalid value {value:?} for characteristic {characteristic}")]
    InvalidValue {
        characteristic: CharacteristicType,
        value: CharacteristicValue,
    },

    /// The accessory does not expose the requested service.
    #[error("service {0} not found")]
    ServiceNotFound(ServiceType),

    /// The product type has no accessory implementation.
    #[error("unsupported product type {product_type:?} for device {mac}")]
    UnsupportedDevice { mac: String, product_type: String },
}

impl Error {
    /// Create a new API error
    pub fn api(method: &str, message: impl Into<String>) -> Self {
        Error::Api {
            method: method.to_string(),
            message: message.into(),
        }
    }

    /// Wrap a transport-level failure raised by a device API client
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Transport(Box::new(err))
    }

    pub fn invalid_value(characteristic: CharacteristicType, value: &CharacteristicValue) -> Self {
        Error::InvalidValue {
            characteristic,
            value: value.clone(),
        }
    }

    pub fn unsupported_device(mac: &str, product_type: &str) -> Self {
        Error::UnsupportedDevice {
            mac: mac.to_string(),
            product_type: product_type.to_string(),
        }
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
