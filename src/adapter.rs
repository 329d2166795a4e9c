//! The Bluetooth stack seam.
//!
//! [`Adapter`] and [`Advertisement`] describe the handful of calls the startup sequence makes into the
//! platform's Bluetooth stack. On Linux they are implemented on top of BlueZ by
//! [`BluerAdapter`][crate::BluerAdapter]; tests substitute their own implementations.

use async_trait::async_trait;

use crate::{Result, Uuid};

/// A characteristic to expose in a GATT service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharacteristicConfig {
    /// The characteristic's UUID
    pub uuid: Uuid,
}

/// A GATT service to publish.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceDescriptor {
    /// The service's UUID
    pub uuid: Uuid,
    /// Whether the service is a primary service
    pub primary: bool,
    /// The characteristics of the service
    pub characteristics: Vec<CharacteristicConfig>,
}

impl ServiceDescriptor {
    /// A primary service with no characteristics.
    pub fn new(uuid: Uuid) -> Self {
        ServiceDescriptor {
            uuid,
            primary: true,
            characteristics: Vec::new(),
        }
    }
}

/// The content of an LE advertisement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdvertisementConfig {
    /// The complete local name of the device
    pub local_name: String,
    /// Advertised GATT service UUIDs
    pub service_uuids: Vec<Uuid>,
}

impl AdvertisementConfig {
    /// Creates an advertisement for `local_name` listing `service_uuids`.
    pub fn new(local_name: impl Into<String>, service_uuids: Vec<Uuid>) -> Self {
        AdvertisementConfig {
            local_name: local_name.into(),
            service_uuids,
        }
    }
}

/// A local Bluetooth adapter acting as a peripheral.
#[async_trait]
pub trait Adapter: Send {
    /// The advertisement type handed out by [`Adapter::default_advertisement`].
    type Advertisement: Advertisement;

    /// Powers on the radio.
    async fn enable(&mut self) -> Result<()>;

    /// Publishes `service` in the local GATT database.
    async fn add_service(&mut self, service: &ServiceDescriptor) -> Result<()>;

    /// Returns the adapter's advertisement, not yet configured.
    fn default_advertisement(&self) -> Self::Advertisement;
}

/// An LE advertisement owned by an [`Adapter`].
#[async_trait]
pub trait Advertisement: Send {
    /// Prepares the advertising payload.
    async fn configure(&mut self, config: &AdvertisementConfig) -> Result<()>;

    /// Starts broadcasting the configured payload.
    async fn start(&mut self) -> Result<()>;
}
