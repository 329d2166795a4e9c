use async_trait::async_trait;
use bluer::adv::{AdvertisementHandle, Type};
use tracing::debug;

use crate::adapter::{Advertisement, AdvertisementConfig};
use crate::error::ErrorKind;
use crate::{Error, Result};

/// An LE advertisement registered with BlueZ.
///
/// Broadcasting continues while this value lives.
pub struct BluerAdvertisement {
    adapter: Option<bluer::Adapter>,
    payload: Option<bluer::adv::Advertisement>,
    handle: Option<AdvertisementHandle>,
}

impl std::fmt::Debug for BluerAdvertisement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BluerAdvertisement")
            .field("adapter", &self.adapter.as_ref().map(|adapter| adapter.name()))
            .field("payload", &self.payload)
            .field("started", &self.handle.is_some())
            .finish()
    }
}

impl BluerAdvertisement {
    pub(super) fn new(adapter: Option<bluer::Adapter>) -> Self {
        BluerAdvertisement {
            adapter,
            payload: None,
            handle: None,
        }
    }
}

#[async_trait]
impl Advertisement for BluerAdvertisement {
    async fn configure(&mut self, config: &AdvertisementConfig) -> Result<()> {
        let payload = bluer::adv::Advertisement {
            advertisement_type: Type::Peripheral,
            service_uuids: config.service_uuids.iter().copied().collect(),
            local_name: Some(config.local_name.clone()),
            discoverable: Some(true),
            ..Default::default()
        };
        debug!(?payload, "advertisement configured");
        self.payload = Some(payload);
        Ok(())
    }

    async fn start(&mut self) -> Result<()> {
        let adapter = self
            .adapter
            .as_ref()
            .ok_or_else(|| Error::new(ErrorKind::NotReady, None, "adapter is not enabled"))?;
        let payload = self
            .payload
            .take()
            .ok_or_else(|| Error::new(ErrorKind::NotReady, None, "advertisement is not configured"))?;
        let handle = adapter.advertise(payload).await?;
        self.handle = Some(handle);
        Ok(())
    }
}
