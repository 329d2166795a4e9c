use async_trait::async_trait;
use bluer::gatt::local::{Application, ApplicationHandle, Service};
use bluer::Session;
use tracing::{debug, info};

use super::advertisement::BluerAdvertisement;
use crate::adapter::{Adapter, ServiceDescriptor};
use crate::error::ErrorKind;
use crate::{Error, Result};

/// The system's default Bluetooth adapter, driven through BlueZ.
///
/// Nothing is contacted until [`Adapter::enable`] is called. Published services stay registered for as long
/// as the `BluerAdapter` lives.
#[derive(Default)]
pub struct BluerAdapter {
    _session: Option<Session>,
    inner: Option<bluer::Adapter>,
    applications: Vec<ApplicationHandle>,
}

impl std::fmt::Debug for BluerAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BluerAdapter")
            .field("adapter", &self.inner.as_ref().map(|adapter| adapter.name()))
            .field("applications", &self.applications.len())
            .finish()
    }
}

impl BluerAdapter {
    /// Creates a handle to the default adapter. The adapter is resolved by [`Adapter::enable`].
    pub fn new() -> Self {
        Self::default()
    }

    fn enabled(&self) -> Result<&bluer::Adapter> {
        self.inner
            .as_ref()
            .ok_or_else(|| Error::new(ErrorKind::NotReady, None, "adapter is not enabled"))
    }
}

#[async_trait]
impl Adapter for BluerAdapter {
    type Advertisement = BluerAdvertisement;

    async fn enable(&mut self) -> Result<()> {
        let session = Session::new().await.map_err(|err| {
            Error::new(
                ErrorKind::AdapterUnavailable,
                Some(Box::new(err)),
                "cannot reach the Bluetooth daemon",
            )
        })?;
        let adapter = session.default_adapter().await.map_err(|err| {
            Error::new(
                ErrorKind::AdapterUnavailable,
                Some(Box::new(err)),
                "no default Bluetooth adapter",
            )
        })?;
        adapter.set_powered(true).await?;
        let address = adapter.address().await?;
        info!(
            adapter = adapter.name(),
            address = %address,
            "adapter powered on"
        );

        self._session = Some(session);
        self.inner = Some(adapter);
        Ok(())
    }

    async fn add_service(&mut self, service: &ServiceDescriptor) -> Result<()> {
        if !service.characteristics.is_empty() {
            return Err(Error::new(
                ErrorKind::NotSupported,
                None,
                "services with characteristics are not supported",
            ));
        }

        let app = Application {
            services: vec![Service {
                uuid: service.uuid,
                primary: service.primary,
                characteristics: Vec::new(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let handle = self.enabled()?.serve_gatt_application(app).await?;
        debug!(uuid = %service.uuid, "GATT application served");
        self.applications.push(handle);
        Ok(())
    }

    fn default_advertisement(&self) -> BluerAdvertisement {
        BluerAdvertisement::new(self.inner.clone())
    }
}
