//! Adapter bring-up.
//!
//! The adapter moves through [`AdapterState`] strictly in order. Every step is attempted once; the first
//! failure is logged where it happens and ends the sequence.

use tracing::{debug, error};

use crate::adapter::{Adapter, Advertisement, AdvertisementConfig, ServiceDescriptor};
use crate::error::{ErrorKind, Step};
use crate::{Error, StartupError};

/// How far the adapter has been brought up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AdapterState {
    /// Nothing has been done yet
    Disabled,
    /// The radio is powered on
    Enabled,
    /// The GATT service is published
    ServiceRegistered,
    /// The advertising payload is prepared
    AdvertisementConfigured,
    /// The advertisement is being broadcast
    Advertising,
}

/// Drives an [`Adapter`] from [`AdapterState::Disabled`] to [`AdapterState::Advertising`].
pub struct Configurator<A: Adapter> {
    adapter: A,
    advertisement: Option<A::Advertisement>,
    state: AdapterState,
}

impl<A: Adapter> Configurator<A> {
    /// Takes ownership of a disabled adapter.
    pub fn new(adapter: A) -> Self {
        Configurator {
            adapter,
            advertisement: None,
            state: AdapterState::Disabled,
        }
    }

    /// The current state.
    pub fn state(&self) -> AdapterState {
        self.state
    }

    /// Powers on the radio.
    pub async fn enable(&mut self) -> Result<(), StartupError> {
        self.expect(AdapterState::Disabled, Step::Enable)?;
        self.adapter.enable().await.map_err(|err| fail(Step::Enable, err))?;
        self.advance(AdapterState::Enabled);
        Ok(())
    }

    /// Publishes `service`.
    pub async fn register_service(&mut self, service: &ServiceDescriptor) -> Result<(), StartupError> {
        self.expect(AdapterState::Enabled, Step::RegisterService)?;
        if service.uuid.is_nil() {
            return Err(fail(
                Step::RegisterService,
                Error::new(ErrorKind::InvalidParameter, None, "nil service UUID"),
            ));
        }
        self.adapter
            .add_service(service)
            .await
            .map_err(|err| fail(Step::RegisterService, err))?;
        debug!(uuid = %service.uuid, "service registered");
        self.advance(AdapterState::ServiceRegistered);
        Ok(())
    }

    /// Validates `config` and prepares the adapter's default advertisement with it.
    pub async fn configure_advertisement(&mut self, config: &AdvertisementConfig) -> Result<(), StartupError> {
        self.expect(AdapterState::ServiceRegistered, Step::ConfigureAdvertisement)?;
        config
            .validate()
            .map_err(|err| fail(Step::ConfigureAdvertisement, err))?;
        let mut advertisement = self.adapter.default_advertisement();
        advertisement
            .configure(config)
            .await
            .map_err(|err| fail(Step::ConfigureAdvertisement, err))?;
        self.advertisement = Some(advertisement);
        self.advance(AdapterState::AdvertisementConfigured);
        Ok(())
    }

    /// Starts broadcasting, handing the adapter over to the returned [`Advertising`] session.
    pub async fn start_advertising(mut self) -> Result<Advertising<A>, StartupError> {
        self.expect(AdapterState::AdvertisementConfigured, Step::StartAdvertising)?;
        let Some(mut advertisement) = self.advertisement.take() else {
            return Err(fail(Step::StartAdvertising, ErrorKind::Internal.into()));
        };
        advertisement
            .start()
            .await
            .map_err(|err| fail(Step::StartAdvertising, err))?;
        self.advance(AdapterState::Advertising);
        Ok(Advertising {
            _adapter: self.adapter,
            _advertisement: advertisement,
        })
    }

    fn expect(&self, expected: AdapterState, step: Step) -> Result<(), StartupError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(fail(
                step,
                Error::new(
                    ErrorKind::NotReady,
                    None,
                    format!("adapter is {:?}, expected {:?}", self.state, expected),
                ),
            ))
        }
    }

    fn advance(&mut self, state: AdapterState) {
        debug!(from = ?self.state, to = ?state, "adapter state changed");
        self.state = state;
    }
}

fn fail(step: Step, err: Error) -> StartupError {
    error!(%step, error = %err, "problem {step}");
    StartupError::new(step, err)
}

/// A started advertisement.
///
/// Keeps the adapter and the advertisement alive. Nothing is torn down explicitly when it is dropped; the
/// platform stack releases whatever it holds.
pub struct Advertising<A: Adapter> {
    _adapter: A,
    _advertisement: A::Advertisement,
}

/// Runs every step in order: enable, register `service`, configure `advertisement`, start.
pub async fn bring_up<A: Adapter>(
    adapter: A,
    service: &ServiceDescriptor,
    advertisement: &AdvertisementConfig,
) -> Result<Advertising<A>, StartupError> {
    let mut configurator = Configurator::new(adapter);
    configurator.enable().await?;
    configurator.register_service(service).await?;
    configurator.configure_advertisement(advertisement).await?;
    configurator.start_advertising().await
}
