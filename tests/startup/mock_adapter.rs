//! Recording stand-in for the Bluetooth stack.

use std::sync::{Arc, Mutex};

use appliance_beacon::error::ErrorKind;
use appliance_beacon::{Adapter, Advertisement, AdvertisementConfig, Error, Result, ServiceDescriptor};
use async_trait::async_trait;

/// A call received by the mock, in order of arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Enable,
    AddService(ServiceDescriptor),
    Configure(AdvertisementConfig),
    Start,
}

/// Which call the mock rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Enable,
    AddService,
    Configure,
    Start,
}

#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }
}

pub struct MockAdapter {
    log: CallLog,
    fail_at: Option<FailAt>,
}

impl MockAdapter {
    pub fn new(log: CallLog) -> Self {
        MockAdapter { log, fail_at: None }
    }

    pub fn failing(log: CallLog, fail_at: FailAt) -> Self {
        MockAdapter {
            log,
            fail_at: Some(fail_at),
        }
    }
}

fn check(fail_at: Option<FailAt>, here: FailAt, kind: ErrorKind) -> Result<()> {
    if fail_at == Some(here) {
        Err(Error::new(kind, None, format!("mock rejected {here:?}")))
    } else {
        Ok(())
    }
}

#[async_trait]
impl Adapter for MockAdapter {
    type Advertisement = MockAdvertisement;

    async fn enable(&mut self) -> Result<()> {
        self.log.push(Call::Enable);
        check(self.fail_at, FailAt::Enable, ErrorKind::AdapterUnavailable)
    }

    async fn add_service(&mut self, service: &ServiceDescriptor) -> Result<()> {
        self.log.push(Call::AddService(service.clone()));
        check(self.fail_at, FailAt::AddService, ErrorKind::Other)
    }

    fn default_advertisement(&self) -> MockAdvertisement {
        MockAdvertisement {
            log: self.log.clone(),
            fail_at: self.fail_at,
        }
    }
}

pub struct MockAdvertisement {
    log: CallLog,
    fail_at: Option<FailAt>,
}

#[async_trait]
impl Advertisement for MockAdvertisement {
    async fn configure(&mut self, config: &AdvertisementConfig) -> Result<()> {
        self.log.push(Call::Configure(config.clone()));
        check(self.fail_at, FailAt::Configure, ErrorKind::InvalidParameter)
    }

    async fn start(&mut self) -> Result<()> {
        self.log.push(Call::Start);
        check(self.fail_at, FailAt::Start, ErrorKind::NotReady)
    }
}
