//! Process lifetime: startup, idling, and signal-driven shutdown.

use std::sync::Arc;

use async_trait::async_trait;
use futures_lite::future;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::adapter::{Adapter, AdvertisementConfig, ServiceDescriptor};
use crate::config::Config;
use crate::configurator::{self, Advertising};
use crate::error::Step;
use crate::identity::{Identity, InterfaceSource};
use crate::StartupError;

/// An operating-system request to terminate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShutdownSignal {
    /// Terminal interrupt (SIGINT)
    Interrupt,
    /// Termination request (SIGTERM)
    Terminate,
}

impl ShutdownSignal {
    /// The conventional name of the signal.
    pub fn name(self) -> &'static str {
        match self {
            ShutdownSignal::Interrupt => "SIGINT",
            ShutdownSignal::Terminate => "SIGTERM",
        }
    }
}

/// A one-shot, process-wide cancellation flag.
///
/// Clones share the same flag. Once cancelled it stays cancelled.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    /// Creates a flag that is not cancelled.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Shutdown { tx: Arc::new(tx) }
    }

    /// Cancels the flag. Returns `true` if this call was the one that cancelled it.
    pub fn cancel(&self) -> bool {
        self.tx.send_if_modified(|cancelled| !std::mem::replace(cancelled, true))
    }

    /// Returns `true` once [`Shutdown::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Waits until the flag is cancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

/// A source of [`ShutdownSignal`]s.
#[async_trait]
pub trait SignalSource: Send {
    /// Waits for the next signal. Returns `None` once no further signals can arrive.
    async fn next_signal(&mut self) -> Option<ShutdownSignal>;
}

/// SIGINT and SIGTERM delivered to this process.
#[cfg(unix)]
#[derive(Debug)]
pub struct UnixSignals {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl UnixSignals {
    /// Subscribes to SIGINT and SIGTERM. Must be called within a tokio runtime.
    pub fn new() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(UnixSignals {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }
}

#[cfg(unix)]
#[async_trait]
impl SignalSource for UnixSignals {
    async fn next_signal(&mut self) -> Option<ShutdownSignal> {
        let UnixSignals { interrupt, terminate } = self;
        future::or(
            async { interrupt.recv().await.map(|()| ShutdownSignal::Interrupt) },
            async { terminate.recv().await.map(|()| ShutdownSignal::Terminate) },
        )
        .await
    }
}

#[async_trait]
impl SignalSource for mpsc::Receiver<ShutdownSignal> {
    async fn next_signal(&mut self) -> Option<ShutdownSignal> {
        self.recv().await
    }
}

/// Spawns the background task that turns the first signal from `signals` into cancellation of `shutdown`.
///
/// The task finishes with the signal it acted on, or with `None` if `shutdown` was cancelled by someone else.
/// Signals arriving after the first are not read.
pub fn spawn_signal_handler<S>(mut signals: S, shutdown: Shutdown) -> JoinHandle<Option<ShutdownSignal>>
where
    S: SignalSource + 'static,
{
    tokio::spawn(async move {
        let received = future::or(async { signals.next_signal().await }, async {
            shutdown.cancelled().await;
            None
        })
        .await;

        match received {
            Some(signal) => {
                info!(signal = signal.name(), "received {}", signal.name());
                info!("shutting down");
                shutdown.cancel();
                Some(signal)
            }
            None => {
                // Either cancelled elsewhere or the source closed; only cancellation ends the wait.
                shutdown.cancelled().await;
                None
            }
        }
    })
}

/// Blocks until `shutdown` is cancelled while `advertising` stays up.
pub async fn hold<A: Adapter>(_advertising: &Advertising<A>, shutdown: &Shutdown) {
    shutdown.cancelled().await;
    info!("advertising stopped");
}

/// Runs the peripheral until `shutdown` is cancelled.
///
/// Resolves the identity from `interfaces`, brings `adapter` up to advertising, then idles. Returns `Ok(())`
/// on shutdown. If shutdown is requested while the adapter is being brought up, the pending step is abandoned
/// and no further adapter calls are made.
pub async fn run<A, S>(config: &Config, interfaces: &S, adapter: A, shutdown: &Shutdown) -> Result<(), StartupError>
where
    A: Adapter,
    S: InterfaceSource + ?Sized,
{
    let identity = Identity::resolve(config, interfaces).map_err(|err| {
        error!(error = %err, "problem deriving device identity");
        StartupError::new(Step::DeriveIdentity, err)
    })?;
    info!(device = %identity.device, service = %identity.service, "identity derived");

    let service = ServiceDescriptor::new(identity.service.uuid());
    let advertisement = AdvertisementConfig::new(config.local_name(&identity.device), vec![identity.service.uuid()]);

    let startup = async { Some(configurator::bring_up(adapter, &service, &advertisement).await) };
    let cancelled = async {
        shutdown.cancelled().await;
        None
    };
    let Some(advertising) = future::or(startup, cancelled).await.transpose()? else {
        info!("shutdown requested during startup");
        return Ok(());
    };

    info!(local_name = %advertisement.local_name, "advertising started");
    hold(&advertising, shutdown).await;
    Ok(())
}
