#![warn(missing_docs)]

//! A minimal [Bluetooth Low Energy] (BLE) peripheral. It publishes one GATT service with no characteristics,
//! advertises it under a name derived from the host's hardware address, and idles until the process is asked
//! to terminate.
//!
//! [Bluetooth Low Energy]: https://www.bluetooth.com/specifications/specs/
//!
//! # Usage
//!
//! ```rust,no_run
//!# use appliance_beacon::{lifecycle, BluerAdapter, Config, Shutdown, SystemInterfaces, UnixSignals};
//!# #[tokio::main]
//!# async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!let shutdown = Shutdown::new();
//!lifecycle::spawn_signal_handler(UnixSignals::new()?, shutdown.clone());
//!
//!let config = Config::default();
//!lifecycle::run(&config, &SystemInterfaces, BluerAdapter::new(), &shutdown).await?;
//!#
//!#    Ok(())
//!# }
//! ```
//!
//! # Overview
//!
//! Startup runs in three stages:
//!
//! - [Identity derivation][identity]: the device identity is a name-based hash of the first network interface
//!   with a hardware address; the service UUID is derived from fixed constants.
//! - [Adapter bring-up][configurator]: the adapter is enabled, the service registered, the advertisement
//!   configured and started, strictly in that order. The first failure ends startup.
//! - [Lifecycle][lifecycle]: the main task waits on a one-shot [`Shutdown`] flag that a background task cancels
//!   when SIGINT or SIGTERM arrives.
//!
//! The Bluetooth stack is reached through the [`Adapter`] and [`Advertisement`] traits. On Linux,
//! [`BluerAdapter`] implements them on top of BlueZ.
//!
//! # Exit status
//!
//! A signal-driven shutdown exits with status 0. Each failing startup step exits with its own non-zero status,
//! see [`Step::exit_code`].
//!
//! # Feature flags
//!
//! The `serde` feature is available to enable serializing/deserializing the identity types and [`Config`].

pub mod ad;
pub mod adapter;
pub mod config;
pub mod configurator;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod logging;

#[cfg(target_os = "linux")]
mod bluer;

pub use adapter::{Adapter, Advertisement, AdvertisementConfig, CharacteristicConfig, ServiceDescriptor};
#[cfg(target_os = "linux")]
pub use crate::bluer::adapter::BluerAdapter;
#[cfg(target_os = "linux")]
pub use crate::bluer::advertisement::BluerAdvertisement;
pub use config::Config;
pub use configurator::{AdapterState, Advertising, Configurator};
pub use error::{Error, StartupError, Step};
pub use identity::{DeviceIdentity, HardwareAddress, Identity, InterfaceSource, ServiceIdentifier, SystemInterfaces};
#[cfg(unix)]
pub use lifecycle::UnixSignals;
pub use lifecycle::{Shutdown, ShutdownSignal, SignalSource};
pub use uuid::Uuid;

/// Convenience alias for a result with [`Error`]
pub type Result<T, E = Error> = core::result::Result<T, E>;
