//! Fixed naming constants for the advertised peripheral.

use crate::identity::DeviceIdentity;

/// Prefix of the advertised local name. The device identity is appended to it.
pub const LOCAL_NAME_PREFIX: &str = "ApplianceMonitor - ";

/// Domain name hashed into the DNS namespace to form the service namespace.
pub const NAMESPACE_DOMAIN: &str = "www.danesparza.net";

/// Application tag hashed into the service namespace to form the service UUID.
pub const APPLICATION_TAG: &str = "ble-test";

/// Naming configuration of the peripheral.
///
/// The binary always runs with [`Config::default()`]; the fields exist so embedders and tests can derive
/// identities for other applications.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Prefix of the advertised local name
    pub local_name_prefix: String,
    /// Domain name the service namespace is derived from
    pub namespace_domain: String,
    /// Application tag the service UUID is derived from
    pub application_tag: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            local_name_prefix: LOCAL_NAME_PREFIX.to_string(),
            namespace_domain: NAMESPACE_DOMAIN.to_string(),
            application_tag: APPLICATION_TAG.to_string(),
        }
    }
}

impl Config {
    /// The local name advertised for `device`.
    pub fn local_name(&self, device: &DeviceIdentity) -> String {
        format!("{}{}", self.local_name_prefix, device)
    }
}
