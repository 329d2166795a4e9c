//! Device and service identity.
//!
//! The device identity is a short name-based hash of the host's first hardware address, so the same host
//! advertises under the same name across restarts. The service identifier depends only on fixed constants and
//! is identical on every host.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::config::Config;
use crate::error::ErrorKind;
use crate::{Error, Result};

/// The hardware (MAC) address of a network interface.
///
/// Formats as lowercase hex octets separated by `:`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HardwareAddress(Vec<u8>);

impl HardwareAddress {
    /// Creates an address from its raw octets.
    pub fn new(octets: impl Into<Vec<u8>>) -> Self {
        HardwareAddress(octets.into())
    }

    /// The raw octets of the address.
    pub fn octets(&self) -> &[u8] {
        &self.0
    }

    /// Returns `true` if the interface exposes no usable address (empty or all zero, as loopback reports).
    pub fn is_unset(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

impl fmt::Display for HardwareAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, octet) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{octet:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for HardwareAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::new(ErrorKind::InvalidParameter, None, format!("invalid hardware address {s:?}"));
        if s.is_empty() {
            return Err(invalid());
        }
        s.split([':', '-'])
            .map(|octet| {
                if octet.len() == 2 {
                    u8::from_str_radix(octet, 16).map_err(|_| invalid())
                } else {
                    Err(invalid())
                }
            })
            .collect::<Result<Vec<u8>>>()
            .map(HardwareAddress)
    }
}

impl From<mac_address::MacAddress> for HardwareAddress {
    fn from(addr: mac_address::MacAddress) -> Self {
        HardwareAddress(addr.bytes().to_vec())
    }
}

/// A provider of the local network interfaces' hardware addresses.
pub trait InterfaceSource {
    /// Lists the hardware address of every interface, in interface order.
    fn hardware_addresses(&self) -> Result<Vec<HardwareAddress>>;
}

/// The host's network interfaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInterfaces;

impl InterfaceSource for SystemInterfaces {
    fn hardware_addresses(&self) -> Result<Vec<HardwareAddress>> {
        Ok(mac_address::MacAddressIterator::new()?
            .map(HardwareAddress::from)
            .collect())
    }
}

impl InterfaceSource for [HardwareAddress] {
    fn hardware_addresses(&self) -> Result<Vec<HardwareAddress>> {
        Ok(self.to_vec())
    }
}

/// Returns the first address in `source` that is not unset.
pub fn first_hardware_address<S: InterfaceSource + ?Sized>(source: &S) -> Result<HardwareAddress> {
    source
        .hardware_addresses()?
        .into_iter()
        .find(|addr| !addr.is_unset())
        .ok_or_else(|| ErrorKind::NoHardwareAddress.into())
}

/// The short identifier appended to the advertised local name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceIdentity(String);

impl DeviceIdentity {
    /// Length of a device identity in characters.
    pub const LEN: usize = 8;

    /// Derives the identity of the host owning `addr`.
    ///
    /// This is the first [`Self::LEN`] characters of the version 3 UUID of the address's text form in the nil
    /// namespace.
    pub fn derive(addr: &HardwareAddress) -> Self {
        let uuid = Uuid::new_v3(&Uuid::nil(), addr.to_string().as_bytes());
        let mut id = uuid.hyphenated().to_string();
        id.truncate(Self::LEN);
        DeviceIdentity(id)
    }

    /// The identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The UUID of the advertised GATT service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceIdentifier(Uuid);

impl ServiceIdentifier {
    /// Derives the service UUID for `application_tag` within the namespace of `namespace_domain`.
    ///
    /// The namespace is the version 5 UUID of the domain in the DNS namespace; the service is the version 5
    /// UUID of the tag in that namespace.
    pub fn derive(namespace_domain: &str, application_tag: &str) -> Self {
        let namespace = Uuid::new_v5(&Uuid::NAMESPACE_DNS, namespace_domain.as_bytes());
        ServiceIdentifier(Uuid::new_v5(&namespace, application_tag.as_bytes()))
    }

    /// The identifier as a UUID.
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ServiceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The identities resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Identity of this host
    pub device: DeviceIdentity,
    /// Identifier of the advertised service
    pub service: ServiceIdentifier,
}

impl Identity {
    /// Resolves both identities, reading the hardware address from `interfaces`.
    pub fn resolve<S: InterfaceSource + ?Sized>(config: &Config, interfaces: &S) -> Result<Self> {
        let addr = first_hardware_address(interfaces)?;
        tracing::debug!(address = %addr, "using hardware address");
        Ok(Identity {
            device: DeviceIdentity::derive(&addr),
            service: ServiceIdentifier::derive(&config.namespace_domain, &config.application_tag),
        })
    }
}
