//! Legacy LE advertising payload limits.
//!
//! BlueZ places the service UUID list in the advertising data and the local name in the scan response. Each
//! of the two is limited to 31 octets of AD structures (Core Specification Vol 3, Part C, §11).

use crate::adapter::AdvertisementConfig;
use crate::error::ErrorKind;
use crate::{Error, Result, Uuid};

/// Maximum length of legacy advertising data or scan response data.
pub const MAX_LEGACY_DATA_LEN: usize = 31;

/// Length of the Flags AD structure.
const FLAGS_LEN: usize = 3;

/// Length and type octets preceding every AD structure's data.
const AD_HEADER_LEN: usize = 2;

/// This is the Bluetooth Base UUID. 16-bit and 32-bit SIG assigned UUIDs are aliases within it.
const BLUETOOTH_BASE_UUID: u128 = 0x00000000_0000_1000_8000_00805f9b34fb;

/// Number of octets `uuid` occupies in a service UUID list: 2, 4 or 16.
pub fn uuid_width(uuid: &Uuid) -> usize {
    let u = uuid.as_u128();
    if (u & ((1 << 96) - 1)) != BLUETOOTH_BASE_UUID {
        16
    } else if (u >> 112) == 0 {
        2
    } else {
        4
    }
}

/// Length of the advertising data carrying `config`: the flags and one service UUID list per UUID width.
pub fn advertising_data_len(config: &AdvertisementConfig) -> usize {
    let lists: usize = [2, 4, 16]
        .into_iter()
        .map(|width| {
            let count = config.service_uuids.iter().filter(|u| uuid_width(u) == width).count();
            if count == 0 {
                0
            } else {
                AD_HEADER_LEN + count * width
            }
        })
        .sum();
    FLAGS_LEN + lists
}

/// Length of the scan response carrying the complete local name of `config`.
pub fn scan_response_len(config: &AdvertisementConfig) -> usize {
    AD_HEADER_LEN + config.local_name.len()
}

impl AdvertisementConfig {
    /// Checks that the name is usable and that the payload fits legacy advertising.
    pub fn validate(&self) -> Result<()> {
        if self.local_name.is_empty() {
            return Err(Error::new(ErrorKind::InvalidParameter, None, "local name is empty"));
        }
        if self.local_name.chars().any(char::is_control) {
            return Err(Error::new(
                ErrorKind::InvalidParameter,
                None,
                format!("local name {:?} contains control characters", self.local_name),
            ));
        }
        if self.service_uuids.iter().any(Uuid::is_nil) {
            return Err(Error::new(ErrorKind::InvalidParameter, None, "nil service UUID"));
        }

        let adv_len = advertising_data_len(self);
        if adv_len > MAX_LEGACY_DATA_LEN {
            return Err(Error::new(
                ErrorKind::PayloadTooLarge,
                None,
                format!("advertising data is {adv_len} octets, limit is {MAX_LEGACY_DATA_LEN}"),
            ));
        }
        let scan_len = scan_response_len(self);
        if scan_len > MAX_LEGACY_DATA_LEN {
            return Err(Error::new(
                ErrorKind::PayloadTooLarge,
                None,
                format!("scan response is {scan_len} octets, limit is {MAX_LEGACY_DATA_LEN}"),
            ));
        }
        Ok(())
    }
}
