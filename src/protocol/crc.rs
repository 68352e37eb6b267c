//! CRC32 frame check sequence
//!
//! Two variants are available:
//!
//! - [`FcsVariant::Ieee8023`]: the standard reflected CRC-32 (poly 0x04C11DB7, reflected
//!   form 0xEDB88320, init 0xFFFFFFFF, final complement). Check value for
//!   `"123456789"` is `0xCBF43926`.
//! - [`FcsVariant::Legacy`]: shifts right but XORs the *unreflected* polynomial
//!   0x04C11DB7. This is not a standard CRC; it reproduces captures made by older
//!   tooling byte for byte.

use crc::{CRC_32_ISO_HDLC, Crc};
use serde::{Deserialize, Serialize};

const IEEE_802_3: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

const LEGACY_POLY: u32 = 0x04C1_1DB7;

/// Frame check algorithm applied by the Ethernet framer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FcsVariant {
    #[default]
    Ieee8023,
    Legacy,
}

impl FcsVariant {
    pub fn checksum(self, data: &[u8]) -> u32 {
        match self {
            FcsVariant::Ieee8023 => crc32_ieee(data),
            FcsVariant::Legacy => crc32_legacy(data),
        }
    }
}

/// Standard IEEE 802.3 CRC-32.
pub fn crc32_ieee(data: &[u8]) -> u32 {
    IEEE_802_3.checksum(data)
}

/// Right-shifting CRC that XORs the unreflected 0x04C11DB7 polynomial.
pub fn crc32_legacy(data: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFF_FFFF;
    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ LEGACY_POLY } else { crc >> 1 };
        }
    }
    !crc
}
