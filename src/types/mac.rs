//! 48-bit MAC address parsed from colon-separated hex octets

use crate::{FronthaulError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 48-bit Ethernet hardware address, most-significant octet first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// Create a MAC address from raw octets.
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Raw octets in wire order.
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// The address as a 48-bit integer (upper 16 bits zero).
    pub fn to_u64(&self) -> u64 {
        self.0.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64)
    }
}

impl FromStr for MacAddress {
    type Err = FronthaulError;

    fn from_str(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let parts: Vec<&str> = trimmed.split(':').collect();
        if parts.len() != 6 {
            return Err(FronthaulError::invalid_mac(
                input,
                format!("expected 6 octets, found {}", parts.len()),
            ));
        }

        let mut octets = [0u8; 6];
        for (slot, part) in octets.iter_mut().zip(&parts) {
            if part.is_empty() || part.len() > 2 {
                return Err(FronthaulError::invalid_mac(
                    input,
                    format!("octet '{}' must be one or two hex digits", part),
                ));
            }
            *slot = u8::from_str_radix(part, 16).map_err(|e| {
                FronthaulError::invalid_mac(input, format!("octet '{}': {}", part, e))
            })?;
        }

        Ok(Self(octets))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = FronthaulError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.to_string()
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}", a, b, c, d, e, g)
    }
}
