//! Ethernet framing
//!
//! Frame layout as emitted:
//!
//! ```text
//! | preamble+SFD (8) | dst (6) | src (6) | EtherType 0xAEFE (2) | payload | FCS (4) | 0x07 filler |
//! ```
//!
//! The FCS is computed over every preceding byte of the frame *including* the preamble,
//! and written most-significant byte first. Filler bytes pad the frame to a multiple of
//! four bytes. Payload length is not clamped to the 46..=1474 range.

use super::crc::FcsVariant;
use crate::MacAddress;
use crate::config::EthernetConfig;

pub const PREAMBLE_SFD: u64 = 0xFB55_5555_5555_55D5;
pub const PREAMBLE_SFD_SIZE: usize = 8;
pub const ETHER_TYPE_ECPRI: u16 = 0xAEFE;
pub const FCS_SIZE: usize = 4;

/// Bytes preceding the payload.
pub const ETHERNET_HEADER_SIZE: usize = PREAMBLE_SFD_SIZE + 6 + 6 + 2;

/// Inter-frame gap filler byte.
pub const IFG_FILLER: u8 = 0x07;

/// Frames are padded to this alignment.
pub const FRAME_ALIGNMENT: usize = 4;

/// Wraps eCPRI packets in Ethernet frames for one source/destination pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetFramer {
    destination: MacAddress,
    source: MacAddress,
    fcs: FcsVariant,
}

impl EthernetFramer {
    pub fn new(destination: MacAddress, source: MacAddress, fcs: FcsVariant) -> Self {
        Self { destination, source, fcs }
    }

    pub fn from_config(config: &EthernetConfig) -> Self {
        Self::new(config.dest_address, config.source_address, config.fcs)
    }

    pub fn destination(&self) -> MacAddress {
        self.destination
    }

    pub fn source(&self) -> MacAddress {
        self.source
    }

    /// Total emitted length for a payload of `payload_len` bytes, filler included.
    pub fn framed_len(payload_len: usize) -> usize {
        (ETHERNET_HEADER_SIZE + payload_len + FCS_SIZE).next_multiple_of(FRAME_ALIGNMENT)
    }

    /// Build a standalone frame around `payload`.
    pub fn frame(&self, payload: &[u8]) -> Vec<u8> {
        let mut frame = Vec::with_capacity(Self::framed_len(payload.len()));
        self.frame_into(payload, &mut frame);
        frame
    }

    /// Append a frame around `payload` to `out`.
    ///
    /// Bytes already in `out` are not covered by the FCS or the alignment padding.
    pub fn frame_into(&self, payload: &[u8], out: &mut Vec<u8>) {
        let start = out.len();
        out.reserve(Self::framed_len(payload.len()));

        out.extend_from_slice(&PREAMBLE_SFD.to_be_bytes());
        out.extend_from_slice(&self.destination.octets());
        out.extend_from_slice(&self.source.octets());
        out.extend_from_slice(&ETHER_TYPE_ECPRI.to_be_bytes());
        out.extend_from_slice(payload);

        let fcs = self.fcs.checksum(&out[start..]);
        out.extend_from_slice(&fcs.to_be_bytes());

        let framed = out.len() - start;
        out.resize(start + framed.next_multiple_of(FRAME_ALIGNMENT), IFG_FILLER);
    }
}
