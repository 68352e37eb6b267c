//! Test utilities shared by unit tests, integration tests and benchmarks
//!
//! Decoding here is written field by field against the documented wire layout rather
//! than through the encoders, so tests built on it check the encoders independently.

#![cfg(any(test, feature = "benchmark"))]

use crate::config::Config;
use crate::protocol::{ECPRI_HEADER_SIZE, ETHERNET_HEADER_SIZE, EthernetFramer, FCS_SIZE};
use crate::{MacAddress, SubcarrierSpacing};
use std::path::{Path, PathBuf};

/// The worked capacity scenario: 25 Gbit/s, 10 ms, 30 kHz, 24 PRBs in packets of 8,
/// 1500-byte packets, 12 IFG bytes.
pub fn reference_config() -> Config {
    let mut config = Config::default();
    config.ethernet.line_rate_gbps = 25.0;
    config.ethernet.capture_size_ms = 10;
    config.ethernet.min_ifgs_per_packet = 12;
    config.ethernet.max_packet_size = 1500;
    config.oran.scs = SubcarrierSpacing::Khz30;
    config.oran.max_nrb = 24;
    config.oran.nrb_per_packet = 8;
    config
}

/// Write `pairs` as a text sample file named `name` in `dir`.
pub fn write_sample_file(dir: &Path, name: &str, pairs: &[(i32, i32)]) -> PathBuf {
    let text: String = pairs.iter().map(|(i, q)| format!("{i} {q}\n")).collect();
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap_or_else(|e| panic!("writing {}: {e}", path.display()));
    path
}

/// Fields of one emitted Ethernet frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame<'a> {
    pub preamble: [u8; 8],
    pub destination: MacAddress,
    pub source: MacAddress,
    pub ether_type: u16,
    pub ecpri_header: [u8; ECPRI_HEADER_SIZE],
    pub ecpri_payload_len: usize,
    pub sequence_id: u8,
    /// eCPRI payload: the O-RAN packet or one fragment of it.
    pub payload: &'a [u8],
    pub fcs: u32,
    /// Bytes before the FCS, the range it covers.
    pub covered: &'a [u8],
    pub padding: &'a [u8],
}

/// Decode a single frame, padding included. The eCPRI size field locates the FCS.
pub fn decode_frame(frame: &[u8]) -> DecodedFrame<'_> {
    let octets = |at: usize| -> [u8; 6] { frame[at..at + 6].try_into().unwrap() };
    let ecpri_at = ETHERNET_HEADER_SIZE;
    let ecpri_header: [u8; ECPRI_HEADER_SIZE] =
        frame[ecpri_at..ecpri_at + ECPRI_HEADER_SIZE].try_into().unwrap();
    let ecpri_payload_len = u16::from_be_bytes([ecpri_header[2], ecpri_header[3]]) as usize;

    let payload_at = ecpri_at + ECPRI_HEADER_SIZE;
    let fcs_at = payload_at + ecpri_payload_len;
    let fcs = u32::from_be_bytes(frame[fcs_at..fcs_at + FCS_SIZE].try_into().unwrap());

    DecodedFrame {
        preamble: frame[..8].try_into().unwrap(),
        destination: MacAddress::new(octets(8)),
        source: MacAddress::new(octets(14)),
        ether_type: u16::from_be_bytes([frame[20], frame[21]]),
        ecpri_header,
        ecpri_payload_len,
        sequence_id: ecpri_header[5],
        payload: &frame[payload_at..fcs_at],
        fcs,
        covered: &frame[..fcs_at],
        padding: &frame[fcs_at + FCS_SIZE..],
    }
}

/// Split a generated stream into its Ethernet frames, stopping at the idle filler.
pub fn split_frames(stream: &[u8]) -> Vec<&[u8]> {
    const PREAMBLE_START: u8 = 0xFB;
    let mut frames = Vec::new();
    let mut rest = stream;
    while rest.len() >= ETHERNET_HEADER_SIZE + ECPRI_HEADER_SIZE && rest[0] == PREAMBLE_START {
        let size = u16::from_be_bytes([rest[ETHERNET_HEADER_SIZE + 2], rest[ETHERNET_HEADER_SIZE + 3]]);
        let len = EthernetFramer::framed_len(ECPRI_HEADER_SIZE + size as usize);
        let (frame, tail) = rest.split_at(len);
        frames.push(frame);
        rest = tail;
    }
    frames
}
