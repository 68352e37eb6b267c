//! eCPRI transport header
//!
//! ```text
//!  byte | field
//! ------+------------------------------
//!   0   | revision / reserved (0x00)
//!   1   | message type (0x00, IQ data)
//!  2..3 | payload size, big-endian
//!   4   | PC/RTC id (0x00)
//!   5   | sequence id
//! ```
//!
//! The sequence identifier is supplied by the caller; this module never advances it.

use tracing::warn;

pub const ECPRI_HEADER_SIZE: usize = 6;

/// Largest payload whose size is representable in the header.
pub const ECPRI_MAX_PAYLOAD: usize = 8191;

pub const ECPRI_VERSION: u8 = 0x00;
pub const ECPRI_MESSAGE_IQ_DATA: u8 = 0x00;
pub const ECPRI_PC_RTC: u8 = 0x00;

/// Build the 6-byte header for a payload of `payload_len` bytes.
///
/// An unrepresentable size is logged and encoded as zero.
pub fn ecpri_header(payload_len: usize, sequence_id: u8) -> [u8; ECPRI_HEADER_SIZE] {
    let size = if payload_len > ECPRI_MAX_PAYLOAD {
        warn!(
            payload_len,
            max = ECPRI_MAX_PAYLOAD,
            "eCPRI payload exceeds representable size; writing zero length"
        );
        0u16
    } else {
        payload_len as u16
    };
    let [size_hi, size_lo] = size.to_be_bytes();

    [ECPRI_VERSION, ECPRI_MESSAGE_IQ_DATA, size_hi, size_lo, ECPRI_PC_RTC, sequence_id]
}

/// Header followed by `payload`.
pub fn encapsulate_ecpri(payload: &[u8], sequence_id: u8) -> Vec<u8> {
    let mut packet = Vec::with_capacity(ECPRI_HEADER_SIZE + payload.len());
    packet.extend_from_slice(&ecpri_header(payload.len(), sequence_id));
    packet.extend_from_slice(payload);
    packet
}
