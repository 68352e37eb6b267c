//! Oversize O-RAN packet fragmentation
//!
//! An assembled O-RAN packet (header and payload) larger than the configured limit is cut
//! into consecutive chunks of at most that size. Fragments are raw slices of the original
//! buffer: no per-fragment O-RAN header is derived, and each fragment is encapsulated
//! independently downstream.

use crate::{FronthaulError, Result};
use std::slice::Chunks;

/// Whether a packet of `packet_len` bytes must be split.
pub fn needs_fragmentation(packet_len: usize, max_fragment_size: usize) -> bool {
    packet_len > max_fragment_size
}

/// Number of pieces a packet of `packet_len` bytes is emitted as.
///
/// A packet within the limit is a single piece. `max_fragment_size` must be non-zero.
pub fn fragment_count(packet_len: usize, max_fragment_size: usize) -> usize {
    packet_len.div_ceil(max_fragment_size)
}

/// Split `packet` into slices of at most `max_fragment_size` bytes.
///
/// The last slice carries the remainder; an exact multiple produces no empty trailing
/// fragment.
pub fn fragment(packet: &[u8], max_fragment_size: usize) -> Result<Chunks<'_, u8>> {
    if max_fragment_size == 0 {
        return Err(FronthaulError::config_error(
            "oran.max_fragment_size",
            "fragment size must be at least 1 byte",
        ));
    }
    Ok(packet.chunks(max_fragment_size))
}
