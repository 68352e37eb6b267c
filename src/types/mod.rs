//! Core value types shared by the protocol encoders and the stream generator.
//!
//! - [`MacAddress`] parses and renders 48-bit Ethernet addresses
//! - [`SubcarrierSpacing`] maps 15/30/60 kHz to numerology and slot counts
//! - [`IqSample`] is one signed 16-bit I/Q pair with its little-endian wire form
//! - [`GridPosition`] and [`GridIter`] walk the frame/subframe/slot/symbol grid

mod grid;
mod iq;
mod mac;
mod subcarrier_spacing;

pub use grid::{
    FRAME_DURATION_MS, GridIter, GridPosition, SUBFRAMES_PER_FRAME, SYMBOLS_PER_SLOT,
};
pub use iq::{IQ_PAIR_SIZE, IqSample};
pub use mac::MacAddress;
pub use subcarrier_spacing::SubcarrierSpacing;
