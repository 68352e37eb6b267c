//! Wire encoders for the three protocol layers.
//!
//! Each layer is an independent encoder that takes the previous layer's output as an
//! opaque byte buffer:
//!
//! ```text
//! I/Q bytes ──► O-RAN packet ──► [fragments] ──► eCPRI packet ──► Ethernet frame
//! ```
//!
//! ```rust
//! use fronthaul::protocol::{EthernetFramer, FcsVariant, OranHeader, encapsulate_ecpri, encode_oran_packet};
//! use fronthaul::GridPosition;
//!
//! let header = OranHeader::at(GridPosition::new(0, 1, 0, 3), 0, 1);
//! let oran = encode_oran_packet(&header, &[0u8; 48]);
//! let ecpri = encapsulate_ecpri(&oran, 0);
//! let framer = EthernetFramer::new(
//!     "00:11:22:33:44:55".parse()?,
//!     "66:77:88:99:aa:bb".parse()?,
//!     FcsVariant::Ieee8023,
//! );
//! let frame = framer.frame(&ecpri);
//! assert_eq!(frame.len() % 4, 0);
//! # Ok::<(), fronthaul::FronthaulError>(())
//! ```

pub mod crc;
pub mod ecpri;
pub mod ethernet;
pub mod fragment;
pub mod oran;

pub use crc::{FcsVariant, crc32_ieee, crc32_legacy};
pub use ecpri::{ECPRI_HEADER_SIZE, ECPRI_MAX_PAYLOAD, ecpri_header, encapsulate_ecpri};
pub use ethernet::{
    ETHER_TYPE_ECPRI, ETHERNET_HEADER_SIZE, EthernetFramer, FCS_SIZE, IFG_FILLER, PREAMBLE_SFD,
};
pub use fragment::{fragment, fragment_count, needs_fragmentation};
pub use oran::{BYTES_PER_PRB, ORAN_HEADER_SIZE, OranHeader, encode_oran_packet};
