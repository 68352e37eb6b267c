//! O-RAN user-plane data section header
//!
//! ```text
//!  byte | bits 7..0
//! ------+--------------------------------------------------------------
//!   0   | dataDirection / payloadVersion / filterIndex (always 0)
//!   1   | frameId
//!   2   | subframeId[3:0]            | slotId[5:2]
//!   3   | slotId[1:0] | symbolId[5:0]
//!   4   | sectionId[11:4]
//!   5   | sectionId[3:0] | rb | symInc | startPrbu[9:8]
//!   6   | startPrbu[7:0]
//!   7   | numPrbu
//! ```

use crate::GridPosition;

/// Encoded header length in bytes.
pub const ORAN_HEADER_SIZE: usize = 8;

/// First header byte: downlink, payload version and filter index all zero.
pub const ORAN_FIRST_BYTE: u8 = 0x00;

/// Bytes of I/Q payload per resource block (12 subcarriers × 4-byte pairs).
pub const BYTES_PER_PRB: usize = 12 * crate::IQ_PAIR_SIZE;

const SECTION_ID_MASK: u16 = 0x0FFF;
const START_PRBU_MASK: u16 = 0x03FF;

/// Header fields of one O-RAN data section.
///
/// Values wider than their wire field are masked on encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OranHeader {
    pub frame_id: u8,
    pub subframe_id: u8,
    pub slot_id: u8,
    pub symbol_id: u8,
    pub section_id: u16,
    pub rb: bool,
    pub sym_inc: bool,
    pub start_prbu: u16,
    pub num_prbu: u8,
}

impl OranHeader {
    /// Header for a packet at `position` covering `num_prbu` PRBs from `start_prbu`.
    pub fn at(position: GridPosition, start_prbu: u16, num_prbu: u8) -> Self {
        Self {
            frame_id: position.frame_id(),
            subframe_id: position.subframe,
            slot_id: position.slot,
            symbol_id: position.symbol,
            start_prbu,
            num_prbu,
            ..Self::default()
        }
    }

    pub fn to_bytes(&self) -> [u8; ORAN_HEADER_SIZE] {
        let section_id = self.section_id & SECTION_ID_MASK;
        let start_prbu = self.start_prbu & START_PRBU_MASK;

        [
            ORAN_FIRST_BYTE,
            self.frame_id,
            ((self.subframe_id & 0x0F) << 4) | ((self.slot_id >> 2) & 0x0F),
            ((self.slot_id & 0x03) << 6) | (self.symbol_id & 0x3F),
            (section_id >> 4) as u8,
            (((section_id & 0x0F) as u8) << 4)
                | ((self.rb as u8) << 3)
                | ((self.sym_inc as u8) << 2)
                | ((start_prbu >> 8) as u8 & 0x03),
            (start_prbu & 0xFF) as u8,
            self.num_prbu,
        ]
    }
}

/// Header followed by the payload, verbatim.
pub fn encode_oran_packet(header: &OranHeader, payload: &[u8]) -> Vec<u8> {
    let mut packet = Vec::with_capacity(ORAN_HEADER_SIZE + payload.len());
    packet.extend_from_slice(&header.to_bytes());
    packet.extend_from_slice(payload);
    packet
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_boundary_header_exactly() {
        let header = OranHeader::at(GridPosition::new(255, 9, 3, 13), 1023, 8);
        assert_eq!(header.to_bytes(), [0x00, 0xFF, 0x90, 0xCD, 0x00, 0x03, 0xFF, 0x08]);
    }

    #[test]
    fn packs_section_id_and_flags() {
        let header = OranHeader {
            section_id: 0xABC,
            rb: true,
            sym_inc: true,
            start_prbu: 0x155,
            num_prbu: 16,
            ..OranHeader::default()
        };
        let bytes = header.to_bytes();
        assert_eq!(bytes[4], 0xAB);
        assert_eq!(bytes[5], 0xC0 | 0x08 | 0x04 | 0x01);
        assert_eq!(bytes[6], 0x55);
        assert_eq!(bytes[7], 16);
    }

    #[test]
    fn wide_values_are_masked_to_their_fields() {
        let header = OranHeader { slot_id: 0x3F, symbol_id: 0xFF, start_prbu: 0x0400, ..OranHeader::default() };
        let bytes = header.to_bytes();
        assert_eq!(bytes[2], 0x0F);
        assert_eq!(bytes[3], 0xFF);
        assert_eq!(bytes[5] & 0x03, 0);
        assert_eq!(bytes[6], 0);
    }

    #[test]
    fn frame_id_wraps_modulo_256() {
        let header = OranHeader::at(GridPosition::new(257, 0, 0, 0), 0, 1);
        assert_eq!(header.to_bytes()[1], 1);
    }

    #[test]
    fn appends_payload_verbatim() {
        let payload = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let packet = encode_oran_packet(&OranHeader::default(), &payload);
        assert_eq!(packet.len(), ORAN_HEADER_SIZE + payload.len());
        assert_eq!(&packet[ORAN_HEADER_SIZE..], &payload);
    }

    proptest! {
        #[test]
        fn fields_decode_back_from_bit_layout(
            subframe in 0u8..10,
            slot in 0u8..4,
            symbol in 0u8..14,
            section in 0u16..0x1000,
            start in 0u16..0x400,
            rb in any::<bool>(),
            sym_inc in any::<bool>(),
        ) {
            let header = OranHeader {
                subframe_id: subframe,
                slot_id: slot,
                symbol_id: symbol,
                section_id: section,
                rb,
                sym_inc,
                start_prbu: start,
                ..OranHeader::default()
            };
            let b = header.to_bytes();
            prop_assert_eq!(b[2] >> 4, subframe);
            prop_assert_eq!(((b[2] & 0x0F) << 2) | (b[3] >> 6), slot);
            prop_assert_eq!(b[3] & 0x3F, symbol);
            prop_assert_eq!(((b[4] as u16) << 4) | (b[5] >> 4) as u16, section);
            prop_assert_eq!((b[5] >> 3) & 1 == 1, rb);
            prop_assert_eq!((b[5] >> 2) & 1 == 1, sym_inc);
            prop_assert_eq!((((b[5] & 0x03) as u16) << 8) | b[6] as u16, start);
        }
    }
}
