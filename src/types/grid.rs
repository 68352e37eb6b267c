//! Radio frame grid coordinates

/// Subframes per 10 ms radio frame.
pub const SUBFRAMES_PER_FRAME: u32 = 10;

/// OFDM symbols per slot (normal cyclic prefix).
pub const SYMBOLS_PER_SLOT: u32 = 14;

/// Radio frame duration in milliseconds.
pub const FRAME_DURATION_MS: u32 = 10;

/// Position of one symbol inside the capture grid.
///
/// `frame` counts from the start of the capture and is reduced modulo 256 only when
/// written to the O-RAN header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPosition {
    pub frame: u32,
    pub subframe: u8,
    pub slot: u8,
    pub symbol: u8,
}

impl GridPosition {
    pub fn new(frame: u32, subframe: u8, slot: u8, symbol: u8) -> Self {
        Self { frame, subframe, slot, symbol }
    }

    /// Frame identifier as carried on the wire.
    pub fn frame_id(&self) -> u8 {
        (self.frame % 256) as u8
    }

    /// Zero-based symbol index across the whole capture.
    pub fn symbol_index(&self, slots_per_subframe: u32) -> u64 {
        let slots_per_frame = (SUBFRAMES_PER_FRAME * slots_per_subframe) as u64;
        let slot_index = self.frame as u64 * slots_per_frame
            + self.subframe as u64 * slots_per_subframe as u64
            + self.slot as u64;
        slot_index * SYMBOLS_PER_SLOT as u64 + self.symbol as u64
    }
}

/// Iterator over every symbol position of a capture, frame-major.
#[derive(Debug, Clone)]
pub struct GridIter {
    frames: u32,
    slots_per_subframe: u32,
    next: Option<GridPosition>,
}

impl GridIter {
    pub fn new(frames: u32, slots_per_subframe: u32) -> Self {
        let next = (frames > 0 && slots_per_subframe > 0).then(GridPosition::default);
        Self { frames, slots_per_subframe, next }
    }
}

impl Iterator for GridIter {
    type Item = GridPosition;

    fn next(&mut self) -> Option<GridPosition> {
        let current = self.next?;
        let mut following = current;

        following.symbol += 1;
        if following.symbol as u32 == SYMBOLS_PER_SLOT {
            following.symbol = 0;
            following.slot += 1;
            if following.slot as u32 == self.slots_per_subframe {
                following.slot = 0;
                following.subframe += 1;
                if following.subframe as u32 == SUBFRAMES_PER_FRAME {
                    following.subframe = 0;
                    following.frame += 1;
                }
            }
        }

        self.next = (following.frame < self.frames).then_some(following);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterates_every_symbol_in_order() {
        let positions: Vec<_> = GridIter::new(2, 2).collect();
        assert_eq!(positions.len(), 2 * 10 * 2 * 14);
        assert_eq!(positions[0], GridPosition::new(0, 0, 0, 0));
        assert_eq!(positions[13], GridPosition::new(0, 0, 0, 13));
        assert_eq!(positions[14], GridPosition::new(0, 0, 1, 0));
        assert_eq!(positions[28], GridPosition::new(0, 1, 0, 0));
        assert_eq!(*positions.last().unwrap(), GridPosition::new(1, 9, 1, 13));

        for (index, position) in positions.iter().enumerate() {
            assert_eq!(position.symbol_index(2), index as u64);
        }
    }

    #[test]
    fn empty_capture_yields_nothing() {
        assert_eq!(GridIter::new(0, 4).count(), 0);
    }

    #[test]
    fn frame_id_wraps() {
        assert_eq!(GridPosition::new(255, 0, 0, 0).frame_id(), 255);
        assert_eq!(GridPosition::new(256, 0, 0, 0).frame_id(), 0);
        assert_eq!(GridPosition::new(300, 0, 0, 0).frame_id(), 44);
    }
}
