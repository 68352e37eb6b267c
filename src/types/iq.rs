//! I/Q sample representation

/// Size in bytes of one serialized I/Q pair.
pub const IQ_PAIR_SIZE: usize = 4;

/// One complex baseband sample: signed 16-bit in-phase and quadrature components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IqSample {
    pub i: i16,
    pub q: i16,
}

impl IqSample {
    pub const fn new(i: i16, q: i16) -> Self {
        Self { i, q }
    }

    /// Little-endian wire form: `I_lo I_hi Q_lo Q_hi`.
    pub fn to_le_bytes(self) -> [u8; IQ_PAIR_SIZE] {
        let [i0, i1] = self.i.to_le_bytes();
        let [q0, q1] = self.q.to_le_bytes();
        [i0, i1, q0, q1]
    }
}
