//! Counters threaded through a generation run

use crate::config::PrbCursorPolicy;

/// Mutable per-run counters: the eCPRI sequence identifier and the PRB cursor.
///
/// Both wrap silently. The sequence identifier advances once per emitted Ethernet frame;
/// the PRB cursor advances once per O-RAN packet and is masked to 10 bits on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamState {
    sequence_id: u8,
    prb_cursor: u16,
}

impl StreamState {
    pub fn new(initial_sequence_id: u8) -> Self {
        Self { sequence_id: initial_sequence_id, prb_cursor: 0 }
    }

    /// State at the start of symbol `symbol_index`, assuming every preceding symbol
    /// emitted `frames_per_symbol` frames and covered `prbs_per_symbol` PRBs.
    pub fn at_symbol(
        initial_sequence_id: u8,
        symbol_index: u64,
        frames_per_symbol: u64,
        prbs_per_symbol: u64,
        policy: PrbCursorPolicy,
    ) -> Self {
        let frames = symbol_index.wrapping_mul(frames_per_symbol);
        let sequence_id = initial_sequence_id.wrapping_add((frames % 256) as u8);
        let prb_cursor = match policy {
            PrbCursorPolicy::Continuous => {
                (symbol_index.wrapping_mul(prbs_per_symbol) % (u16::MAX as u64 + 1)) as u16
            }
            PrbCursorPolicy::ResetPerSymbol => 0,
        };
        Self { sequence_id, prb_cursor }
    }

    pub fn sequence_id(&self) -> u8 {
        self.sequence_id
    }

    pub fn prb_cursor(&self) -> u16 {
        self.prb_cursor
    }

    /// Apply the cursor policy at a symbol boundary.
    pub fn begin_symbol(&mut self, policy: PrbCursorPolicy) {
        if policy == PrbCursorPolicy::ResetPerSymbol {
            self.prb_cursor = 0;
        }
    }

    /// Current PRB cursor, then advance it by `num_prbu`.
    pub fn take_start_prbu(&mut self, num_prbu: u8) -> u16 {
        let start = self.prb_cursor;
        self.prb_cursor = self.prb_cursor.wrapping_add(num_prbu as u16);
        start
    }

    /// Current sequence identifier, then advance it by one.
    pub fn take_sequence_id(&mut self) -> u8 {
        let id = self.sequence_id;
        self.sequence_id = self.sequence_id.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sequence_id_wraps_after_255() {
        let mut state = StreamState::new(254);
        assert_eq!(state.take_sequence_id(), 254);
        assert_eq!(state.take_sequence_id(), 255);
        assert_eq!(state.take_sequence_id(), 0);
        assert_eq!(state.sequence_id(), 1);
    }

    #[test]
    fn sequence_id_returns_to_start_after_256_frames() {
        let mut state = StreamState::new(17);
        for _ in 0..256 {
            state.take_sequence_id();
        }
        assert_eq!(state.sequence_id(), 17);
    }

    #[test]
    fn prb_cursor_advances_and_wraps() {
        let mut state = StreamState::new(0);
        assert_eq!(state.take_start_prbu(8), 0);
        assert_eq!(state.take_start_prbu(8), 8);
        assert_eq!(state.prb_cursor(), 16);

        let mut state = StreamState { sequence_id: 0, prb_cursor: u16::MAX - 3 };
        assert_eq!(state.take_start_prbu(8), u16::MAX - 3);
        assert_eq!(state.prb_cursor(), 4);
    }

    #[test]
    fn reset_policy_clears_cursor_only() {
        let mut state = StreamState::new(7);
        state.take_start_prbu(50);
        state.begin_symbol(PrbCursorPolicy::Continuous);
        assert_eq!(state.prb_cursor(), 50);
        state.begin_symbol(PrbCursorPolicy::ResetPerSymbol);
        assert_eq!(state.prb_cursor(), 0);
        assert_eq!(state.sequence_id(), 7);
    }

    proptest! {
        #[test]
        fn at_symbol_matches_stepping(
            initial in any::<u8>(),
            symbols in 0u64..400,
            packets_per_symbol in 1u64..6,
            frames_per_packet in 1u64..4,
            nrb in 1u8..=255,
            reset in any::<bool>(),
        ) {
            let policy =
                if reset { PrbCursorPolicy::ResetPerSymbol } else { PrbCursorPolicy::Continuous };
            let mut stepped = StreamState::new(initial);
            for _ in 0..symbols {
                stepped.begin_symbol(policy);
                for _ in 0..packets_per_symbol {
                    stepped.take_start_prbu(nrb);
                    for _ in 0..frames_per_packet {
                        stepped.take_sequence_id();
                    }
                }
            }
            stepped.begin_symbol(policy);

            let jumped = StreamState::at_symbol(
                initial,
                symbols,
                packets_per_symbol * frames_per_packet,
                packets_per_symbol * nrb as u64,
                policy,
            );
            prop_assert_eq!(jumped, stepped);
        }
    }
}
