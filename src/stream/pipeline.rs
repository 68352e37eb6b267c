//! Per-symbol packet assembly
//!
//! For each packet of a symbol the builder draws the payload samples, encodes the O-RAN
//! packet, splits it when oversize, and wraps every piece in eCPRI and Ethernet. Each
//! emitted Ethernet frame consumes one sequence identifier.

use super::state::StreamState;
use crate::config::{Config, PrbCursorPolicy};
use crate::protocol::{EthernetFramer, OranHeader, ecpri_header, fragment, needs_fragmentation};
use crate::samples::SampleStream;
use crate::timing::TimingPlan;
use crate::{GridPosition, Result};
use tracing::trace;

/// Counts produced by building one or more symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildStats {
    pub oran_packets: u64,
    pub ethernet_frames: u64,
    pub fragmented_packets: u64,
    pub frame_bytes: u64,
}

impl BuildStats {
    pub fn merge(&mut self, other: BuildStats) {
        self.oran_packets += other.oran_packets;
        self.ethernet_frames += other.ethernet_frames;
        self.fragmented_packets += other.fragmented_packets;
        self.frame_bytes += other.frame_bytes;
    }
}

/// Reusable encoder for the packets of one run.
///
/// Holds scratch buffers, so one builder should be used per thread.
#[derive(Debug, Clone)]
pub struct PacketBuilder {
    framer: EthernetFramer,
    num_prbu: u8,
    pairs_per_packet: usize,
    packets_per_symbol: u32,
    max_fragment_size: usize,
    policy: PrbCursorPolicy,
    oran: Vec<u8>,
    ecpri: Vec<u8>,
    frame: Vec<u8>,
}

impl PacketBuilder {
    /// Builder for `config`, sized by `plan`.
    pub fn new(config: &Config, plan: &TimingPlan) -> Self {
        Self {
            framer: EthernetFramer::from_config(&config.ethernet),
            num_prbu: config.oran.nrb_per_packet as u8,
            pairs_per_packet: plan.pairs_per_packet(),
            packets_per_symbol: plan.packets_per_symbol(),
            max_fragment_size: config.oran.max_fragment_size,
            policy: config.oran.prb_cursor,
            oran: Vec::new(),
            ecpri: Vec::new(),
            frame: Vec::new(),
        }
    }

    /// Build every packet of the symbol at `position`, passing each Ethernet frame to
    /// `emit` in order.
    pub fn build_symbol<F>(
        &mut self,
        position: GridPosition,
        state: &mut StreamState,
        samples: &mut SampleStream,
        mut emit: F,
    ) -> Result<BuildStats>
    where
        F: FnMut(&[u8]) -> Result<()>,
    {
        state.begin_symbol(self.policy);
        let mut stats = BuildStats::default();
        for _ in 0..self.packets_per_symbol {
            stats.merge(self.build_packet(position, state, samples, &mut emit)?);
        }
        Ok(stats)
    }

    /// Build one O-RAN packet at `position` and its Ethernet frame(s).
    pub fn build_packet<F>(
        &mut self,
        position: GridPosition,
        state: &mut StreamState,
        samples: &mut SampleStream,
        mut emit: F,
    ) -> Result<BuildStats>
    where
        F: FnMut(&[u8]) -> Result<()>,
    {
        let start_prbu = state.take_start_prbu(self.num_prbu);
        let header = OranHeader::at(position, start_prbu, self.num_prbu);

        self.oran.clear();
        self.oran.extend_from_slice(&header.to_bytes());
        samples.read_payload(self.pairs_per_packet, &mut self.oran);

        let fragmented = needs_fragmentation(self.oran.len(), self.max_fragment_size);
        let mut stats = BuildStats {
            oran_packets: 1,
            fragmented_packets: fragmented as u64,
            ..BuildStats::default()
        };

        for piece in fragment(&self.oran, self.max_fragment_size)? {
            let sequence_id = state.take_sequence_id();

            self.ecpri.clear();
            self.ecpri.extend_from_slice(&ecpri_header(piece.len(), sequence_id));
            self.ecpri.extend_from_slice(piece);

            self.frame.clear();
            self.framer.frame_into(&self.ecpri, &mut self.frame);
            emit(&self.frame)?;

            stats.ethernet_frames += 1;
            stats.frame_bytes += self.frame.len() as u64;
        }

        trace!(
            frame = position.frame,
            subframe = position.subframe,
            slot = position.slot,
            symbol = position.symbol,
            start_prbu,
            frames = stats.ethernet_frames,
            sequence_id = state.sequence_id(),
            "Built O-RAN packet"
        );

        Ok(stats)
    }
}
