//! Timing and capacity budget
//!
//! Derives the iteration grid and the idle-time filler budget for one capture:
//!
//! 1. numerology from the sub-carrier spacing, `slots/subframe = 2^μ`
//! 2. `frames = capture_ms / 10` (remainder dropped)
//! 3. `subframes = frames × 10`, `slots = subframes × slots/subframe`, `symbols = slots × 14`
//! 4. `packets/symbol = ceil(max_nrb / nrb_per_packet)`, `packets = packets/symbol × symbols`
//! 5. `bits/packet = nrb_per_packet × 12 × 2 × 16`
//! 6. `t_packet = (max_packet_size + min_ifg) × 8 / line_rate`
//! 7. `t_total = t_packet × (packets / 2)` with integer halving
//! 8. `t_idle = 10 ms − t_total`, `idle gaps = t_idle / (min_ifg × 8 / line_rate)`
//!
//! The halving in step 7 is carried over unchanged from earlier captures so generated
//! streams stay comparable; it is not derived from the link model.

use crate::protocol::{ORAN_HEADER_SIZE, fragment_count};
use crate::{
    Config, FRAME_DURATION_MS, FronthaulError, IQ_PAIR_SIZE, Result, SUBFRAMES_PER_FRAME,
    SYMBOLS_PER_SLOT,
};
use tracing::{info, warn};

/// Subcarriers per resource block.
pub const SUBCARRIERS_PER_PRB: u32 = 12;

/// Bit width of one I or Q component.
pub const IQ_BIT_WIDTH: u32 = 16;

/// Non-fatal anomaly found while budgeting a capture.
#[derive(Debug, Clone, PartialEq)]
pub enum CapacityWarning {
    /// The packets do not fit in the frame at this line rate.
    NegativeIdleTime { remaining_seconds: f64 },
    /// No inter-frame gap size was configured, so no idle filler can be budgeted.
    ZeroInterFrameGap,
    /// The capture is shorter than one radio frame.
    EmptyCapture { capture_size_ms: u32 },
}

/// Derived, read-only plan for a generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingPlan {
    slots_per_subframe: u32,
    frames: u32,
    subframes: u64,
    slots: u64,
    symbols: u64,
    packets_per_symbol: u32,
    total_packets: u64,
    bits_per_packet: u64,
    pairs_per_packet: usize,
    frames_per_packet: usize,
    packet_transmission_time: f64,
    total_transmission_time: f64,
    remaining_time: f64,
    idle_gap_count: u64,
    warnings: Vec<CapacityWarning>,
}

impl TimingPlan {
    /// Compute the plan for `config`.
    pub fn compute(config: &Config) -> Result<Self> {
        config.validate()?;
        let eth = &config.ethernet;
        let oran = &config.oran;
        let mut warnings = Vec::new();

        let slots_per_subframe = oran.scs.slots_per_subframe();
        let frames = eth.capture_size_ms / FRAME_DURATION_MS;
        if frames == 0 {
            warnings.push(CapacityWarning::EmptyCapture { capture_size_ms: eth.capture_size_ms });
        }
        // Wide enough for any u32 capture length at every numerology.
        let subframes = frames as u64 * SUBFRAMES_PER_FRAME as u64;
        let slots = subframes * slots_per_subframe as u64;
        let symbols = slots * SYMBOLS_PER_SLOT as u64;

        let packets_per_symbol = oran.max_nrb.div_ceil(oran.nrb_per_packet);
        let total_packets = (packets_per_symbol as u64).checked_mul(symbols).ok_or_else(|| {
            FronthaulError::config_error(
                "ethernet.capture_size_ms",
                format!(
                    "{} symbols of {} packets each exceed the countable packet total",
                    symbols, packets_per_symbol
                ),
            )
        })?;
        let bits_per_packet =
            oran.nrb_per_packet as u64 * SUBCARRIERS_PER_PRB as u64 * 2 * IQ_BIT_WIDTH as u64;

        let pairs_per_packet = (oran.nrb_per_packet * SUBCARRIERS_PER_PRB) as usize;
        let oran_packet_len = ORAN_HEADER_SIZE + pairs_per_packet * IQ_PAIR_SIZE;
        let frames_per_packet = fragment_count(oran_packet_len, oran.max_fragment_size);

        let bits_per_second = eth.line_rate_gbps * 1e9;
        let ifg_bytes = eth.min_ifgs_per_packet as u64;
        let packet_transmission_time =
            ((eth.max_packet_size as u64 + ifg_bytes) * 8) as f64 / bits_per_second;
        let total_transmission_time = packet_transmission_time * (total_packets / 2) as f64;
        let frame_duration = FRAME_DURATION_MS as f64 / 1e3;
        let remaining_time = frame_duration - total_transmission_time;

        let idle_gap_count = if remaining_time < 0.0 {
            warn!(
                remaining_seconds = remaining_time,
                line_rate_gbps = eth.line_rate_gbps,
                "Line rate too slow for the configured load; no idle gaps will be emitted"
            );
            warnings.push(CapacityWarning::NegativeIdleTime { remaining_seconds: remaining_time });
            0
        } else if ifg_bytes == 0 {
            warn!("Minimum inter-frame gap is zero; no idle gaps will be emitted");
            warnings.push(CapacityWarning::ZeroInterFrameGap);
            0
        } else {
            let ifg_time = (ifg_bytes * 8) as f64 / bits_per_second;
            (remaining_time / ifg_time) as u64
        };

        let plan = Self {
            slots_per_subframe,
            frames,
            subframes,
            slots,
            symbols,
            packets_per_symbol,
            total_packets,
            bits_per_packet,
            pairs_per_packet,
            frames_per_packet,
            packet_transmission_time,
            total_transmission_time,
            remaining_time,
            idle_gap_count,
            warnings,
        };

        info!(
            slots_per_subframe = plan.slots_per_subframe,
            frames = plan.frames,
            subframes = plan.subframes,
            slots = plan.slots,
            symbols = plan.symbols,
            packets_per_symbol = plan.packets_per_symbol,
            total_packets = plan.total_packets,
            bits_per_packet = plan.bits_per_packet,
            remaining_seconds = plan.remaining_time,
            idle_gaps = plan.idle_gap_count,
            "Computed timing plan"
        );

        Ok(plan)
    }

    pub fn slots_per_subframe(&self) -> u32 {
        self.slots_per_subframe
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn subframes(&self) -> u64 {
        self.subframes
    }

    pub fn slots(&self) -> u64 {
        self.slots
    }

    pub fn symbols(&self) -> u64 {
        self.symbols
    }

    pub fn packets_per_symbol(&self) -> u32 {
        self.packets_per_symbol
    }

    pub fn total_packets(&self) -> u64 {
        self.total_packets
    }

    pub fn bits_per_packet(&self) -> u64 {
        self.bits_per_packet
    }

    /// I/Q pairs drawn from the sample stream for each O-RAN packet.
    pub fn pairs_per_packet(&self) -> usize {
        self.pairs_per_packet
    }

    /// Ethernet frames emitted per O-RAN packet (more than one when fragmented).
    pub fn frames_per_packet(&self) -> usize {
        self.frames_per_packet
    }

    /// Seconds to send one maximum-size packet plus its gap.
    pub fn packet_transmission_time(&self) -> f64 {
        self.packet_transmission_time
    }

    pub fn total_transmission_time(&self) -> f64 {
        self.total_transmission_time
    }

    /// Idle seconds left in the frame; negative when over budget.
    pub fn remaining_time(&self) -> f64 {
        self.remaining_time
    }

    /// Filler bytes emitted after the grid.
    pub fn idle_gap_count(&self) -> u64 {
        self.idle_gap_count
    }

    pub fn warnings(&self) -> &[CapacityWarning] {
        &self.warnings
    }

    /// Ethernet frames the full grid will produce, saturating at `u64::MAX`.
    pub fn total_frames_emitted(&self) -> u64 {
        self.total_packets.saturating_mul(self.frames_per_packet as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SubcarrierSpacing;

    fn config(scs: SubcarrierSpacing, capture_ms: u32, max_nrb: u32, nrb: u32) -> Config {
        let mut config = Config::default();
        config.oran.scs = scs;
        config.ethernet.capture_size_ms = capture_ms;
        config.oran.max_nrb = max_nrb;
        config.oran.nrb_per_packet = nrb;
        config
    }

    #[test]
    fn grid_scales_with_numerology() {
        for (scs, slots) in [
            (SubcarrierSpacing::Khz15, 1),
            (SubcarrierSpacing::Khz30, 2),
            (SubcarrierSpacing::Khz60, 4),
        ] {
            let plan = TimingPlan::compute(&config(scs, 20, 24, 8)).unwrap();
            assert_eq!(plan.slots_per_subframe(), slots);
            assert_eq!(plan.frames(), 2);
            assert_eq!(plan.subframes(), 20);
            assert_eq!(plan.slots(), 20 * slots as u64);
            assert_eq!(plan.symbols(), 20 * slots as u64 * 14);
        }
    }

    #[test]
    fn partial_frames_are_truncated() {
        let plan = TimingPlan::compute(&config(SubcarrierSpacing::Khz15, 25, 24, 8)).unwrap();
        assert_eq!(plan.frames(), 2);

        let plan = TimingPlan::compute(&config(SubcarrierSpacing::Khz15, 9, 24, 8)).unwrap();
        assert_eq!(plan.frames(), 0);
        assert_eq!(plan.total_packets(), 0);
        assert!(plan.warnings().contains(&CapacityWarning::EmptyCapture { capture_size_ms: 9 }));
    }

    #[test]
    fn long_captures_count_past_u32() {
        let plan =
            TimingPlan::compute(&config(SubcarrierSpacing::Khz60, 2_000_000_000, 24, 8)).unwrap();
        assert_eq!(plan.frames(), 200_000_000);
        assert_eq!(plan.subframes(), 2_000_000_000);
        assert_eq!(plan.slots(), 8_000_000_000);
        assert_eq!(plan.symbols(), 112_000_000_000);
        assert_eq!(plan.total_packets(), 336_000_000_000);
        assert_eq!(plan.idle_gap_count(), 0);
    }

    #[test]
    fn uncountable_packet_total_is_a_config_error() {
        let cfg = config(SubcarrierSpacing::Khz60, u32::MAX, u32::MAX, 1);
        match TimingPlan::compute(&cfg) {
            Err(FronthaulError::Config { field, .. }) => {
                assert_eq!(field, "ethernet.capture_size_ms")
            }
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn packets_per_symbol_rounds_up() {
        let plan = TimingPlan::compute(&config(SubcarrierSpacing::Khz30, 10, 273, 20)).unwrap();
        assert_eq!(plan.packets_per_symbol(), 14);
        assert_eq!(plan.bits_per_packet(), 20 * 12 * 2 * 16);
        assert_eq!(plan.pairs_per_packet(), 240);
    }

    #[test]
    fn reference_capacity_budget() {
        let plan = TimingPlan::compute(&config(SubcarrierSpacing::Khz30, 10, 24, 8)).unwrap();
        assert_eq!(plan.symbols(), 280);
        assert_eq!(plan.packets_per_symbol(), 3);
        assert_eq!(plan.total_packets(), 840);
        assert_eq!(plan.bits_per_packet(), 3072);
        assert!((plan.packet_transmission_time() - 4.8384e-7).abs() < 1e-18);
        assert!((plan.remaining_time() - 0.0097967872).abs() < 1e-12);
        assert_eq!(plan.idle_gap_count(), 2_551_246);
        assert_eq!(plan.frames_per_packet(), 1);
        assert!(plan.warnings().is_empty());
    }

    #[test]
    fn overloaded_link_warns_and_emits_no_gaps() {
        let mut cfg = config(SubcarrierSpacing::Khz60, 100, 273, 1);
        cfg.ethernet.line_rate_gbps = 1.0;
        let plan = TimingPlan::compute(&cfg).unwrap();
        assert!(plan.remaining_time() < 0.0);
        assert_eq!(plan.idle_gap_count(), 0);
        assert!(matches!(plan.warnings(), [CapacityWarning::NegativeIdleTime { .. }]));
    }

    #[test]
    fn zero_gap_size_is_not_a_division_by_zero() {
        let mut cfg = config(SubcarrierSpacing::Khz30, 10, 24, 8);
        cfg.ethernet.min_ifgs_per_packet = 0;
        let plan = TimingPlan::compute(&cfg).unwrap();
        assert_eq!(plan.idle_gap_count(), 0);
        assert_eq!(plan.warnings(), &[CapacityWarning::ZeroInterFrameGap]);
    }

    #[test]
    fn oversize_packets_count_their_fragments() {
        // 8 + 255 * 48 = 12248 bytes -> ceil(12248 / 1466) = 9
        let plan = TimingPlan::compute(&config(SubcarrierSpacing::Khz30, 10, 255, 255)).unwrap();
        assert_eq!(plan.packets_per_symbol(), 1);
        assert_eq!(plan.frames_per_packet(), 9);
        assert_eq!(plan.total_frames_emitted(), 280 * 9);
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let mut cfg = Config::default();
        cfg.oran.nrb_per_packet = 0;
        assert!(TimingPlan::compute(&cfg).is_err());
    }
}
