//! Sequential stream generation

use super::pipeline::{BuildStats, PacketBuilder};
use super::sink::ByteSink;
use super::state::StreamState;
use crate::config::Config;
use crate::samples::SampleStream;
use crate::timing::TimingPlan;
use crate::{GridIter, Result};
use std::time::Instant;
use tracing::{debug, info};

/// What a generation run emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub oran_packets: u64,
    pub ethernet_frames: u64,
    /// O-RAN packets that were split across more than one frame.
    pub fragmented_packets: u64,
    /// Frame and idle filler bytes written to the sink.
    pub bytes_emitted: u64,
    pub idle_gap_bytes: u64,
    /// Sequence identifier the next frame would have carried.
    pub final_sequence_id: u8,
}

impl RunSummary {
    pub(crate) fn from_build(stats: BuildStats, idle_gap_bytes: u64, final_sequence_id: u8) -> Self {
        Self {
            oran_packets: stats.oran_packets,
            ethernet_frames: stats.ethernet_frames,
            fragmented_packets: stats.fragmented_packets,
            bytes_emitted: stats.frame_bytes + idle_gap_bytes,
            idle_gap_bytes,
            final_sequence_id,
        }
    }
}

/// Drives the grid walk for one configuration.
///
/// Iterates frame → subframe → slot → symbol → packet, hands every Ethernet frame to the
/// sink in that order, then appends the idle gap block.
///
/// ```rust
/// use fronthaul::{Config, Generator, SampleStream};
///
/// let config = Config::default();
/// let samples = SampleStream::random(1, 128)?;
/// let generator = Generator::new(config, samples)?;
///
/// let mut out = Vec::new();
/// let summary = generator.run(&mut out)?;
/// assert_eq!(summary.oran_packets, generator.plan().total_packets());
/// # Ok::<(), fronthaul::FronthaulError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Generator {
    config: Config,
    plan: TimingPlan,
    samples: SampleStream,
}

impl Generator {
    /// Validate `config` and compute its timing plan.
    pub fn new(config: Config, samples: SampleStream) -> Result<Self> {
        let plan = TimingPlan::compute(&config)?;
        Ok(Self { config, plan, samples })
    }

    /// Build the sample source from the configuration as well.
    pub fn from_config(config: Config) -> Result<Self> {
        let samples = SampleStream::from_config(&config)?;
        Self::new(config, samples)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn plan(&self) -> &TimingPlan {
        &self.plan
    }

    pub fn samples(&self) -> &SampleStream {
        &self.samples
    }

    /// Generate the full stream into `sink`.
    ///
    /// Every run starts from the configured initial sequence identifier and the first
    /// sample, so repeated runs produce identical output.
    pub fn run<S: ByteSink>(&self, mut sink: S) -> Result<RunSummary> {
        let started = Instant::now();
        let mut builder = PacketBuilder::new(&self.config, &self.plan);
        let mut state = StreamState::new(self.config.ecpri.initial_sequence_id);
        let mut samples = self.samples.at(0);
        let mut totals = BuildStats::default();
        let mut frame_stats = BuildStats::default();
        let mut current_frame = None;

        for position in GridIter::new(self.plan.frames(), self.plan.slots_per_subframe()) {
            if current_frame != Some(position.frame) {
                if let Some(frame) = current_frame {
                    debug!(frame, packets = frame_stats.oran_packets, "Finished radio frame");
                    totals.merge(std::mem::take(&mut frame_stats));
                }
                sink.begin_radio_frame(position.frame)?;
                current_frame = Some(position.frame);
            }

            frame_stats.merge(builder.build_symbol(position, &mut state, &mut samples, |frame| {
                sink.write_frame(frame)
            })?);
        }
        if let Some(frame) = current_frame {
            debug!(frame, packets = frame_stats.oran_packets, "Finished radio frame");
            totals.merge(frame_stats);
        }

        let idle = self.plan.idle_gap_count();
        if idle > 0 {
            sink.write_idle_gap(idle)?;
        }
        sink.finish()?;

        let summary = RunSummary::from_build(totals, idle, state.sequence_id());
        info!(
            oran_packets = summary.oran_packets,
            ethernet_frames = summary.ethernet_frames,
            fragmented_packets = summary.fragmented_packets,
            bytes = summary.bytes_emitted,
            idle_gap_bytes = summary.idle_gap_bytes,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Generation complete"
        );
        Ok(summary)
    }
}
