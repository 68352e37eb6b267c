//! Parallel stream generation
//!
//! Radio frames are independent once the counters at their first symbol are known, and
//! those follow in closed form from the frame index (see [`StreamState::at_symbol`]).
//! Each radio frame is therefore built on the blocking pool from precomputed state, and
//! the finished frames are written to the sink strictly in grid order.

use super::generator::{Generator, RunSummary};
use super::pipeline::{BuildStats, PacketBuilder};
use super::sink::ByteSink;
use super::state::StreamState;
use crate::{
    FronthaulError, GridIter, GridPosition, Result, SUBFRAMES_PER_FRAME, SYMBOLS_PER_SLOT,
};
use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{debug, info, trace};

/// Ethernet frames of one radio frame, packed back to back.
#[derive(Debug)]
struct RadioFrameBatch {
    frame: u32,
    bytes: Vec<u8>,
    ends: Vec<usize>,
    stats: BuildStats,
    final_state: StreamState,
}

impl RadioFrameBatch {
    fn frames(&self) -> impl Iterator<Item = &[u8]> {
        let starts = std::iter::once(0).chain(self.ends.iter().copied());
        starts.zip(self.ends.iter().copied()).map(|(start, end)| &self.bytes[start..end])
    }
}

/// Generate the same byte stream as [`Generator::run`], building up to `jobs` radio
/// frames in parallel.
///
/// Must be called from within a tokio runtime.
pub async fn generate_concurrent<S: ByteSink>(
    generator: &Generator,
    mut sink: S,
    jobs: usize,
) -> Result<RunSummary> {
    let started = Instant::now();
    let config = generator.config();
    let plan = generator.plan();
    let jobs = jobs.max(1);

    let slots_per_subframe = plan.slots_per_subframe();
    let symbols_per_frame = (SUBFRAMES_PER_FRAME * slots_per_subframe * SYMBOLS_PER_SLOT) as u64;
    let packets_per_symbol = plan.packets_per_symbol() as u64;
    let frames_per_symbol = packets_per_symbol * plan.frames_per_packet() as u64;
    let prbs_per_symbol = packets_per_symbol * config.oran.nrb_per_packet as u64;
    let pairs_per_symbol = packets_per_symbol * plan.pairs_per_packet() as u64;
    let initial_sequence_id = config.ecpri.initial_sequence_id;
    let policy = config.oran.prb_cursor;

    let builder = PacketBuilder::new(config, plan);
    let samples = generator.samples().clone();

    let mut batches = stream::iter(0..plan.frames())
        .map(|frame| {
            let first_symbol = frame as u64 * symbols_per_frame;
            let mut state = StreamState::at_symbol(
                initial_sequence_id,
                first_symbol,
                frames_per_symbol,
                prbs_per_symbol,
                policy,
            );
            let mut samples = samples.at(first_symbol.wrapping_mul(pairs_per_symbol));
            let mut builder = builder.clone();

            tokio::task::spawn_blocking(move || -> Result<RadioFrameBatch> {
                trace!(frame, "Building radio frame");
                let mut bytes = Vec::new();
                let mut ends = Vec::new();
                let mut stats = BuildStats::default();
                for position in GridIter::new(1, slots_per_subframe) {
                    let position = GridPosition { frame, ..position };
                    stats.merge(builder.build_symbol(position, &mut state, &mut samples, |f| {
                        bytes.extend_from_slice(f);
                        ends.push(bytes.len());
                        Ok(())
                    })?);
                }
                Ok(RadioFrameBatch { frame, bytes, ends, stats, final_state: state })
            })
        })
        .buffered(jobs);

    let mut totals = BuildStats::default();
    let mut final_sequence_id = initial_sequence_id;
    while let Some(joined) = batches.next().await {
        let batch = joined.map_err(|e| FronthaulError::Task {
            details: format!("radio frame worker panicked: {e}"),
        })??;

        sink.begin_radio_frame(batch.frame)?;
        for frame in batch.frames() {
            sink.write_frame(frame)?;
        }
        debug!(frame = batch.frame, packets = batch.stats.oran_packets, "Finished radio frame");

        totals.merge(batch.stats);
        final_sequence_id = batch.final_state.sequence_id();
    }

    let idle = plan.idle_gap_count();
    if idle > 0 {
        sink.write_idle_gap(idle)?;
    }
    sink.finish()?;

    let summary = RunSummary::from_build(totals, idle, final_sequence_id);
    info!(
        oran_packets = summary.oran_packets,
        ethernet_frames = summary.ethernet_frames,
        jobs,
        bytes = summary.bytes_emitted,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Concurrent generation complete"
    );
    Ok(summary)
}
