//! I/Q sample source
//!
//! A [`SampleStream`] is an endless, cyclic view over a finite set of (I, Q) pairs. Reads
//! that run past the last pair continue from the first. The pairs live behind an [`Arc`],
//! so cloning a stream is cheap and every clone keeps its own cursor.

use crate::config::{Config, PayloadType};
use crate::{FronthaulError, IQ_PAIR_SIZE, IqSample, Result};
use rand::prelude::*;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Cyclic reader over a shared set of I/Q pairs.
#[derive(Debug, Clone)]
pub struct SampleStream {
    samples: Arc<[IqSample]>,
    cursor: usize,
}

impl SampleStream {
    /// Build a stream from explicit pairs. At least one pair is required.
    pub fn from_pairs(pairs: Vec<IqSample>) -> Result<Self> {
        if pairs.is_empty() {
            return Err(FronthaulError::samples_error("sample source contains no I/Q pairs"));
        }
        Ok(Self { samples: pairs.into(), cursor: 0 })
    }

    /// Parse whitespace-separated `I Q` integer pairs.
    ///
    /// Values outside the `i16` range are truncated to their low 16 bits. A trailing
    /// unpaired value is dropped.
    pub fn parse_text(text: &str, context: &str) -> Result<Self> {
        let mut values = Vec::new();
        for (index, token) in text.split_whitespace().enumerate() {
            let value: i64 = token.parse().map_err(|e| {
                FronthaulError::parse_error(
                    format!("{context}: value {}", index + 1),
                    format!("'{token}' is not an integer: {e}"),
                )
            })?;
            values.push(value);
        }

        let narrowed = values.iter().filter(|&&v| i16::try_from(v).is_err()).count();
        if narrowed > 0 {
            warn!(context, narrowed, "Sample values outside the 16-bit range were truncated");
        }
        if values.len() % 2 == 1 {
            warn!(context, "Ignoring trailing I value without a matching Q value");
        }

        let pairs = values
            .chunks_exact(2)
            .map(|pair| IqSample::new(pair[0] as i16, pair[1] as i16))
            .collect::<Vec<_>>();

        debug!(context, pairs = pairs.len(), "Parsed I/Q samples");
        Self::from_pairs(pairs)
    }

    /// Load a text sample file.
    pub fn load_text<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| FronthaulError::file_error(path.to_path_buf(), e))?;
        Self::parse_text(&text, &path.display().to_string())
    }

    /// Generate `pairs` pseudo-random pairs from `seed`. The same seed always yields the
    /// same stream.
    pub fn random(seed: u64, pairs: usize) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let samples = (0..pairs)
            .map(|_| {
                IqSample::new(rng.gen_range(i16::MIN..=i16::MAX), rng.gen_range(i16::MIN..=i16::MAX))
            })
            .collect();
        Self::from_pairs(samples)
    }

    /// Build the source described by `config.oran`.
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.oran.payload_type {
            PayloadType::Fixed => {
                let path = config.oran.payload.as_ref().ok_or_else(|| {
                    FronthaulError::config_error(
                        "oran.payload",
                        "a sample file is required when payload_type is fixed",
                    )
                })?;
                Self::load_text(path)
            }
            PayloadType::Random => {
                Self::random(config.oran.random_seed, config.oran.random_pool_pairs)
            }
        }
    }

    /// Pairs in one cycle of the source.
    pub fn cycle_len(&self) -> usize {
        self.samples.len()
    }

    /// Cursor within the current cycle.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Move the cursor to absolute pair index `position`, counted from the start of the
    /// first cycle.
    pub fn seek(&mut self, position: u64) {
        self.cursor = (position % self.samples.len() as u64) as usize;
    }

    /// A clone of this stream positioned at `position`.
    pub fn at(&self, position: u64) -> Self {
        let mut stream = self.clone();
        stream.seek(position);
        stream
    }

    /// Next pair, wrapping at the end of the source.
    pub fn next_pair(&mut self) -> IqSample {
        let sample = self.samples[self.cursor];
        self.advance(1);
        sample
    }

    /// Append the little-endian bytes of the next `pairs` pairs to `out`.
    pub fn read_payload(&mut self, pairs: usize, out: &mut Vec<u8>) {
        out.reserve(pairs * IQ_PAIR_SIZE);
        let mut remaining = pairs;
        while remaining > 0 {
            let take = remaining.min(self.samples.len() - self.cursor);
            for sample in &self.samples[self.cursor..self.cursor + take] {
                out.extend_from_slice(&sample.to_le_bytes());
            }
            self.advance(take);
            remaining -= take;
        }
    }

    fn advance(&mut self, pairs: usize) {
        self.cursor += pairs;
        if self.cursor == self.samples.len() {
            debug!(pairs = self.samples.len(), "Reached end of sample source; restarting");
            self.cursor = 0;
        }
    }
}
