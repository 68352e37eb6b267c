//! Synthetic O-RAN fronthaul traffic generator.
//!
//! Builds the byte stream a radio unit link would carry for a configured capture window:
//! I/Q samples wrapped in O-RAN user-plane sections, eCPRI transport headers and Ethernet
//! frames, followed by the idle inter-frame gap filler that pads the capture out to the
//! line rate.
//!
//! # Features
//!
//! - **Timing plan**: grid dimensions and idle budget from numerology and line rate
//! - **Protocol encoders**: O-RAN, eCPRI and Ethernet layers usable on their own
//! - **Fragmentation**: oversize O-RAN packets split across consecutive frames
//! - **Sinks**: in-memory, raw binary and hex text output
//! - **Concurrency**: radio frames built in parallel with byte-identical output
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fronthaul::{Config, Generator, HexWriter};
//! use std::fs::File;
//! use std::io::BufWriter;
//!
//! fn main() -> fronthaul::Result<()> {
//!     let config = Config::load("fronthaul.yaml")?;
//!     let generator = Generator::from_config(config)?;
//!
//!     let file = File::create("packets.txt")?;
//!     let summary = generator.run(HexWriter::new(BufWriter::new(file)))?;
//!     println!("{} frames written", summary.ethernet_frames);
//!     Ok(())
//! }
//! ```

// Core types and error handling
pub mod config;
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Encoding and generation
pub mod protocol;
pub mod samples;
pub mod stream;
pub mod timing;

// Core exports
pub use config::{Config, PayloadType, PrbCursorPolicy};
pub use error::*;
pub use types::*;

// Main API exports
pub use samples::SampleStream;
pub use stream::{ByteSink, Generator, HexWriter, RawWriter, RunSummary, generate_concurrent};
pub use timing::{CapacityWarning, TimingPlan};
