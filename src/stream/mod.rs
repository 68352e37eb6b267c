//! Stream generation
//!
//! [`Generator`] walks the capture grid and pushes each Ethernet frame into a
//! [`ByteSink`]; [`generate_concurrent`] produces the same bytes using the tokio blocking
//! pool. Both finish with the idle gap block from the [`TimingPlan`](crate::TimingPlan).

mod concurrent;
mod generator;
mod pipeline;
mod sink;
mod state;

pub use concurrent::generate_concurrent;
pub use generator::{Generator, RunSummary};
pub use pipeline::{BuildStats, PacketBuilder};
pub use sink::{ByteSink, HexWriter, RawWriter};
pub use state::StreamState;
