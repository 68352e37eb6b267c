//! Run configuration
//!
//! A [`Config`] is loaded once before generation and never mutated afterwards. Two
//! on-disk formats are accepted:
//!
//! - YAML (`.yaml` / `.yml`), deserialized with `serde_yaml_ng`
//! - the flat `Key=Value` setup file used by earlier tooling (see [`setup_file`])
//!
//! ```yaml
//! ethernet:
//!   line_rate_gbps: 25
//!   capture_size_ms: 10
//!   min_ifgs_per_packet: 12
//!   max_packet_size: 1500
//!   dest_address: "00:11:22:33:44:55"
//!   source_address: "66:77:88:99:aa:bb"
//! ecpri:
//!   initial_sequence_id: 0
//! oran:
//!   scs: 30
//!   max_nrb: 24
//!   nrb_per_packet: 8
//!   payload_type: fixed
//!   payload: iq_file.txt
//! ```

pub mod setup_file;

use crate::protocol::FcsVariant;
use crate::{FronthaulError, MacAddress, Result, SubcarrierSpacing};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Largest O-RAN packet carried in one Ethernet frame before fragmenting.
pub const DEFAULT_MAX_FRAGMENT_SIZE: usize = 1466;

/// How the starting PRB of each packet advances through the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrbCursorPolicy {
    /// Advance by `nrb_per_packet` every packet and never reset.
    #[default]
    Continuous,
    /// Restart at PRB 0 at the beginning of every symbol.
    ResetPerSymbol,
}

/// Where O-RAN payload samples come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadType {
    /// Samples read from the `oran.payload` text file.
    Fixed,
    /// Seeded pseudo-random samples.
    #[default]
    Random,
}

/// Complete configuration for one generation run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub ethernet: EthernetConfig,
    pub ecpri: EcpriConfig,
    pub oran: OranConfig,
}

/// Link-layer and capture parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EthernetConfig {
    /// Line rate in Gbit/s.
    pub line_rate_gbps: f64,
    /// Capture window in milliseconds; only whole 10 ms frames are generated.
    pub capture_size_ms: u32,
    /// Minimum inter-frame gap bytes accounted per packet.
    pub min_ifgs_per_packet: u32,
    /// Maximum Ethernet packet size used for the transmission-time budget.
    pub max_packet_size: u32,
    pub dest_address: MacAddress,
    pub source_address: MacAddress,
    pub fcs: FcsVariant,
    /// Accepted for compatibility with older setup files; not used.
    pub burst_size: Option<u32>,
    /// Accepted for compatibility with older setup files; not used.
    pub burst_periodicity: Option<u32>,
}

impl Default for EthernetConfig {
    fn default() -> Self {
        Self {
            line_rate_gbps: 25.0,
            capture_size_ms: 10,
            min_ifgs_per_packet: 12,
            max_packet_size: 1500,
            dest_address: MacAddress::new([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]),
            source_address: MacAddress::new([0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB]),
            fcs: FcsVariant::default(),
            burst_size: None,
            burst_periodicity: None,
        }
    }
}

/// eCPRI transport parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EcpriConfig {
    /// Sequence identifier carried by the first emitted frame.
    pub initial_sequence_id: u8,
}

/// O-RAN user-plane parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OranConfig {
    pub scs: SubcarrierSpacing,
    /// Resource blocks to cover per symbol.
    pub max_nrb: u32,
    /// Resource blocks carried by each O-RAN packet.
    pub nrb_per_packet: u32,
    /// O-RAN packets larger than this are split before eCPRI encapsulation.
    pub max_fragment_size: usize,
    pub prb_cursor: PrbCursorPolicy,
    pub payload_type: PayloadType,
    /// IQ sample file for [`PayloadType::Fixed`].
    pub payload: Option<PathBuf>,
    pub random_seed: u64,
    /// Number of random pairs generated before the stream cycles.
    pub random_pool_pairs: usize,
}

impl Default for OranConfig {
    fn default() -> Self {
        Self {
            scs: SubcarrierSpacing::Khz30,
            max_nrb: 24,
            nrb_per_packet: 8,
            max_fragment_size: DEFAULT_MAX_FRAGMENT_SIZE,
            prb_cursor: PrbCursorPolicy::default(),
            payload_type: PayloadType::default(),
            payload: None,
            random_seed: 0,
            random_pool_pairs: 4096,
        }
    }
}

impl Config {
    /// Parse and validate a YAML configuration.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml_ng::from_str(yaml)
            .map_err(|e| FronthaulError::parse_error("YAML configuration", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, choosing the format by extension.
    ///
    /// A relative `oran.payload` path is resolved against the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| FronthaulError::file_error(path.to_path_buf(), e))?;

        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );

        let mut config = if is_yaml {
            serde_yaml_ng::from_str::<Config>(&text)
                .map_err(|e| FronthaulError::parse_error(path.display().to_string(), e.to_string()))?
        } else {
            let mut config = Config::default();
            config.apply_setup_file(&text)?;
            config
        };

        if let (Some(payload), Some(base)) = (config.oran.payload.as_mut(), path.parent()) {
            if payload.is_relative() {
                *payload = base.join(&*payload);
            }
        }

        config.validate()?;
        debug!(path = %path.display(), yaml = is_yaml, "Loaded configuration");
        Ok(config)
    }

    /// Apply a `Key=Value` setup file on top of this configuration.
    ///
    /// Either every line applies or nothing does.
    pub fn apply_setup_file(&mut self, text: &str) -> Result<()> {
        let updated = setup_file::apply(self, text)?;
        *self = updated;
        Ok(())
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let eth = &self.ethernet;
        if !eth.line_rate_gbps.is_finite() || eth.line_rate_gbps <= 0.0 {
            return Err(FronthaulError::config_error(
                "ethernet.line_rate_gbps",
                format!("must be a positive number, got {}", eth.line_rate_gbps),
            ));
        }

        let oran = &self.oran;
        if oran.max_nrb == 0 {
            return Err(FronthaulError::config_error("oran.max_nrb", "must be at least 1"));
        }
        if oran.nrb_per_packet == 0 || oran.nrb_per_packet > u8::MAX as u32 {
            return Err(FronthaulError::config_error(
                "oran.nrb_per_packet",
                format!("must be within 1..=255, got {}", oran.nrb_per_packet),
            ));
        }
        if oran.max_fragment_size == 0 {
            return Err(FronthaulError::config_error("oran.max_fragment_size", "must be at least 1"));
        }
        match oran.payload_type {
            PayloadType::Fixed if oran.payload.is_none() => {
                return Err(FronthaulError::config_error(
                    "oran.payload",
                    "a sample file is required when payload_type is fixed",
                ));
            }
            PayloadType::Random if oran.random_pool_pairs == 0 => {
                return Err(FronthaulError::config_error(
                    "oran.random_pool_pairs",
                    "must be at least 1",
                ));
            }
            PayloadType::Random => {
                if let Some(payload) = &oran.payload {
                    warn!(
                        payload = %payload.display(),
                        "Sample file is configured but payload_type is random; it will not be read"
                    );
                }
            }
            _ => {}
        }

        if eth.capture_size_ms < crate::FRAME_DURATION_MS {
            warn!(
                capture_size_ms = eth.capture_size_ms,
                "Capture shorter than one radio frame; no packets will be generated"
            );
        }
        if eth.burst_size.is_some() || eth.burst_periodicity.is_some() {
            debug!("Burst parameters are accepted but have no effect on generation");
        }

        Ok(())
    }
}
