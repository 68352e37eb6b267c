//! Error types for fronthaul stream generation.
//!
//! Every fallible operation in the crate returns [`FronthaulError`]. Errors carry
//! structured context so callers can report exactly which configuration field, file
//! or sink failed.
//!
//! ## Error Categories
//!
//! - **Configuration Errors**: unsupported sub-carrier spacing, invalid MAC addresses,
//!   out-of-range numeric fields
//! - **Parse Errors**: malformed YAML, setup-file or IQ sample text
//! - **File Errors**: configuration or sample files that cannot be read
//! - **Sample Errors**: an empty or unusable sample source
//! - **Output Errors**: failures writing the generated byte stream
//! - **Task Errors**: a worker in the concurrent generator failed to complete
//!
//! Capacity anomalies (negative idle time, oversize eCPRI payloads) are *not* errors:
//! they are logged and the run continues with best-effort values.
//!
//! ```rust
//! use fronthaul::FronthaulError;
//!
//! let error = FronthaulError::config_error("oran.nrb_per_packet", "must be at least 1");
//! assert!(error.is_configuration_error());
//! for suggestion in error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fronthaul operations.
pub type Result<T, E = FronthaulError> = std::result::Result<T, E>;

/// Main error type for fronthaul operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FronthaulError {
    #[error("Invalid configuration value for {field}: {details}")]
    Config { field: String, details: String },

    #[error("Unsupported sub-carrier spacing {khz} kHz (expected 15, 30 or 60)")]
    UnsupportedSubcarrierSpacing { khz: u32 },

    #[error("Invalid MAC address '{input}': {reason}")]
    InvalidMacAddress { input: String, reason: String },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("File error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Sample source error: {details}")]
    Samples { details: String },

    #[error("Failed to write output stream")]
    Output {
        #[source]
        source: std::io::Error,
    },

    #[error("Generation task failed: {details}")]
    Task { details: String },
}

impl FronthaulError {
    /// Returns whether this error stems from the run's static inputs.
    ///
    /// Configuration errors abort the run before any packet is emitted.
    pub fn is_configuration_error(&self) -> bool {
        match self {
            FronthaulError::Config { .. } => true,
            FronthaulError::UnsupportedSubcarrierSpacing { .. } => true,
            FronthaulError::InvalidMacAddress { .. } => true,
            FronthaulError::Parse { .. } => true,
            FronthaulError::File { .. } => true,
            FronthaulError::Samples { .. } => true,
            FronthaulError::Output { .. } => false,
            FronthaulError::Task { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            FronthaulError::Config { .. } => vec![
                "Check the named field in the configuration file",
                "Compare against the documented defaults",
            ],
            FronthaulError::UnsupportedSubcarrierSpacing { .. } => {
                vec!["Set the sub-carrier spacing to 15, 30 or 60 kHz"]
            }
            FronthaulError::InvalidMacAddress { .. } => vec![
                "Use six colon-separated hex octets, e.g. 00:11:22:33:44:55",
                "Check for stray whitespace or missing octets",
            ],
            FronthaulError::Parse { .. } => vec![
                "Check the file syntax around the reported location",
                "Verify numeric fields contain plain integers",
            ],
            FronthaulError::File { .. } => vec![
                "Check file exists and is readable",
                "Relative sample paths resolve against the configuration directory",
            ],
            FronthaulError::Samples { .. } => vec![
                "Provide at least one I/Q pair in the sample file",
                "Switch the payload type to random for synthetic samples",
            ],
            FronthaulError::Output { .. } => vec![
                "Check the output location is writable",
                "Ensure sufficient disk space for the idle gap block",
            ],
            FronthaulError::Task { .. } => {
                vec!["Retry with the sequential generator to isolate the failure"]
            }
        }
    }

    /// Helper constructor for configuration errors.
    pub fn config_error(field: impl Into<String>, details: impl Into<String>) -> Self {
        FronthaulError::Config { field: field.into(), details: details.into() }
    }

    /// Helper constructor for parse errors.
    pub fn parse_error(context: impl Into<String>, details: impl Into<String>) -> Self {
        FronthaulError::Parse { context: context.into(), details: details.into() }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        FronthaulError::File { path, source }
    }

    /// Helper constructor for MAC address errors.
    pub fn invalid_mac(input: impl Into<String>, reason: impl Into<String>) -> Self {
        FronthaulError::InvalidMacAddress { input: input.into(), reason: reason.into() }
    }

    /// Helper constructor for sample source errors.
    pub fn samples_error(details: impl Into<String>) -> Self {
        FronthaulError::Samples { details: details.into() }
    }
}

impl From<std::io::Error> for FronthaulError {
    fn from(err: std::io::Error) -> Self {
        FronthaulError::Output { source: err }
    }
}
