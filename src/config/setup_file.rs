//! Flat `Key=Value` setup file support
//!
//! Older tooling describes a run with lines such as:
//!
//! ```text
//! Eth.LineRate=25
//! Eth.CaptureSizeMs=10
//! Eth.MinNumOfIFGsPerPacket=12
//! Eth.DestAddress=01:23:45:67:89:AB
//! Eth.SourceAddress=00:00:00:00:00:01
//! Eth.MaxPacketSize=1500
//! ORAN.SCS=30
//! ORAN.MaxNRB=273
//! ORAN.NRBperpacket=20
//! ORAN.PayloadType=fixed
//! ORAN.Payload=iq_file.txt
//! ```
//!
//! Values are trimmed and may carry a trailing `#` or `//` comment. Updates are staged
//! on a copy so a malformed value leaves the caller's configuration untouched.
//!
//! These files always read their I/Q samples from `ORAN.Payload`, so a file that names a
//! payload without an `ORAN.PayloadType` line loads as [`PayloadType::Fixed`]. Unknown
//! payload type tags fall back to `fixed` as well.

use super::{Config, PayloadType};
use crate::{FronthaulError, MacAddress, Result, SubcarrierSpacing};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, warn};

/// Apply setup-file text to a copy of `base` and return the updated copy.
pub fn apply(base: &Config, text: &str) -> Result<Config> {
    let mut draft = base.clone();
    let mut applied = 0usize;
    let mut payload_named = false;
    let mut payload_type_named = false;

    for (index, raw_line) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            debug!(line = line_number, "Skipping setup line without '='");
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if apply_entry(&mut draft, key, value, line_number)? {
            applied += 1;
            match key {
                "ORAN.Payload" => payload_named = true,
                "ORAN.PayloadType" => payload_type_named = true,
                _ => {}
            }
        }
    }

    if payload_named && !payload_type_named && draft.oran.payload_type != PayloadType::Fixed {
        debug!("Setup file names a payload without a type; reading it as fixed");
        draft.oran.payload_type = PayloadType::Fixed;
    }

    debug!(entries = applied, "Applied setup file");
    Ok(draft)
}

/// Returns `Ok(true)` when the key was recognised.
fn apply_entry(draft: &mut Config, key: &str, value: &str, line: usize) -> Result<bool> {
    match key {
        "Eth.LineRate" => draft.ethernet.line_rate_gbps = number(key, value, line)?,
        "Eth.CaptureSizeMs" => draft.ethernet.capture_size_ms = number(key, value, line)?,
        "Eth.MinNumOfIFGsPerPacket" => {
            draft.ethernet.min_ifgs_per_packet = number(key, value, line)?
        }
        "Eth.MaxPacketSize" => draft.ethernet.max_packet_size = number(key, value, line)?,
        "Eth.DestAddress" => draft.ethernet.dest_address = mac(value)?,
        "Eth.SourceAddress" => draft.ethernet.source_address = mac(value)?,
        "Eth.BurstSize" => draft.ethernet.burst_size = Some(number(key, value, line)?),
        "Eth.BurstPeriodicity" => {
            draft.ethernet.burst_periodicity = Some(number(key, value, line)?)
        }
        "ECPRI.SeqId" => draft.ecpri.initial_sequence_id = number(key, value, line)?,
        "ORAN.SCS" => draft.oran.scs = SubcarrierSpacing::try_from(number::<u32>(key, value, line)?)?,
        "ORAN.MaxNRB" => draft.oran.max_nrb = number(key, value, line)?,
        "ORAN.NRBperpacket" => draft.oran.nrb_per_packet = number(key, value, line)?,
        "ORAN.PayloadType" => draft.oran.payload_type = payload_type(value, line),
        "ORAN.Payload" => draft.oran.payload = Some(PathBuf::from(value)),
        other => {
            warn!(key = other, line, "Ignoring unknown setup key");
            return Ok(false);
        }
    }
    Ok(true)
}

fn strip_comment(line: &str) -> &str {
    let cut = [line.find('#'), line.find("//")].into_iter().flatten().min();
    match cut {
        Some(position) => &line[..position],
        None => line,
    }
}

fn number<T>(key: &str, value: &str, line: usize) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| {
        FronthaulError::parse_error(
            format!("setup file line {}", line),
            format!("invalid value '{}' for {}: {}", value, key, e),
        )
    })
}

fn mac(value: &str) -> Result<MacAddress> {
    value.parse()
}

fn payload_type(value: &str, line: usize) -> PayloadType {
    match value.to_ascii_lowercase().as_str() {
        "fixed" => PayloadType::Fixed,
        "random" => PayloadType::Random,
        _ => {
            warn!(value, line, "Unknown payload type in setup file; using fixed");
            PayloadType::Fixed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE_SETUP: &str = "\
Eth.LineRate=25
Eth.CaptureSizeMs=10
Eth.MinNumOfIFGsPerPacket=12
Eth.DestAddress=01:23:45:67:89:AB
Eth.SourceAddress=00:00:00:00:00:01
Eth.MaxPacketSize=1500
Eth.BurstSize=3
Eth.BurstPeriodicity=100
ECPRI.SeqId=5
ORAN.SCS=30
ORAN.MaxNRB=24
ORAN.NRBperpacket=8
ORAN.PayloadType=fixed
ORAN.Payload=iq_file.txt
";

    #[test]
    fn applies_every_reference_key() {
        let config = apply(&Config::default(), REFERENCE_SETUP).unwrap();
        assert_eq!(config.ethernet.line_rate_gbps, 25.0);
        assert_eq!(config.ethernet.capture_size_ms, 10);
        assert_eq!(config.ethernet.min_ifgs_per_packet, 12);
        assert_eq!(config.ethernet.max_packet_size, 1500);
        assert_eq!(config.ethernet.dest_address.to_u64(), 0x0123_4567_89AB);
        assert_eq!(config.ethernet.source_address.to_u64(), 1);
        assert_eq!(config.ethernet.burst_size, Some(3));
        assert_eq!(config.ecpri.initial_sequence_id, 5);
        assert_eq!(config.oran.scs, SubcarrierSpacing::Khz30);
        assert_eq!(config.oran.max_nrb, 24);
        assert_eq!(config.oran.nrb_per_packet, 8);
        assert_eq!(config.oran.payload_type, PayloadType::Fixed);
        assert_eq!(config.oran.payload, Some(PathBuf::from("iq_file.txt")));
    }

    #[test]
    fn tolerates_whitespace_comments_and_noise() {
        let text = "# capture setup\n\n  Eth.LineRate = 40   # Gbps\nnot a setting\nORAN.MaxNRB=50 // PRBs\nVendor.Extra=1\n";
        let config = apply(&Config::default(), text).unwrap();
        assert_eq!(config.ethernet.line_rate_gbps, 40.0);
        assert_eq!(config.oran.max_nrb, 50);
    }

    #[test]
    fn malformed_value_leaves_configuration_untouched() {
        let mut config = Config::default();
        let before = config.clone();

        let result = config.apply_setup_file("Eth.LineRate=100\nORAN.MaxNRB=lots\n");
        match result {
            Err(FronthaulError::Parse { context, details }) => {
                assert!(context.contains("line 2"));
                assert!(details.contains("ORAN.MaxNRB"));
            }
            other => panic!("Expected Parse error, got {:?}", other),
        }
        assert_eq!(config, before);
    }

    #[test]
    fn payload_without_type_reads_the_sample_file() {
        let config = apply(&Config::default(), "ORAN.Payload=iq_file.txt\n").unwrap();
        assert_eq!(config.oran.payload_type, PayloadType::Fixed);
        assert_eq!(config.oran.payload, Some(PathBuf::from("iq_file.txt")));
    }

    #[test]
    fn explicit_random_type_is_kept_alongside_a_payload() {
        let text = "ORAN.Payload=iq_file.txt\nORAN.PayloadType=random\n";
        let config = apply(&Config::default(), text).unwrap();
        assert_eq!(config.oran.payload_type, PayloadType::Random);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_payload_type_falls_back_to_fixed() {
        let text = "ORAN.PayloadType=vendor_iq\nORAN.Payload=iq_file.txt\n";
        let config = apply(&Config::default(), text).unwrap();
        assert_eq!(config.oran.payload_type, PayloadType::Fixed);

        let config = apply(&Config::default(), "ORAN.PayloadType=Random").unwrap();
        assert_eq!(config.oran.payload_type, PayloadType::Random);
    }

    #[test]
    fn rejects_out_of_range_sequence_id_and_bad_scs() {
        assert!(apply(&Config::default(), "ECPRI.SeqId=256").is_err());
        assert!(matches!(
            apply(&Config::default(), "ORAN.SCS=45"),
            Err(FronthaulError::UnsupportedSubcarrierSpacing { khz: 45 })
        ));
        assert!(matches!(
            apply(&Config::default(), "Eth.DestAddress=01:23"),
            Err(FronthaulError::InvalidMacAddress { .. })
        ));
    }
}
