//! End-to-end generation from configuration files on disk.
//!
//! Frames are decoded here by byte offset, independently of the crate's encoders.

use fronthaul::{Config, FronthaulError, Generator, HexWriter, RawWriter, SubcarrierSpacing};
use std::path::Path;

const SETUP: &str = "\
# reference capture
Eth.LineRate=25
Eth.CaptureSizeMs=10
Eth.MinNumOfIFGsPerPacket=12
Eth.DestAddress=01:23:45:67:89:AB
Eth.SourceAddress=00:00:00:00:00:01
Eth.MaxPacketSize=1500
ORAN.SCS=30
ORAN.MaxNRB=24
ORAN.NRBperpacket=8   // three packets per symbol
ORAN.PayloadType=fixed
ORAN.Payload=iq_file.txt
";

const FRAME_LEN: usize = 424;
const IDLE_GAPS: usize = 2_551_246;

/// Bitwise reflected CRC-32, independent of the `crc` crate tables.
fn reference_crc32(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ 0xEDB8_8320 } else { crc >> 1 };
        }
    }
    !crc
}

fn write_inputs(dir: &Path, pairs: usize) {
    std::fs::write(dir.join("SetupFile.txt"), SETUP).unwrap();
    let text: String = (0..pairs as i32).map(|n| format!("{} {}\n", n, -n)).collect();
    std::fs::write(dir.join("iq_file.txt"), text).unwrap();
}

#[test]
fn reference_setup_file_produces_expected_stream() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    write_inputs(dir.path(), 100);

    let config = Config::load(dir.path().join("SetupFile.txt"))?;
    let generator = Generator::from_config(config)?;
    assert_eq!(generator.plan().total_packets(), 840);
    assert_eq!(generator.plan().idle_gap_count(), IDLE_GAPS as u64);

    let mut out = Vec::new();
    let summary = generator.run(&mut out)?;
    assert_eq!(summary.ethernet_frames, 840);
    assert_eq!(out.len(), 840 * FRAME_LEN + IDLE_GAPS);

    let mut sample = 0usize;
    for (index, frame) in out[..840 * FRAME_LEN].chunks(FRAME_LEN).enumerate() {
        // Ethernet
        assert_eq!(&frame[..8], &[0xFB, 0x55, 0x55, 0x55, 0x55, 0x55, 0x55, 0xD5]);
        assert_eq!(&frame[8..14], &[0x01, 0x23, 0x45, 0x67, 0x89, 0xAB]);
        assert_eq!(&frame[14..20], &[0, 0, 0, 0, 0, 1]);
        assert_eq!(&frame[20..22], &[0xAE, 0xFE]);
        let fcs = u32::from_be_bytes(frame[420..424].try_into()?);
        assert_eq!(fcs, reference_crc32(&frame[..420]), "bad FCS in frame {index}");

        // eCPRI
        assert_eq!(&frame[22..28], &[0x00, 0x00, 0x01, 0x88, 0x00, index as u8]);

        // O-RAN
        let symbol_index = index / 3;
        let symbol = (symbol_index % 14) as u8;
        let slot = ((symbol_index / 14) % 2) as u8;
        let subframe = (symbol_index / 28) as u8;
        let start_prbu = ((index * 8) & 0x3FF) as u16;
        let oran = &frame[28..36];
        assert_eq!(oran[0], 0x00);
        assert_eq!(oran[1], 0x00);
        assert_eq!(oran[2], (subframe << 4) | (slot >> 2));
        assert_eq!(oran[3], ((slot & 0x03) << 6) | symbol);
        assert_eq!(oran[4], 0x00);
        assert_eq!(oran[5], (start_prbu >> 8) as u8);
        assert_eq!(oran[6], start_prbu as u8);
        assert_eq!(oran[7], 8);

        // 96 pairs per packet, cycling through the 100-pair file
        for pair in frame[36..420].chunks(4) {
            let n = (sample % 100) as i16;
            assert_eq!(pair, [n.to_le_bytes(), (-n).to_le_bytes()].concat().as_slice());
            sample += 1;
        }
    }
    assert!(out[840 * FRAME_LEN..].iter().all(|&b| b == 0x07));
    Ok(())
}

#[test]
fn hex_and_raw_outputs_describe_the_same_bytes() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    write_inputs(dir.path(), 12);
    let generator = Generator::from_config(Config::load(dir.path().join("SetupFile.txt"))?)?;

    let raw_path = dir.path().join("capture.bin");
    generator.run(RawWriter::new(std::fs::File::create(&raw_path)?))?;
    let raw = std::fs::read(&raw_path)?;

    let hex_path = dir.path().join("OutputPackets.txt");
    generator.run(HexWriter::new(std::io::BufWriter::new(std::fs::File::create(&hex_path)?)))?;
    let text = std::fs::read_to_string(&hex_path)?;

    assert!(text.starts_with("fb 55 55 55\n55 55 55 d5\n01 23 45 67\n"));
    assert!(text.lines().all(|line| line.split(' ').count() <= 4));
    let parsed: Vec<u8> = text
        .split_whitespace()
        .map(|token| u8::from_str_radix(token, 16))
        .collect::<Result<_, _>>()?;
    assert_eq!(parsed, raw);
    Ok(())
}

#[test]
fn yaml_configuration_with_random_payload() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("fronthaul.yaml");
    std::fs::write(
        &path,
        "ethernet:\n  capture_size_ms: 10\necpri:\n  initial_sequence_id: 250\noran:\n  scs: 15\n  max_nrb: 24\n  nrb_per_packet: 8\n  random_seed: 99\n",
    )?;

    let config = Config::load(&path)?;
    assert_eq!(config.oran.scs, SubcarrierSpacing::Khz15);
    let generator = Generator::from_config(config)?;

    let mut first = Vec::new();
    let summary = generator.run(&mut first)?;
    // 10 subframes × 1 slot × 14 symbols × 3 packets
    assert_eq!(summary.ethernet_frames, 420);
    assert_eq!(summary.final_sequence_id, 250u8.wrapping_add((420 % 256) as u8));
    assert_eq!(first[27], 250);
    assert_eq!(first[FRAME_LEN + 27], 251);
    assert_eq!(first[6 * FRAME_LEN + 27], 0);

    let mut second = Vec::new();
    Generator::from_config(Config::load(&path)?)?.run(&mut second)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn invalid_setup_file_is_rejected_before_generation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("SetupFile.txt");
    std::fs::write(&path, "ORAN.SCS=120\n").unwrap();

    let error = Config::load(&path).unwrap_err();
    assert!(matches!(error, FronthaulError::UnsupportedSubcarrierSpacing { khz: 120 }));
    assert!(error.is_configuration_error());
}

#[test]
fn missing_sample_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("SetupFile.txt"), SETUP).unwrap();

    let config = Config::load(dir.path().join("SetupFile.txt")).unwrap();
    let error = Generator::from_config(config).unwrap_err();
    match error {
        FronthaulError::File { path, .. } => assert!(path.ends_with("iq_file.txt")),
        other => panic!("expected file error, got {other:?}"),
    }
}
