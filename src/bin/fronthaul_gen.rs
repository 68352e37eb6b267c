//! Fronthaul stream generator CLI
//!
//! Usage:
//!   fronthaul-gen --config fronthaul.yaml --output OutputPackets.txt
//!   fronthaul-gen --config SetupFile.txt --format raw --output capture.bin --concurrent

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use fronthaul::{ByteSink, Config, Generator, HexWriter, RawWriter, RunSummary, TimingPlan};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Space-separated hex bytes, four per line
    Hex,
    /// Binary bytes
    Raw,
}

#[derive(Parser, Debug)]
#[command(name = "fronthaul-gen", version, about = "Generate an O-RAN/eCPRI/Ethernet fronthaul stream")]
struct Args {
    /// Configuration file (.yaml/.yml, or a Key=Value setup file)
    #[arg(short, long)]
    config: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "OutputPackets.txt")]
    output: PathBuf,

    /// Output encoding
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Hex)]
    format: OutputFormat,

    /// Write radio frame and idle block marker lines (hex output only)
    #[arg(long)]
    annotate: bool,

    /// I/Q sample file, overriding the configured payload
    #[arg(short, long)]
    samples: Option<PathBuf>,

    /// Build radio frames in parallel
    #[arg(long)]
    concurrent: bool,

    /// Radio frames in flight with --concurrent (defaults to available cores)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Print the timing plan and exit without generating
    #[arg(long)]
    plan_only: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = Config::load(&args.config)
        .with_context(|| format!("failed to load configuration {}", args.config.display()))?;
    if let Some(samples) = &args.samples {
        config.oran.payload_type = fronthaul::PayloadType::Fixed;
        config.oran.payload = Some(samples.clone());
    }

    if args.plan_only {
        let plan = TimingPlan::compute(&config).context("invalid configuration")?;
        print_plan(&plan);
        return Ok(());
    }

    let generator = Generator::from_config(config).context("failed to prepare generator")?;

    let file = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    let writer = BufWriter::new(file);
    let jobs = args.jobs.unwrap_or_else(|| {
        std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
    });

    let summary = match args.format {
        OutputFormat::Hex if args.annotate => {
            emit(&generator, HexWriter::annotated(writer), args.concurrent, jobs).await?
        }
        OutputFormat::Hex => emit(&generator, HexWriter::new(writer), args.concurrent, jobs).await?,
        OutputFormat::Raw => emit(&generator, RawWriter::new(writer), args.concurrent, jobs).await?,
    };

    info!(
        output = %args.output.display(),
        frames = summary.ethernet_frames,
        fragmented = summary.fragmented_packets,
        idle_gap_bytes = summary.idle_gap_bytes,
        final_sequence_id = summary.final_sequence_id,
        "Wrote fronthaul stream"
    );
    Ok(())
}

async fn emit<S: ByteSink>(
    generator: &Generator,
    sink: S,
    concurrent: bool,
    jobs: usize,
) -> Result<RunSummary> {
    let summary = if concurrent {
        fronthaul::generate_concurrent(generator, sink, jobs).await
    } else {
        generator.run(sink)
    };
    summary.context("stream generation failed")
}

fn print_plan(plan: &TimingPlan) {
    println!("slots per subframe : {}", plan.slots_per_subframe());
    println!("frames             : {}", plan.frames());
    println!("subframes          : {}", plan.subframes());
    println!("slots              : {}", plan.slots());
    println!("symbols            : {}", plan.symbols());
    println!("packets per symbol : {}", plan.packets_per_symbol());
    println!("total packets      : {}", plan.total_packets());
    println!("frames per packet  : {}", plan.frames_per_packet());
    println!("bits per packet    : {}", plan.bits_per_packet());
    println!("packet time (s)    : {:e}", plan.packet_transmission_time());
    println!("total time (s)     : {:e}", plan.total_transmission_time());
    println!("remaining time (s) : {:e}", plan.remaining_time());
    println!("idle gaps          : {}", plan.idle_gap_count());
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
