// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! # CADENCE telemetry exporter
//!
//! Reads a terminal-packet-stats file (or picks the newest one from a
//! results directory) and writes per-flow achieved-rate CSV series for
//! inspection.
//!
//! For example, run using:
//!   cargo run --bin cadence-telemetry -- --input results/ --sid 3

use std::io::Write;
use std::path::PathBuf;

use cadence_schedule::LinkModel;
use cadence_telemetry::export::{output_stem, write_series};
use cadence_telemetry::reader::{flow_ids, read_file, resolve_input};
use clap::Parser;
use color_eyre::Result;
use itertools::Itertools;
use log::{LevelFilter, info};

/// Command-line arguments.
#[derive(Parser)]
#[command(about = "Export per-flow achieved-rate series from simulator telemetry")]
struct Cli {
    /// Enable debug log messages
    #[arg(short, long)]
    debug: bool,

    /// Telemetry file, or a results directory containing
    /// terminal-packet-stats-* files
    #[arg(short, long)]
    input: PathBuf,

    /// Schedule id used in the output file names
    #[arg(long)]
    sid: Option<u64>,

    /// Directory the series files are written to (default: alongside the
    /// input)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Path to additional configuration file
    ///
    /// This configuration file must contain TOML, and set values for the
    /// link model fields.
    #[arg(long)]
    conf_file: Option<PathBuf>,

    /// Override the nominal full-link bandwidth in GB/s
    #[arg(long)]
    link_bandwidth_gbps: Option<f64>,
}

/// Configure the logger level and formating string.
fn setup_logger(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::builder()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    setup_logger(args.debug);

    let mut link = LinkModel::load(args.conf_file.as_deref())?;
    if let Some(bandwidth) = args.link_bandwidth_gbps {
        link.link_bandwidth_gbps = bandwidth;
    }

    let stats_path = resolve_input(&args.input)?;
    info!("reading {}", stats_path.display());

    let samples = read_file(&stats_path, &link)?;
    let flows = flow_ids(&samples);
    info!(
        "{} samples across flows: {}",
        samples.len(),
        flows.iter().join(", ")
    );

    let out_dir = match &args.out_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            dir.clone()
        }
        None => stats_path
            .parent()
            .map_or_else(|| PathBuf::from("."), PathBuf::from),
    };

    let written = write_series(&samples, &out_dir, &output_stem(args.sid))?;
    for path in &written {
        info!("wrote {}", path.display());
    }
    Ok(())
}
