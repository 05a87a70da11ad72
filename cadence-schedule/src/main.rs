// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! # CADENCE schedule compiler
//!
//! Compiles a bandwidth-demand schedule into the period (rate) file a
//! CODES simulation injects from, plus optional workload and allocation
//! artifacts.
//!
//! For example, run using:
//!   cargo run --bin cadence-schedule -- compile --schedule schedules.json
//! --sid s1 --out-dir ../multiflow --descriptors descriptors.json

use std::io::Write;
use std::path::PathBuf;

use cadence_schedule::emit::{ArtifactNames, DescriptorTable, compile_to_dir};
use cadence_schedule::resolve::change_points;
use cadence_schedule::{LinkModel, Schedule, ScheduleSet};
use clap::{Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::Context;
use itertools::Itertools;
use log::{LevelFilter, info};

/// Command-line arguments.
#[derive(Parser)]
#[command(about = "Compile bandwidth-demand schedules into simulator injection timing files")]
struct Cli {
    /// Enable debug log messages
    #[arg(short, long)]
    debug: bool,

    /// Path to additional configuration file
    ///
    /// This configuration file must contain TOML, and set values for the
    /// link model fields.
    #[arg(long)]
    conf_file: Option<PathBuf>,

    /// Override the nominal full-link bandwidth in GB/s
    #[arg(long)]
    link_bandwidth_gbps: Option<f64>,

    /// Override the fixed injected message size in bytes
    #[arg(long)]
    message_size_bytes: Option<u64>,

    #[clap(subcommand)]
    command: CommandArg,
}

#[derive(Debug, Subcommand)]
enum CommandArg {
    /// Compile a schedule into its output artifacts
    Compile {
        /// Schedule document (JSON)
        #[arg(short, long)]
        schedule: PathBuf,

        /// Schedule id when the document is a collection of schedules
        #[arg(long)]
        sid: Option<String>,

        /// Directory the artifacts are written to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Name of the period (rate) file
        #[arg(long, default_value = "period.file")]
        period_name: String,

        /// Per-flow descriptor document (JSON); when given, workload and
        /// allocation artifacts are emitted as well
        #[arg(long)]
        descriptors: Option<PathBuf>,

        /// Name of the workload file
        #[arg(long, default_value = "workload.file")]
        workload_name: String,

        /// Name of the allocation file
        #[arg(long, default_value = "allocation.file")]
        allocation_name: String,
    },
    /// Print the resolved change-point vectors for a schedule
    Show {
        /// Schedule document (JSON)
        #[arg(short, long)]
        schedule: PathBuf,

        /// Schedule id when the document is a collection of schedules
        #[arg(long)]
        sid: Option<String>,
    },
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

fn load_link_model(args: &Cli) -> Result<LinkModel> {
    let mut link = LinkModel::load(args.conf_file.as_deref())?;
    if let Some(bandwidth) = args.link_bandwidth_gbps {
        link.link_bandwidth_gbps = bandwidth;
    }
    if let Some(message_size) = args.message_size_bytes {
        link.message_size_bytes = message_size;
    }
    Ok(link)
}

fn load_schedule(schedule_path: &PathBuf, sid: Option<&str>) -> Result<Schedule> {
    let schedule = match sid {
        Some(sid) => ScheduleSet::from_file(schedule_path)
            .wrap_err_with(|| format!("Failed to load {}", schedule_path.display()))?
            .select(sid)?,
        None => Schedule::from_file(schedule_path)
            .wrap_err_with(|| format!("Failed to load {}", schedule_path.display()))?,
    };
    Ok(schedule)
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    setup_logger(args.debug);

    let link = load_link_model(&args)?;

    match &args.command {
        CommandArg::Compile {
            schedule,
            sid,
            out_dir,
            period_name,
            descriptors,
            workload_name,
            allocation_name,
        } => {
            let schedule = load_schedule(schedule, sid.as_deref())?;
            let table = match descriptors {
                Some(path) => Some(DescriptorTable::from_file(path)?),
                None => None,
            };
            let names = ArtifactNames {
                period: period_name.clone(),
                workload: workload_name.clone(),
                allocation: allocation_name.clone(),
            };
            let artifacts = compile_to_dir(&schedule, &link, out_dir, &names, table.as_ref())?;

            info!(
                "compiled schedule '{}' ({} flows) -> {}",
                schedule.id(),
                schedule.flow_universe().len(),
                artifacts.period.display()
            );
            if let Some(workload) = &artifacts.workload {
                info!("wrote {}", workload.display());
            }
            if let Some(allocation) = &artifacts.allocation {
                info!("wrote {}", allocation.display());
            }
            Ok(())
        }
        CommandArg::Show { schedule, sid } => {
            let schedule = load_schedule(schedule, sid.as_deref())?;
            let universe = schedule.flow_universe();

            println!("schedule '{}'", schedule.id());
            println!("flows: {}", universe.iter().join(", "));
            for point in change_points(&schedule, &universe) {
                let demands = universe
                    .iter()
                    .zip(&point.demands)
                    .map(|(flow, demand)| format!("f{flow}={demand}"))
                    .join(" ");
                println!("t={} {demands}", point.time_index * link.time_scale_factor);
            }
            Ok(())
        }
    }
}
