// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Permissive reader for the simulator's terminal packet statistics.
//!
//! The telemetry file is a whitespace-delimited table. Only the
//! `time-stamp`, `term-id` and `bw-consumed` columns are used; everything
//! else (qos levels, virtual channels, credit counters) is dropped. A
//! single malformed row never fails the read: it is skipped with a debug
//! message so the rest of the run can still be inspected.

use std::path::{Path, PathBuf};

use cadence_schedule::LinkModel;
use itertools::Itertools;
use log::debug;

use crate::error::{TelemetryError, TelemetryResult};

/// Telemetry file name prefix written by the simulator.
pub const STATS_FILE_PREFIX: &str = "terminal-packet-stats-";

/// One achieved-rate sample, already converted to inspection units.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Timestamp in microseconds.
    pub time_us: f64,
    /// Flow (terminal) identifier.
    pub flow: u32,
    /// Achieved injection rate in GB/s.
    pub rate_gbps: f64,
}

/// Resolve a user-supplied input path to a telemetry file.
///
/// A directory selects the most recently modified
/// `terminal-packet-stats-*` file inside it.
pub fn resolve_input(input: &Path) -> TelemetryResult<PathBuf> {
    if !input.is_dir() {
        return Ok(input.to_path_buf());
    }

    let entries = std::fs::read_dir(input).map_err(|e| TelemetryError::Io {
        path: input.to_path_buf(),
        source: e,
    })?;
    let newest = entries
        .filter_map(Result::ok)
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .starts_with(STATS_FILE_PREFIX)
        })
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((modified, entry.path()))
        })
        .max_by_key(|(modified, _)| *modified);

    match newest {
        Some((_, path)) => Ok(path),
        None => Err(TelemetryError::NoStatsFile {
            dir: input.to_path_buf(),
        }),
    }
}

/// Read and convert a telemetry file.
pub fn read_file(stats_path: &Path, link: &LinkModel) -> TelemetryResult<Vec<Sample>> {
    let contents = std::fs::read_to_string(stats_path).map_err(|e| TelemetryError::Io {
        path: stats_path.to_path_buf(),
        source: e,
    })?;
    parse_table(&contents, link)
}

/// Parse the table contents and convert units.
///
/// Timestamps are converted from nanoseconds to microseconds, bandwidth
/// from percent-of-link to GB/s using the same link model as the
/// compiler. Rows with zero consumed bandwidth are treated as "no
/// sample" rather than "idle" and discarded. The result is sorted by
/// (timestamp, flow).
pub fn parse_table(contents: &str, link: &LinkModel) -> TelemetryResult<Vec<Sample>> {
    let mut lines = contents.lines();
    let header = lines.next().ok_or(TelemetryError::Empty)?;
    let columns: Vec<&str> = header.split_whitespace().collect();

    let column_idx = |name: &'static str| -> TelemetryResult<usize> {
        columns
            .iter()
            .position(|c| *c == name)
            .ok_or(TelemetryError::MissingColumn { name })
    };
    let time_idx = column_idx("time-stamp")?;
    let flow_idx = column_idx("term-id")?;
    let bw_idx = column_idx("bw-consumed")?;

    let mut samples = Vec::new();
    for (line_no, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let parsed = (
            fields.get(time_idx).and_then(|s| s.parse::<f64>().ok()),
            fields.get(flow_idx).and_then(|s| s.parse::<u32>().ok()),
            fields.get(bw_idx).and_then(|s| s.parse::<f64>().ok()),
        );
        let (Some(time_ns), Some(flow), Some(bw_percent)) = parsed else {
            debug!("skipping malformed telemetry row {}", line_no + 2);
            continue;
        };
        if !time_ns.is_finite() || !bw_percent.is_finite() {
            debug!("skipping non-finite telemetry row {}", line_no + 2);
            continue;
        }
        if bw_percent == 0.0 {
            continue;
        }

        samples.push(Sample {
            time_us: time_ns / 1000.0,
            flow,
            rate_gbps: bw_percent * link.link_bandwidth_gbps / 100.0,
        });
    }

    samples.sort_by(|a, b| {
        a.time_us
            .total_cmp(&b.time_us)
            .then_with(|| a.flow.cmp(&b.flow))
    });
    Ok(samples)
}

/// Flow ids present in the samples, ascending and deduplicated.
#[must_use]
pub fn flow_ids(samples: &[Sample]) -> Vec<u32> {
    samples
        .iter()
        .map(|sample| sample.flow)
        .sorted()
        .dedup()
        .collect()
}
