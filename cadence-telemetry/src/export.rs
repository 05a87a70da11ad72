// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! CSV export of per-flow achieved-rate series.
//!
//! Writes one series file per discovered flow plus a combined file with a
//! flow column, ready for external plotting. Plot rendering itself is
//! left to whatever consumes the CSVs.

use std::path::{Path, PathBuf};

use crate::error::{TelemetryError, TelemetryResult};
use crate::reader::{Sample, flow_ids};

/// Output stem for a run, e.g. `multiflow` or `multiflow_s3`.
#[must_use]
pub fn output_stem(sid: Option<u64>) -> String {
    match sid {
        Some(sid) => format!("multiflow_s{sid}"),
        None => "multiflow".to_string(),
    }
}

fn csv_error(path: &Path) -> impl FnOnce(csv::Error) -> TelemetryError + '_ {
    move |e| TelemetryError::Csv {
        path: path.to_path_buf(),
        source: e,
    }
}

/// Write the combined and per-flow series files, returning the paths
/// written (combined file first).
pub fn write_series(
    samples: &[Sample],
    out_dir: &Path,
    stem: &str,
) -> TelemetryResult<Vec<PathBuf>> {
    let mut written = Vec::new();

    let combined_path = out_dir.join(format!("{stem}.csv"));
    let mut combined = csv::Writer::from_path(&combined_path).map_err(csv_error(&combined_path))?;
    combined
        .write_record(["flow", "time_us", "rate_gbps"])
        .map_err(csv_error(&combined_path))?;
    for sample in samples {
        combined
            .write_record([
                sample.flow.to_string(),
                sample.time_us.to_string(),
                sample.rate_gbps.to_string(),
            ])
            .map_err(csv_error(&combined_path))?;
    }
    combined.flush().map_err(|e| TelemetryError::Io {
        path: combined_path.clone(),
        source: e,
    })?;
    written.push(combined_path);

    for flow in flow_ids(samples) {
        let flow_path = out_dir.join(format!("{stem}_flow{flow}.csv"));
        let mut writer = csv::Writer::from_path(&flow_path).map_err(csv_error(&flow_path))?;
        writer
            .write_record(["time_us", "rate_gbps"])
            .map_err(csv_error(&flow_path))?;
        for sample in samples.iter().filter(|sample| sample.flow == flow) {
            writer
                .write_record([sample.time_us.to_string(), sample.rate_gbps.to_string()])
                .map_err(csv_error(&flow_path))?;
        }
        writer.flush().map_err(|e| TelemetryError::Io {
            path: flow_path.clone(),
            source: e,
        })?;
        written.push(flow_path);
    }

    Ok(written)
}
