// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Error type for the telemetry tools.
//!
//! The reader itself is permissive (bad rows are skipped); these errors
//! cover the failures that leave nothing to inspect.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// The `TelemetryError` is what should be returned in the case of an error
#[derive(Debug)]
pub enum TelemetryError {
    /// A required column is absent from the header line.
    MissingColumn { name: &'static str },
    /// The telemetry file has no header line at all.
    Empty,
    /// A directory was given but holds no telemetry file.
    NoStatsFile { dir: PathBuf },
    /// Reading the input or writing a series file failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Writing a CSV series failed.
    Csv {
        path: PathBuf,
        source: csv::Error,
    },
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TelemetryError::MissingColumn { name } => {
                write!(f, "Telemetry table has no '{name}' column")
            }
            TelemetryError::Empty => {
                write!(f, "Telemetry file is empty")
            }
            TelemetryError::NoStatsFile { dir } => {
                write!(
                    f,
                    "No terminal-packet-stats-* file found in {}",
                    dir.display()
                )
            }
            TelemetryError::Io { path, source } => {
                write!(f, "I/O failure on {}: {source}", path.display())
            }
            TelemetryError::Csv { path, source } => {
                write!(f, "Failed to write {}: {source}", path.display())
            }
        }
    }
}

impl Error for TelemetryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TelemetryError::Io { source, .. } => Some(source),
            TelemetryError::Csv { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// The `TelemetryResult` is the return type for most telemetry functions
pub type TelemetryResult<T> = Result<T, TelemetryError>;
