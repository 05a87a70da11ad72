// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Error type for the schedule compiler.
//!
//! Every error is fatal: the compiler is a single-shot offline tool and
//! never retries or emits partial artifacts.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use crate::types::FlowId;

/// The `ScheduleError` is what should be returned in the case of an error
pub enum ScheduleError {
    /// The requested schedule id is not present in the loaded collection.
    MissingSchedule {
        requested: String,
        available: Vec<String>,
    },
    /// A demand value or key in the schedule document cannot be used.
    MalformedSchedule {
        schedule: String,
        time_index: String,
        flow: String,
        reason: String,
    },
    /// The schedule declares no flows at all.
    EmptyFlowUniverse { schedule: String },
    /// A flow in the universe has no entry in the descriptor table.
    MissingDescriptor { flow: FlowId },
    /// The descriptor document cannot be parsed.
    MalformedDescriptor { reason: String },
    /// The link model configuration could not be assembled.
    Config { reason: String },
    /// Reading an input or writing an output artifact failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Debug for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScheduleError::MissingSchedule {
                requested,
                available,
            } => {
                write!(
                    f,
                    "No schedule '{requested}' in the loaded collection. Available: {}",
                    available.join(", ")
                )
            }
            ScheduleError::MalformedSchedule {
                schedule,
                time_index,
                flow,
                reason,
            } => {
                write!(
                    f,
                    "Malformed schedule '{schedule}' at time index {time_index}, flow {flow}: {reason}"
                )
            }
            ScheduleError::EmptyFlowUniverse { schedule } => {
                write!(f, "Schedule '{schedule}' declares an empty flow universe")
            }
            ScheduleError::MissingDescriptor { flow } => {
                write!(f, "No descriptor entry for flow {flow}")
            }
            ScheduleError::MalformedDescriptor { reason } => {
                write!(f, "Malformed descriptor document: {reason}")
            }
            ScheduleError::Config { reason } => {
                write!(f, "Unable to build link model configuration: {reason}")
            }
            ScheduleError::Io { path, source } => {
                write!(f, "I/O failure on {}: {source}", path.display())
            }
        }
    }
}

impl Error for ScheduleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ScheduleError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// The `ScheduleResult` is the return type for most compiler functions
pub type ScheduleResult<T> = Result<T, ScheduleError>;
