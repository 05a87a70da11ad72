// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Reader and series exporter for CODES terminal telemetry.
//!
//! Reconstructs the achieved per-flow injection rate over time from the
//! simulator's terminal packet statistics, in the same units (GB/s,
//! microseconds) the schedule compiler works in, so requested and
//! achieved rates can be compared side by side.

pub mod error;
pub mod export;
pub mod reader;

pub use error::{TelemetryError, TelemetryResult};
pub use reader::Sample;
