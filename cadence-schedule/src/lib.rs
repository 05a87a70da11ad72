// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Compiler from bandwidth-demand schedules to the injection-timing files
//! consumed by CODES network simulations.
//!
//! A schedule maps discrete time indices to per-flow bandwidth demands in
//! percent of link bandwidth. The compiler resolves carried-forward
//! values, keeps the time indices where the resolved demands change, and
//! inverts each demand into the delay between fixed-size message
//! injections. The result is serialized as the simulator's period file,
//! with optional workload/allocation companion artifacts.
//!
//! The same [`LinkModel`](config::LinkModel) constants are shared with
//! `cadence-telemetry` so requested and achieved rates can be compared in
//! the same units.

pub mod config;
pub mod error;
pub mod types;

pub mod emit;
pub mod rate;
pub mod resolve;

pub use config::LinkModel;
pub use error::{ScheduleError, ScheduleResult};
pub use types::{Schedule, ScheduleSet};
