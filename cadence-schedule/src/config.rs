// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Physical link constants used by the compiler and telemetry tools.
//!
//! The link model can be assembled from multiple sources which are merged
//! in priority order: struct defaults, then a TOML configuration file,
//! then environment variables prefixed with `CADENCE_`. Command-line
//! overrides are applied on top by the binaries.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};

/// Environment variable prefix for link model fields,
/// e.g. `CADENCE_LINK_BANDWIDTH_GBPS`.
pub const ENV_PREFIX: &str = "CADENCE_";

/// Process-wide physical constants, fixed at start of run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkModel {
    /// Nominal full-link bandwidth in GB/s.
    pub link_bandwidth_gbps: f64,

    /// Fixed payload size of each injected message.
    pub message_size_bytes: u64,

    /// Simulator time units per schedule time index. The simulator expects
    /// schedule steps 1000 time units apart; changing this breaks
    /// compatibility with existing period files.
    pub time_scale_factor: u64,
}

impl Default for LinkModel {
    fn default() -> Self {
        Self {
            link_bandwidth_gbps: 25.0,
            message_size_bytes: 64,
            time_scale_factor: 1000,
        }
    }
}

impl LinkModel {
    /// Merge defaults, an optional TOML conf file, and `CADENCE_`
    /// environment variables into a link model.
    pub fn load(conf_file: Option<&Path>) -> ScheduleResult<Self> {
        let mut config = Figment::new().merge(Serialized::defaults(LinkModel::default()));
        if let Some(conf_file) = conf_file {
            if !conf_file.is_file() {
                return Err(ScheduleError::Io {
                    path: conf_file.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "conf file not found",
                    ),
                });
            }
            config = config.merge(Toml::file(conf_file));
        }
        config = config.merge(Env::prefixed(ENV_PREFIX));
        config.extract().map_err(|e| ScheduleError::Config {
            reason: e.to_string(),
        })
    }

    /// Link bandwidth expressed in bytes per simulator nanosecond.
    ///
    /// GB are binary (1024^3 bytes) while the simulator clock is decimal,
    /// matching the constants the simulator itself was calibrated with.
    #[must_use]
    pub fn bytes_per_ns(&self) -> f64 {
        self.link_bandwidth_gbps * (1u64 << 30) as f64 / 1e9
    }

    /// The injection delay that saturates the link at 100% demand.
    #[must_use]
    pub fn base_rate(&self) -> f64 {
        self.message_size_bytes as f64 / self.bytes_per_ns()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn default_base_rate() {
        let link = LinkModel::default();
        // 64 bytes over 26.8435456 bytes/ns
        assert_relative_eq!(link.base_rate(), 2.384_185_791_015_625, epsilon = 1e-12);
    }

    #[test]
    fn conf_file_missing_is_an_error() {
        let result = LinkModel::load(Some(Path::new("no_such_conf.toml")));
        assert!(matches!(result, Err(ScheduleError::Io { .. })));
    }
}
