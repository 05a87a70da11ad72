// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Rate sequence construction and artifact serialization.
//!
//! Three text artifacts can be produced for a schedule: the period (rate)
//! file the simulator injects from, and optionally a workload file and an
//! allocation file templated from a per-flow descriptor table. All three
//! use the same ascending flow order, so line `i` of each artifact refers
//! to the same flow. Files are written to a temporary file and renamed
//! into place so an aborted run never leaves a partial artifact.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use log::debug;
use serde::Deserialize;
use tempfile::NamedTempFile;

use crate::config::LinkModel;
use crate::error::{ScheduleError, ScheduleResult};
use crate::rate::delay_for_demand;
use crate::resolve::change_points;
use crate::types::{FlowId, Schedule};

/// One emitted rate change: simulator timestamp and injection delay.
#[derive(Debug, Clone, PartialEq)]
pub struct RateEntry {
    pub timestamp: u64,
    pub delay: f64,
}

/// The ordered rate changes for one flow.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSequence {
    pub flow: FlowId,
    pub entries: Vec<RateEntry>,
}

/// Build the per-flow rate sequences for a schedule.
///
/// Entries are taken at the schedule's change points, and within a flow an
/// entry is dropped when its delay repeats the flow's previous one, so no
/// sequence holds two consecutive equal delays. Timestamps are the change
/// point's time index scaled into simulator time units.
#[must_use]
pub fn build_rate_sequences(schedule: &Schedule, link: &LinkModel) -> Vec<RateSequence> {
    let universe = schedule.flow_universe();
    let points = change_points(schedule, &universe);

    universe
        .iter()
        .enumerate()
        .map(|(column, &flow)| {
            let mut entries: Vec<RateEntry> = Vec::new();
            for point in &points {
                let delay = delay_for_demand(link, point.demands[column]);
                if entries.last().is_some_and(|last| last.delay == delay) {
                    continue;
                }
                entries.push(RateEntry {
                    timestamp: point.time_index * link.time_scale_factor,
                    delay,
                });
            }
            RateSequence { flow, entries }
        })
        .collect()
}

/// Serialize rate sequences into the period file format.
///
/// One line per flow: the entry count followed by `timestamp:delay`
/// tokens, then a final line containing `0` which declares the trailing
/// all-reduce phase. The count always comes from the built entry list.
#[must_use]
pub fn render_period(sequences: &[RateSequence]) -> String {
    let mut out = String::new();
    for sequence in sequences {
        let tokens = sequence
            .entries
            .iter()
            .map(|entry| format!("{}:{}", entry.timestamp, entry.delay))
            .join(" ");
        out.push_str(&format!("{} {tokens} \n", sequence.entries.len()));
    }
    out.push_str("0\n");
    out
}

/// Workload and allocation declaration lines for one flow. Opaque to the
/// compiler beyond being literal strings.
#[derive(Debug, Clone, Deserialize)]
pub struct FlowDescriptor {
    pub workload: String,
    pub allocation: String,
}

#[derive(Debug, Deserialize)]
struct RawDescriptorTable {
    flows: BTreeMap<String, FlowDescriptor>,
    collective: FlowDescriptor,
}

/// Static per-flow descriptor table plus the trailing collective lines.
#[derive(Debug)]
pub struct DescriptorTable {
    flows: BTreeMap<FlowId, FlowDescriptor>,
    collective: FlowDescriptor,
}

impl DescriptorTable {
    pub fn from_file(table_path: &Path) -> ScheduleResult<Self> {
        let s = std::fs::read_to_string(table_path).map_err(|e| ScheduleError::Io {
            path: table_path.to_path_buf(),
            source: e,
        })?;
        Self::from_string(&s)
    }

    pub fn from_string(table_str: &str) -> ScheduleResult<Self> {
        let raw: RawDescriptorTable =
            serde_json::from_str(table_str).map_err(|e| ScheduleError::MalformedDescriptor {
                reason: format!("serde_json::from_str failed: {e}"),
            })?;

        let mut flows = BTreeMap::new();
        for (key, descriptor) in raw.flows {
            let flow: FlowId =
                key.trim()
                    .parse()
                    .map_err(|_| ScheduleError::MalformedDescriptor {
                        reason: format!("flow id '{key}' is not a non-negative integer"),
                    })?;
            flows.insert(flow, descriptor);
        }
        Ok(Self {
            flows,
            collective: raw.collective,
        })
    }

    fn get(&self, flow: FlowId) -> ScheduleResult<&FlowDescriptor> {
        self.flows
            .get(&flow)
            .ok_or(ScheduleError::MissingDescriptor { flow })
    }
}

/// Render the workload artifact for the given flow universe.
pub fn render_workload(universe: &[FlowId], table: &DescriptorTable) -> ScheduleResult<String> {
    let mut out = String::new();
    for &flow in universe {
        out.push_str(table.get(flow)?.workload.as_str());
        out.push('\n');
    }
    out.push_str(&table.collective.workload);
    out.push('\n');
    Ok(out)
}

/// Render the allocation artifact for the given flow universe.
pub fn render_allocation(universe: &[FlowId], table: &DescriptorTable) -> ScheduleResult<String> {
    let mut out = String::new();
    for &flow in universe {
        out.push_str(table.get(flow)?.allocation.as_str());
        out.push('\n');
    }
    out.push_str(&table.collective.allocation);
    out.push('\n');
    Ok(out)
}

/// Write `contents` to `path` via a temporary file in the same directory,
/// renamed into place once fully written.
pub fn write_atomic(path: &Path, contents: &str) -> ScheduleResult<()> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = NamedTempFile::new_in(parent.unwrap_or(Path::new(".")))
        .map_err(|e| ScheduleError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| ScheduleError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
    tmp.persist(path).map_err(|e| ScheduleError::Io {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

/// File names for the emitted artifacts.
#[derive(Debug)]
pub struct ArtifactNames {
    pub period: String,
    pub workload: String,
    pub allocation: String,
}

impl Default for ArtifactNames {
    fn default() -> Self {
        Self {
            period: "period.file".to_string(),
            workload: "workload.file".to_string(),
            allocation: "allocation.file".to_string(),
        }
    }
}

/// Paths of the artifacts written by [`compile_to_dir`].
#[derive(Debug)]
pub struct CompiledArtifacts {
    pub period: PathBuf,
    pub workload: Option<PathBuf>,
    pub allocation: Option<PathBuf>,
}

/// Compile a schedule into its artifacts under `out_dir`.
///
/// All artifact contents are rendered before anything touches the
/// filesystem, so validation failures cannot leave output behind.
pub fn compile_to_dir(
    schedule: &Schedule,
    link: &LinkModel,
    out_dir: &Path,
    names: &ArtifactNames,
    descriptors: Option<&DescriptorTable>,
) -> ScheduleResult<CompiledArtifacts> {
    let sequences = build_rate_sequences(schedule, link);
    let period = render_period(&sequences);

    let universe = schedule.flow_universe();
    let templated = match descriptors {
        Some(table) => Some((
            render_workload(&universe, table)?,
            render_allocation(&universe, table)?,
        )),
        None => None,
    };

    let period_path = out_dir.join(&names.period);
    write_atomic(&period_path, &period)?;
    debug!(
        "wrote {} ({} flows)",
        period_path.display(),
        sequences.len()
    );

    let mut artifacts = CompiledArtifacts {
        period: period_path,
        workload: None,
        allocation: None,
    };
    if let Some((workload, allocation)) = templated {
        let workload_path = out_dir.join(&names.workload);
        write_atomic(&workload_path, &workload)?;
        let allocation_path = out_dir.join(&names.allocation);
        write_atomic(&allocation_path, &allocation)?;
        artifacts.workload = Some(workload_path);
        artifacts.allocation = Some(allocation_path);
    }
    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::types::DemandVector;

    fn two_step_schedule() -> Schedule {
        let step0: DemandVector = BTreeMap::from([(0, 15.0), (1, 25.0)]);
        let step1: DemandVector = BTreeMap::from([(0, 25.0), (1, 25.0)]);
        Schedule::from_literal("s", [(0, step0), (1, step1)]).unwrap()
    }

    #[test]
    fn counts_come_from_built_entries() {
        let link = LinkModel::default();
        let sequences = build_rate_sequences(&two_step_schedule(), &link);
        // Flow 1 never changes; its count must be 1 even though the
        // schedule has two indices
        assert_eq!(sequences[0].entries.len(), 2);
        assert_eq!(sequences[1].entries.len(), 1);
        let rendered = render_period(&sequences);
        assert!(rendered.starts_with("2 "));
        assert!(rendered.lines().nth(1).unwrap().starts_with("1 "));
    }

    #[test]
    fn terminator_line_is_zero() {
        let link = LinkModel::default();
        let rendered = render_period(&build_rate_sequences(&two_step_schedule(), &link));
        assert_eq!(rendered.lines().last().unwrap(), "0");
        assert!(rendered.ends_with("0\n"));
    }

    #[test]
    fn timestamps_use_scale_factor() {
        let link = LinkModel::default();
        let sequences = build_rate_sequences(&two_step_schedule(), &link);
        assert_eq!(sequences[0].entries[0].timestamp, 0);
        assert_eq!(sequences[0].entries[1].timestamp, 1000);
    }

    #[test]
    fn descriptor_lines_follow_flow_order() {
        let table = DescriptorTable::from_string(
            r#"{
                "flows": {
                    "0": {"workload": "w0", "allocation": "a0"},
                    "1": {"workload": "w1", "allocation": "a1"}
                },
                "collective": {"workload": "wc", "allocation": "ac"}
            }"#,
        )
        .unwrap();
        let workload = render_workload(&[0, 1], &table).unwrap();
        assert_eq!(workload, "w0\nw1\nwc\n");
        let allocation = render_allocation(&[0, 1], &table).unwrap();
        assert_eq!(allocation, "a0\na1\nac\n");
    }

    #[test]
    fn missing_descriptor_is_an_error() {
        let table = DescriptorTable::from_string(
            r#"{
                "flows": {"0": {"workload": "w0", "allocation": "a0"}},
                "collective": {"workload": "wc", "allocation": "ac"}
            }"#,
        )
        .unwrap();
        let result = render_workload(&[0, 7], &table);
        assert!(matches!(
            result,
            Err(ScheduleError::MissingDescriptor { flow: 7 })
        ));
    }
}
