// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Types that map directly to the schedule document contents.
//!
//! A schedule document is a JSON mapping from stringified time index to a
//! mapping from stringified flow id to a bandwidth demand, expressed as a
//! percentage of full link bandwidth. A collection document holds several
//! such schedules keyed by schedule id.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::{ScheduleError, ScheduleResult};

/// Flow identifier as declared in the schedule and telemetry files.
pub type FlowId = u32;

/// Schedule-relative time index (unitless, ascending).
pub type TimeIndex = u64;

/// Demand values for one time index, keyed by flow id.
pub type DemandVector = BTreeMap<FlowId, f64>;

/// A bandwidth-demand schedule, immutable once loaded.
#[derive(Debug, Clone)]
pub struct Schedule {
    id: String,
    steps: BTreeMap<TimeIndex, DemandVector>,
}

/// Raw JSON shape: all keys are strings in the document.
type RawSchedule = BTreeMap<String, BTreeMap<String, f64>>;

fn parse_raw(id: &str, raw: RawSchedule) -> ScheduleResult<Schedule> {
    let mut steps = BTreeMap::new();
    for (t_key, raw_vector) in raw {
        let t: TimeIndex =
            t_key.trim().parse().map_err(|_| ScheduleError::MalformedSchedule {
                schedule: id.to_string(),
                time_index: t_key.clone(),
                flow: "-".to_string(),
                reason: "time index is not a non-negative integer".to_string(),
            })?;

        let mut vector = DemandVector::new();
        for (f_key, demand) in raw_vector {
            let flow: FlowId =
                f_key.trim().parse().map_err(|_| ScheduleError::MalformedSchedule {
                    schedule: id.to_string(),
                    time_index: t_key.clone(),
                    flow: f_key.clone(),
                    reason: "flow id is not a non-negative integer".to_string(),
                })?;

            if !demand.is_finite() || demand < 0.0 {
                return Err(ScheduleError::MalformedSchedule {
                    schedule: id.to_string(),
                    time_index: t_key.clone(),
                    flow: f_key.clone(),
                    reason: format!("demand value {demand} is negative or not finite"),
                });
            }
            vector.insert(flow, demand);
        }
        steps.insert(t, vector);
    }

    let schedule = Schedule {
        id: id.to_string(),
        steps,
    };
    if schedule.flow_universe().is_empty() {
        return Err(ScheduleError::EmptyFlowUniverse {
            schedule: id.to_string(),
        });
    }
    Ok(schedule)
}

impl Schedule {
    /// Build a schedule from (time index, demand vector) pairs.
    ///
    /// Used by tests and embedded-literal schedule sources; validated the
    /// same way as a loaded document.
    pub fn from_literal<I>(id: &str, steps: I) -> ScheduleResult<Self>
    where
        I: IntoIterator<Item = (TimeIndex, DemandVector)>,
    {
        let raw: RawSchedule = steps
            .into_iter()
            .map(|(t, v)| {
                (
                    t.to_string(),
                    v.into_iter().map(|(f, d)| (f.to_string(), d)).collect(),
                )
            })
            .collect();
        parse_raw(id, raw)
    }

    pub fn from_file(schedule_path: &Path) -> ScheduleResult<Self> {
        let s = std::fs::read_to_string(schedule_path).map_err(|e| ScheduleError::Io {
            path: schedule_path.to_path_buf(),
            source: e,
        })?;
        let id = schedule_path
            .file_stem()
            .map_or_else(|| "schedule".to_string(), |s| s.to_string_lossy().to_string());
        Self::from_string(&id, &s)
    }

    pub fn from_string(id: &str, schedule_str: &str) -> ScheduleResult<Self> {
        let raw: RawSchedule =
            serde_json::from_str(schedule_str).map_err(|e| ScheduleError::MalformedSchedule {
                schedule: id.to_string(),
                time_index: "-".to_string(),
                flow: "-".to_string(),
                reason: format!("serde_json::from_str failed: {e}"),
            })?;
        parse_raw(id, raw)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn steps(&self) -> &BTreeMap<TimeIndex, DemandVector> {
        &self.steps
    }

    /// Sorted union of every flow id appearing at any time index.
    ///
    /// This fixes the canonical column order used by the resolver and all
    /// three emitted artifacts.
    #[must_use]
    pub fn flow_universe(&self) -> Vec<FlowId> {
        let ids: BTreeSet<FlowId> = self
            .steps
            .values()
            .flat_map(|vector| vector.keys().copied())
            .collect();
        ids.into_iter().collect()
    }
}

/// A collection of schedules keyed by schedule id.
#[derive(Debug)]
pub struct ScheduleSet {
    schedules: BTreeMap<String, RawSchedule>,
}

impl ScheduleSet {
    pub fn from_file(set_path: &Path) -> ScheduleResult<Self> {
        let s = std::fs::read_to_string(set_path).map_err(|e| ScheduleError::Io {
            path: set_path.to_path_buf(),
            source: e,
        })?;
        Self::from_string(&s)
    }

    pub fn from_string(set_str: &str) -> ScheduleResult<Self> {
        let schedules: BTreeMap<String, RawSchedule> =
            serde_json::from_str(set_str).map_err(|e| ScheduleError::MalformedSchedule {
                schedule: "-".to_string(),
                time_index: "-".to_string(),
                flow: "-".to_string(),
                reason: format!("serde_json::from_str failed: {e}"),
            })?;
        Ok(Self { schedules })
    }

    /// The schedule ids present, in sorted order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.schedules.keys().cloned().collect()
    }

    /// Extract and validate one schedule by id.
    pub fn select(&self, id: &str) -> ScheduleResult<Schedule> {
        match self.schedules.get(id) {
            Some(raw) => parse_raw(id, raw.clone()),
            None => Err(ScheduleError::MissingSchedule {
                requested: id.to_string(),
                available: self.ids(),
            }),
        }
    }
}
