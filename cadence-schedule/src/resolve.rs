// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Carry-forward resolution and change-point filtering.
//!
//! A raw schedule is sparse: a flow missing at some time index inherits
//! its most recent resolved value (zero before the first mention). The
//! resolved vectors are then compacted to the indices where something
//! actually changed. The rate sequence builder and the diagnostic `show`
//! output both consume this one function, so they can never disagree on
//! where the change points are.

use crate::types::{FlowId, Schedule, TimeIndex};

/// A resolved demand vector at a time index where it differs from its
/// predecessor. Demands are in flow-universe column order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangePoint {
    pub time_index: TimeIndex,
    pub demands: Vec<f64>,
}

/// Resolve the schedule over the given flow universe and keep only the
/// change points. The first time index is always kept: it has no
/// predecessor, even when it only inherits the all-zero default.
#[must_use]
pub fn change_points(schedule: &Schedule, universe: &[FlowId]) -> Vec<ChangePoint> {
    let mut points = Vec::new();
    let mut previous = vec![0.0; universe.len()];
    let mut first = true;

    for (&time_index, raw_vector) in schedule.steps() {
        let resolved: Vec<f64> = universe
            .iter()
            .enumerate()
            .map(|(column, flow)| raw_vector.get(flow).copied().unwrap_or(previous[column]))
            .collect();

        if first || resolved != previous {
            points.push(ChangePoint {
                time_index,
                demands: resolved.clone(),
            });
        }
        previous = resolved;
        first = false;
    }

    points
}
