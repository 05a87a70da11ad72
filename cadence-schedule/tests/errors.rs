// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use cadence_schedule::{Schedule, ScheduleError, ScheduleSet};

fn collection() -> ScheduleSet {
    ScheduleSet::from_string(
        r#"{
            "s1": {"0": {"0": 15, "1": 25}},
            "s2": {"0": {"0": 5}}
        }"#,
    )
    .unwrap()
}

#[test]
fn select_known_schedule() {
    let schedule = collection().select("s2").unwrap();
    assert_eq!(schedule.id(), "s2");
    assert_eq!(schedule.flow_universe(), vec![0]);
}

#[test]
fn missing_schedule_reports_available_ids() {
    let err = collection().select("s3").unwrap_err();
    match &err {
        ScheduleError::MissingSchedule {
            requested,
            available,
        } => {
            assert_eq!(requested, "s3");
            assert_eq!(available, &["s1".to_string(), "s2".to_string()]);
        }
        other => panic!("unexpected error {other}"),
    }
    let message = err.to_string();
    assert!(message.contains("s1, s2"));
}

#[test]
#[should_panic(expected = "time index abc")]
fn non_numeric_time_index() {
    Schedule::from_string("s", r#"{"abc": {"0": 15}}"#).unwrap();
}

#[test]
#[should_panic(expected = "flow x")]
fn non_numeric_flow_id() {
    Schedule::from_string("s", r#"{"0": {"x": 15}}"#).unwrap();
}

#[test]
#[should_panic(expected = "negative or not finite")]
fn negative_demand() {
    Schedule::from_string("s", r#"{"0": {"0": 15}, "1": {"0": -2.5}}"#).unwrap();
}

#[test]
fn malformed_error_names_the_offending_input() {
    let err = Schedule::from_string("night", r#"{"0": {"0": 15}, "3": {"1": -2.5}}"#).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("night"));
    assert!(message.contains("time index 3"));
    assert!(message.contains("flow 1"));
}

#[test]
#[should_panic(expected = "empty flow universe")]
fn schedule_with_no_flows() {
    Schedule::from_string("s", r#"{"0": {}, "1": {}}"#).unwrap();
}

#[test]
#[should_panic(expected = "serde_json::from_str failed")]
fn schedule_that_is_not_json() {
    Schedule::from_string("s", "0: {0: 15}").unwrap();
}
