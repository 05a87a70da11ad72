// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use std::path::Path;

use cadence_schedule::LinkModel;
use cadence_telemetry::TelemetryError;
use cadence_telemetry::export::{output_stem, write_series};
use cadence_telemetry::reader::{parse_table, read_file, resolve_input};

const TABLE: &str = "\
time-stamp term-id qos-level vc0 vc1 bw-consumed downstream-credits
1000 0 0 4 4 60 7
1000 2 0 4 4 0 7
2000 0 0 4 4 20 7
2000 2 0 4 4 80 7
";

#[test]
fn file_round_trip_to_csv() {
    let link = LinkModel::default();
    let dir = tempfile::tempdir().unwrap();
    let stats_path = dir.path().join("terminal-packet-stats-1234");
    std::fs::write(&stats_path, TABLE).unwrap();

    let samples = read_file(&stats_path, &link).unwrap();
    assert_eq!(samples.len(), 3);

    let written = write_series(&samples, dir.path(), &output_stem(Some(3))).unwrap();
    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "multiflow_s3.csv",
            "multiflow_s3_flow0.csv",
            "multiflow_s3_flow2.csv"
        ]
    );

    let combined = std::fs::read_to_string(&written[0]).unwrap();
    let mut lines = combined.lines();
    assert_eq!(lines.next().unwrap(), "flow,time_us,rate_gbps");
    // 60% of 25 GB/s at 1000ns
    assert_eq!(lines.next().unwrap(), "0,1,15");

    let flow2 = std::fs::read_to_string(&written[2]).unwrap();
    // The 0-bandwidth row at 1000ns was dropped, so flow 2 has one sample
    assert_eq!(flow2.lines().count(), 2);
    assert_eq!(flow2.lines().nth(1).unwrap(), "2,20");
}

#[test]
fn directory_input_picks_stats_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("other-output.txt"), "x").unwrap();
    let stats_path = dir.path().join("terminal-packet-stats-42");
    std::fs::write(&stats_path, TABLE).unwrap();

    assert_eq!(resolve_input(dir.path()).unwrap(), stats_path);
}

#[test]
fn directory_without_stats_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = resolve_input(dir.path());
    assert!(matches!(result, Err(TelemetryError::NoStatsFile { .. })));
}

#[test]
fn plain_file_input_passes_through() {
    let path = Path::new("some/stats/file");
    assert_eq!(resolve_input(path).unwrap(), path.to_path_buf());
}

#[test]
fn reader_matches_compiler_units() {
    // A flow running at the compiler's 15% demand should read back as
    // 15% of the configured bandwidth
    let link = LinkModel::default();
    let samples = parse_table(
        "time-stamp term-id bw-consumed\n5000 1 15\n",
        &link,
    )
    .unwrap();
    assert_eq!(samples.len(), 1);
    assert!((samples[0].rate_gbps - 0.15 * link.link_bandwidth_gbps).abs() < 1e-9);
    assert!((samples[0].time_us - 5.0).abs() < 1e-9);
}
