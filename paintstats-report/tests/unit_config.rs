use clap::Parser;
use paintstats_analysis::delta::DeltaMode;
use paintstats_analysis::outliers::OutlierPolicy;
use paintstats_common::PaintStatsError;
use paintstats_report::cli::Args;
use paintstats_report::config::{DeltaSelection, ReportConfig, StatsInput};
use std::io::Write;

fn parse(argv: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("paintstats").chain(argv.iter().copied())).unwrap()
}

fn config_file(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults() {
    let config = ReportConfig::default();
    assert_eq!(config.outliers, OutlierPolicy::Fixed { limit: 6500.0 });
    assert_eq!(config.delta_policy(DeltaMode::Absolute), OutlierPolicy::Fixed { limit: 2000.0 });
    assert_eq!(config.delta_policy(DeltaMode::Relative), OutlierPolicy::None);
    assert_eq!(config.delta_mode, DeltaSelection::Both);
    assert_eq!(config.stats_on, StatsInput::Filtered);
    assert!(config.charts.enabled);
    assert!(config.validate().is_ok());
}

#[test]
fn test_delta_selection_modes() {
    assert_eq!(DeltaSelection::Both.modes(), &[DeltaMode::Absolute, DeltaMode::Relative]);
    assert_eq!(DeltaSelection::Absolute.modes(), &[DeltaMode::Absolute]);
    assert_eq!(DeltaSelection::Relative.modes(), &[DeltaMode::Relative]);
}

#[test]
fn test_partial_config_file_keeps_defaults() {
    let file = config_file(r#"{"stats_on":"raw","outliers":{"kind":"none"},"charts":{"deltas":{"bin_size":25,"range":[-500,1500]}}}"#);
    let config = ReportConfig::load(file.path()).unwrap();
    assert_eq!(config.stats_on, StatsInput::Raw);
    assert_eq!(config.outliers, OutlierPolicy::None);
    assert_eq!(config.charts.deltas.bin_size, 25.0);
    assert_eq!(config.charts.deltas.range, Some([-500.0, 1500.0]));
    assert_eq!(config.charts.distribution.bin_size, 100.0);
    assert_eq!(config.delta_mode, DeltaSelection::Both);
}

#[test]
fn test_bad_config_file() {
    let file = config_file(r#"{"delta_mode":"sideways"}"#);
    assert!(matches!(ReportConfig::load(file.path()), Err(PaintStatsError::InvalidConfig(_))));
}

#[test]
fn test_validate_rejects_bad_chart_options() {
    let mut config = ReportConfig::default();
    config.charts.fp_fcp_deltas.bin_size = -1.0;
    assert!(matches!(config.validate(), Err(PaintStatsError::InvalidConfig(_))));

    let mut config = ReportConfig::default();
    config.charts.distribution.range = Some([500.0, 100.0]);
    assert!(matches!(config.validate(), Err(PaintStatsError::InvalidConfig(_))));
}

#[test]
fn test_cli_defaults_match_config_defaults() {
    let args = parse(&["paint-metrics.json"]);
    assert_eq!(args.input.to_str(), Some("paint-metrics.json"));
    assert_eq!(args.resolve_config().unwrap(), ReportConfig::default());
}

#[test]
fn test_cli_overrides() {
    let args = parse(&[
        "m.json",
        "--outliers",
        "percentile",
        "--delta-outlier-threshold",
        "1500",
        "--delta-mode",
        "absolute",
        "--stats-on",
        "raw",
        "--no-charts",
    ]);
    let config = args.resolve_config().unwrap();
    assert_eq!(config.outliers, OutlierPolicy::Percentile { fraction: 0.95 });
    assert_eq!(config.delta_outliers, OutlierPolicy::Fixed { limit: 1500.0 });
    assert_eq!(config.delta_mode, DeltaSelection::Absolute);
    assert_eq!(config.stats_on, StatsInput::Raw);
    assert!(!config.charts.enabled);
}

#[test]
fn test_cli_threshold_implies_fixed_policy() {
    let config = parse(&["m.json", "--outlier-threshold", "5000"]).resolve_config().unwrap();
    assert_eq!(config.outliers, OutlierPolicy::Fixed { limit: 5000.0 });

    let config = parse(&["m.json", "--outlier-percentile", "0.9"]).resolve_config().unwrap();
    assert_eq!(config.outliers, OutlierPolicy::Percentile { fraction: 0.9 });

    let config = parse(&["m.json", "--outliers", "fixed", "--outlier-threshold", "5000"]).resolve_config().unwrap();
    assert_eq!(config.outliers, OutlierPolicy::Fixed { limit: 5000.0 });
}

#[test]
fn test_cli_value_flag_must_match_policy_kind() {
    for argv in [
        ["m.json", "--outliers", "fixed", "--outlier-percentile", "0.9"],
        ["m.json", "--outliers", "none", "--outlier-threshold", "5000"],
        ["m.json", "--outliers", "percentile", "--outlier-threshold", "5000"],
    ] {
        let err = parse(&argv).resolve_config().unwrap_err();
        assert!(matches!(err, PaintStatsError::InvalidConfig(_)), "{argv:?}: {err:?}");
    }
}

#[test]
fn test_cli_threshold_conflicts_with_percentile() {
    let err = Args::try_parse_from(["paintstats", "m.json", "--outlier-threshold", "5000", "--outlier-percentile", "0.9"])
        .unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
}

#[test]
fn test_cli_flags_override_config_file() {
    let file = config_file(r#"{"delta_mode":"relative","outliers":{"kind":"percentile","fraction":0.8}}"#);
    let path = file.path().to_str().unwrap().to_string();

    let config = parse(&["m.json", "--config", &path]).resolve_config().unwrap();
    assert_eq!(config.delta_mode, DeltaSelection::Relative);
    assert_eq!(config.outliers, OutlierPolicy::Percentile { fraction: 0.8 });

    let config = parse(&["m.json", "--config", &path, "--delta-mode", "both", "--outliers", "percentile"])
        .resolve_config()
        .unwrap();
    assert_eq!(config.delta_mode, DeltaSelection::Both);
    // the file's fraction survives when only the kind is given
    assert_eq!(config.outliers, OutlierPolicy::Percentile { fraction: 0.8 });
}

#[test]
fn test_cli_invalid_percentile_rejected() {
    let err = parse(&["m.json", "--outlier-percentile", "1.2"]).resolve_config().unwrap_err();
    assert_eq!(err, PaintStatsError::InvalidPercentile(1.2));
}

#[test]
fn test_cli_requires_input() {
    let err = Args::try_parse_from(["paintstats"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
}
