use std::path::PathBuf;
use paintstats_common::PaintStatsError;

#[test]
fn test_file_not_found_display() {
    let err = PaintStatsError::FileNotFound(PathBuf::from("paint-metrics.json"));
    assert_eq!(err.to_string(), "File not found: paint-metrics.json");
}

#[test]
fn test_missing_metric_key_display() {
    let err = PaintStatsError::MissingMetricKey {
        key: "fcp".to_string(),
        location: "URL entry 2".to_string(),
    };
    assert_eq!(err.to_string(), "Missing metric key \"fcp\" in URL entry 2");
}

#[test]
fn test_division_by_zero_display() {
    let err = PaintStatsError::DivisionByZero { index: 7 };
    assert_eq!(err.to_string(), "Division by zero: baseline is 0 at index 7");
}

#[test]
fn test_invalid_percentile_display() {
    let err = PaintStatsError::InvalidPercentile(1.5);
    assert_eq!(err.to_string(), "Percentile fraction 1.5 is outside [0, 1]");
}

#[test]
fn test_error_equality() {
    let a = PaintStatsError::EmptySeries("fp".to_string());
    let b = PaintStatsError::EmptySeries("fp".to_string());
    let c = PaintStatsError::EmptySeries("fcp".to_string());
    assert_eq!(a, b);
    assert_ne!(a, c);
}
