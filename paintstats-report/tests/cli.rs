use std::path::Path;
use std::process::Command;

const SAMPLE: &str = r#"{"urls":[{"render":[100,200],"fp":[150,250],"fcp":[180,300],"fmp":[200,320]}]}"#;

fn paintstats(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_paintstats"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run paintstats")
}

fn html_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".html"))
        .collect();
    names.sort();
    names
}

#[test]
fn test_report_run_prints_tables_and_writes_charts() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("paint-metrics.json");
    std::fs::write(&input, SAMPLE).unwrap();

    let out = paintstats(&[input.to_str().unwrap()]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("| Start Render | First Paint | First Contentful Paint | First Meaningful Paint |"));
    assert!(stdout.contains("Harmonic Mean"));
    assert!(stdout.contains("Relative delta percentiles"));

    assert_eq!(
        html_files(dir.path()),
        vec![
            "paint-metrics-deltas-relative.html",
            "paint-metrics-deltas.html",
            "paint-metrics-distribution-by-url.html",
            "paint-metrics-distribution.html",
            "paint-metrics-fp-fcp-deltas.html",
        ]
    );
}

#[test]
fn test_missing_argument_prints_usage_and_fails() {
    let out = paintstats(&[]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"));
}

#[test]
fn test_missing_file_fails_with_message() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("absent.json");
    let out = paintstats(&[input.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("File not found"));
}

#[test]
fn test_failed_run_writes_no_charts() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.json");
    // zero render makes the harmonic mean undefined
    std::fs::write(&input, r#"{"urls":[{"render":[0],"fp":[1],"fcp":[2],"fmp":[3]}]}"#).unwrap();
    let out = paintstats(&[input.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Domain error"));
    assert!(out.stdout.is_empty());
    assert!(html_files(dir.path()).is_empty());
}

#[test]
fn test_no_charts_flag() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("m.json");
    std::fs::write(&input, SAMPLE).unwrap();
    let out = paintstats(&[input.to_str().unwrap(), "--no-charts", "--delta-mode", "absolute"]);
    assert!(out.status.success());
    assert!(!String::from_utf8_lossy(&out.stdout).contains("Relative"));
    assert!(html_files(dir.path()).is_empty());
}
