pub mod chart;
pub mod cli;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod table;

use paintstats_common::{MeasurementSet, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use config::ReportConfig;
use pipeline::{build_report, Report};

/// Load `input`, build the report and write its charts next to the input.
/// Returns the report so the caller can print its tables.
pub fn run(input: &Path, config: &ReportConfig) -> Result<Report> {
    let set = MeasurementSet::load(input)?;
    info!(path = %input.display(), urls = set.urls.len(), "loaded measurements");

    let report = build_report(&set, config)?;

    let files: Vec<(PathBuf, String)> = report
        .charts
        .iter()
        .map(|chart| (output::output_path(input, chart.suffix), chart.html.clone()))
        .collect();
    output::write_atomically(&files)?;

    Ok(report)
}
