use paintstats_analysis::delta::DeltaMode;
use paintstats_analysis::outliers::OutlierPolicy;
use paintstats_common::{PaintStatsError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Metric samples at or above this many milliseconds are dropped by default.
pub const DEFAULT_OUTLIER_LIMIT_MS: f64 = 6500.0;

/// Absolute deltas whose magnitude reaches this many milliseconds are dropped by default.
pub const DEFAULT_DELTA_OUTLIER_LIMIT_MS: f64 = 2000.0;

/// Fraction used by percentile-threshold outlier policies.
pub const DEFAULT_OUTLIER_PERCENTILE: f64 = 0.95;

/// Upper bound on histogram bins per chart.
pub const MAX_CHART_BINS: usize = 2_000;

/// Which delta analyses run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaSelection {
    Absolute,
    Relative,
    Both,
}

impl DeltaSelection {
    pub fn modes(&self) -> &'static [DeltaMode] {
        match self {
            DeltaSelection::Absolute => &[DeltaMode::Absolute],
            DeltaSelection::Relative => &[DeltaMode::Relative],
            DeltaSelection::Both => &[DeltaMode::Absolute, DeltaMode::Relative],
        }
    }
}

/// Whether aggregate statistics see the series before or after outlier removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsInput {
    Filtered,
    Raw,
}

/// Bin size and optional fixed x-axis range of one chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub bin_size: f64,
    #[serde(default)]
    pub range: Option<[f64; 2]>,
}

impl ChartOptions {
    pub const fn with_bin(bin_size: f64) -> Self {
        Self { bin_size, range: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub enabled: bool,
    pub distribution: ChartOptions,
    pub distribution_by_url: ChartOptions,
    pub deltas: ChartOptions,
    pub deltas_relative: ChartOptions,
    pub fp_fcp_deltas: ChartOptions,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            distribution: ChartOptions::with_bin(100.0),
            distribution_by_url: ChartOptions::with_bin(50.0),
            deltas: ChartOptions::with_bin(50.0),
            deltas_relative: ChartOptions::with_bin(0.05),
            fp_fcp_deltas: ChartOptions::with_bin(10.0),
        }
    }
}

/// Everything that varies between report runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Applied to every metric series.
    pub outliers: OutlierPolicy,
    /// Applied to absolute delta series.
    pub delta_outliers: OutlierPolicy,
    /// Applied to relative delta series.
    pub relative_delta_outliers: OutlierPolicy,
    pub delta_mode: DeltaSelection,
    pub stats_on: StatsInput,
    pub charts: ChartSettings,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            outliers: OutlierPolicy::Fixed { limit: DEFAULT_OUTLIER_LIMIT_MS },
            delta_outliers: OutlierPolicy::Fixed { limit: DEFAULT_DELTA_OUTLIER_LIMIT_MS },
            relative_delta_outliers: OutlierPolicy::None,
            delta_mode: DeltaSelection::Both,
            stats_on: StatsInput::Filtered,
            charts: ChartSettings::default(),
        }
    }
}

impl ReportConfig {
    /// Load a config document; absent fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => PaintStatsError::FileNotFound(path.to_path_buf()),
            _ => PaintStatsError::Io(format!("{}: {e}", path.display())),
        })?;
        serde_json::from_str(&text).map_err(|e| {
            PaintStatsError::InvalidConfig(format!("{}: {e}", path.display()))
        })
    }

    pub fn delta_policy(&self, mode: DeltaMode) -> OutlierPolicy {
        match mode {
            DeltaMode::Absolute => self.delta_outliers,
            DeltaMode::Relative => self.relative_delta_outliers,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.outliers.validate()?;
        self.delta_outliers.validate()?;
        self.relative_delta_outliers.validate()?;

        let charts = &self.charts;
        for (name, options) in [
            ("distribution", &charts.distribution),
            ("distribution_by_url", &charts.distribution_by_url),
            ("deltas", &charts.deltas),
            ("deltas_relative", &charts.deltas_relative),
            ("fp_fcp_deltas", &charts.fp_fcp_deltas),
        ] {
            if !(options.bin_size.is_finite() && options.bin_size > 0.0) {
                return Err(PaintStatsError::InvalidConfig(format!(
                    "{name} chart bin size must be a positive number, got {}",
                    options.bin_size
                )));
            }
            if let Some([low, high]) = options.range {
                if !(low.is_finite() && high.is_finite() && low < high) {
                    return Err(PaintStatsError::InvalidConfig(format!(
                        "{name} chart range [{low}, {high}] must be finite and increasing"
                    )));
                }
            }
        }
        Ok(())
    }
}
