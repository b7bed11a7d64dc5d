use clap::{Parser, ValueEnum};
use paintstats_analysis::outliers::OutlierPolicy;
use paintstats_common::{PaintStatsError, Result};
use std::path::PathBuf;

use crate::config::{
    DeltaSelection, ReportConfig, StatsInput, DEFAULT_OUTLIER_LIMIT_MS, DEFAULT_OUTLIER_PERCENTILE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutlierKind {
    None,
    Fixed,
    Percentile,
}

#[derive(Parser, Debug)]
#[command(name = "paintstats", about = "Paint-timing statistics and histogram report")]
pub struct Args {
    /// Measurement file: {"urls": [{"render": [...], "fp": [...], "fcp": [...], "fmp": [...]}]}
    pub input: PathBuf,

    /// JSON report configuration used as the base; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Outlier policy for the metric series
    #[arg(long, value_enum)]
    pub outliers: Option<OutlierKind>,

    /// Limit (ms) for the fixed outlier policy
    #[arg(long, conflicts_with = "outlier_percentile")]
    pub outlier_threshold: Option<f64>,

    /// Fraction for the percentile outlier policy
    #[arg(long)]
    pub outlier_percentile: Option<f64>,

    /// Fixed limit (ms) applied to absolute deltas
    #[arg(long)]
    pub delta_outlier_threshold: Option<f64>,

    /// Which delta analyses run
    #[arg(long, value_enum)]
    pub delta_mode: Option<DeltaModeArg>,

    /// Compute aggregate statistics on the filtered or the raw series
    #[arg(long, value_enum)]
    pub stats_on: Option<StatsOnArg>,

    /// Print the tables only
    #[arg(long)]
    pub no_charts: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeltaModeArg {
    Absolute,
    Relative,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatsOnArg {
    Filtered,
    Raw,
}

impl Args {
    /// Base config (file or defaults) with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<ReportConfig> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::load(path)?,
            None => ReportConfig::default(),
        };
        self.apply(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&self, config: &mut ReportConfig) -> Result<()> {
        // a bare threshold or fraction implies its policy kind
        let implied = match (self.outlier_threshold, self.outlier_percentile) {
            (Some(_), _) => Some(OutlierKind::Fixed),
            (None, Some(_)) => Some(OutlierKind::Percentile),
            (None, None) => None,
        };
        let kind = match (self.outliers, implied) {
            (Some(kind), Some(implied)) if kind != implied => {
                let flag = match implied {
                    OutlierKind::Percentile => "--outlier-percentile",
                    _ => "--outlier-threshold",
                };
                return Err(PaintStatsError::InvalidConfig(format!(
                    "{flag} does not apply to --outliers {}",
                    kind.to_possible_value().map_or_else(String::new, |v| v.get_name().to_string())
                )));
            }
            (kind, implied) => kind.or(implied),
        };
        if let Some(kind) = kind {
            config.outliers = match kind {
                OutlierKind::None => OutlierPolicy::None,
                OutlierKind::Fixed => OutlierPolicy::Fixed {
                    limit: self.outlier_threshold.unwrap_or(match config.outliers {
                        OutlierPolicy::Fixed { limit } => limit,
                        _ => DEFAULT_OUTLIER_LIMIT_MS,
                    }),
                },
                OutlierKind::Percentile => OutlierPolicy::Percentile {
                    fraction: self.outlier_percentile.unwrap_or(match config.outliers {
                        OutlierPolicy::Percentile { fraction } => fraction,
                        _ => DEFAULT_OUTLIER_PERCENTILE,
                    }),
                },
            };
        }

        if let Some(limit) = self.delta_outlier_threshold {
            config.delta_outliers = OutlierPolicy::Fixed { limit };
        }
        if let Some(mode) = self.delta_mode {
            config.delta_mode = match mode {
                DeltaModeArg::Absolute => DeltaSelection::Absolute,
                DeltaModeArg::Relative => DeltaSelection::Relative,
                DeltaModeArg::Both => DeltaSelection::Both,
            };
        }
        if let Some(stats_on) = self.stats_on {
            config.stats_on = match stats_on {
                StatsOnArg::Filtered => StatsInput::Filtered,
                StatsOnArg::Raw => StatsInput::Raw,
            };
        }
        if self.no_charts {
            config.charts.enabled = false;
        }
        Ok(())
    }
}
