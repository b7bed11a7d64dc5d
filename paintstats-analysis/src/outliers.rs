use paintstats_common::{PaintStatsError, Result};
use serde::{Deserialize, Serialize};

use crate::stats::percentile;

/// How the outlier cutoff for a series is chosen.
///
/// | Policy       | Dropped values                                   |
/// |--------------|--------------------------------------------------|
/// | `None`       | nothing                                          |
/// | `Fixed`      | `abs(v) >= limit`                                |
/// | `Percentile` | `v >= percentile(series, fraction)`              |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OutlierPolicy {
    None,
    Fixed { limit: f64 },
    Percentile { fraction: f64 },
}

/// A resolved outlier bound, ready to apply to a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cutoff {
    /// Drop values whose magnitude is at or above the bound.
    Magnitude(f64),
    /// Drop values at or above the bound.
    Value(f64),
}

impl Cutoff {
    pub fn keeps(&self, value: f64) -> bool {
        match *self {
            Cutoff::Magnitude(limit) => value.abs() < limit,
            Cutoff::Value(limit) => value < limit,
        }
    }
}

impl OutlierPolicy {
    pub fn as_name(&self) -> &'static str {
        match self {
            OutlierPolicy::None => "none",
            OutlierPolicy::Fixed { .. } => "fixed",
            OutlierPolicy::Percentile { .. } => "percentile",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            OutlierPolicy::None => Ok(()),
            OutlierPolicy::Fixed { limit } if limit.is_finite() && limit > 0.0 => Ok(()),
            OutlierPolicy::Fixed { limit } => Err(PaintStatsError::InvalidConfig(format!(
                "fixed outlier limit must be a positive number, got {limit}"
            ))),
            OutlierPolicy::Percentile { fraction } if (0.0..=1.0).contains(&fraction) => Ok(()),
            OutlierPolicy::Percentile { fraction } => Err(PaintStatsError::InvalidPercentile(fraction)),
        }
    }

    /// Resolve the policy against `series`. `None` means nothing is dropped,
    /// which is also the result for a percentile policy over an empty series.
    pub fn cutoff(&self, series: &[f64]) -> Result<Option<Cutoff>> {
        match *self {
            OutlierPolicy::None => Ok(None),
            OutlierPolicy::Fixed { limit } => Ok(Some(Cutoff::Magnitude(limit))),
            OutlierPolicy::Percentile { .. } if series.is_empty() => Ok(None),
            OutlierPolicy::Percentile { fraction } => {
                Ok(Some(Cutoff::Value(percentile(series, fraction)?)))
            }
        }
    }

    /// Resolve the cutoff on `series` and drop the values it rejects.
    pub fn apply(&self, series: &[f64]) -> Result<Vec<f64>> {
        Ok(match self.cutoff(series)? {
            Some(cutoff) => remove_outliers(series, cutoff),
            None => series.to_vec(),
        })
    }
}

pub fn remove_outliers(series: &[f64], cutoff: Cutoff) -> Vec<f64> {
    series.iter().copied().filter(|&v| cutoff.keeps(v)).collect()
}

/// Apply `cutoff` inside each group independently, keeping the grouping.
pub fn filter_per_url(groups: &[&[f64]], cutoff: Option<Cutoff>) -> Vec<Vec<f64>> {
    groups
        .iter()
        .map(|group| match cutoff {
            Some(cutoff) => remove_outliers(group, cutoff),
            None => group.to_vec(),
        })
        .collect()
}
