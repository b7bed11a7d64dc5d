use paintstats_common::{PaintStatsError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaMode {
    /// `a[i] - b[i]`
    Absolute,
    /// `(a[i] - b[i]) / b[i]`
    Relative,
}

impl DeltaMode {
    pub fn compute(&self, a: &[f64], baseline: &[f64]) -> Result<Vec<f64>> {
        match self {
            DeltaMode::Absolute => delta(a, baseline),
            DeltaMode::Relative => relative_delta(a, baseline),
        }
    }

    pub fn as_name(&self) -> &'static str {
        match self {
            DeltaMode::Absolute => "absolute",
            DeltaMode::Relative => "relative",
        }
    }
}

fn check_aligned(a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(PaintStatsError::AlignmentError {
            detail: format!("cannot pair a series of {} samples with one of {}", a.len(), b.len()),
        });
    }
    Ok(())
}

/// Element-wise `a[i] - b[i]`.
pub fn delta(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    check_aligned(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x - y).collect())
}

/// Element-wise `(a[i] - baseline[i]) / baseline[i]`. Fails on the first zero baseline.
pub fn relative_delta(a: &[f64], baseline: &[f64]) -> Result<Vec<f64>> {
    check_aligned(a, baseline)?;
    a.iter()
        .zip(baseline)
        .enumerate()
        .map(|(index, (x, base))| {
            if *base == 0.0 {
                Err(PaintStatsError::DivisionByZero { index })
            } else {
                Ok((x - base) / base)
            }
        })
        .collect()
}
