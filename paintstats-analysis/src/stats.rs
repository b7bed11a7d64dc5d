use paintstats_common::{PaintStatsError, Result};

/// Percentile fractions reported in the breakdown tables.
pub const REPORT_PERCENTILES: [f64; 7] = [0.10, 0.25, 0.50, 0.70, 0.80, 0.90, 0.95];

pub fn mean(data: &[f64]) -> Result<f64> {
    if data.is_empty() {
        return Err(PaintStatsError::EmptySeries("mean of an empty series".to_string()));
    }
    Ok(data.iter().sum::<f64>() / data.len() as f64)
}

/// Harmonic mean; only defined when every value is strictly positive.
pub fn harmonic_mean(data: &[f64]) -> Result<f64> {
    if data.is_empty() {
        return Err(PaintStatsError::EmptySeries("harmonic mean of an empty series".to_string()));
    }
    if let Some((index, value)) = data.iter().enumerate().find(|(_, v)| **v <= 0.0) {
        return Err(PaintStatsError::DomainError(format!(
            "harmonic mean requires positive values, found {value} at index {index}"
        )));
    }
    let reciprocal_sum: f64 = data.iter().map(|v| 1.0 / v).sum();
    Ok(data.len() as f64 / reciprocal_sum)
}

/// Sort `data` ascending and return the element at index `floor(p * n)`,
/// clamped to the last element.
pub fn percentile(data: &[f64], p: f64) -> Result<f64> {
    let sorted = sorted_copy(data)?;
    percentile_of_sorted(&sorted, p)
}

/// Several percentiles of `data`, sorting it once.
pub fn percentiles(data: &[f64], fractions: &[f64]) -> Result<Vec<f64>> {
    let sorted = sorted_copy(data)?;
    fractions.iter().map(|&p| percentile_of_sorted(&sorted, p)).collect()
}

fn sorted_copy(data: &[f64]) -> Result<Vec<f64>> {
    if data.is_empty() {
        return Err(PaintStatsError::EmptySeries("percentile of an empty series".to_string()));
    }
    let mut sorted = data.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    Ok(sorted)
}

fn percentile_of_sorted(sorted: &[f64], p: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&p) {
        return Err(PaintStatsError::InvalidPercentile(p));
    }
    let idx = (p * sorted.len() as f64).floor() as usize;
    Ok(sorted[idx.min(sorted.len() - 1)])
}

/// Aggregates printed for one series in the mean tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub harmonic_mean: f64,
}

impl Summary {
    pub fn compute(data: &[f64]) -> Result<Self> {
        let mean = mean(data)?;
        let harmonic_mean = harmonic_mean(data)?;
        Ok(Self { mean, harmonic_mean })
    }
}
