use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::{PaintStatsError, Result};

/// The four paint-timing metrics recorded per page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "render")]
    Render,
    #[serde(rename = "fp")]
    FirstPaint,
    #[serde(rename = "fcp")]
    FirstContentfulPaint,
    #[serde(rename = "fmp")]
    FirstMeaningfulPaint,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Render,
        Metric::FirstPaint,
        Metric::FirstContentfulPaint,
        Metric::FirstMeaningfulPaint,
    ];

    /// JSON key of this metric inside a URL entry.
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Render => "render",
            Metric::FirstPaint => "fp",
            Metric::FirstContentfulPaint => "fcp",
            Metric::FirstMeaningfulPaint => "fmp",
        }
    }

    pub fn from_key(key: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.key() == key)
    }

    /// Human-readable column label used in tables and chart legends.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Render => "Start Render",
            Metric::FirstPaint => "First Paint",
            Metric::FirstContentfulPaint => "First Contentful Paint",
            Metric::FirstMeaningfulPaint => "First Meaningful Paint",
        }
    }

    /// Short label used in delta column headers, e.g. `FCP - SR`.
    pub fn abbrev(&self) -> &'static str {
        match self {
            Metric::Render => "SR",
            Metric::FirstPaint => "FP",
            Metric::FirstContentfulPaint => "FCP",
            Metric::FirstMeaningfulPaint => "FMP",
        }
    }
}

/// Samples for one URL. Index `i` of every metric belongs to the same page load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrlSamples {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub render: Vec<f64>,
    pub fp: Vec<f64>,
    pub fcp: Vec<f64>,
    pub fmp: Vec<f64>,
}

impl UrlSamples {
    pub fn metric(&self, metric: Metric) -> &[f64] {
        match metric {
            Metric::Render => &self.render,
            Metric::FirstPaint => &self.fp,
            Metric::FirstContentfulPaint => &self.fcp,
            Metric::FirstMeaningfulPaint => &self.fmp,
        }
    }

    /// Number of page loads sampled for this URL.
    pub fn len(&self) -> usize {
        self.render.len()
    }

    pub fn is_empty(&self) -> bool {
        self.render.is_empty()
    }

    /// Name used in diagnostics: the `url` field when present, else the entry index.
    pub fn describe(&self, index: usize) -> String {
        match &self.url {
            Some(url) => format!("URL entry {index} ({url})"),
            None => format!("URL entry {index}"),
        }
    }
}

/// Every URL entry of one measurement file, in file order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementSet {
    pub urls: Vec<UrlSamples>,
}

// Wire shapes: metric arrays are optional here so that an absent key surfaces
// as `MissingMetricKey` rather than a generic serde message.
#[derive(Deserialize)]
struct RawDocument {
    urls: Vec<RawEntry>,
}

#[derive(Deserialize)]
struct RawEntry {
    url: Option<String>,
    render: Option<Vec<f64>>,
    fp: Option<Vec<f64>>,
    fcp: Option<Vec<f64>>,
    fmp: Option<Vec<f64>>,
}

impl MeasurementSet {
    /// Read and validate a measurement file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => PaintStatsError::FileNotFound(path.to_path_buf()),
            _ => PaintStatsError::Io(format!("{}: {e}", path.display())),
        })?;
        Self::from_json(&text)
    }

    /// Parse and validate a measurement document.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawDocument =
            serde_json::from_str(text).map_err(|e| PaintStatsError::MalformedJson(e.to_string()))?;

        let urls = raw
            .urls
            .into_iter()
            .enumerate()
            .map(|(index, entry)| entry.into_samples(index))
            .collect::<Result<Vec<_>>>()?;

        let set = MeasurementSet { urls };
        set.validate_alignment()?;
        Ok(set)
    }

    /// Every metric array of a URL entry must hold the same number of samples,
    /// since deltas pair samples by position.
    pub fn validate_alignment(&self) -> Result<()> {
        for (index, entry) in self.urls.iter().enumerate() {
            let expected = entry.render.len();
            for metric in Metric::ALL {
                let found = entry.metric(metric).len();
                if found != expected {
                    return Err(PaintStatsError::AlignmentError {
                        detail: format!(
                            "{} has {expected} {} samples but {found} {} samples",
                            entry.describe(index),
                            Metric::Render.key(),
                            metric.key(),
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// All samples of `metric` across URLs, concatenated in file order.
    pub fn series(&self, metric: Metric) -> Vec<f64> {
        self.urls
            .iter()
            .flat_map(|entry| entry.metric(metric).iter().copied())
            .collect()
    }

    /// Like [`MeasurementSet::series`], addressed by JSON key.
    pub fn series_by_key(&self, key: &str) -> Result<Vec<f64>> {
        let metric = Metric::from_key(key).ok_or_else(|| PaintStatsError::MissingMetricKey {
            key: key.to_string(),
            location: "measurement set".to_string(),
        })?;
        Ok(self.series(metric))
    }

    /// Samples of `metric` grouped by URL entry.
    pub fn per_url(&self, metric: Metric) -> Vec<&[f64]> {
        self.urls.iter().map(|entry| entry.metric(metric)).collect()
    }

    /// Total number of page loads across all URLs.
    pub fn sample_count(&self) -> usize {
        self.urls.iter().map(UrlSamples::len).sum()
    }
}

impl RawEntry {
    fn into_samples(self, index: usize) -> Result<UrlSamples> {
        let location = match &self.url {
            Some(url) => format!("URL entry {index} ({url})"),
            None => format!("URL entry {index}"),
        };
        let require = |values: Option<Vec<f64>>, metric: Metric| {
            values.ok_or_else(|| PaintStatsError::MissingMetricKey {
                key: metric.key().to_string(),
                location: location.clone(),
            })
        };

        Ok(UrlSamples {
            render: require(self.render, Metric::Render)?,
            fp: require(self.fp, Metric::FirstPaint)?,
            fcp: require(self.fcp, Metric::FirstContentfulPaint)?,
            fmp: require(self.fmp, Metric::FirstMeaningfulPaint)?,
            url: self.url,
        })
    }
}
