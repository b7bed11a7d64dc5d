use paintstats_analysis::delta::DeltaMode;
use paintstats_analysis::outliers::{filter_per_url, OutlierPolicy};
use paintstats_analysis::stats::{mean, percentiles, Summary, REPORT_PERCENTILES};
use paintstats_common::{MeasurementSet, Metric, Result};
use std::fmt;
use tracing::{debug, info, warn};

use crate::chart::{ChartSeries, Histogram};
use crate::config::{ChartOptions, ReportConfig, StatsInput};
use crate::table::{comparison_table, delta_percentile_table, DeltaColumn, TextTable};

pub const DISTRIBUTION_SUFFIX: &str = "-distribution.html";
pub const DISTRIBUTION_BY_URL_SUFFIX: &str = "-distribution-by-url.html";
pub const DELTAS_SUFFIX: &str = "-deltas.html";
pub const DELTAS_RELATIVE_SUFFIX: &str = "-deltas-relative.html";
pub const FP_FCP_DELTAS_SUFFIX: &str = "-fp-fcp-deltas.html";

/// Paint metrics compared against the start render baseline.
const BASELINE_PAIRS: [(Metric, Metric); 3] = [
    (Metric::FirstPaint, Metric::Render),
    (Metric::FirstContentfulPaint, Metric::Render),
    (Metric::FirstMeaningfulPaint, Metric::Render),
];

const FP_FCP_PAIR: (Metric, Metric) = (Metric::FirstContentfulPaint, Metric::FirstPaint);

/// A series before and after outlier removal.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSeries {
    pub label: String,
    pub raw: Vec<f64>,
    pub filtered: Vec<f64>,
}

impl FilteredSeries {
    fn new(label: impl Into<String>, raw: Vec<f64>, policy: &OutlierPolicy) -> Result<Self> {
        let filtered = policy.apply(&raw)?;
        let label = label.into();
        debug!(
            series = %label,
            policy = policy.as_name(),
            kept = filtered.len(),
            dropped = raw.len() - filtered.len(),
            "filtered outliers"
        );
        Ok(Self { label, raw, filtered })
    }

    /// The variant aggregate statistics are computed on.
    pub fn for_stats(&self, input: StatsInput) -> &[f64] {
        match input {
            StatsInput::Filtered => &self.filtered,
            StatsInput::Raw => &self.raw,
        }
    }
}

/// A chart document, not yet written anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    pub suffix: &'static str,
    pub html: String,
}

/// Everything one run produces: stdout tables and chart documents.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub tables: Vec<TextTable>,
    pub charts: Vec<RenderedChart>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, table) in self.tables.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{table}")?;
        }
        Ok(())
    }
}

/// Run the whole analysis in memory. Nothing is written; any error aborts the report.
pub fn build_report(set: &MeasurementSet, config: &ReportConfig) -> Result<Report> {
    config.validate()?;
    info!(
        urls = set.urls.len(),
        samples = set.sample_count(),
        outliers = config.outliers.as_name(),
        "analysing paint metrics"
    );

    let metrics = Metric::ALL
        .iter()
        .map(|&m| FilteredSeries::new(m.label(), set.series(m), &config.outliers).map(|s| (m, s)))
        .collect::<Result<Vec<_>>>()?;

    let mut tables = mean_tables(&metrics, config.stats_on)?;
    let mut charts = Vec::new();

    if config.charts.enabled {
        let series = metrics
            .iter()
            .map(|(_, s)| ChartSeries::new(s.label.clone(), s.filtered.clone()))
            .collect();
        charts.push(render(
            DISTRIBUTION_SUFFIX,
            "Paint metric distribution",
            "Time (ms)",
            config.charts.distribution,
            series,
        )?);
        charts.push(render(
            DISTRIBUTION_BY_URL_SUFFIX,
            "Paint metric distribution by URL average",
            "Mean time per URL (ms)",
            config.charts.distribution_by_url,
            per_url_means(set, config)?,
        )?);
    }

    for &mode in config.delta_mode.modes() {
        let policy = config.delta_policy(mode);
        let mut pairs = BASELINE_PAIRS.to_vec();
        pairs.push(FP_FCP_PAIR);

        let deltas = pairs
            .iter()
            .map(|&(a, b)| {
                let raw = mode.compute(&set.series(a), &set.series(b))?;
                FilteredSeries::new(format!("{} - {}", a.abbrev(), b.abbrev()), raw, &policy)
            })
            .collect::<Result<Vec<_>>>()?;

        let columns = deltas
            .iter()
            .map(|d| delta_column(d, config.stats_on))
            .collect::<Result<Vec<_>>>()?;
        let title = match mode {
            DeltaMode::Absolute => "Delta percentiles (ms)",
            DeltaMode::Relative => "Relative delta percentiles (% of baseline)",
        };
        tables.push(delta_percentile_table(title, mode, &columns));

        if config.charts.enabled {
            // the last entry is FCP - FP, charted on its own
            let (baseline_deltas, fp_fcp) = deltas.split_at(BASELINE_PAIRS.len());
            let series = baseline_deltas
                .iter()
                .map(|d| ChartSeries::new(d.label.clone(), d.filtered.clone()))
                .collect();
            match mode {
                DeltaMode::Absolute => {
                    charts.push(render(
                        DELTAS_SUFFIX,
                        "Paint metric deltas from start render",
                        "Delta (ms)",
                        config.charts.deltas,
                        series,
                    )?);
                    let series = fp_fcp
                        .iter()
                        .map(|d| ChartSeries::new(d.label.clone(), d.filtered.clone()))
                        .collect();
                    charts.push(render(
                        FP_FCP_DELTAS_SUFFIX,
                        "First contentful paint minus first paint",
                        "Delta (ms)",
                        config.charts.fp_fcp_deltas,
                        series,
                    )?);
                }
                DeltaMode::Relative => {
                    charts.push(render(
                        DELTAS_RELATIVE_SUFFIX,
                        "Paint metric deltas relative to start render",
                        "Delta / start render",
                        config.charts.deltas_relative,
                        series,
                    )?);
                }
            }
        }
    }

    Ok(Report { tables, charts })
}

fn mean_tables(metrics: &[(Metric, FilteredSeries)], input: StatsInput) -> Result<Vec<TextTable>> {
    let summaries = metrics
        .iter()
        .map(|(m, s)| Summary::compute(s.for_stats(input)).map(|summary| (m.label(), summary)))
        .collect::<Result<Vec<_>>>()?;

    let means: Vec<(&str, f64)> = summaries.iter().map(|(l, s)| (*l, s.mean)).collect();
    let harmonic: Vec<(&str, f64)> = summaries.iter().map(|(l, s)| (*l, s.harmonic_mean)).collect();
    Ok(vec![comparison_table("Mean", &means), comparison_table("Harmonic Mean", &harmonic)])
}

fn delta_column(series: &FilteredSeries, input: StatsInput) -> Result<DeltaColumn> {
    let data = series.for_stats(input);
    Ok(DeltaColumn {
        label: series.label.clone(),
        percentiles: percentiles(data, &REPORT_PERCENTILES)?,
        mean: mean(data)?,
    })
}

/// Mean of each URL's outlier-free samples, for render, fp and fcp.
/// The cutoff is resolved on the metric's full series, then applied per URL.
fn per_url_means(set: &MeasurementSet, config: &ReportConfig) -> Result<Vec<ChartSeries>> {
    [Metric::Render, Metric::FirstPaint, Metric::FirstContentfulPaint]
        .iter()
        .map(|&metric| {
            let cutoff = config.outliers.cutoff(&set.series(metric))?;
            let groups = filter_per_url(&set.per_url(metric), cutoff);
            let mut means = Vec::with_capacity(groups.len());
            for (index, group) in groups.iter().enumerate() {
                if group.is_empty() {
                    warn!(
                        metric = metric.key(),
                        entry = %set.urls[index].describe(index),
                        "no samples left after outlier removal, skipped in by-URL chart"
                    );
                    continue;
                }
                means.push(mean(group)?);
            }
            Ok(ChartSeries::new(metric.label(), means))
        })
        .collect()
}

fn render(
    suffix: &'static str,
    title: &str,
    x_label: &str,
    options: ChartOptions,
    series: Vec<ChartSeries>,
) -> Result<RenderedChart> {
    let chart = Histogram { title: title.to_string(), x_label: x_label.to_string(), options, series };
    Ok(RenderedChart { suffix, html: chart.render_html()? })
}
