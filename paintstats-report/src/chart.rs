use paintstats_common::{PaintStatsError, Result};
use std::fmt::Write as FmtWrite;
use tracing::warn;

use crate::config::{ChartOptions, MAX_CHART_BINS};

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 460.0;
const LEFT: f64 = 60.0;
const RIGHT: f64 = 20.0;
const TOP: f64 = 16.0;
const BOTTOM: f64 = 48.0;

const PALETTE: [&str; 6] = ["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b"];

/// One named series drawn as a bar layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self { name: name.into(), values }
    }
}

/// Overlayed histogram of several series sharing one set of bins.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub title: String,
    pub x_label: String,
    pub options: ChartOptions,
    pub series: Vec<ChartSeries>,
}

/// Bin layout plus per-series counts. Bin `i` covers `[start + i*size, start + (i+1)*size)`;
/// the last bin also holds values equal to the range end.
#[derive(Debug, Clone, PartialEq)]
pub struct Bins {
    pub start: f64,
    pub size: f64,
    pub counts: Vec<Vec<usize>>,
}

impl Bins {
    pub fn len(&self) -> usize {
        self.counts.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn end(&self) -> f64 {
        self.start + self.size * self.len() as f64
    }
}

impl Histogram {
    fn data_bounds(&self) -> Result<(f64, f64)> {
        let mut values = self.series.iter().flat_map(|s| s.values.iter().copied());
        let first = values
            .next()
            .ok_or_else(|| PaintStatsError::EmptySeries(format!("no samples to chart in {:?}", self.title)))?;
        Ok(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Bin layout: the explicit range, or the data min/max snapped outward to bin edges.
    /// A derived range that would need more than `MAX_CHART_BINS` bins gets wider bins.
    fn layout(&self) -> Result<(f64, f64, f64)> {
        let size = self.options.bin_size;
        if let Some([low, high]) = self.options.range {
            let span = ((high - low) / size).ceil();
            if span > MAX_CHART_BINS as f64 {
                return Err(PaintStatsError::InvalidChart(format!(
                    "{:?} would need {span} bins of size {size} (limit {MAX_CHART_BINS})",
                    self.title
                )));
            }
            return Ok((low, high, size));
        }

        let (min, max) = self.data_bounds()?;
        let (low, high) = snap(min, max, size);
        if ((high - low) / size).ceil() <= MAX_CHART_BINS as f64 {
            return Ok((low, high, size));
        }
        // snapping adds at most one bin on each side
        let widened = size * ((max - min) / (size * (MAX_CHART_BINS - 2) as f64)).ceil();
        warn!(
            chart = %self.title,
            bin_size = size,
            widened_bin_size = widened,
            "data range too wide for configured bin size, widening bins"
        );
        let (low, high) = snap(min, max, widened);
        Ok((low, high, widened))
    }

    pub fn bins(&self) -> Result<Bins> {
        let size = self.options.bin_size;
        if !(size.is_finite() && size > 0.0) {
            return Err(PaintStatsError::InvalidChart(format!("bin size must be positive, got {size}")));
        }
        let (low, high, size) = self.layout()?;
        let bin_count = (((high - low) / size).ceil() as usize).max(1);

        let counts = self
            .series
            .iter()
            .map(|s| {
                let mut counts = vec![0usize; bin_count];
                for &v in &s.values {
                    if v < low || v > high {
                        continue;
                    }
                    let idx = (((v - low) / size).floor() as usize).min(bin_count - 1);
                    counts[idx] += 1;
                }
                counts
            })
            .collect();

        Ok(Bins { start: low, size, counts })
    }

    /// Standalone HTML document with the histogram as inline SVG.
    pub fn render_html(&self) -> Result<String> {
        let bins = self.bins()?;
        let mut html = String::with_capacity(64 * 1024);
        write_document(&mut html, self, &bins).map_err(|e| PaintStatsError::InvalidChart(e.to_string()))?;
        Ok(html)
    }
}

fn snap(min: f64, max: f64, size: f64) -> (f64, f64) {
    let low = (min / size).floor() * size;
    let mut high = (max / size).ceil() * size;
    if high <= low {
        high = low + size;
    }
    (low, high)
}

fn write_document(out: &mut String, chart: &Histogram, bins: &Bins) -> std::fmt::Result {
    let title = escape(&chart.title);
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"utf-8\"/>")?;
    writeln!(out, "<title>{title}</title>")?;
    writeln!(out, "<style>")?;
    writeln!(out, "body{{font-family:Arial,Helvetica,sans-serif;margin:20px;color:#222;background:#fff;}}")?;
    writeln!(out, "h1{{margin:0 0 8px 0;font-size:22px;}}")?;
    writeln!(out, ".meta{{color:#555;font-size:13px;margin-bottom:12px;}}")?;
    writeln!(out, ".legend span{{display:inline-block;margin-right:16px;font-size:13px;}}")?;
    writeln!(out, ".legend i{{display:inline-block;width:12px;height:12px;margin-right:6px;opacity:0.6;}}")?;
    writeln!(out, "svg{{background:#fafafa;border:1px solid #e5e5e5;}}")?;
    writeln!(out, "</style>")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<h1>{title}</h1>")?;
    writeln!(
        out,
        "<div class=\"meta\">bin size {} &middot; range [{}, {}]</div>",
        format_tick(bins.size),
        format_tick(bins.start),
        format_tick(bins.end())
    )?;

    writeln!(out, "<div class=\"legend\">")?;
    for (i, series) in chart.series.iter().enumerate() {
        writeln!(
            out,
            "<span><i style=\"background:{}\"></i>{} (n={})</span>",
            PALETTE[i % PALETTE.len()],
            escape(&series.name),
            series.values.len()
        )?;
    }
    writeln!(out, "</div>")?;

    write_svg(out, chart, bins)?;

    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;
    Ok(())
}

fn write_svg(out: &mut String, chart: &Histogram, bins: &Bins) -> std::fmt::Result {
    let plot_w = WIDTH - LEFT - RIGHT;
    let plot_h = HEIGHT - TOP - BOTTOM;

    // y is the share of each series' samples in a bin, so series of different sizes overlay
    let shares: Vec<Vec<f64>> = chart
        .series
        .iter()
        .zip(&bins.counts)
        .map(|(series, counts)| {
            let total = series.values.len().max(1) as f64;
            counts.iter().map(|&c| c as f64 / total * 100.0).collect()
        })
        .collect();
    let max_y = shares.iter().flatten().copied().fold(0.0, f64::max);
    let max_y = if max_y == 0.0 { 1.0 } else { max_y };

    writeln!(out, "<svg width=\"{WIDTH}\" height=\"{HEIGHT}\" viewBox=\"0 0 {WIDTH} {HEIGHT}\">")?;
    writeln!(
        out,
        "<rect x=\"{LEFT}\" y=\"{TOP}\" width=\"{plot_w}\" height=\"{plot_h}\" fill=\"#fff\" stroke=\"#ddd\"/>"
    )?;

    let ticks = 4;
    for t in 0..=ticks {
        let value = max_y * t as f64 / ticks as f64;
        let y = TOP + plot_h - plot_h * t as f64 / ticks as f64;
        writeln!(
            out,
            "<line x1=\"{LEFT}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#eee\"/>",
            LEFT + plot_w
        )?;
        writeln!(
            out,
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"end\">{value:.1}%</text>",
            LEFT - 6.0,
            y + 4.0
        )?;
    }

    let bar_w = plot_w / bins.len().max(1) as f64;
    for (i, layer) in shares.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        for (b, share) in layer.iter().enumerate() {
            if *share == 0.0 {
                continue;
            }
            let h = share / max_y * plot_h;
            writeln!(
                out,
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{h:.2}\" fill=\"{color}\" fill-opacity=\"0.5\"/>",
                LEFT + b as f64 * bar_w,
                TOP + plot_h - h,
                bar_w.max(1.0)
            )?;
        }
    }

    let x_ticks = 5;
    for t in 0..=x_ticks {
        let value = bins.start + (bins.end() - bins.start) * t as f64 / x_ticks as f64;
        let x = LEFT + plot_w * t as f64 / x_ticks as f64;
        writeln!(
            out,
            "<text x=\"{x:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"middle\">{}</text>",
            TOP + plot_h + 16.0,
            format_tick(value)
        )?;
    }
    writeln!(
        out,
        "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\" text-anchor=\"middle\">{}</text>",
        LEFT + plot_w / 2.0,
        HEIGHT - 8.0,
        escape(&chart.x_label)
    )?;
    writeln!(out, "</svg>")?;
    Ok(())
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
