use paintstats_analysis::delta::DeltaMode;
use paintstats_analysis::stats::REPORT_PERCENTILES;
use std::fmt;

/// Pipe-delimited fixed-width text table with a centered title row.
#[derive(Debug, Clone, PartialEq)]
pub struct TextTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TextTable {
    fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

impl fmt::Display for TextTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.column_widths();
        // each column is padded by one space on both sides, columns share one '|'
        let inner = widths.iter().map(|w| w + 2).sum::<usize>() + widths.len().saturating_sub(1);

        writeln!(f, "|{:^inner$}|", self.title)?;
        write_row(f, &self.headers, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
        writeln!(f, "|{}|", rule.join("|"))?;
        for row in &self.rows {
            write_row(f, row, &widths)?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    write!(f, "|")?;
    for (i, &width) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        write!(f, " {cell:>width$} |")?;
    }
    writeln!(f)
}

/// Milliseconds rounded to a whole number.
pub fn format_ms(value: f64) -> String {
    format!("{}", value.round() as i64)
}

/// Ratio rendered as a signed percentage with one decimal.
pub fn format_ratio(value: f64) -> String {
    let pct = (value * 1000.0).round() / 10.0;
    // avoid printing "-0.0%"
    format!("{:+.1}%", if pct == 0.0 { 0.0 } else { pct })
}

pub fn percentile_label(fraction: f64) -> String {
    format!("p{}", (fraction * 100.0).round() as i64)
}

/// One aggregate per metric compared against the first (baseline) column:
/// the baseline shows its value, every other column shows `value (+delta)`.
pub fn comparison_table(title: &str, columns: &[(&str, f64)]) -> TextTable {
    let baseline = columns.first().map(|(_, v)| v.round() as i64).unwrap_or(0);
    let cells = columns
        .iter()
        .enumerate()
        .map(|(i, (_, value))| {
            let rounded = value.round() as i64;
            if i == 0 {
                rounded.to_string()
            } else {
                format!("{rounded} ({:+})", rounded - baseline)
            }
        })
        .collect();

    TextTable {
        title: title.to_string(),
        headers: columns.iter().map(|(label, _)| label.to_string()).collect(),
        rows: vec![cells],
    }
}

/// Percentile breakdown of one delta series.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaColumn {
    pub label: String,
    /// One value per entry of `REPORT_PERCENTILES`.
    pub percentiles: Vec<f64>,
    pub mean: f64,
}

/// Rows p10..p95 plus a mean row; one column per delta series.
pub fn delta_percentile_table(title: &str, mode: DeltaMode, columns: &[DeltaColumn]) -> TextTable {
    let cell: fn(f64) -> String = match mode {
        DeltaMode::Absolute => format_ms,
        DeltaMode::Relative => format_ratio,
    };

    let mut headers = vec!["Percentile".to_string()];
    headers.extend(columns.iter().map(|c| c.label.clone()));

    let mut rows: Vec<Vec<String>> = REPORT_PERCENTILES
        .iter()
        .enumerate()
        .map(|(i, &fraction)| {
            let mut row = vec![percentile_label(fraction)];
            row.extend(columns.iter().map(|c| c.percentiles.get(i).map_or_else(String::new, |v| cell(*v))));
            row
        })
        .collect();

    let mut mean_row = vec!["mean".to_string()];
    mean_row.extend(columns.iter().map(|c| cell(c.mean)));
    rows.push(mean_row);

    TextTable { title: title.to_string(), headers, rows }
}
