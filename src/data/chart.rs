use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::model::Record;
use super::terms::TermAxis;

// ---------------------------------------------------------------------------
// Chart data types
// ---------------------------------------------------------------------------

/// The two charted statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    MedianBid,
    MinBid,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::MedianBid, Metric::MinBid];

    pub fn label(self) -> &'static str {
        match self {
            Metric::MedianBid => "Median Bid",
            Metric::MinBid => "Min Bid",
        }
    }
}

/// Per-term averages of one section. `None` where no value was observed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermPoint {
    pub term: String,
    pub median_bid: Option<f64>,
    pub min_bid: Option<f64>,
}

impl TermPoint {
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::MedianBid => self.median_bid,
            Metric::MinBid => self.min_bid,
        }
    }
}

/// Everything needed to draw one section's chart.
///
/// `points` has exactly one entry per term of the axis, in axis order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub course_code: String,
    pub section: String,
    pub points: Vec<TermPoint>,
}

impl ChartSpec {
    /// Maximal runs of consecutive present values as `(axis index, value)`.
    ///
    /// Each run is drawn as its own line, so absent terms split the series.
    pub fn segments(&self, metric: Metric) -> Vec<Vec<(usize, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for (i, point) in self.points.iter().enumerate() {
            match point.value(metric) {
                Some(v) => current.push((i, v)),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    /// Number of axis terms with at least one metric present.
    pub fn observed_terms(&self) -> usize {
        self.points
            .iter()
            .filter(|p| p.median_bid.is_some() || p.min_bid.is_some())
            .count()
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Chart for one section, or `None` when no record belongs to it.
pub fn build_chart(records: &[&Record], section: &str, axis: &TermAxis) -> Option<ChartSpec> {
    let mut course_code = None;
    // (median, min) accumulators, one slot per axis term.
    let mut slots = vec![(Mean::default(), Mean::default()); axis.len()];
    for record in records.iter().filter(|r| r.section == section) {
        course_code.get_or_insert(record.course_code.as_str());
        // Terms outside the axis are not charted.
        if let Some(i) = axis.position(&record.term) {
            let (median, min) = &mut slots[i];
            median.push(record.median_bid);
            min.push(record.min_bid);
        }
    }
    let course_code = course_code?;

    let points = axis
        .labels()
        .iter()
        .zip(slots)
        .map(|(term, (median, min))| TermPoint {
            term: term.clone(),
            median_bid: median.value(),
            min_bid: min.value(),
        })
        .collect();

    Some(ChartSpec {
        title: format!("{course_code} - Section {section}"),
        course_code: course_code.to_string(),
        section: section.to_string(),
        points,
    })
}

/// One chart per selected section, in selection order.
///
/// Sections without matching records are skipped; repeated sections are charted once.
pub fn build_charts(records: &[&Record], sections: &[String], axis: &TermAxis) -> Vec<ChartSpec> {
    let mut charts: Vec<ChartSpec> = Vec::with_capacity(sections.len());
    for section in sections {
        if charts.iter().any(|c| c.section == *section) {
            continue;
        }
        if let Some(chart) = build_chart(records, section, axis) {
            charts.push(chart);
        }
    }
    charts
}

/// Write chart specs as pretty JSON. Absent values are written as `null`.
pub fn write_charts_json(charts: &[ChartSpec], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, charts).context("serializing charts")?;
    writer.flush().context("flushing chart export")?;
    Ok(())
}
