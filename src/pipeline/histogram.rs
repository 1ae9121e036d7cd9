//! Fixed-width histogram binning and SVG rendering

use anyhow::{Context, Result};
use plotters::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::error::{AnalysisError, AnalysisResult};

/// Income bin width in currency units
pub const DEFAULT_BIN_WIDTH: f64 = 2500.0;

/// Bin edges and per-bin counts.
///
/// Bins are half-open `[edges[i], edges[i + 1])` except the last, which is
/// closed on the right.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub bin_width: f64,
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }
}

/// Chart text for [`render_histogram`]
#[derive(Debug, Clone, Copy)]
pub struct HistogramLabels<'a> {
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
}

pub const INCOME_LABELS: HistogramLabels<'static> = HistogramLabels {
    title: "Income distribution",
    x_label: "Income",
    y_label: "Absolute frequency",
};

/// Bin `values` into intervals of `bin_width` starting at the minimum.
///
/// Edges run `min, min + w, ...` and stop before `max + w`, so the last edge
/// is always at or beyond the maximum value.
pub fn build_histogram(values: &[f64], bin_width: f64) -> AnalysisResult<Histogram> {
    if !(bin_width.is_finite() && bin_width > 0.0) {
        return Err(AnalysisError::InvalidBinWidth { width: bin_width });
    }
    if values.is_empty() {
        return Err(AnalysisError::EmptyColumn {
            column: "histogram input".to_string(),
        });
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let stop = max + bin_width;
    let n_edges = ((stop - min) / bin_width).ceil() as usize;
    let mut edges: Vec<f64> = (0..n_edges).map(|i| min + i as f64 * bin_width).collect();
    // A constant column would otherwise produce a single edge and no bins
    if edges.len() < 2 {
        edges.push(min + bin_width);
    }

    let n_bins = edges.len() - 1;
    let mut counts = vec![0usize; n_bins];
    for &value in values {
        let idx = edges.partition_point(|&edge| edge <= value).saturating_sub(1);
        counts[idx.min(n_bins - 1)] += 1;
    }

    Ok(Histogram {
        bin_width,
        edges,
        counts,
    })
}

/// Render the histogram as an SVG file at `output_path`.
///
/// The chart is drawn to a temporary sibling file and renamed into place, so
/// a failed render never leaves a partial image behind.
pub fn render_histogram(
    histogram: &Histogram,
    output_path: &Path,
    labels: HistogramLabels,
) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let partial = partial_path(output_path);
    let drawn = draw_bars(histogram, &partial, labels);
    if let Err(e) = drawn {
        let _ = std::fs::remove_file(&partial);
        return Err(e.context(format!("Failed to render histogram: {}", output_path.display())));
    }

    if let Err(e) = std::fs::rename(&partial, output_path) {
        let _ = std::fs::remove_file(&partial);
        return Err(e)
            .with_context(|| format!("Failed to write histogram: {}", output_path.display()));
    }

    Ok(())
}

fn partial_path(output_path: &Path) -> PathBuf {
    let file_name = output_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "histogram.svg".to_string());
    output_path.with_file_name(format!(".{}.partial", file_name))
}

fn draw_bars(histogram: &Histogram, path: &Path, labels: HistogramLabels) -> Result<()> {
    let x_min = histogram.edges[0];
    let x_max = histogram.edges[histogram.edges.len() - 1];
    let y_max = histogram.counts.iter().copied().max().unwrap_or(0).max(1);

    let root = SVGBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| anyhow::anyhow!("{e}"))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(25)
        .caption(labels.title, ("sans-serif", 24))
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0..y_max)
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(labels.x_label)
        .y_desc(labels.y_label)
        .draw()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let bars = histogram
        .edges
        .windows(2)
        .zip(histogram.counts.iter())
        .map(|(edge, &count)| {
            Rectangle::new([(edge[0], 0), (edge[1], count)], BLUE.mix(0.6).filled())
        });
    chart.draw_series(bars).map_err(|e| anyhow::anyhow!("{e}"))?;

    let outlines = histogram
        .edges
        .windows(2)
        .zip(histogram.counts.iter())
        .map(|(edge, &count)| {
            Rectangle::new([(edge[0], 0), (edge[1], count)], BLACK.stroke_width(1))
        });
    chart.draw_series(outlines).map_err(|e| anyhow::anyhow!("{e}"))?;

    root.present().map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}
