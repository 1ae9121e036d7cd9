//! JSON export of every computed result

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{
    CorrelationMatrix, FittedModel, GroupComparison, Histogram, PartialRegression, SummaryTable,
};

/// Metadata about the analysis run
#[derive(Debug, Serialize)]
pub struct RunMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    pub docvisits_version: String,
    pub input_file: String,
    pub rows: usize,
    pub reference_year: i32,
    pub bin_width: f64,
}

impl RunMetadata {
    pub fn new(input_file: &str, rows: usize, reference_year: i32, bin_width: f64) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            docvisits_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: input_file.to_string(),
            rows,
            reference_year,
            bin_width,
        }
    }
}

/// A fitted model tagged with the question it answers
#[derive(Debug, Serialize)]
pub struct LabeledModel {
    pub label: String,
    pub sample: String,
    #[serde(flatten)]
    pub model: FittedModel,
}

/// Everything the run produced, in question order
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub metadata: RunMetadata,
    pub summary: Option<SummaryTable>,
    pub derived_summary: Option<SummaryTable>,
    pub income_histogram: Option<Histogram>,
    pub group_comparisons: Vec<GroupComparison>,
    pub correlation: Option<CorrelationMatrix>,
    pub models: Vec<LabeledModel>,
    /// Visits change from a 10% increase in age, at mean age
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_increase_effect: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_regression_check: Option<PartialRegressionCheck>,
}

/// Full-model coefficient next to the partial-regression slope
#[derive(Debug, Serialize)]
pub struct PartialRegressionCheck {
    pub focus: String,
    pub full_model_coefficient: f64,
    pub partial_coefficient: f64,
    pub absolute_difference: f64,
}

impl PartialRegressionCheck {
    pub fn new(focus: &str, full: &FittedModel, partial: &PartialRegression) -> Option<Self> {
        let full_model_coefficient = full.coefficient(focus)?;
        let partial_coefficient = partial.focus_coefficient();
        Some(Self {
            focus: focus.to_string(),
            full_model_coefficient,
            partial_coefficient,
            absolute_difference: (full_model_coefficient - partial_coefficient).abs(),
        })
    }
}

impl AnalysisReport {
    pub fn new(metadata: RunMetadata) -> Self {
        Self {
            metadata,
            summary: None,
            derived_summary: None,
            income_histogram: None,
            group_comparisons: Vec::new(),
            correlation: None,
            models: Vec::new(),
            age_increase_effect: None,
            partial_regression_check: None,
        }
    }

    pub fn add_model(&mut self, label: &str, sample: &str, model: FittedModel) {
        self.models.push(LabeledModel {
            label: label.to_string(),
            sample: sample.to_string(),
            model,
        });
    }
}

/// Write the report as pretty-printed JSON
pub fn export_results(report: &AnalysisReport, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize analysis results to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON file: {}", output_path.display()))?;

    Ok(())
}
