//! docvisits: Insurance Lottery Survey Analysis CLI
//!
//! Runs the fixed sequence of analyses (questions A through K) over the
//! survey file and prints every table in order.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use polars::prelude::DataFrame;

use docvisits::cli::{Cli, OutputFormat};
use docvisits::pipeline::{
    add_age, add_age_squared, add_visit_indicator, build_histogram, compare_group_means,
    correlation_matrix, describe, describe_numeric, load_survey, numeric_values,
    partial_regression, partition_by_indicator, quadratic_effect, regress, render_histogram,
    FittedModel, SummaryTable, AGE, AGE_SQUARED, DOCTOR_VISITS, FEMALE, HOUSEHOLD_INCOME,
    INCOME_LABELS, LOTTERY, VISIT_INDICATOR,
};
use docvisits::report::{
    correlation_to_latex, display_correlation, display_group_comparison, display_histogram,
    display_model, display_summary, export_results, model_to_latex, print_table_title,
    summary_to_latex, AnalysisReport, PartialRegressionCheck, RunMetadata, RunSummary,
};
use docvisits::utils::{
    print_banner, print_completion, print_config, print_info, print_step_header, print_step_time,
    print_success,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&cli.input, &cli.histogram, cli.reference_year, cli.bin_width);

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let format = cli.format;

    // A. Load, recode and summarize
    print_step_header("A", "Load Data & Summary Statistics");
    let step_start = Instant::now();

    let mut df = load_survey(&cli.input, cli.infer_schema_length)
        .with_context(|| format!("Step A: failed to load {}", cli.input.display()))?;
    let (rows, cols) = df.shape();
    print_success(&format!("Loaded and recoded {} rows, {} columns", rows, cols));

    let mut summary = RunSummary::new(rows, cols);
    let mut report = AnalysisReport::new(RunMetadata::new(
        &cli.input.display().to_string(),
        rows,
        cli.reference_year,
        cli.bin_width,
    ));

    let stats = describe_numeric(&df)
        .context("Step A: summary statistics")?
        .rounded(2);
    emit_summary("Summary statistics", &stats, format);
    report.summary = Some(stats);
    finish_step(&mut summary, "Load & summarize", step_start);

    // B. Derived variables
    print_step_header("B", "Age & Doctor Visit Indicator");
    let step_start = Instant::now();

    add_age(&mut df, cli.reference_year).context("Step B: deriving age")?;
    add_visit_indicator(&mut df).context("Step B: deriving visit indicator")?;
    let derived = describe(&df, &[AGE, VISIT_INDICATOR])
        .context("Step B: summary statistics")?
        .rounded(2);
    emit_summary("Age and visit indicator", &derived, format);
    report.derived_summary = Some(derived);
    finish_step(&mut summary, "Derived variables", step_start);

    // C. Income histogram
    print_step_header("C", "Income Distribution");
    let step_start = Instant::now();

    let incomes = numeric_values(&df, HOUSEHOLD_INCOME).context("Step C: reading income")?;
    let histogram =
        build_histogram(&incomes, cli.bin_width).context("Step C: binning income")?;
    render_histogram(&histogram, &cli.histogram, INCOME_LABELS).context("Step C")?;
    if format.tables() {
        display_histogram(&histogram);
    }
    print_success(&format!(
        "Histogram with {} bins saved to {}",
        histogram.bin_count(),
        cli.histogram.display()
    ));
    summary.histogram_path = Some(cli.histogram.display().to_string());
    report.income_histogram = Some(histogram);
    finish_step(&mut summary, "Histogram", step_start);

    // D. Lottery selected vs. not selected
    print_step_header("D", "Selected vs. Not Selected");
    let step_start = Instant::now();

    let comparison = compare_group_means(&df, LOTTERY, &[AGE, FEMALE])
        .context("Step D: comparing lottery groups")?;
    display_group_comparison(&comparison);
    for mean in &comparison.means {
        println!(
            "      Mean {} selected: {:.2}   not selected: {:.2}",
            mean.column, mean.mean_one, mean.mean_zero
        );
    }
    report.group_comparisons.push(comparison);
    finish_step(&mut summary, "Group comparison", step_start);

    // F. Visits on lottery selection
    print_step_header("F", "Doctor Visits on Lottery Selection");
    let step_start = Instant::now();

    let model = fit_model(&df, "Step F", DOCTOR_VISITS, &[LOTTERY])?;
    emit_model("Model 1", "all", model, format, &mut report, &mut summary);
    finish_step(&mut summary, "Regression F", step_start);

    // G. Adding controls
    print_step_header("G", "Adding Age, Sex and Income");
    let step_start = Instant::now();

    let correlation = correlation_matrix(
        &df,
        &[DOCTOR_VISITS, LOTTERY, AGE, FEMALE, HOUSEHOLD_INCOME],
    )
    .context("Step G: correlation matrix")?;
    if format.tables() {
        print_table_title("Correlation matrix (Pearson)");
        display_correlation(&correlation);
    }
    if format.latex() {
        println!("{}", correlation_to_latex(&correlation));
    }
    report.correlation = Some(correlation);

    let controlled_models: [(&str, &[&str]); 4] = [
        ("Model 2", &[LOTTERY, AGE]),
        ("Model 3", &[LOTTERY, FEMALE]),
        ("Model 4", &[LOTTERY, HOUSEHOLD_INCOME]),
        ("Model 5", &[LOTTERY, AGE, FEMALE, HOUSEHOLD_INCOME]),
    ];
    for (label, predictors) in controlled_models {
        let model = fit_model(&df, "Step G", DOCTOR_VISITS, predictors)?;
        emit_model(label, "all", model, format, &mut report, &mut summary);
    }
    finish_step(&mut summary, "Regressions G", step_start);

    // I. Age slope by sex
    print_step_header("I", "Age and Visits for Women and Men");
    let step_start = Instant::now();

    let (females, males) =
        partition_by_indicator(&df, FEMALE).context("Step I: splitting by sex")?;
    for (label, sample, subset) in [("Model 6", "female", &females), ("Model 7", "male", &males)] {
        let model =
            fit_model(subset, "Step I", DOCTOR_VISITS, &[LOTTERY, AGE, HOUSEHOLD_INCOME])?;
        emit_model(label, sample, model, format, &mut report, &mut summary);
    }
    finish_step(&mut summary, "Regressions I", step_start);

    // J. Quadratic age profile
    print_step_header("J", "Non-linear Age Profile");
    let step_start = Instant::now();

    add_age_squared(&mut df).context("Step J: deriving age squared")?;
    let model = fit_model(&df, "Step J", DOCTOR_VISITS, &[LOTTERY, AGE, AGE_SQUARED])?;
    let ages = numeric_values(&df, AGE).context("Step J: reading age")?;
    let mean_age = ages.iter().sum::<f64>() / ages.len() as f64;
    if let (Some(linear), Some(quadratic)) =
        (model.coefficient(AGE), model.coefficient(AGE_SQUARED))
    {
        let effect = quadratic_effect(linear, quadratic, mean_age, 0.10);
        print_info(&format!(
            "A 10% increase in age at the mean age ({:.2}) changes expected visits by {:.4}",
            mean_age, effect
        ));
        report.age_increase_effect = Some(effect);
    }
    emit_model("Model 8", "all", model, format, &mut report, &mut summary);
    finish_step(&mut summary, "Regression J", step_start);

    // K. Frisch-Waugh-Lovell
    print_step_header("K", "Partialling Out Age and Income");
    let step_start = Instant::now();

    let controls = [AGE, HOUSEHOLD_INCOME];
    let full = fit_model(&df, "Step K", DOCTOR_VISITS, &[FEMALE, AGE, HOUSEHOLD_INCOME])?;
    let partial = partial_regression(&df, DOCTOR_VISITS, FEMALE, &controls)
        .context("Step K: partial regression")?;

    let check = PartialRegressionCheck::new(FEMALE, &full, &partial);
    emit_model("Model 9", "all", full, format, &mut report, &mut summary);
    emit_model(
        "Model 10",
        "all",
        partial.response_on_controls.clone(),
        format,
        &mut report,
        &mut summary,
    );
    emit_model(
        "Model 11",
        "all",
        partial.focus_on_controls.clone(),
        format,
        &mut report,
        &mut summary,
    );
    emit_model("Model 12", "all", partial.partial, format, &mut report, &mut summary);

    if let Some(check) = check {
        print_info(&format!(
            "Coefficient on {}: full model {:.6}, residual regression {:.6} (|diff| = {:.2e})",
            check.focus,
            check.full_model_coefficient,
            check.partial_coefficient,
            check.absolute_difference
        ));
        report.partial_regression_check = Some(check);
    }
    finish_step(&mut summary, "Regressions K", step_start);

    if let Some(path) = &cli.export_json {
        export_results(&report, path)?;
        print_success(&format!("Results exported to {}", path.display()));
        summary.export_path = Some(path.display().to_string());
    }

    summary.display();
    print_completion();

    Ok(())
}

fn fit_model(
    df: &DataFrame,
    step: &str,
    response: &str,
    predictors: &[&str],
) -> Result<FittedModel> {
    regress(df, response, predictors).with_context(|| {
        format!("{}: regression of {} on {}", step, response, predictors.join(", "))
    })
}

fn emit_summary(title: &str, table: &SummaryTable, format: OutputFormat) {
    if format.tables() {
        print_table_title(title);
        display_summary(table);
    }
    if format.latex() {
        println!("{}", summary_to_latex(table));
    }
}

fn emit_model(
    label: &str,
    sample: &str,
    model: FittedModel,
    format: OutputFormat,
    report: &mut AnalysisReport,
    summary: &mut RunSummary,
) {
    let title = format!(
        "{}: {} ~ {} ({} rows, sample: {})",
        label,
        model.response,
        model.terms[1..].join(" + "),
        model.n_obs,
        sample
    );
    if format.tables() {
        print_table_title(&title);
        display_model(&model);
    } else {
        println!("{}", style(&title).bold());
    }
    if format.latex() {
        println!("{}", model_to_latex(&model));
    }

    summary.models_fitted += 1;
    report.add_model(label, sample, model);
}

fn finish_step(summary: &mut RunSummary, name: &str, started: Instant) {
    let elapsed = started.elapsed();
    summary.record_step(name, elapsed);
    print_step_time(elapsed);
}
