//! Terminal tables for the analysis results

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{
    CorrelationMatrix, FittedModel, GroupComparison, Histogram, SummaryTable, STATISTIC_LABELS,
};

fn format_value(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.*}", decimals, value)
    }
}

fn numeric_cell(value: f64, decimals: usize) -> Cell {
    Cell::new(format_value(value, decimals)).set_alignment(CellAlignment::Right)
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

/// Print a heading line above a table
pub fn print_table_title(title: &str) {
    println!();
    println!("    {}", style(title).white().bold());
}

pub fn summary_table(table: &SummaryTable) -> Table {
    let mut out = new_table();
    let mut header = vec![header_cell("")];
    header.extend(table.columns.iter().map(|c| header_cell(&c.name)));
    out.set_header(header);

    for (row, label) in STATISTIC_LABELS.iter().enumerate() {
        let mut cells = vec![Cell::new(label).add_attribute(Attribute::Bold)];
        cells.extend(table.columns.iter().map(|c| numeric_cell(c.values()[row], 2)));
        out.add_row(cells);
    }
    out
}

pub fn display_summary(table: &SummaryTable) {
    print_indented(&summary_table(table));
}

pub fn correlation_table(matrix: &CorrelationMatrix) -> Table {
    let mut out = new_table();
    let mut header = vec![header_cell("")];
    header.extend(matrix.columns.iter().map(|c| header_cell(c)));
    out.set_header(header);

    for (name, row) in matrix.columns.iter().zip(&matrix.values) {
        let mut cells = vec![Cell::new(name).add_attribute(Attribute::Bold)];
        cells.extend(row.iter().map(|&v| {
            let cell = numeric_cell(v, 2);
            if v.abs() >= 0.5 && v.abs() < 1.0 {
                cell.fg(Color::Yellow)
            } else {
                cell
            }
        }));
        out.add_row(cells);
    }
    out
}

pub fn display_correlation(matrix: &CorrelationMatrix) {
    print_indented(&correlation_table(matrix));
}

pub fn display_group_comparison(comparison: &GroupComparison) {
    let mut table = new_table();
    table.set_header(vec![
        header_cell("Column"),
        header_cell(&format!("{} = 1 (n={})", comparison.indicator, comparison.rows_one)),
        header_cell(&format!("{} = 0 (n={})", comparison.indicator, comparison.rows_zero)),
        header_cell("Difference"),
    ]);

    for mean in &comparison.means {
        table.add_row(vec![
            Cell::new(&mean.column),
            numeric_cell(mean.mean_one, 2),
            numeric_cell(mean.mean_zero, 2),
            numeric_cell(mean.difference(), 2),
        ]);
    }
    print_indented(&table);
}

pub fn display_histogram(histogram: &Histogram) {
    let mut table = new_table();
    table.set_header(vec![header_cell("Bin"), header_cell("Count")]);

    let last = histogram.bin_count().saturating_sub(1);
    for (i, (edge, count)) in histogram
        .edges
        .windows(2)
        .zip(&histogram.counts)
        .enumerate()
    {
        let close = if i == last { "]" } else { ")" };
        table.add_row(vec![
            Cell::new(format!("[{:.0}, {:.0}{}", edge[0], edge[1], close)),
            Cell::new(count).set_alignment(CellAlignment::Right),
        ]);
    }
    print_indented(&table);
}

/// Fit statistics block of a regression report
pub fn model_header_table(model: &FittedModel) -> Table {
    let mut table = new_table();
    let f3 = |v: f64| format_value(v, 3);
    let log_likelihood = format_value(model.log_likelihood, 2);
    let rows = [
        ("Dep. Variable", model.response.clone(), "R-squared", f3(model.r_squared)),
        ("Model", "OLS".to_string(), "Adj. R-squared", f3(model.adj_r_squared)),
        ("No. Observations", model.n_obs.to_string(), "F-statistic", f3(model.f_statistic)),
        ("Df Residuals", model.df_resid.to_string(), "Prob (F-statistic)", f3(model.f_pvalue)),
        ("Df Model", model.df_model.to_string(), "Log-Likelihood", log_likelihood),
        ("AIC", format_value(model.aic, 1), "BIC", format_value(model.bic, 1)),
    ];
    for (left_label, left_value, right_label, right_value) in rows {
        table.add_row(vec![
            Cell::new(format!("{}:", left_label)).add_attribute(Attribute::Bold),
            Cell::new(left_value),
            Cell::new(format!("{}:", right_label)).add_attribute(Attribute::Bold),
            Cell::new(right_value).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Coefficient table of a regression report; significant terms in green
pub fn coefficient_table(model: &FittedModel) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        header_cell(""),
        header_cell("coef"),
        header_cell("std err"),
        header_cell("t"),
        header_cell("P>|t|"),
        header_cell("[0.025"),
        header_cell("0.975]"),
    ]);

    for (i, term) in model.terms.iter().enumerate() {
        let p = model.p_values[i];
        let p_cell = numeric_cell(p, 3);
        table.add_row(vec![
            Cell::new(term).add_attribute(Attribute::Bold),
            numeric_cell(model.coefficients[i], 4),
            numeric_cell(model.std_errors[i], 3),
            numeric_cell(model.t_values[i], 3),
            if p < 0.05 { p_cell.fg(Color::Green) } else { p_cell },
            numeric_cell(model.conf_int[i][0], 3),
            numeric_cell(model.conf_int[i][1], 3),
        ]);
    }
    table
}

/// Residual diagnostics block printed under the coefficients
pub fn diagnostics_table(model: &FittedModel) -> Table {
    let diag = &model.diagnostics;
    let mut table = new_table();
    let f3 = |v: f64| format_value(v, 3);
    let rows = [
        ("Omnibus", f3(diag.omnibus), "Durbin-Watson", f3(diag.durbin_watson)),
        ("Prob(Omnibus)", f3(diag.omnibus_pvalue), "Jarque-Bera (JB)", f3(diag.jarque_bera)),
        ("Skew", f3(diag.skew), "Prob(JB)", f3(diag.jarque_bera_pvalue)),
        ("Kurtosis", f3(diag.kurtosis), "Cond. No.", format!("{:.3e}", diag.condition_number)),
    ];
    for (left_label, left_value, right_label, right_value) in rows {
        table.add_row(vec![
            Cell::new(format!("{}:", left_label)).add_attribute(Attribute::Bold),
            Cell::new(left_value).set_alignment(CellAlignment::Right),
            Cell::new(format!("{}:", right_label)).add_attribute(Attribute::Bold),
            Cell::new(right_value).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn display_model(model: &FittedModel) {
    print_indented(&model_header_table(model));
    print_indented(&coefficient_table(model));
    print_indented(&diagnostics_table(model));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::summarize;

    #[test]
    fn test_summary_table_layout() {
        let summary = SummaryTable {
            columns: vec![summarize("x", &[1.0, 2.0, 3.0, 4.0]).unwrap()],
        };
        let rendered = summary_table(&summary).to_string();

        for label in STATISTIC_LABELS {
            assert!(rendered.contains(label), "missing row {label}");
        }
        assert!(rendered.contains("2.50"));
        assert!(rendered.contains("1.29"));
    }

    #[test]
    fn test_diagnostics_table_rows() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let design = crate::pipeline::DesignMatrix::with_intercept(&[("x", &x)]).unwrap();
        let model = crate::pipeline::fit_ols("y", &y, &design).unwrap();
        let rendered = diagnostics_table(&model).to_string();

        let labels = ["Omnibus:", "Durbin-Watson:", "Jarque-Bera (JB):", "Prob(JB):", "Cond. No.:"];
        for label in labels {
            assert!(rendered.contains(label), "missing row {label}");
        }
        assert!(rendered.contains("2.017"));
        assert!(rendered.contains("0.570"));
        // Too few residuals for the omnibus test
        assert!(rendered.contains("NaN"));
    }
}
