//! LaTeX (booktabs) rendering of summary tables, correlations and models

use std::fmt::Write;

use crate::pipeline::{CorrelationMatrix, FittedModel, SummaryTable, STATISTIC_LABELS};

/// Escape characters that are special in LaTeX text
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '_' | '%' | '&' | '#' | '$' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            '\\' => out.push_str("\\textbackslash{}"),
            '^' => out.push_str("\\^{}"),
            '~' => out.push_str("\\~{}"),
            _ => out.push(ch),
        }
    }
    out
}

fn number(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        format!("{:.*}", decimals, value)
    }
}

/// Statistics as rows, columns as columns, two decimals
pub fn summary_to_latex(table: &SummaryTable) -> String {
    let mut out = String::new();
    let align: String = "r".repeat(table.columns.len());

    let _ = writeln!(out, "\\begin{{tabular}}{{l{}}}", align);
    out.push_str("\\toprule\n");
    let header: Vec<String> = table.columns.iter().map(|c| escape_latex(&c.name)).collect();
    let _ = writeln!(out, " & {} \\\\", header.join(" & "));
    out.push_str("\\midrule\n");

    for (row, label) in STATISTIC_LABELS.iter().enumerate() {
        let cells: Vec<String> = table
            .columns
            .iter()
            .map(|c| number(c.values()[row], 2))
            .collect();
        let _ = writeln!(out, "{} & {} \\\\", escape_latex(label), cells.join(" & "));
    }

    out.push_str("\\bottomrule\n");
    out.push_str("\\end{tabular}\n");
    out
}

pub fn correlation_to_latex(matrix: &CorrelationMatrix) -> String {
    let mut out = String::new();
    let align: String = "r".repeat(matrix.columns.len());

    let _ = writeln!(out, "\\begin{{tabular}}{{l{}}}", align);
    out.push_str("\\toprule\n");
    let header: Vec<String> = matrix.columns.iter().map(|c| escape_latex(c)).collect();
    let _ = writeln!(out, " & {} \\\\", header.join(" & "));
    out.push_str("\\midrule\n");

    for (name, row) in matrix.columns.iter().zip(&matrix.values) {
        let cells: Vec<String> = row.iter().map(|&v| number(v, 2)).collect();
        let _ = writeln!(out, "{} & {} \\\\", escape_latex(name), cells.join(" & "));
    }

    out.push_str("\\bottomrule\n");
    out.push_str("\\end{tabular}\n");
    out
}

/// Regression report: fit statistics block followed by the coefficient table
pub fn model_to_latex(model: &FittedModel) -> String {
    let mut out = String::new();

    out.push_str("\\begin{center}\n");
    out.push_str("\\begin{tabular}{lclc}\n");
    out.push_str("\\toprule\n");

    let n3 = |v: f64| number(v, 3);
    let log_likelihood = number(model.log_likelihood, 2);
    let header_rows = [
        ("Dep. Variable:", escape_latex(&model.response), "R-squared:", n3(model.r_squared)),
        ("Model:", "OLS".to_string(), "Adj. R-squared:", n3(model.adj_r_squared)),
        ("Method:", "Least Squares".to_string(), "F-statistic:", n3(model.f_statistic)),
        ("No. Observations:", model.n_obs.to_string(), "Prob (F-statistic):", n3(model.f_pvalue)),
        ("Df Residuals:", model.df_resid.to_string(), "Log-Likelihood:", log_likelihood),
        ("Df Model:", model.df_model.to_string(), "AIC:", number(model.aic, 1)),
        ("Covariance Type:", "nonrobust".to_string(), "BIC:", number(model.bic, 1)),
    ];
    for (left_label, left_value, right_label, right_value) in header_rows {
        let _ = writeln!(
            out,
            "\\textbf{{{}}} & {} & \\textbf{{{}}} & {} \\\\",
            left_label, left_value, right_label, right_value
        );
    }
    out.push_str("\\bottomrule\n");
    out.push_str("\\end{tabular}\n");

    out.push_str("\\begin{tabular}{lcccccc}\n");
    out.push_str(
        " & \\textbf{coef} & \\textbf{std err} & \\textbf{t} & \\textbf{P$> |$t$|$} & \\textbf{[0.025} & \\textbf{0.975]} \\\\\n",
    );
    out.push_str("\\midrule\n");
    for (i, term) in model.terms.iter().enumerate() {
        let _ = writeln!(
            out,
            "\\textbf{{{}}} & {} & {} & {} & {} & {} & {} \\\\",
            escape_latex(term),
            number(model.coefficients[i], 4),
            number(model.std_errors[i], 3),
            number(model.t_values[i], 3),
            number(model.p_values[i], 3),
            number(model.conf_int[i][0], 3),
            number(model.conf_int[i][1], 3),
        );
    }
    out.push_str("\\bottomrule\n");
    out.push_str("\\end{tabular}\n");

    let diag = &model.diagnostics;
    let diagnostic_rows = [
        ("Omnibus:", n3(diag.omnibus), "Durbin-Watson:", n3(diag.durbin_watson)),
        ("Prob(Omnibus):", n3(diag.omnibus_pvalue), "Jarque-Bera (JB):", n3(diag.jarque_bera)),
        ("Skew:", n3(diag.skew), "Prob(JB):", n3(diag.jarque_bera_pvalue)),
        ("Kurtosis:", n3(diag.kurtosis), "Cond. No.:", format!("{:.3e}", diag.condition_number)),
    ];
    out.push_str("\\begin{tabular}{lclc}\n");
    out.push_str("\\toprule\n");
    for (left_label, left_value, right_label, right_value) in diagnostic_rows {
        let _ = writeln!(
            out,
            "\\textbf{{{}}} & {} & \\textbf{{{}}} & {} \\\\",
            left_label, left_value, right_label, right_value
        );
    }
    out.push_str("\\bottomrule\n");
    out.push_str("\\end{tabular}\n");
    out.push_str("\\end{center}\n");
    out
}
