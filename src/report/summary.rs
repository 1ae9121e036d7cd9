//! End-of-run summary card

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

/// What the run produced and how long each step took
#[derive(Debug, Default)]
pub struct RunSummary {
    pub rows: usize,
    pub columns: usize,
    pub models_fitted: usize,
    pub histogram_path: Option<String>,
    pub export_path: Option<String>,
    pub step_times: Vec<(String, Duration)>,
}

impl RunSummary {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            ..Default::default()
        }
    }

    pub fn record_step(&mut self, name: &str, elapsed: Duration) {
        self.step_times.push((name.to_string(), elapsed));
    }

    pub fn total_time(&self) -> Duration {
        self.step_times.iter().map(|(_, d)| *d).sum()
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("RUN SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Rows"), Cell::new(self.rows)]);
        table.add_row(vec![Cell::new("📐 Columns"), Cell::new(self.columns)]);
        table.add_row(vec![
            Cell::new("📈 Models fitted"),
            Cell::new(self.models_fitted)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        if let Some(path) = &self.histogram_path {
            table.add_row(vec![Cell::new("🖼  Histogram"), Cell::new(path)]);
        }
        if let Some(path) = &self.export_path {
            table.add_row(vec![Cell::new("💾 JSON export"), Cell::new(path)]);
        }

        for (name, elapsed) in &self.step_times {
            table.add_row(vec![
                Cell::new(format!("⏱  {}", name)),
                Cell::new(format_duration(*elapsed)).fg(Color::Cyan),
            ]);
        }
        table.add_row(vec![
            Cell::new("⏱  Total").add_attribute(Attribute::Bold),
            Cell::new(format_duration(self.total_time())).add_attribute(Attribute::Bold),
        ]);

        for line in table.to_string().lines() {
            println!("    {}", line);
        }
    }
}

/// Human-readable duration: milliseconds below a second, seconds above
pub fn format_duration(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else {
        format!("{:.2}s", secs)
    }
}
