//! Dashboard sections: charts, metrics, class distribution, correlations,
//! and the columns summary table.

use std::fmt::Write;

use colored::Colorize;

use mlboard_core::chart::{diverging_color, needs_light_text};
use mlboard_core::dashboard::{ClassCount, ColumnSummary, Correlations, DashboardData};

use super::charts::render_chart;
use super::{bar, format_number, hex_to_rgb, section};

const BAR_WIDTH: usize = 30;

/// Renders the full dashboard for one dataset.
pub fn render_dashboard(data: &DashboardData) -> String {
    let mut out = String::new();

    if !data.charts.is_empty() {
        out.push_str(&section("Charts"));
        for chart in &data.charts {
            out.push_str(&render_chart(chart));
            out.push('\n');
        }
    }

    if !data.metrics.is_empty() {
        out.push_str(&section("Metrics"));
        for (key, value) in &data.metrics {
            let display = match value.as_f64() {
                Some(number) => format!("{number:.4}"),
                None => mlboard_core::json::display_string(value),
            };
            let _ = writeln!(out, "  {:<24} {}", key, display.cyan());
        }
    }

    if !data.class_distribution.is_empty() {
        out.push_str(&section("Class Distribution"));
        out.push_str(&class_distribution(&data.class_distribution));
    }

    match &data.correlations {
        Correlations::Matrix(matrix) => {
            out.push_str(&section("Feature Correlations"));
            out.push_str(&correlation_matrix(matrix));
        }
        Correlations::PerFeature(flat) => {
            out.push_str(&section("Feature Correlations"));
            for (feature, value) in flat {
                let _ = writeln!(out, "  {:<24} {:+.4}", feature, value);
            }
        }
        Correlations::Absent => {}
    }

    if !data.columns_summary.is_empty() {
        out.push_str(&section("Columns Summary"));
        out.push_str(&columns_table(&data.columns_summary));
    }

    if out.is_empty() {
        out.push_str(&super::advisory("Dashboard is empty for this dataset."));
        out.push('\n');
    }
    out
}

fn class_distribution(classes: &[ClassCount]) -> String {
    let total: f64 = classes.iter().map(|c| c.count).sum();
    let max = classes.iter().map(|c| c.count).fold(0.0, f64::max);

    let mut out = String::new();
    for class in classes {
        let proportion = if total > 0.0 {
            format!("{:.1}%", class.count / total * 100.0)
        } else {
            "-".to_string()
        };
        let _ = writeln!(
            out,
            "  {:>12} {} {} ({})",
            class.label,
            bar(class.count, max, BAR_WIDTH).blue(),
            format_number(class.count),
            proportion.bright_black()
        );
    }
    out
}

// Correlation cells reuse the diverging heatmap ramp.
fn correlation_matrix(matrix: &[Vec<f64>]) -> String {
    let mut out = String::new();
    for row in matrix {
        out.push_str("  ");
        for value in row {
            let clamped = value.clamp(-1.0, 1.0);
            let cell = format!(" {clamped:>5.2} ");
            let (r, g, b) = hex_to_rgb(diverging_color(clamped));
            let colored_cell = if needs_light_text(clamped) {
                cell.white().on_truecolor(r, g, b)
            } else {
                cell.truecolor(17, 17, 17).on_truecolor(r, g, b)
            };
            let _ = write!(out, "{colored_cell}");
        }
        out.push('\n');
    }
    out
}

fn columns_table(columns: &[ColumnSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<24} {:<16} {}",
        "Column".bold(),
        "Type".bold(),
        "Missing".bold()
    );
    for column in columns {
        let _ = writeln!(
            out,
            "  {:<24} {:<16} {}",
            column.name, column.dtype, column.missing
        );
    }
    out
}
