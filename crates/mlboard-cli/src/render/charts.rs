//! Terminal renderers for the five chart kinds.
//!
//! Each renderer guards against missing or empty data arrays and emits an
//! inline advisory instead of failing the page. Unknown chart types get a
//! visible notice.

use std::fmt::Write;

use colored::Colorize;

use mlboard_core::chart::{
    BoxSummary, Chart, ChartData, SummaryStats, diverging_color, needs_light_text,
};

use super::{advisory, bar, format_number, hex_to_rgb};

const BAR_WIDTH: usize = 40;
const HEATMAP_CELL: usize = 8;
const SCATTER_COLS: usize = 60;
const SCATTER_ROWS: usize = 16;

/// Renders one chart card: bold title, then the type-dispatched body.
pub fn render_chart(chart: &Chart) -> String {
    let body = match &chart.data {
        ChartData::Heatmap { x, y, z } => heatmap(x, y, z),
        ChartData::Histogram {
            bins,
            counts,
            stats,
        } => histogram(bins, counts, stats.as_ref()),
        ChartData::Scatter {
            points,
            x_label,
            y_label,
            correlation,
        } => scatter(points, x_label.as_deref(), y_label.as_deref(), *correlation),
        ChartData::Bar {
            labels,
            values,
            counts,
            y_label,
        } => bar_chart(labels, values, counts, y_label.as_deref()),
        ChartData::BoxPlot { categories } => box_plot(categories),
        ChartData::Unsupported { kind } => advisory(&format!("Unsupported chart type: {kind}")),
    };
    format!("{}\n{}\n", chart.title.bold(), body)
}

fn heatmap(x: &[String], y: &[String], z: &[Vec<f64>]) -> String {
    if x.is_empty() || y.is_empty() || z.is_empty() {
        return advisory("Heatmap data incomplete.");
    }
    let label_width = y.iter().map(String::len).max().unwrap_or(0).clamp(4, 16);

    let mut out = String::new();
    // Column header
    let _ = write!(out, "  {:label_width$}", "");
    for label in x {
        let _ = write!(out, " {:>width$}", clip(label, HEATMAP_CELL), width = HEATMAP_CELL);
    }
    out.push('\n');

    for (row_idx, row_label) in y.iter().enumerate() {
        let _ = write!(out, "  {:label_width$}", clip(row_label, label_width));
        let row = z.get(row_idx).map(Vec::as_slice).unwrap_or_default();
        for col_idx in 0..x.len() {
            let value = row.get(col_idx).copied().unwrap_or(f64::NAN);
            let cell = format!(" {:>width$.2}", value, width = HEATMAP_CELL - 1);
            let (r, g, b) = hex_to_rgb(diverging_color(value));
            let colored_cell = if needs_light_text(value) {
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

fn histogram(bins: &[String], counts: &[f64], stats: Option<&SummaryStats>) -> String {
    if bins.is_empty() || counts.is_empty() {
        return advisory("Histogram data unavailable.");
    }
    let max = counts.iter().copied().filter(|c| c.is_finite()).fold(0.0, f64::max);

    let mut out = String::new();
    for (bin, count) in bins.iter().zip(counts) {
        let _ = writeln!(
            out,
            "  {:>12} {} {}",
            clip(bin, 12),
            bar(*count, max, BAR_WIDTH).cyan(),
            format_number(*count).bright_black()
        );
    }
    if let Some(stats) = stats {
        let strip = [
            ("mean", stats.mean),
            ("median", stats.median),
            ("std", stats.std),
            ("min", stats.min),
            ("max", stats.max),
        ]
        .iter()
        .map(|(label, value)| {
            format!(
                "{label}={}",
                value.map(format_number).unwrap_or_else(|| "-".to_string())
            )
        })
        .collect::<Vec<_>>()
        .join("  ");
        let _ = writeln!(out, "  {}", strip.bright_black());
    }
    out
}

fn scatter(
    points: &[(f64, f64)],
    x_label: Option<&str>,
    y_label: Option<&str>,
    correlation: Option<f64>,
) -> String {
    let finite: Vec<(f64, f64)> = points
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    if finite.is_empty() {
        return advisory("Scatter data unavailable.");
    }

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for (x, y) in &finite {
        x_min = x_min.min(*x);
        x_max = x_max.max(*x);
        y_min = y_min.min(*y);
        y_max = y_max.max(*y);
    }
    let x_span = (x_max - x_min).max(f64::EPSILON);
    let y_span = (y_max - y_min).max(f64::EPSILON);

    let mut grid = vec![vec![false; SCATTER_COLS]; SCATTER_ROWS];
    for (x, y) in &finite {
        let col = (((x - x_min) / x_span) * (SCATTER_COLS - 1) as f64).round() as usize;
        let row = (((y - y_min) / y_span) * (SCATTER_ROWS - 1) as f64).round() as usize;
        grid[SCATTER_ROWS - 1 - row][col] = true;
    }

    let mut out = String::new();
    if let Some(corr) = correlation {
        let _ = writeln!(out, "  {}", format!("Corr: {corr:.4}").bright_black());
    }
    for row in &grid {
        out.push_str("  ");
        for cell in row {
            out.push(if *cell { '•' } else { ' ' });
        }
        out.push('\n');
    }
    let _ = writeln!(
        out,
        "  x: {} [{} .. {}]   y: {} [{} .. {}]",
        x_label.unwrap_or("x"),
        format_number(x_min),
        format_number(x_max),
        y_label.unwrap_or("y"),
        format_number(y_min),
        format_number(y_max)
    );
    out
}

fn bar_chart(
    labels: &[String],
    values: &[f64],
    counts: &[Option<f64>],
    y_label: Option<&str>,
) -> String {
    if labels.is_empty() || values.is_empty() {
        return advisory("Bar data unavailable.");
    }
    let value_label = y_label.unwrap_or("Value");
    let max = values.iter().copied().filter(|v| v.is_finite()).fold(0.0, f64::max);
    let label_width = labels.iter().map(String::len).max().unwrap_or(0).clamp(4, 20);

    let mut out = String::new();
    for (idx, (label, value)) in labels.iter().zip(values).enumerate() {
        let sample = counts
            .get(idx)
            .copied()
            .flatten()
            .map(|n| format!("  n={}", format_number(n)))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {:>label_width$} {} {}{}",
            clip(label, label_width),
            bar(*value, max, BAR_WIDTH).magenta(),
            format_number(*value),
            sample.bright_black()
        );
    }
    let _ = writeln!(out, "  {}", value_label.bright_black());
    out
}

fn box_plot(categories: &[BoxSummary]) -> String {
    if categories.is_empty() {
        return advisory("Box plot: No data available.");
    }
    // Median-only bars, a deliberate simplification of the full glyph.
    let max = categories
        .iter()
        .filter_map(|c| c.median)
        .filter(|m| m.is_finite())
        .fold(0.0, f64::max);
    let label_width = categories
        .iter()
        .map(|c| c.label.len())
        .max()
        .unwrap_or(0)
        .clamp(4, 20);

    let mut out = String::new();
    for category in categories {
        let median = category.median.unwrap_or(f64::NAN);
        let _ = writeln!(
            out,
            "  {:>label_width$} {} {}",
            clip(&category.label, label_width),
            bar(median, max, BAR_WIDTH).magenta(),
            format_number(median)
        );
    }
    for category in categories {
        let mut parts = Vec::new();
        for (name, value) in [
            ("min", category.min),
            ("q1", category.q1),
            ("median", category.median),
            ("q3", category.q3),
            ("max", category.max),
            ("n", category.count),
        ] {
            if let Some(value) = value {
                parts.push(format!("{name}={}", format_number(value)));
            }
        }
        if !category.outliers.is_empty() {
            parts.push(format!("outliers={}", category.outliers.len()));
        }
        let _ = writeln!(
            out,
            "  {} {}",
            format!("{}:", category.label).bold(),
            parts.join("  ").bright_black()
        );
    }
    out
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let clipped: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{clipped}…")
    }
}
