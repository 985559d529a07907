//! ANSI rendering for dashboard sections, charts, and reports.

pub mod charts;
pub mod dashboard;
pub mod predict;
pub mod report;

use colored::Colorize;

/// Inline advisory shown in place of a chart body when data is missing.
pub(crate) fn advisory(text: &str) -> String {
    format!("  {}", text.yellow())
}

/// Section heading.
pub(crate) fn section(title: &str) -> String {
    format!("\n{}\n", title.bold())
}

/// A horizontal bar scaled against `max`, at most `width` cells. Positive
/// values always get at least one cell so small counts stay visible.
pub(crate) fn bar(value: f64, max: f64, width: usize) -> String {
    if !value.is_finite() || !max.is_finite() || max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let cells = ((value / max) * width as f64).round() as usize;
    "█".repeat(cells.clamp(1, width))
}

/// Trims trailing zeros from a float for display.
pub(crate) fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let rounded = (value * 10_000.0).round() / 10_000.0;
        format!("{rounded}")
    }
}

/// Parses a `#rrggbb` color into its channels.
pub(crate) fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return (0, 0, 0);
    }
    let channel = |range| u8::from_str_radix(&hex[range], 16).unwrap_or(0);
    (channel(0..2), channel(2..4), channel(4..6))
}
