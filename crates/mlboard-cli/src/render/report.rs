//! Model report rendering: overview, best model, comparison table, and
//! the markdown body.

use std::fmt::Write;

use colored::Colorize;
use serde_json::{Map, Value};

use mlboard_core::json;
use mlboard_core::report::{ModelReport, format_metric};

use super::section;

/// Renders the full evaluation report.
pub fn render_report(report: &ModelReport) -> String {
    let mut out = String::new();

    out.push_str(&section("Report overview"));
    for (label, value) in [
        ("Task", report.task.clone().map(Value::String)),
        ("Target column", report.target_column.clone().map(Value::String)),
        ("Version", report.version.clone()),
        ("User ID", report.user_id.clone()),
    ] {
        if let Some(value) = value {
            let display = json::display_string(&value);
            if !display.is_empty() {
                let _ = writeln!(out, "  {:<16} {}", label, display.cyan());
            }
        }
    }

    if let Some(best) = &report.best_model {
        out.push_str(&section("Best model"));
        let _ = writeln!(out, "  {}", best.name.bold());
        if let Some(gap) = best.generalization_gap {
            let _ = writeln!(out, "  Generalization gap: {}", format_metric(&gap.into()));
        }
        out.push_str(&metric_grid("Train metrics", &best.train_metrics));
        out.push_str(&metric_grid("Test metrics", &best.test_metrics));
    }

    if !report.all_models.is_empty() {
        out.push_str(&section("All evaluated models"));
        out.push_str(&comparison_table(report));
    }

    if let Some(markdown) = report
        .report_markdown
        .as_deref()
        .filter(|m| !m.trim().is_empty())
    {
        out.push_str(&section("Detailed report"));
        for line in markdown.lines() {
            let _ = writeln!(out, "  {line}");
        }
    }

    out
}

fn metric_grid(title: &str, metrics: &Map<String, Value>) -> String {
    if metrics.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    let _ = writeln!(out, "  {}", title.bright_black());
    for (key, value) in metrics {
        let _ = writeln!(
            out,
            "    {:<16} {}",
            key.to_uppercase(),
            format_metric(value)
        );
    }
    out
}

fn comparison_table(report: &ModelReport) -> String {
    let order = report.metric_order();
    let mut out = String::new();

    let mut header = format!("  {:<20}", "Model".bold());
    for key in &order {
        let _ = write!(header, " {:>12}", format!("Test {}", key.to_uppercase()).bold());
    }
    let _ = write!(header, " {:>10}", "Gap".bold());
    out.push_str(&header);
    out.push('\n');

    for model in &report.all_models {
        let _ = write!(out, "  {:<20}", model.name);
        for key in &order {
            let display = model
                .test_metrics
                .get(key)
                .map(format_metric)
                .unwrap_or_else(|| "-".to_string());
            let _ = write!(out, " {display:>12}");
        }
        let gap = model
            .generalization_gap
            .map(|g| format_metric(&g.into()))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(out, " {gap:>10}");
    }
    out
}
