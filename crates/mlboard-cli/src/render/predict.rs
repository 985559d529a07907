//! Prediction form hints and result rendering.

use std::fmt::Write;

use colored::Colorize;

use mlboard_app::predict::{PredictMeta, PredictPage};
use mlboard_core::predict::PredictionOutcome;
use mlboard_core::schema::{FeatureDescriptor, Widget};

use super::{format_number, section};

/// Summary line shown after metadata loads.
pub fn render_meta(page: &PredictPage, meta: &PredictMeta) -> String {
    let mut out = String::new();
    let version = meta
        .version
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string());
    let _ = writeln!(
        out,
        "  Dataset {}  schema version {}  {} feature(s), {} model(s)",
        page.active_id.bold(),
        version,
        meta.features.len(),
        meta.model_options.len()
    );
    if meta.features.is_empty() {
        let _ = writeln!(
            out,
            "  {}",
            "No feature definitions were returned from the schema endpoint.".yellow()
        );
    }
    out
}

/// Prompt line for one feature, with a hint matching its widget.
pub fn feature_prompt(feature: &FeatureDescriptor, current: &str) -> String {
    let hint = match feature.widget() {
        Widget::Slider { min, max, step } => format!(
            "range {} to {} step {}",
            format_number(min),
            format_number(max),
            format_number(step)
        ),
        Widget::Dropdown => {
            if feature.categories.is_empty() {
                "enter a value".to_string()
            } else {
                format!("one of: {}", feature.categories.join(", "))
            }
        }
        Widget::DateInput => "date, e.g. 2024-01-31".to_string(),
        Widget::NumberInput => "number".to_string(),
    };
    let current_display = if current.is_empty() {
        "empty".to_string()
    } else {
        current.to_string()
    };
    format!(
        "{} ({hint}) [{}]: ",
        feature.label.bold(),
        current_display.bright_black()
    )
}

/// Result cards for a completed prediction.
pub fn render_outcome(outcome: &PredictionOutcome) -> String {
    let mut out = String::new();
    out.push_str(&section("Prediction"));
    let _ = writeln!(out, "  {}", outcome.prediction_display().green().bold());
    if let Some(model) = &outcome.model_used {
        let _ = writeln!(out, "  Model used: {model}");
    }
    if let Some(ms) = outcome.processing_time_ms {
        let _ = writeln!(out, "  Processing time: {ms:.2} ms");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlboard_core::schema::normalize_feature;
    use serde_json::json;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn slider_prompt_names_range_and_step() {
        plain();
        let feature = normalize_feature(
            &json!({"name": "area", "dataType": "float", "input_type": "numeric_continuous",
                    "min_allowed": 20, "max_allowed": 400}),
            None,
        )
        .unwrap();
        let prompt = feature_prompt(&feature, "20");
        assert!(prompt.contains("range 20 to 400 step 0.1"));
    }

    #[test]
    fn dropdown_prompt_lists_categories() {
        plain();
        let feature = normalize_feature(
            &json!({"name": "city", "categories": ["north", "south"]}),
            None,
        )
        .unwrap();
        let prompt = feature_prompt(&feature, "");
        assert!(prompt.contains("one of: north, south"));
        assert!(prompt.contains("[empty]"));
    }

    #[test]
    fn outcome_shows_model_and_latency() {
        plain();
        let outcome = PredictionOutcome {
            prediction: json!(231000.5),
            model_used: Some("xgboost".to_string()),
            processing_time_ms: Some(12.5),
        };
        let out = render_outcome(&outcome);
        assert!(out.contains("231000.5"));
        assert!(out.contains("Model used: xgboost"));
        assert!(out.contains("12.50 ms"));
    }
}
