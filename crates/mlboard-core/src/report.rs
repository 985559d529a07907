//! Model evaluation report returned by the models endpoint.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Metric orderings preferred for comparison tables, by task.
const CLASSIFICATION_METRICS: [&str; 5] = ["accuracy", "precision", "recall", "f1", "auc"];
const REGRESSION_METRICS: [&str; 4] = ["rmse", "mae", "mse", "r2"];

/// One evaluated candidate model.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ModelEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub train_metrics: Map<String, Value>,
    #[serde(default)]
    pub test_metrics: Map<String, Value>,
    #[serde(default)]
    pub generalization_gap: Option<f64>,
}

/// The full evaluation report for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ModelReport {
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub target_column: Option<String>,
    #[serde(default)]
    pub version: Option<Value>,
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub best_model: Option<ModelEntry>,
    #[serde(default)]
    pub all_models: Vec<ModelEntry>,
    #[serde(default)]
    pub report_markdown: Option<String>,
}

impl ModelReport {
    /// Names of all evaluated models, in report order, empty names dropped.
    pub fn model_names(&self) -> Vec<String> {
        self.all_models
            .iter()
            .map(|m| m.name.clone())
            .filter(|n| !n.is_empty())
            .collect()
    }

    /// Column order for the comparison table, derived from the first
    /// model's test metrics: task-preferred metrics first, then whatever
    /// else the sample carries.
    pub fn metric_order(&self) -> Vec<String> {
        let sample = self
            .all_models
            .first()
            .map(|m| &m.test_metrics)
            .cloned()
            .unwrap_or_default();
        metric_order(self.task.as_deref(), &sample)
    }
}

/// Orders metric keys: preferred metrics for the task (when present in the
/// sample) first, remaining sample keys after.
pub fn metric_order(task: Option<&str>, sample: &Map<String, Value>) -> Vec<String> {
    let preferred: &[&str] = match task {
        Some("classification") => &CLASSIFICATION_METRICS,
        Some("regression") => &REGRESSION_METRICS,
        _ => &[],
    };
    let mut order: Vec<String> = preferred
        .iter()
        .filter(|k| sample.contains_key(**k))
        .map(|k| k.to_string())
        .collect();
    order.extend(
        sample
            .keys()
            .filter(|k| !preferred.contains(&k.as_str()))
            .cloned(),
    );
    order
}

/// Formats a metric value: numbers rounded to at most four decimals with
/// trailing zeros trimmed, everything else via its display string.
pub fn format_metric(value: &Value) -> String {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(v) if v.is_finite() => {
                let rounded = (v * 10_000.0).round() / 10_000.0;
                if rounded.fract() == 0.0 {
                    format!("{}", rounded as i64)
                } else {
                    format!("{rounded}")
                }
            }
            _ => n.to_string(),
        },
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
