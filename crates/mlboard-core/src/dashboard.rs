//! Dashboard payload normalization: charts plus the auxiliary sections.

use serde_json::{Map, Value};

use crate::chart::{self, Chart};
use crate::json;

/// One class of the target column with its sample count.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassCount {
    pub label: String,
    pub count: f64,
}

/// Feature correlations arrive either as a full matrix or as a flat
/// per-feature list, depending on the task.
#[derive(Debug, Clone, PartialEq)]
pub enum Correlations {
    Matrix(Vec<Vec<f64>>),
    PerFeature(Vec<(String, f64)>),
    Absent,
}

impl Default for Correlations {
    fn default() -> Self {
        Correlations::Absent
    }
}

/// One row of the columns-summary table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: String,
    pub missing: String,
}

/// Everything the dashboard endpoint returns for one dataset, normalized
/// for rendering. Charts are already sorted ascending by their order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub charts: Vec<Chart>,
    pub metrics: Map<String, Value>,
    pub class_distribution: Vec<ClassCount>,
    pub correlations: Correlations,
    pub columns_summary: Vec<ColumnSummary>,
}

impl DashboardData {
    pub fn from_value(raw: &Value) -> Self {
        let mut charts: Vec<Chart> = raw
            .get("charts")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Chart::from_value).collect())
            .unwrap_or_default();
        chart::sort_charts(&mut charts);

        let metrics = json::first_field(raw, &["metrics", "modelMetrics"])
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let class_distribution = json::first_field(raw, &["classDistribution", "classes"])
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|entry| {
                        let label = json::string_field(entry, &["label"])?;
                        Some(ClassCount {
                            label,
                            count: json::number_field(entry, &["count"]).unwrap_or(0.0),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let correlations = correlations_from(
            json::first_field(raw, &["correlations", "featureCorrelations"]),
        );

        let columns_summary = json::first_field(raw, &["columnsSummary", "schema"])
            .and_then(Value::as_array)
            .map(|items| items.iter().map(column_summary).collect())
            .unwrap_or_default();

        DashboardData {
            charts,
            metrics,
            class_distribution,
            correlations,
            columns_summary,
        }
    }
}

fn correlations_from(raw: Option<&Value>) -> Correlations {
    let Some(items) = raw.and_then(Value::as_array).filter(|a| !a.is_empty()) else {
        return Correlations::Absent;
    };
    if items[0].is_array() {
        // Non-numeric matrix cells read as zero.
        let matrix = items
            .iter()
            .map(|row| {
                row.as_array()
                    .map(|cells| {
                        cells
                            .iter()
                            .map(|v| json::as_number(v).unwrap_or(0.0))
                            .collect()
                    })
                    .unwrap_or_default()
            })
            .collect();
        Correlations::Matrix(matrix)
    } else {
        let flat = items
            .iter()
            .filter_map(|entry| {
                let feature = json::string_field(entry, &["feature"])?;
                Some((feature, json::number_field(entry, &["value"]).unwrap_or(0.0)))
            })
            .collect();
        Correlations::PerFeature(flat)
    }
}

fn column_summary(entry: &Value) -> ColumnSummary {
    let name = json::string_field(entry, &["name", "columnName", "ColumnName"])
        .unwrap_or_else(|| "?".to_string());
    let dtype = json::string_field(entry, &["type", "dataType", "Type", "DataType"])
        .unwrap_or_else(|| "?".to_string());
    let missing = match json::first_field(entry, &["missing"]) {
        Some(v) => json::display_string(v),
        None => match json::first_field(entry, &["missingPercent"]) {
            Some(v) => format!("{}%", json::display_string(v)),
            None => "-".to_string(),
        },
    };
    ColumnSummary {
        name,
        dtype,
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartData;
    use serde_json::json;

    #[test]
    fn charts_are_sorted_on_construction() {
        let data = DashboardData::from_value(&json!({
            "charts": [
                {"type": "histogram", "order": 2, "data": {"x": [1], "y": [1]}},
                {"type": "bar", "order": 1, "data": {"labels": ["a"], "values": [1]}},
            ],
        }));
        assert!(matches!(data.charts[0].data, ChartData::Bar { .. }));
        assert!(matches!(data.charts[1].data, ChartData::Histogram { .. }));
    }

    #[test]
    fn sections_fall_back_to_alias_names() {
        let data = DashboardData::from_value(&json!({
            "modelMetrics": {"accuracy": 0.93},
            "classes": [{"label": "yes", "count": 120}],
            "featureCorrelations": [{"feature": "age", "value": 0.4}],
            "schema": [{"columnName": "age", "dataType": "int", "missingPercent": 2}],
        }));
        assert_eq!(data.metrics.get("accuracy"), Some(&json!(0.93)));
        assert_eq!(data.class_distribution[0].label, "yes");
        assert_eq!(
            data.correlations,
            Correlations::PerFeature(vec![("age".to_string(), 0.4)])
        );
        assert_eq!(data.columns_summary[0].missing, "2%");
    }

    #[test]
    fn matrix_correlations_zero_non_numeric_cells() {
        let data = DashboardData::from_value(&json!({
            "correlations": [[1.0, "x"], [0.5, 1.0]],
        }));
        assert_eq!(
            data.correlations,
            Correlations::Matrix(vec![vec![1.0, 0.0], vec![0.5, 1.0]])
        );
    }

    #[test]
    fn missing_sections_read_as_empty() {
        let data = DashboardData::from_value(&json!({}));
        assert!(data.charts.is_empty());
        assert!(data.metrics.is_empty());
        assert_eq!(data.correlations, Correlations::Absent);
        assert!(data.columns_summary.is_empty());
    }

    #[test]
    fn column_summary_uses_missing_before_percent() {
        let data = DashboardData::from_value(&json!({
            "columnsSummary": [{"name": "a", "type": "int", "missing": 5, "missingPercent": 1}],
        }));
        assert_eq!(data.columns_summary[0].missing, "5");
    }
}
