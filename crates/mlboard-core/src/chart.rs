//! Chart descriptors and the closed tagged-variant dispatch.
//!
//! The dashboard endpoint returns an arbitrary set of charts as
//! `{type, data}` records. Each record is mapped to one of the known
//! variants; anything unrecognized becomes [`ChartData::Unsupported`],
//! which renders a visible notice instead of failing the page.

use serde_json::Value;

use crate::json;

/// Scatter charts render at most this many paired points.
pub const SCATTER_POINT_CAP: usize = 800;

/// Fixed 7-stop diverging color ramp (red to white to blue) used for
/// heatmap cells and correlation matrices.
pub const DIVERGING_RAMP: [&str; 7] = [
    "#67001f", "#b2182b", "#d6604d", "#f7f7f7", "#4393c3", "#2166ac", "#053061",
];

/// Maps a value to its ramp stop: clamp to [-1, 1], then round into the
/// seven stops. Non-finite values land on the neutral middle stop.
pub fn diverging_color(value: f64) -> &'static str {
    if !value.is_finite() {
        return DIVERGING_RAMP[DIVERGING_RAMP.len() / 2];
    }
    let clamped = value.clamp(-1.0, 1.0);
    let idx = (((clamped + 1.0) / 2.0) * (DIVERGING_RAMP.len() - 1) as f64).round() as usize;
    DIVERGING_RAMP[idx]
}

/// Cell text flips to white on saturated cells for contrast.
pub fn needs_light_text(value: f64) -> bool {
    value.abs() > 0.6
}

/// Summary strip rendered below a histogram.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryStats {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Per-category five-number summary for a box chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxSummary {
    pub label: String,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
    pub count: Option<f64>,
    pub outliers: Vec<f64>,
}

/// Validated payload of one chart, dispatched by the server's `type` tag.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Heatmap {
        x: Vec<String>,
        y: Vec<String>,
        z: Vec<Vec<f64>>,
    },
    Histogram {
        bins: Vec<String>,
        counts: Vec<f64>,
        stats: Option<SummaryStats>,
    },
    Scatter {
        points: Vec<(f64, f64)>,
        x_label: Option<String>,
        y_label: Option<String>,
        correlation: Option<f64>,
    },
    Bar {
        labels: Vec<String>,
        values: Vec<f64>,
        counts: Vec<Option<f64>>,
        y_label: Option<String>,
    },
    BoxPlot {
        categories: Vec<BoxSummary>,
    },
    Unsupported {
        kind: String,
    },
}

/// One chart card: display title, ordering hint, and validated payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub order: i64,
    pub data: ChartData,
}

impl Chart {
    /// Builds a chart from one raw descriptor. Never fails: missing or
    /// malformed sections produce empty arrays that renderers guard with
    /// an inline advisory, and unknown types become `Unsupported`.
    pub fn from_value(raw: &Value) -> Chart {
        let kind = json::string_field(raw, &["type"]).unwrap_or_default();
        let title =
            json::string_field(raw, &["title", "id"]).unwrap_or_else(|| "Chart".to_string());
        let order = json::number_field(raw, &["order"]).unwrap_or(0.0) as i64;
        let data = raw.get("data").cloned().unwrap_or(Value::Null);

        let data = match kind.as_str() {
            "heatmap" => parse_heatmap(&data),
            "histogram" => parse_histogram(&data),
            "scatter" => parse_scatter(raw, &data),
            "bar" => parse_bar(&data),
            "box" => parse_box(&data),
            _ => ChartData::Unsupported { kind },
        };

        Chart { title, order, data }
    }
}

/// Sorts charts ascending by `order` (default 0). The sort is stable, so
/// ties keep their original array position.
pub fn sort_charts(charts: &mut [Chart]) {
    charts.sort_by_key(|c| c.order);
}

fn parse_heatmap(data: &Value) -> ChartData {
    let x = data
        .get("x")
        .map(json::string_array)
        .unwrap_or_default();
    let y = data
        .get("y")
        .map(json::string_array)
        .unwrap_or_default();
    let z = data
        .get("z")
        .and_then(Value::as_array)
        .map(|rows| rows.iter().map(json::number_array).collect())
        .unwrap_or_default();
    ChartData::Heatmap { x, y, z }
}

fn parse_histogram(data: &Value) -> ChartData {
    let bins = data
        .get("x")
        .map(json::string_array)
        .unwrap_or_default();
    let counts = data
        .get("y")
        .map(json::number_array)
        .unwrap_or_default();
    let stats = data
        .get("stats")
        .filter(|s| s.is_object())
        .map(|stats| SummaryStats {
            mean: json::number_field(stats, &["mean"]),
            median: json::number_field(stats, &["median"]),
            std: json::number_field(stats, &["std"]),
            min: json::number_field(stats, &["min"]),
            max: json::number_field(stats, &["max"]),
        });
    ChartData::Histogram {
        bins,
        counts,
        stats,
    }
}

fn parse_scatter(raw: &Value, data: &Value) -> ChartData {
    let x = data.get("x").map(json::number_array).unwrap_or_default();
    let y = data.get("y").map(json::number_array).unwrap_or_default();
    // Cap the paired points for render performance.
    let points: Vec<(f64, f64)> = x
        .into_iter()
        .zip(y)
        .take(SCATTER_POINT_CAP)
        .collect();
    ChartData::Scatter {
        points,
        // Axis labels live on the chart record itself, not in `data`.
        x_label: raw.get("x").and_then(Value::as_str).map(str::to_string),
        y_label: raw.get("y").and_then(Value::as_str).map(str::to_string),
        correlation: json::number_field(data, &["correlation"]),
    }
}

fn parse_bar(data: &Value) -> ChartData {
    let labels = data
        .get("labels")
        .map(json::string_array)
        .unwrap_or_default();
    let values = data
        .get("values")
        .map(json::number_array)
        .unwrap_or_default();
    let raw_counts = data.get("counts").and_then(Value::as_array);
    let counts = (0..labels.len())
        .map(|i| raw_counts.and_then(|c| c.get(i)).and_then(json::as_number))
        .collect();
    ChartData::Bar {
        labels,
        values,
        counts,
        y_label: json::string_field(data, &["y_label"]),
    }
}

// The box payload nests its array one level down, under `data.data`.
fn parse_box(data: &Value) -> ChartData {
    let categories = data
        .get("data")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(box_summary).collect())
        .unwrap_or_default();
    ChartData::BoxPlot { categories }
}

fn box_summary(item: &Value) -> BoxSummary {
    let label = json::string_field(item, &["category", "label", "name"])
        .unwrap_or_else(|| json::display_string(item));
    BoxSummary {
        label,
        min: json::number_field(item, &["min"]),
        q1: json::number_field(item, &["q1"]),
        median: json::number_field(item, &["median"]),
        q3: json::number_field(item, &["q3"]),
        max: json::number_field(item, &["max"]),
        count: json::number_field(item, &["count"]),
        outliers: item
            .get("outliers")
            .map(json::number_array)
            .unwrap_or_default(),
    }
}
