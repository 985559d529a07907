//! Schema normalization.
//!
//! Column descriptors arrive with property names that vary by backend
//! version. This module is the single trust boundary between that loose
//! JSON and the rest of the system: each raw descriptor either becomes a
//! canonical [`FeatureDescriptor`] or is dropped (target columns).

use serde_json::{Number, Value};

use crate::json;

/// Declared-type fragments that suggest a numeric column.
const NUMERIC_TYPE_MARKERS: [&str; 6] = ["int", "integer", "float", "double", "decimal", "number"];

/// The canonical classification of one input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    NumericContinuous,
    NumericCategorical,
    Numeric,
    Categorical,
    Boolean,
    Date,
}

/// Input widget a feature maps to on the prediction form.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Slider { min: f64, max: f64, step: f64 },
    Dropdown,
    DateInput,
    NumberInput,
}

/// Normalized, UI-consumable description of one input column.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureDescriptor {
    pub name: String,
    pub label: String,
    pub type_class: TypeClass,
    /// Non-empty only for categorical and boolean features.
    pub categories: Vec<String>,
    pub min_allowed: Option<f64>,
    pub max_allowed: Option<f64>,
    pub is_integer: bool,
}

impl FeatureDescriptor {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self.type_class,
            TypeClass::NumericContinuous | TypeClass::NumericCategorical | TypeClass::Numeric
        )
    }

    /// Selects the form widget for this feature.
    pub fn widget(&self) -> Widget {
        match self.type_class {
            TypeClass::NumericContinuous => Widget::Slider {
                min: self.min_allowed.unwrap_or(0.0),
                max: self.max_allowed.unwrap_or(100.0),
                step: if self.is_integer { 1.0 } else { 0.1 },
            },
            TypeClass::NumericCategorical | TypeClass::Categorical | TypeClass::Boolean => {
                Widget::Dropdown
            }
            TypeClass::Date => Widget::DateInput,
            TypeClass::Numeric => Widget::NumberInput,
        }
    }

    /// Initial form value: continuous features seed at their lower bound
    /// (default 0), everything else starts empty.
    pub fn seed_value(&self) -> String {
        match self.type_class {
            TypeClass::NumericContinuous => format_bound(self.min_allowed.unwrap_or(0.0)),
            _ => String::new(),
        }
    }
}

/// Result of normalizing one schema payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaInfo {
    pub target_column: Option<String>,
    pub version: Option<Number>,
    pub features: Vec<FeatureDescriptor>,
}

impl SchemaInfo {
    /// Normalizes a raw schema payload. The column list and target column
    /// hide behind several aliases; columns that fail to normalize are
    /// dropped rather than failing the whole schema.
    pub fn from_value(raw: &Value) -> Self {
        let target_column = json::string_field(raw, &["target_column", "targetColumn", "target"]);
        let version =
            json::first_field(raw, &["version", "Version", "data_version"]).and_then(version_number);
        let features = json::first_field(raw, &["columns", "schema", "fields", "data"])
            .and_then(Value::as_array)
            .map(|columns| {
                columns
                    .iter()
                    .filter_map(|col| normalize_feature(col, target_column.as_deref()))
                    .collect()
            })
            .unwrap_or_default();
        SchemaInfo {
            target_column,
            version,
            features,
        }
    }
}

/// Maps one raw column descriptor to a canonical feature descriptor.
///
/// Returns `None` when the column is the declared target or explicitly
/// marked as target. Classification order, first match wins:
///
/// 1. a date marker in the input type or declared type
/// 2. a boolean marker (categories fixed to "true"/"false")
/// 3. numeric, decided by an explicit flag, an input type of
///    `numeric`/`number`, or a numeric declared type; refined to
///    continuous or categorical by the input type
/// 4. otherwise categorical, with categories from the first populated
///    option-list alias
pub fn normalize_feature(field: &Value, target: Option<&str>) -> Option<FeatureDescriptor> {
    let name = json::string_field(field, &["name", "columnName", "ColumnName"])?;
    if target.is_some_and(|t| t == name) {
        return None;
    }
    if json::first_field(field, &["is_target", "isTarget"]).is_some_and(json::is_truthy) {
        return None;
    }

    let raw_type = json::string_field(field, &["dataType", "type", "Type", "pandas_dtype"])
        .unwrap_or_default()
        .to_lowercase();
    let input_type = json::string_field(field, &["input_type", "inputType"])
        .unwrap_or_default()
        .to_lowercase();

    let is_date = input_type.contains("date") || raw_type.contains("date");
    let is_boolean = !is_date && (input_type.contains("bool") || raw_type.contains("bool"));

    let explicit_numeric = json::first_field(field, &["isNumeric", "is_numeric"])
        .is_some_and(json::is_truthy);
    let input_numeric = matches!(input_type.as_str(), "numeric" | "number");
    let type_numeric = NUMERIC_TYPE_MARKERS.iter().any(|m| raw_type.contains(m));
    let is_numeric = !is_date && !is_boolean && (explicit_numeric || input_numeric || type_numeric);

    let type_class = if is_date {
        TypeClass::Date
    } else if is_boolean {
        TypeClass::Boolean
    } else if is_numeric {
        if input_type.contains("numeric_continuous") {
            TypeClass::NumericContinuous
        } else if input_type.contains("numeric_categorical") {
            TypeClass::NumericCategorical
        } else {
            TypeClass::Numeric
        }
    } else {
        TypeClass::Categorical
    };

    let categories = match type_class {
        TypeClass::Boolean => vec!["true".to_string(), "false".to_string()],
        TypeClass::Categorical => option_values(field),
        _ => Vec::new(),
    };

    let label = json::string_field(field, &["label"]).unwrap_or_else(|| name.replace('_', " "));

    Some(FeatureDescriptor {
        label,
        type_class,
        categories,
        min_allowed: json::number_field(field, &["min_allowed", "minAllowed"]),
        max_allowed: json::number_field(field, &["max_allowed", "maxAllowed"]),
        is_integer: raw_type.contains("int") && !raw_type.contains("float"),
        name,
    })
}

// First populated option-list alias wins; arrays are used as-is, objects
// contribute their values. Each option is coerced to a display string.
fn option_values(field: &Value) -> Vec<String> {
    const OPTION_KEYS: [&str; 6] = [
        "raw_labels",
        "rawLabels",
        "categories",
        "uniqueValues",
        "unique_values",
        "values",
    ];
    for key in OPTION_KEYS {
        let Some(raw) = field.get(key) else { continue };
        let collected: Vec<String> = match raw {
            Value::Array(items) => items.iter().map(json::display_string).collect(),
            Value::Object(map) => map.values().map(json::display_string).collect(),
            _ => Vec::new(),
        };
        if !collected.is_empty() {
            return collected;
        }
    }
    Vec::new()
}

fn version_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(n) = trimmed.parse::<i64>() {
                return Some(Number::from(n));
            }
            trimmed.parse::<f64>().ok().and_then(Number::from_f64)
        }
        _ => None,
    }
}

fn format_bound(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
