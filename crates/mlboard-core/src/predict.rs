//! Prediction request assembly and feature value coercion.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{BoardError, Result};
use crate::schema::{FeatureDescriptor, TypeClass};

/// Payload for `POST /Dataset/predict`. Field names follow the backend
/// contract, including its inconsistent `model_Name` casing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictRequest {
    #[serde(rename = "datasetId")]
    pub dataset_id: Number,
    pub version: Number,
    #[serde(rename = "model_Name")]
    pub model_name: String,
    pub features: Map<String, Value>,
}

/// Result of a successful predict call.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PredictionOutcome {
    #[serde(default)]
    pub prediction: Value,
    #[serde(default)]
    pub model_used: Option<String>,
    #[serde(default)]
    pub processing_time_ms: Option<f64>,
}

impl PredictionOutcome {
    /// Display string for the predicted value.
    pub fn prediction_display(&self) -> String {
        crate::json::display_string(&self.prediction)
    }
}

/// Parses a dataset id into the JSON number the predict endpoint expects.
pub fn numeric_id(id: &str) -> Option<Number> {
    let trimmed = id.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(Number::from(n));
    }
    trimmed.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Coerces a raw form value to the JSON type the feature calls for:
/// booleans from the literal "true", numbers for numeric classes, strings
/// for everything else.
pub fn coerce_feature_value(feature: &FeatureDescriptor, raw: &str) -> Result<Value> {
    match feature.type_class {
        TypeClass::Boolean => Ok(Value::Bool(raw == "true")),
        TypeClass::NumericContinuous | TypeClass::NumericCategorical | TypeClass::Numeric => {
            let trimmed = raw.trim();
            if let Ok(n) = trimmed.parse::<i64>() {
                return Ok(Value::Number(Number::from(n)));
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| {
                    BoardError::field_validation(
                        feature.name.clone(),
                        format!("Value for {} must be numeric", feature.label),
                    )
                })
        }
        _ => Ok(Value::String(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::normalize_feature;
    use serde_json::json;

    fn feature(raw: Value) -> FeatureDescriptor {
        normalize_feature(&raw, None).unwrap()
    }

    #[test]
    fn request_serializes_backend_field_names() {
        let request = PredictRequest {
            dataset_id: Number::from(12),
            version: Number::from(3),
            model_name: "xgboost".to_string(),
            features: Map::new(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["datasetId"], json!(12));
        assert_eq!(value["model_Name"], json!("xgboost"));
        assert_eq!(value["version"], json!(3));
    }

    #[test]
    fn boolean_features_compare_against_true_literal() {
        let f = feature(json!({"name": "active", "dataType": "bool"}));
        assert_eq!(coerce_feature_value(&f, "true").unwrap(), json!(true));
        assert_eq!(coerce_feature_value(&f, "false").unwrap(), json!(false));
        assert_eq!(coerce_feature_value(&f, "yes").unwrap(), json!(false));
    }

    #[test]
    fn numeric_features_become_numbers() {
        let f = feature(json!({"name": "age", "dataType": "int"}));
        assert_eq!(coerce_feature_value(&f, "41").unwrap(), json!(41));
        let f = feature(json!({"name": "rate", "dataType": "float"}));
        assert_eq!(coerce_feature_value(&f, "0.25").unwrap(), json!(0.25));
    }

    #[test]
    fn unparsable_numeric_value_is_a_field_error() {
        let f = feature(json!({"name": "age", "dataType": "int"}));
        let err = coerce_feature_value(&f, "old").unwrap_err();
        assert_eq!(err.field(), Some("age"));
    }

    #[test]
    fn categorical_features_stay_strings() {
        let f = feature(json!({"name": "city", "categories": ["a", "b"]}));
        assert_eq!(coerce_feature_value(&f, "a").unwrap(), json!("a"));
    }

    #[test]
    fn numeric_id_handles_integers_and_rejects_garbage() {
        assert_eq!(numeric_id("12"), Some(Number::from(12)));
        assert_eq!(numeric_id(" 7 "), Some(Number::from(7)));
        assert!(numeric_id("iris").is_none());
    }
}
