//! Predict view state machine.
//!
//! The feature form depends on two parallel fetches, schema and model
//! report, joined before the form is built. A failure in either aborts
//! both state updates together.

use std::collections::HashMap;

use serde_json::{Map, Number};

use mlboard_core::backend::Backend;
use mlboard_core::dataset::DatasetRef;
use mlboard_core::predict::{self, PredictRequest, PredictionOutcome};
use mlboard_core::schema::FeatureDescriptor;

use crate::view_state::{RequestSeq, ViewState};

/// Metadata the prediction form is built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictMeta {
    pub version: Option<Number>,
    pub features: Vec<FeatureDescriptor>,
    pub model_options: Vec<String>,
}

/// State of the prediction view.
#[derive(Default)]
pub struct PredictPage {
    pub dataset_input: String,
    pub active_id: String,
    pub datasets: Vec<DatasetRef>,
    pub datasets_error: Option<String>,
    pub meta: ViewState<PredictMeta>,
    /// Raw form values keyed by feature name. Previously entered values
    /// survive a metadata reload.
    pub values: HashMap<String, String>,
    pub selected_model: Option<String>,
    pub predict_error: Option<String>,
    pub result: Option<PredictionOutcome>,
    seq: RequestSeq,
}

impl PredictPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the dataset list, selects the newest dataset, and loads its
    /// metadata.
    pub async fn enter(&mut self, backend: &dyn Backend) {
        self.datasets_error = None;
        match backend.user_datasets().await {
            Ok(options) => {
                self.datasets = options;
                if let Some(newest) = self.datasets.first() {
                    let id = newest.id.clone();
                    self.dataset_input = id.clone();
                    self.active_id = id.clone();
                    self.load_metadata(backend, &id).await;
                }
            }
            Err(err) => self.datasets_error = Some(err.to_string()),
        }
    }

    /// Manual reload; always re-fetches, even for an unchanged id.
    pub async fn reload(&mut self, backend: &dyn Backend, requested: &str) {
        let trimmed = requested.trim();
        if trimmed.is_empty() {
            self.meta = ViewState::Errored("Please enter a dataset id".to_string());
            return;
        }
        let id = trimmed.to_string();
        self.dataset_input = id.clone();
        self.active_id = id.clone();
        self.load_metadata(backend, &id).await;
    }

    /// Resolves schema and model report concurrently and rebuilds the
    /// feature form. The prediction result clears on every reload.
    pub async fn load_metadata(&mut self, backend: &dyn Backend, id: &str) {
        let ticket = self.seq.begin();
        self.meta = ViewState::Loading;
        self.result = None;
        let fetched = tokio::try_join!(backend.schema(id), backend.models(id));
        if !self.seq.is_current(ticket) {
            return;
        }
        match fetched {
            Ok((schema, report)) => {
                // Keep previously entered values, seed the rest.
                let mut next = HashMap::new();
                for feature in &schema.features {
                    let value = self
                        .values
                        .get(&feature.name)
                        .cloned()
                        .unwrap_or_else(|| feature.seed_value());
                    next.insert(feature.name.clone(), value);
                }
                self.values = next;

                let model_options = report.model_names();
                self.selected_model = match &self.selected_model {
                    Some(current) if model_options.contains(current) => Some(current.clone()),
                    _ => model_options.first().cloned(),
                };

                self.meta = ViewState::Loaded(PredictMeta {
                    version: schema.version,
                    features: schema.features,
                    model_options,
                });
            }
            Err(err) => {
                // Either fetch failing aborts both schema and model state.
                self.meta = ViewState::Errored(err.to_string());
            }
        }
    }

    /// Sets one feature value. Unknown names are ignored.
    pub fn set_value(&mut self, name: &str, value: String) {
        let known = self
            .meta
            .data()
            .is_some_and(|meta| meta.features.iter().any(|f| f.name == name));
        if known {
            self.values.insert(name.to_string(), value);
        }
    }

    pub fn select_model(&mut self, name: String) {
        self.selected_model = Some(name);
    }

    /// Submits a prediction. Preconditions are checked in order: active
    /// dataset, selected model, schema version, then every feature value.
    /// Any empty value blocks the submission naming the first missing
    /// feature's label; no network call is issued.
    pub async fn submit(&mut self, backend: &dyn Backend) {
        self.predict_error = None;
        self.result = None;

        let Some(meta) = self.meta.data().cloned() else {
            self.predict_error = Some("Load a dataset first".to_string());
            return;
        };
        if self.active_id.is_empty() {
            self.predict_error = Some("Load a dataset first".to_string());
            return;
        }
        let Some(model_name) = self.selected_model.clone() else {
            self.predict_error = Some("Select a model".to_string());
            return;
        };
        let Some(version) = meta.version.clone() else {
            self.predict_error =
                Some("Dataset version unavailable from schema endpoint".to_string());
            return;
        };

        let missing = meta
            .features
            .iter()
            .find(|f| self.values.get(&f.name).map(|v| v.is_empty()).unwrap_or(true));
        if let Some(feature) = missing {
            self.predict_error = Some(format!("Please provide a value for {}", feature.label));
            return;
        }

        let Some(dataset_id) = predict::numeric_id(&self.active_id) else {
            self.predict_error = Some("Dataset id must be numeric".to_string());
            return;
        };

        let mut features = Map::new();
        for feature in &meta.features {
            let raw = self.values.get(&feature.name).cloned().unwrap_or_default();
            match predict::coerce_feature_value(feature, &raw) {
                Ok(value) => {
                    features.insert(feature.name.clone(), value);
                }
                Err(err) => {
                    self.predict_error = Some(err.to_string());
                    return;
                }
            }
        }

        let request = PredictRequest {
            dataset_id,
            version,
            model_name,
            features,
        };
        match backend.predict(&request).await {
            Ok(outcome) => self.result = Some(outcome),
            Err(err) => self.predict_error = Some(err.to_string()),
        }
    }
}
