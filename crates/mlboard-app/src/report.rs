//! Model report view state machine.

use chrono::{DateTime, Utc};

use mlboard_core::backend::Backend;
use mlboard_core::dataset::DatasetRef;
use mlboard_core::report::ModelReport;

use crate::view_state::{RequestSeq, ViewState};

/// State of the model comparison report view.
#[derive(Default)]
pub struct ReportPage {
    pub dataset_input: String,
    pub active_id: String,
    pub datasets: Vec<DatasetRef>,
    pub datasets_error: Option<String>,
    pub state: ViewState<ModelReport>,
    pub last_fetched: Option<DateTime<Utc>>,
    seq: RequestSeq,
}

impl ReportPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the dataset list, selects the newest dataset, and loads its
    /// report. A report failure does not clear the dataset list.
    pub async fn enter(&mut self, backend: &dyn Backend) {
        self.datasets_error = None;
        match backend.user_datasets().await {
            Ok(options) => {
                self.datasets = options;
                if let Some(newest) = self.datasets.first() {
                    let id = newest.id.clone();
                    self.dataset_input = id.clone();
                    self.active_id = id.clone();
                    self.fetch(backend, &id).await;
                }
            }
            Err(err) => self.datasets_error = Some(err.to_string()),
        }
    }

    /// Manual reload; always re-fetches, even for an unchanged id.
    pub async fn reload(&mut self, backend: &dyn Backend, requested: &str) {
        let trimmed = requested.trim();
        if trimmed.is_empty() {
            self.state = ViewState::Errored("Please enter a dataset id".to_string());
            return;
        }
        let id = trimmed.to_string();
        self.dataset_input = id.clone();
        self.active_id = id.clone();
        self.fetch(backend, &id).await;
    }

    async fn fetch(&mut self, backend: &dyn Backend, id: &str) {
        let ticket = self.seq.begin();
        self.state = ViewState::Loading;
        let fetched = backend.models(id).await;
        if !self.seq.is_current(ticket) {
            return;
        }
        match fetched {
            Ok(report) => {
                self.state = ViewState::Loaded(report);
                self.last_fetched = Some(Utc::now());
            }
            Err(err) => self.state = ViewState::Errored(err.to_string()),
        }
    }
}
