//! Dashboard view state machine.

use chrono::{DateTime, Utc};

use mlboard_core::backend::Backend;
use mlboard_core::dashboard::DashboardData;
use mlboard_core::dataset::DatasetRef;

use crate::view_state::{RequestSeq, ViewState};

/// State of the dataset dashboard view.
#[derive(Default)]
pub struct DashboardPage {
    /// Value of the dataset selector input.
    pub dataset_input: String,
    /// Id the current dashboard was fetched for.
    pub active_id: String,
    pub datasets: Vec<DatasetRef>,
    pub datasets_error: Option<String>,
    pub state: ViewState<DashboardData>,
    pub last_fetched: Option<DateTime<Utc>>,
    seq: RequestSeq,
}

impl DashboardPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// On view entry: fetch the dataset list and, if non-empty, select the
    /// newest dataset and auto-load its dashboard. A list failure leaves
    /// any previously loaded dashboard untouched.
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

    /// Manual reload with a user-entered or re-selected dataset id. Always
    /// re-fetches, even when the id is unchanged from the active one.
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
        let fetched = backend.dashboard(id).await;
        if !self.seq.is_current(ticket) {
            // Superseded by a newer request; drop this response.
            return;
        }
        match fetched {
            Ok(data) => {
                self.state = ViewState::Loaded(data);
                self.last_fetched = Some(Utc::now());
            }
            Err(err) => self.state = ViewState::Errored(err.to_string()),
        }
    }
}
