//! The backend seam: one thin, typed operation per HTTP endpoint.
//!
//! Implementations do no retrying, caching, or backoff. The HTTP client
//! lives in its own crate; pages depend only on this trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::dashboard::DashboardData;
use crate::dataset::DatasetRef;
use crate::error::Result;
use crate::predict::{PredictRequest, PredictionOutcome};
use crate::report::ModelReport;
use crate::schema::SchemaInfo;
use crate::session::{LoginCredentials, LoginResponse, RegisterPayload, ServerMessage};

/// Access to the remote AutoML service.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Sets or clears the bearer token attached to authenticated calls.
    fn set_bearer(&self, token: Option<String>);

    /// `POST /Account/Login`
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse>;

    /// `POST /Account/Register`
    async fn register(&self, payload: &RegisterPayload) -> Result<ServerMessage>;

    /// `POST /Dataset/upload` (multipart: file, targetColumn, runAutoML)
    async fn upload_dataset(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        target_column: &str,
        run_auto_ml: bool,
    ) -> Result<Value>;

    /// `GET /Dataset/GetUserDatasets`, normalized and sorted newest-first.
    async fn user_datasets(&self) -> Result<Vec<DatasetRef>>;

    /// `GET /Dataset/dashboard/{id}`
    async fn dashboard(&self, dataset_id: &str) -> Result<DashboardData>;

    /// `GET /Dataset/schema/{id}`
    async fn schema(&self, dataset_id: &str) -> Result<SchemaInfo>;

    /// `GET /Dataset/models/{id}`
    async fn models(&self, dataset_id: &str) -> Result<ModelReport>;

    /// `POST /Dataset/predict`
    async fn predict(&self, request: &PredictRequest) -> Result<PredictionOutcome>;
}
