//! The backend HTTP client.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::multipart;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;

use mlboard_core::backend::Backend;
use mlboard_core::config::AppConfig;
use mlboard_core::dashboard::DashboardData;
use mlboard_core::dataset::{self, DatasetRef};
use mlboard_core::error::{BoardError, Result};
use mlboard_core::predict::{PredictRequest, PredictionOutcome};
use mlboard_core::report::ModelReport;
use mlboard_core::schema::SchemaInfo;
use mlboard_core::session::{LoginCredentials, LoginResponse, RegisterPayload, ServerMessage};

use crate::response::rejection_error;

// encodeURIComponent keeps these unescaped.
const ID_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Client for the remote AutoML service. Cheap to share behind an `Arc`;
/// the bearer token can be swapped at any time without rebuilding.
pub struct ApiClient {
    http: Client,
    base_url: String,
    bearer: Mutex<Option<String>>,
}

impl ApiClient {
    /// Builds a client from the application configuration.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BoardError::internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bearer: Mutex::new(None),
        })
    }

    fn bearer_token(&self) -> Option<String> {
        match self.bearer.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = self.bearer_token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| String::new());
            return Err(rejection_error(status.as_u16(), &body));
        }
        Ok(response)
    }

    async fn read_json(&self, builder: RequestBuilder) -> Result<Value> {
        let response = self.send(builder).await?;
        response.json().await.map_err(|e| {
            BoardError::api(None, format!("Failed to parse server response: {e}"))
        })
    }

    fn dataset_path(prefix: &str, dataset_id: &str) -> String {
        format!("{prefix}{}", utf8_percent_encode(dataset_id, ID_SEGMENT))
    }
}

fn transport_error(err: reqwest::Error) -> BoardError {
    BoardError::Api {
        status: err.status().map(|s| s.as_u16()),
        message: format!("Request failed: {err}"),
    }
}

#[async_trait]
impl Backend for ApiClient {
    fn set_bearer(&self, token: Option<String>) {
        match self.bearer.lock() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse> {
        let raw = self
            .read_json(self.request(Method::POST, "/Account/Login").json(credentials))
            .await?;
        serde_json::from_value(raw)
            .map_err(|e| BoardError::api(None, format!("Unexpected login response: {e}")))
    }

    async fn register(&self, payload: &RegisterPayload) -> Result<ServerMessage> {
        let raw = self
            .read_json(self.request(Method::POST, "/Account/Register").json(payload))
            .await?;
        Ok(serde_json::from_value(raw).unwrap_or_default())
    }

    async fn upload_dataset(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        target_column: &str,
        run_auto_ml: bool,
    ) -> Result<Value> {
        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime.as_ref())
            .map_err(|e| BoardError::internal(format!("Invalid MIME type for upload: {e}")))?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("targetColumn", target_column.to_string())
            .text("runAutoML", run_auto_ml.to_string());
        tracing::debug!(file_name, target_column, run_auto_ml, "uploading dataset");
        self.read_json(self.request(Method::POST, "/Dataset/upload").multipart(form))
            .await
    }

    async fn user_datasets(&self) -> Result<Vec<DatasetRef>> {
        let raw = self
            .read_json(self.request(Method::GET, "/Dataset/GetUserDatasets"))
            .await?;
        Ok(dataset::dataset_options(&raw))
    }

    async fn dashboard(&self, dataset_id: &str) -> Result<DashboardData> {
        let path = Self::dataset_path("/Dataset/dashboard/", dataset_id);
        let raw = self.read_json(self.request(Method::GET, &path)).await?;
        Ok(DashboardData::from_value(&raw))
    }

    async fn schema(&self, dataset_id: &str) -> Result<SchemaInfo> {
        let path = Self::dataset_path("/Dataset/schema/", dataset_id);
        let raw = self.read_json(self.request(Method::GET, &path)).await?;
        Ok(SchemaInfo::from_value(&raw))
    }

    async fn models(&self, dataset_id: &str) -> Result<ModelReport> {
        let path = Self::dataset_path("/Dataset/models/", dataset_id);
        let raw = self.read_json(self.request(Method::GET, &path)).await?;
        serde_json::from_value(raw)
            .map_err(|e| BoardError::api(None, format!("Unexpected model report: {e}")))
    }

    async fn predict(&self, request: &PredictRequest) -> Result<PredictionOutcome> {
        let raw = self
            .read_json(self.request(Method::POST, "/Dataset/predict").json(request))
            .await?;
        serde_json::from_value(raw)
            .map_err(|e| BoardError::api(None, format!("Unexpected prediction response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_ids_are_percent_encoded() {
        assert_eq!(
            ApiClient::dataset_path("/Dataset/schema/", "my id/7"),
            "/Dataset/schema/my%20id%2F7"
        );
        assert_eq!(
            ApiClient::dataset_path("/Dataset/dashboard/", "12"),
            "/Dataset/dashboard/12"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = AppConfig {
            base_url: "http://localhost:5000/api/".to_string(),
            ..AppConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:5000/api");
    }
}
