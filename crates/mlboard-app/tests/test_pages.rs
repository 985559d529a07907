//! Page state machine tests against a scripted backend.

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use mlboard_app::auth::{AuthFlow, AuthState};
use mlboard_app::dashboard::DashboardPage;
use mlboard_app::predict::PredictPage;
use mlboard_app::report::ReportPage;
use mlboard_app::upload::UploadPage;
use mlboard_core::backend::Backend;
use mlboard_core::dashboard::DashboardData;
use mlboard_core::dataset::DatasetRef;
use mlboard_core::error::{BoardError, Result};
use mlboard_core::predict::{PredictRequest, PredictionOutcome};
use mlboard_core::report::ModelReport;
use mlboard_core::schema::SchemaInfo;
use mlboard_core::session::{LoginCredentials, LoginResponse, RegisterPayload, ServerMessage};
use mlboard_infrastructure::{FileSessionStore, UploadCache};

/// Scripted backend: each endpoint returns a preconfigured result and
/// counts its calls.
struct MockBackend {
    datasets: Result<Vec<DatasetRef>>,
    dashboard: Result<DashboardData>,
    schema: Result<SchemaInfo>,
    models: Result<ModelReport>,
    outcome: Result<PredictionOutcome>,
    upload_response: Result<Value>,
    dashboard_calls: AtomicUsize,
    predict_calls: AtomicUsize,
    register_calls: AtomicUsize,
    last_predict: Mutex<Option<PredictRequest>>,
    bearer: Mutex<Option<String>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            datasets: Ok(Vec::new()),
            dashboard: Ok(DashboardData::default()),
            schema: Ok(SchemaInfo::default()),
            models: Ok(ModelReport::default()),
            outcome: Ok(PredictionOutcome::default()),
            upload_response: Ok(json!({"id": 99})),
            dashboard_calls: AtomicUsize::new(0),
            predict_calls: AtomicUsize::new(0),
            register_calls: AtomicUsize::new(0),
            last_predict: Mutex::new(None),
            bearer: Mutex::new(None),
        }
    }
}

fn api_err(message: &str) -> BoardError {
    BoardError::api(500, message)
}

fn datasets(ids: &[(&str, &str)]) -> Vec<DatasetRef> {
    ids.iter()
        .map(|(id, name)| DatasetRef {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect()
}

#[async_trait]
impl Backend for MockBackend {
    fn set_bearer(&self, token: Option<String>) {
        *self.bearer.lock().unwrap() = token;
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse> {
        Ok(LoginResponse {
            token: "tok-login".to_string(),
            token_type: Some("Bearer".to_string()),
            expiration: None,
            user_name: Some(credentials.user_name.clone()),
            email: None,
            full_name: None,
        })
    }

    async fn register(&self, _payload: &RegisterPayload) -> Result<ServerMessage> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ServerMessage {
            message: Some("User created successfully.".to_string()),
        })
    }

    async fn upload_dataset(
        &self,
        _file_name: &str,
        _bytes: Vec<u8>,
        _target_column: &str,
        _run_auto_ml: bool,
    ) -> Result<Value> {
        self.upload_response.clone()
    }

    async fn user_datasets(&self) -> Result<Vec<DatasetRef>> {
        self.datasets.clone()
    }

    async fn dashboard(&self, _dataset_id: &str) -> Result<DashboardData> {
        self.dashboard_calls.fetch_add(1, Ordering::SeqCst);
        self.dashboard.clone()
    }

    async fn schema(&self, _dataset_id: &str) -> Result<SchemaInfo> {
        self.schema.clone()
    }

    async fn models(&self, _dataset_id: &str) -> Result<ModelReport> {
        self.models.clone()
    }

    async fn predict(&self, request: &PredictRequest) -> Result<PredictionOutcome> {
        self.predict_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_predict.lock().unwrap() = Some(request.clone());
        self.outcome.clone()
    }
}

fn predict_schema() -> SchemaInfo {
    SchemaInfo::from_value(&json!({
        "target_column": "price",
        "version": 3,
        "columns": [
            {"name": "area", "dataType": "float", "input_type": "numeric_continuous", "min_allowed": 20, "max_allowed": 400},
            {"name": "city", "dataType": "object", "categories": ["north", "south"]},
            {"name": "furnished", "dataType": "bool"},
            {"name": "price"},
        ],
    }))
}

fn predict_models() -> ModelReport {
    serde_json::from_value(json!({
        "task": "regression",
        "all_models": [
            {"name": "xgboost", "test_metrics": {"rmse": 3.2}},
            {"name": "ridge", "test_metrics": {"rmse": 4.0}},
        ],
    }))
    .unwrap()
}

// ============================================================================
// Dashboard page
// ============================================================================

#[tokio::test]
async fn dashboard_enter_selects_newest_and_loads() {
    let backend = MockBackend {
        datasets: Ok(datasets(&[("12", "housing"), ("7", "churn")])),
        ..Default::default()
    };
    let mut page = DashboardPage::new();
    page.enter(&backend).await;

    assert_eq!(page.active_id, "12");
    assert!(page.state.data().is_some());
    assert_eq!(backend.dashboard_calls.load(Ordering::SeqCst), 1);
    assert!(page.last_fetched.is_some());
}

#[tokio::test]
async fn dashboard_blank_id_blocks_without_network_call() {
    let backend = MockBackend::default();
    let mut page = DashboardPage::new();
    page.reload(&backend, "   ").await;

    assert_eq!(page.state.error(), Some("Please enter a dataset id"));
    assert_eq!(backend.dashboard_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn dashboard_reload_refetches_unchanged_id() {
    let backend = MockBackend {
        datasets: Ok(datasets(&[("5", "only")])),
        ..Default::default()
    };
    let mut page = DashboardPage::new();
    page.enter(&backend).await;
    page.reload(&backend, "5").await;

    assert_eq!(backend.dashboard_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn dashboard_fetch_failure_surfaces_server_message() {
    let backend = MockBackend {
        datasets: Ok(datasets(&[("5", "only")])),
        dashboard: Err(api_err("Dataset not found")),
        ..Default::default()
    };
    let mut page = DashboardPage::new();
    page.enter(&backend).await;

    assert_eq!(page.state.error(), Some("Dataset not found"));
    // The dataset list survives the dashboard failure.
    assert_eq!(page.datasets.len(), 1);
}

// ============================================================================
// Report page
// ============================================================================

#[tokio::test]
async fn failed_report_fetch_keeps_dataset_list() {
    let backend = MockBackend {
        datasets: Ok(datasets(&[("9", "a"), ("2", "b")])),
        models: Err(api_err("No models trained yet")),
        ..Default::default()
    };
    let mut page = ReportPage::new();
    page.enter(&backend).await;

    assert_eq!(page.state.error(), Some("No models trained yet"));
    assert_eq!(page.datasets.len(), 2);
    assert!(page.datasets_error.is_none());
}

#[tokio::test]
async fn report_loads_for_newest_dataset() {
    let backend = MockBackend {
        datasets: Ok(datasets(&[("9", "a")])),
        models: Ok(predict_models()),
        ..Default::default()
    };
    let mut page = ReportPage::new();
    page.enter(&backend).await;

    let report = page.state.data().unwrap();
    assert_eq!(report.model_names(), vec!["xgboost", "ridge"]);
}

// ============================================================================
// Predict page
// ============================================================================

#[tokio::test]
async fn predict_metadata_builds_form_and_seeds_values() {
    let backend = MockBackend {
        datasets: Ok(datasets(&[("12", "housing")])),
        schema: Ok(predict_schema()),
        models: Ok(predict_models()),
        ..Default::default()
    };
    let mut page = PredictPage::new();
    page.enter(&backend).await;

    let meta = page.meta.data().unwrap();
    assert_eq!(meta.features.len(), 3); // target excluded
    assert_eq!(meta.model_options, vec!["xgboost", "ridge"]);
    assert_eq!(page.selected_model.as_deref(), Some("xgboost"));
    // Continuous features seed at their lower bound, others start empty.
    assert_eq!(page.values.get("area").map(String::as_str), Some("20"));
    assert_eq!(page.values.get("city").map(String::as_str), Some(""));
}

#[tokio::test]
async fn predict_empty_feature_blocks_naming_label() {
    let backend = MockBackend {
        datasets: Ok(datasets(&[("12", "housing")])),
        schema: Ok(predict_schema()),
        models: Ok(predict_models()),
        ..Default::default()
    };
    let mut page = PredictPage::new();
    page.enter(&backend).await;
    page.submit(&backend).await;

    assert_eq!(
        page.predict_error.as_deref(),
        Some("Please provide a value for city")
    );
    assert_eq!(backend.predict_calls.load(Ordering::SeqCst), 0);
    assert!(page.result.is_none());
}

#[tokio::test]
async fn predict_submits_coerced_features() {
    let backend = MockBackend {
        datasets: Ok(datasets(&[("12", "housing")])),
        schema: Ok(predict_schema()),
        models: Ok(predict_models()),
        outcome: Ok(PredictionOutcome {
            prediction: json!(231000.5),
            model_used: Some("xgboost".to_string()),
            processing_time_ms: Some(12.5),
        }),
        ..Default::default()
    };
    let mut page = PredictPage::new();
    page.enter(&backend).await;
    page.set_value("area", "120.5".to_string());
    page.set_value("city", "north".to_string());
    page.set_value("furnished", "true".to_string());
    page.submit(&backend).await;

    assert!(page.predict_error.is_none());
    assert_eq!(
        page.result.as_ref().unwrap().model_used.as_deref(),
        Some("xgboost")
    );

    let request = backend.last_predict.lock().unwrap().clone().unwrap();
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["datasetId"], json!(12));
    assert_eq!(value["version"], json!(3));
    assert_eq!(value["model_Name"], json!("xgboost"));
    assert_eq!(value["features"]["area"], json!(120.5));
    assert_eq!(value["features"]["city"], json!("north"));
    assert_eq!(value["features"]["furnished"], json!(true));
}

#[tokio::test]
async fn predict_requires_schema_version() {
    let mut schema = predict_schema();
    schema.version = None;
    let backend = MockBackend {
        datasets: Ok(datasets(&[("12", "housing")])),
        schema: Ok(schema),
        models: Ok(predict_models()),
        ..Default::default()
    };
    let mut page = PredictPage::new();
    page.enter(&backend).await;
    page.set_value("area", "100".to_string());
    page.set_value("city", "north".to_string());
    page.set_value("furnished", "false".to_string());
    page.submit(&backend).await;

    assert_eq!(
        page.predict_error.as_deref(),
        Some("Dataset version unavailable from schema endpoint")
    );
    assert_eq!(backend.predict_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn predict_requires_selected_model() {
    let backend = MockBackend {
        datasets: Ok(datasets(&[("12", "housing")])),
        schema: Ok(predict_schema()),
        models: Ok(ModelReport::default()),
        ..Default::default()
    };
    let mut page = PredictPage::new();
    page.enter(&backend).await;
    page.submit(&backend).await;

    assert_eq!(page.predict_error.as_deref(), Some("Select a model"));
}

#[tokio::test]
async fn metadata_failure_aborts_schema_and_model_state_together() {
    let backend = MockBackend {
        datasets: Ok(datasets(&[("12", "housing")])),
        schema: Ok(predict_schema()),
        models: Err(api_err("report unavailable")),
        ..Default::default()
    };
    let mut page = PredictPage::new();
    page.enter(&backend).await;

    assert_eq!(page.meta.error(), Some("report unavailable"));
    assert!(page.meta.data().is_none());
    assert_eq!(page.datasets.len(), 1);
}

#[tokio::test]
async fn values_survive_metadata_reload_and_result_clears() {
    let backend = MockBackend {
        datasets: Ok(datasets(&[("12", "housing")])),
        schema: Ok(predict_schema()),
        models: Ok(predict_models()),
        ..Default::default()
    };
    let mut page = PredictPage::new();
    page.enter(&backend).await;
    page.set_value("city", "south".to_string());
    page.result = Some(PredictionOutcome::default());

    page.reload(&backend, "12").await;

    assert_eq!(page.values.get("city").map(String::as_str), Some("south"));
    assert!(page.result.is_none());
}

// ============================================================================
// Auth flow
// ============================================================================

#[tokio::test]
async fn login_persists_session_and_sets_bearer() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let backend = std::sync::Arc::new(MockBackend::default());
    let store = std::sync::Arc::new(FileSessionStore::with_path(
        temp_dir.path().join("session.json"),
    ));
    let mut auth = AuthFlow::new(backend.clone(), store.clone());
    auth.initialize().await.unwrap();
    assert_eq!(*auth.state(), AuthState::Anonymous);
    assert!(auth.require_token().is_err());

    auth.login("ada", "Abc123").await.unwrap();
    assert!(auth.token_present());
    assert_eq!(
        backend.bearer.lock().unwrap().as_deref(),
        Some("tok-login")
    );

    // A fresh flow restores the persisted session.
    let mut restored = AuthFlow::new(backend.clone(), store);
    restored.initialize().await.unwrap();
    assert!(restored.token_present());
    assert_eq!(restored.current_user().unwrap().user_name, "ada");

    restored.logout().await.unwrap();
    assert!(!restored.token_present());
    assert!(backend.bearer.lock().unwrap().is_none());
}

#[tokio::test]
async fn register_validation_blocks_before_network() {
    let backend = std::sync::Arc::new(MockBackend::default());
    let temp_dir = tempfile::TempDir::new().unwrap();
    let store = std::sync::Arc::new(FileSessionStore::with_path(
        temp_dir.path().join("session.json"),
    ));
    let auth = AuthFlow::new(backend.clone(), store);

    let mut payload = RegisterPayload {
        user_name: "ada".to_string(),
        full_name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        password: "abc123".to_string(),
        confirm_password: "abc123".to_string(),
        ..Default::default()
    };
    let err = auth.register(&payload).await.unwrap_err();
    assert_eq!(err.field(), Some("password"));
    assert_eq!(backend.register_calls.load(Ordering::SeqCst), 0);

    payload.password = "Abc123".to_string();
    payload.confirm_password = "Abc123".to_string();
    let message = auth.register(&payload).await.unwrap();
    assert_eq!(message, "User created successfully.");
    assert_eq!(backend.register_calls.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Upload page
// ============================================================================

fn temp_file(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn upload_rejects_bad_files_before_network() {
    let dir = tempfile::TempDir::new().unwrap();
    let backend = MockBackend::default();
    let mut page = UploadPage::new(UploadCache::with_path(dir.path().join("cache.json")));

    let spaced = temp_file(&dir, "my data.csv", b"a,b\n1,2\n");
    let err = page.submit(&backend, &spaced, "price", true).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Filename cannot contain whitespaces. Please rename your file."
    );

    let wrong_type = temp_file(&dir, "report.txt", b"hello");
    let err = page
        .submit(&backend, &wrong_type, "price", true)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "File type not supported. Accepted formats: CSV, JSON, Excel (.xls, .xlsx)"
    );

    let data = temp_file(&dir, "data.csv", b"a,b\n1,2\n");
    let err = page.submit(&backend, &data, "  ", true).await.unwrap_err();
    assert_eq!(err.to_string(), "Please provide the target column name.");

    let missing = dir.path().join("absent.csv");
    let err = page.submit(&backend, &missing, "price", true).await.unwrap_err();
    assert_eq!(err.to_string(), "Please choose a dataset file to upload.");
}

#[tokio::test]
async fn upload_success_caches_and_gates_the_form() {
    let dir = tempfile::TempDir::new().unwrap();
    let backend = MockBackend::default();
    let mut page = UploadPage::new(UploadCache::with_path(dir.path().join("cache.json")));
    let data = temp_file(&dir, "data.csv", b"a,b\n1,2\n");

    let response = page.submit(&backend, &data, "price", true).await.unwrap();
    assert_eq!(response, json!({"id": 99}));
    assert!(page.cached.is_some());

    // The cached response disables the form until cleared.
    let err = page.submit(&backend, &data, "price", true).await.unwrap_err();
    assert!(err.to_string().starts_with("Cached dataset detected"));

    page.clear_cached().unwrap();
    assert!(page.cached.is_none());
    assert!(page.submit(&backend, &data, "price", true).await.is_ok());

    // The cache survives a fresh page, simulating a reload.
    let mut fresh = UploadPage::new(UploadCache::with_path(dir.path().join("cache.json")));
    fresh.refresh_cached().unwrap();
    assert!(fresh.cached.is_some());
}
