//! Upload view: client-side validation, submission, and the cached
//! response that disables the form until cleared.

use std::path::Path;

use serde_json::Value;

use mlboard_core::backend::Backend;
use mlboard_core::error::{BoardError, Result};
use mlboard_core::validation;
use mlboard_infrastructure::UploadCache;

/// State of the upload view.
pub struct UploadPage {
    cache: UploadCache,
    /// The cached upload response, when one survives in storage.
    pub cached: Option<Value>,
}

impl UploadPage {
    pub fn new(cache: UploadCache) -> Self {
        Self {
            cache,
            cached: None,
        }
    }

    /// Re-reads the cached response. Expired or unparseable entries read
    /// as absent.
    pub fn refresh_cached(&mut self) -> Result<()> {
        self.cached = self.cache.load()?;
        Ok(())
    }

    /// Validates and submits one dataset file. All validation runs before
    /// any byte leaves the machine: cached-response gate, file presence,
    /// size, filename, extension, and target column.
    pub async fn submit(
        &mut self,
        backend: &dyn Backend,
        path: &Path,
        target_column: &str,
        run_auto_ml: bool,
    ) -> Result<Value> {
        if self.cached.is_some() {
            return Err(BoardError::validation(
                "Cached dataset detected. Clear it before uploading another file.",
            ));
        }

        let metadata = std::fs::metadata(path)
            .map_err(|_| BoardError::validation("Please choose a dataset file to upload."))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| BoardError::validation("Please choose a dataset file to upload."))?;
        validation::validate_upload_file(file_name, metadata.len())?;

        let target = target_column.trim();
        validation::validate_target_column(target)?;

        let bytes = tokio::fs::read(path).await?;
        let response = backend
            .upload_dataset(file_name, bytes, target, run_auto_ml)
            .await?;

        // Cache write failures are not upload failures.
        if let Err(err) = self.cache.store(&response) {
            tracing::warn!(error = %err, "failed to cache upload response");
        }
        self.cached = Some(response.clone());
        Ok(response)
    }

    /// Clears the cached response and re-enables the form.
    pub fn clear_cached(&mut self) -> Result<()> {
        self.cache.clear()?;
        self.cached = None;
        Ok(())
    }
}
