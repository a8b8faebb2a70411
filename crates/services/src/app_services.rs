use std::path::Path;
use std::sync::Arc;

use storage::repository::Storage;

use crate::error::AppServicesError;
use crate::progress_service::ProgressService;

/// How the progress document is treated at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StartMode {
    /// Keep existing progress; write defaults only if no document exists.
    #[default]
    Resume,
    /// Delete any existing progress before writing defaults.
    Fresh,
}

/// Assembles app-facing services once at process start.
#[derive(Clone)]
pub struct AppServices {
    progress: Arc<ProgressService>,
}

impl AppServices {
    /// Build services backed by a JSON progress file.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the data directory cannot be prepared or
    /// the initial document cannot be written.
    pub async fn new_json_file(
        path: impl AsRef<Path>,
        mode: StartMode,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::json_file(path.as_ref())?;
        Self::from_storage(storage, mode).await
    }

    /// Build services backed by in-memory storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the initial document cannot be written.
    pub async fn in_memory() -> Result<Self, AppServicesError> {
        Self::from_storage(Storage::in_memory(), StartMode::Resume).await
    }

    async fn from_storage(storage: Storage, mode: StartMode) -> Result<Self, AppServicesError> {
        let progress = Arc::new(ProgressService::new(Arc::clone(&storage.progress)));
        match mode {
            StartMode::Resume => {
                progress.ensure_document().await?;
            }
            StartMode::Fresh => progress.start_fresh().await?,
        }
        Ok(Self { progress })
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }
}
