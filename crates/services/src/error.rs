//! Shared error types for the services crate.

use thiserror::Error;

use storage::json::JsonInitError;
use storage::repository::StorageError;

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Json(#[from] JsonInitError),
    #[error(transparent)]
    Progress(#[from] ProgressServiceError),
}
