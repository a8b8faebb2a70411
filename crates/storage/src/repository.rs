use async_trait::async_trait;
use culturo_core::model::ProgressRecord;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("lock poisoned: {0}")]
    Lock(String),
}

/// Repository contract for the progress document.
///
/// Adapters hold no cache: every call goes to the backing store so a write
/// made elsewhere is visible on the next load.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load the stored document.
    ///
    /// Returns `Ok(None)` when no document has been written yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the document cannot be read, or
    /// `StorageError::Serialization` if its content is not a valid record.
    async fn load_progress(&self) -> Result<Option<ProgressRecord>, StorageError>;

    /// Replace the stored document with `record`.
    ///
    /// Readers observe either the previous document or the new one, never a
    /// partial write.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be written.
    async fn save_progress(&self, record: &ProgressRecord) -> Result<(), StorageError>;

    /// Remove the stored document. Removing a missing document succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document exists but cannot be removed.
    async fn clear_progress(&self) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    record: Arc<Mutex<Option<ProgressRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            record: Arc::new(Mutex::new(None)),
        }
    }

    /// Start with an existing document.
    #[must_use]
    pub fn with_record(record: ProgressRecord) -> Self {
        Self {
            record: Arc::new(Mutex::new(Some(record))),
        }
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_progress(&self) -> Result<Option<ProgressRecord>, StorageError> {
        let guard = self
            .record
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_progress(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let mut guard = self
            .record
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        *guard = Some(record.clone());
        Ok(())
    }

    async fn clear_progress(&self) -> Result<(), StorageError> {
        let mut guard = self
            .record
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(InMemoryRepository::new());
        Self { progress }
    }
}
