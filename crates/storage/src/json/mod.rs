use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use culturo_core::model::ProgressRecord;
use thiserror::Error;
use tracing::debug;

use crate::repository::{ProgressRepository, Storage, StorageError};

mod atomic;

/// Progress document stored as a pretty-printed JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JsonInitError {
    #[error("cannot create data directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("progress path {} is a directory", .0.display())]
    IsDirectory(PathBuf),
}

impl JsonFileRepository {
    /// Prepare a repository backed by the file at `path`.
    ///
    /// The parent directory is created if needed; the file itself is only
    /// written on the first save.
    ///
    /// # Errors
    ///
    /// Returns `JsonInitError` if the parent directory cannot be created or
    /// `path` names a directory.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, JsonInitError> {
        let path = path.into();
        if path.is_dir() {
            return Err(JsonInitError::IsDirectory(path));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| JsonInitError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Ok(Self { path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ProgressRepository for JsonFileRepository {
    async fn load_progress(&self) -> Result<Option<ProgressRecord>, StorageError> {
        let path = self.path.clone();
        run_blocking(move || read_document(&path)).await
    }

    async fn save_progress(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let path = self.path.clone();
        let mut bytes = serde_json::to_vec_pretty(record)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        bytes.push(b'\n');
        run_blocking(move || {
            atomic::write_atomic(&path, &bytes).map_err(|err| StorageError::Io(err.to_string()))?;
            debug!(path = %path.display(), "progress document saved");
            Ok(())
        })
        .await
    }

    async fn clear_progress(&self) -> Result<(), StorageError> {
        let path = self.path.clone();
        run_blocking(move || match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "progress document removed");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::Io(err.to_string())),
        })
        .await
    }
}

fn read_document(path: &Path) -> Result<Option<ProgressRecord>, StorageError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(StorageError::Io(err.to_string())),
    };
    let record = serde_json::from_str(&content)
        .map_err(|err| StorageError::Serialization(err.to_string()))?;
    Ok(Some(record))
}

async fn run_blocking<T, F>(task: F) -> Result<T, StorageError>
where
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| StorageError::Io(err.to_string()))?
}

impl Storage {
    /// Build a `Storage` backed by a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `JsonInitError` if the data directory cannot be prepared.
    pub fn json_file(path: impl Into<PathBuf>) -> Result<Self, JsonInitError> {
        let repo = JsonFileRepository::open(path)?;
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Ok(Self { progress })
    }
}
