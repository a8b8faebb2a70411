#![forbid(unsafe_code)]

pub mod json;
pub mod repository;

pub use json::{JsonFileRepository, JsonInitError};
pub use repository::{InMemoryRepository, ProgressRepository, Storage, StorageError};
