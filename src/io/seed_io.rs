use std::fs;
use std::path::Path;

use super::ConfigError;
use crate::model::dataset::Dataset;

/// Load a seed dataset (`{"users": [...], "tasks": [...]}`) from a JSON file.
/// The file is only ever read.
pub fn load_dataset(path: &Path) -> Result<Dataset, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let dataset: Dataset = serde_json::from_str(&text)?;
    tracing::info!(
        path = %path.display(),
        users = dataset.users.len(),
        tasks = dataset.tasks.len(),
        "loaded seed dataset"
    );
    Ok(dataset)
}

/// The seed for a run: the file at `path` if given, else the built-in mock board.
pub fn dataset_or_mock(path: Option<&Path>) -> Result<Dataset, ConfigError> {
    match path {
        Some(p) => load_dataset(p),
        None => Ok(Dataset::mock()),
    }
}
