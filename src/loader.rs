//! Model and configuration loading.

use std::path::Path;

use crate::config::ConverterConfig;
use crate::error::ConvertError;
use crate::model::Model;

/// Load a model from its JSON form on disk.
///
/// # Errors
///
/// Returns `ConvertError::FileNotFound` if the file doesn't exist,
/// `ConvertError::ReadError` if it can't be read, or
/// `ConvertError::InvalidJson` if it isn't valid JSON.
pub fn load_model(path: &Path) -> Result<Model, ConvertError> {
    load_model_str(&read_file(path)?)
}

/// Load a model from a JSON string.
pub fn load_model_str(content: &str) -> Result<Model, ConvertError> {
    serde_json::from_str(content).map_err(|source| ConvertError::InvalidJson { source })
}

/// Load converter configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<ConverterConfig, ConvertError> {
    serde_json::from_str(&read_file(path)?)
        .map_err(|source| ConvertError::InvalidJson { source })
}

fn read_file(path: &Path) -> Result<String, ConvertError> {
    if !path.exists() {
        return Err(ConvertError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    std::fs::read_to_string(path).map_err(|source| ConvertError::ReadError {
        path: path.to_path_buf(),
        source,
    })
}
