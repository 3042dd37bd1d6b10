use thiserror::Error;

use crate::api::ApiError;

/// Failures surfaced to the rendering layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage write failed: {0}")]
    StorageWriteFailure(String),
}

impl DataError {
    /// Text shown in place of a table or detail panel when loading failed.
    pub fn empty_state_message(&self) -> String {
        match self {
            DataError::NotFound(_) => "Nothing found for this selection.".to_string(),
            DataError::DataUnavailable(msg) => format!("Data unavailable: {}", msg),
            DataError::StorageWriteFailure(msg) => format!("Could not save: {}", msg),
        }
    }
}

impl From<ApiError> for DataError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound(msg) => DataError::NotFound(msg),
            other => DataError::DataUnavailable(other.to_string()),
        }
    }
}

/// Errors from the durable key-value storage.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<StorageError> for DataError {
    fn from(err: StorageError) -> Self {
        DataError::StorageWriteFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_not_found_maps_to_not_found() {
        let err: DataError = ApiError::NotFound("Race not found".to_string()).into();
        assert_eq!(err, DataError::NotFound("Race not found".to_string()));
    }

    #[test]
    fn test_other_api_errors_map_to_unavailable() {
        let err: DataError = ApiError::ServerError("boom".to_string()).into();
        assert!(matches!(err, DataError::DataUnavailable(_)));

        let err: DataError = ApiError::InvalidResponse("not json".to_string()).into();
        assert!(matches!(err, DataError::DataUnavailable(_)));
    }

    #[test]
    fn test_empty_state_message() {
        assert_eq!(
            DataError::NotFound("x".to_string()).empty_state_message(),
            "Nothing found for this selection."
        );
        assert!(DataError::DataUnavailable("timeout".to_string())
            .empty_state_message()
            .contains("timeout"));
    }
}
