/// Library file errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    /// Library file is well-formed JSON but inconsistent
    #[error("Invalid library: {0}")]
    InvalidLibrary(String),

    #[error("Malformed library file: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidLibrary(msg.into())
    }
}

// Store failures reach the playback core as plain storage errors
impl From<StorageError> for melody_core::MelodyError {
    fn from(err: StorageError) -> Self {
        melody_core::MelodyError::storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use melody_core::MelodyError;

    #[test]
    fn converts_into_core_storage_error() {
        let err: MelodyError = StorageError::invalid("duplicate track id t1").into();
        assert!(matches!(err, MelodyError::Storage(_)));
        assert!(err.to_string().contains("duplicate track id t1"));
    }
}
