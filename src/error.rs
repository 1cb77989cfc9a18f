use thiserror::Error;

pub type Result<T> = std::result::Result<T, AtlasError>;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("{source_name} source failed: {message}")]
    SourceFetch {
        source_name: &'static str,
        message: String,
    },

    #[error("{source_name} source timed out after {timeout_ms}ms")]
    SourceTimeout {
        source_name: &'static str,
        timeout_ms: u64,
    },

    #[error("No group rendered at row {0}")]
    NoSuchGroup(usize),

    #[error("Failed to open {url}: {message}")]
    OpenFailed { url: String, message: String },

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Error: {0}")]
    Generic(String),
}

impl AtlasError {
    pub fn source_fetch(source_name: &'static str, message: impl Into<String>) -> Self {
        AtlasError::SourceFetch {
            source_name,
            message: message.into(),
        }
    }
}

impl From<String> for AtlasError {
    fn from(error: String) -> Self {
        AtlasError::Generic(error)
    }
}

impl From<&str> for AtlasError {
    fn from(error: &str) -> Self {
        AtlasError::Generic(error.to_string())
    }
}
