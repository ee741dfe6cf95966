use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrialsError {
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status code {status} for URL: {url}. Response preview: {preview}")]
    HttpStatus {
        status: u16,
        url: String,
        preview: String,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("File error: {0}")]
    FileIo(#[from] std::io::Error),

    #[error("Workbook error for {}: {message}", .path.display())]
    Workbook { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Query encoding error: {0}")]
    Query(String),
}

impl TrialsError {
    /// HTTP status code, when the failure came from a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            TrialsError::HttpStatus { status, .. } => Some(*status),
            TrialsError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub(crate) fn workbook(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        TrialsError::Workbook {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrialsError>;
