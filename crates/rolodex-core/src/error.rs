use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    /// The record backend failed, timed out, or returned something unreadable.
    #[error("Search unavailable: {0}")]
    SearchUnavailable(String),

    /// Durable client storage could not be read or written.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl Error {
    pub fn search_unavailable(reason: impl Into<String>) -> Self {
        Self::SearchUnavailable(reason.into())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::SearchUnavailable("request timed out".to_string())
        } else {
            Self::SearchUnavailable(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
