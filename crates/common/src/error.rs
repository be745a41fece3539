use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Exchange API error: {0}")]
    Exchange(String),

    #[error("Rate limited by exchange: {0}")]
    RateLimited(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Errors that should clear up on their own by the next cycle.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Exchange(_) | Error::RateLimited(_) | Error::Http(_) | Error::Json(_)
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
