use thiserror::Error;

/// Errors produced while converting between raw counts and display strings.
#[derive(Debug, Error, PartialEq)]
pub enum CountError {
    #[error("invalid count display string: {0:?}")]
    InvalidDisplay(String),
    #[error("count must be numeric, got {0}")]
    NotNumeric(String),
    #[error("count must be a finite non-negative number, got {0}")]
    OutOfRange(f64),
}

#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("api error (code {code}): {message}")]
    Api { code: i64, message: String },
    #[error("response has no {0}")]
    MissingData(&'static str),
    #[error(transparent)]
    Count(#[from] CountError),
    #[error("tls error: {0}")]
    Tls(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CrawlerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
