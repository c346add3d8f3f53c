use thiserror::Error;

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected response status: {status} at {url}")]
    Status { status: u16, url: String },
    #[error("news payload decoding error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("retrieval returned no items")]
    EmptyBatch,
    #[error("scheduler task failed: {0}")]
    Scheduler(#[from] tokio::task::JoinError),
}

impl NewsError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        NewsError::InvalidConfig(msg.into())
    }
}
