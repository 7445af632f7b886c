use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned {status}: {}", detail.as_deref().unwrap_or("no detail"))]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("{endpoint} returned an unexpected body: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("backend worker unavailable: {0}")]
    Unavailable(String),
}

impl ClientError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Transport { source, .. } if source.is_timeout())
    }
}
