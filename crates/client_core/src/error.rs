use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid API base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("HTTP error! status: {}", .status.as_u16())]
    Remote { status: StatusCode },
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("failed to decode response body: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("stored history is malformed: {0}")]
    MalformedHistory(#[from] serde_json::Error),
    #[error("history index {index} out of range for {len} entries")]
    SelectionOutOfRange { index: usize, len: usize },
    #[error("history storage failure: {0:#}")]
    Storage(#[source] anyhow::Error),
}

impl ClientError {
    pub(crate) fn from_request(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err)
        } else {
            Self::Transport(err)
        }
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
