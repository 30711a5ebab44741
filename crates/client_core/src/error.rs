use reqwest::Method;
use shared::error::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{method} {url} failed: {message}")]
    Transport {
        method: Method,
        url: String,
        message: String,
    },
    #[error("{method} {url} returned status {status}")]
    Status {
        method: Method,
        url: String,
        status: u16,
    },
    #[error("malformed response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("invalid resource url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("grid has not signaled readiness")]
    GridNotReady,
    #[error("csv export failed: {0}")]
    Export(#[from] csv::Error),
    #[error("csv export failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub(crate) fn from_reqwest(method: Method, url: &str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else {
            Self::Transport {
                method,
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}
