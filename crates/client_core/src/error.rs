use reqwest::StatusCode;
use thiserror::Error;

/// Why a single gateway call did not produce a usable response.
///
/// Controllers only ever show the `Display` text; the variants exist so
/// callers and tests can tell the failure kinds apart.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never reached the service or no response came back.
    #[error("{0}")]
    Transport(String),
    /// The service answered with a non-2xx status.
    #[error("{status} {status_text}")]
    Api { status: u16, status_text: String },
    #[error("invalid response body: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("invalid request body: {0}")]
    Encode(#[source] serde_json::Error),
}

impl GatewayError {
    pub fn api(status: StatusCode) -> Self {
        Self::Api {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
