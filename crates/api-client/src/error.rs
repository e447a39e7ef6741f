use reqwest::StatusCode;

/// Errors surfaced by [`crate::ApiClient`] and [`crate::EventStream`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No usable credentials: the caller should send the user to login.
    #[error("not authenticated")]
    Unauthenticated,

    /// The server answered with a non-success status.
    #[error("{status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("credential store: {0}")]
    Credentials(#[from] std::io::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    /// Short text for user-facing alerts: the status code when there is one.
    pub fn summary(&self) -> String {
        match self {
            Self::Status { status, .. } => status.as_u16().to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
