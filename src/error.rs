/// Boxed error type returned by consumer-implemented stores.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Network/transport failure. Never converted into view state —
    /// propagates to the caller as-is.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the backend. `detail` holds the raw response
    /// body so callers can recover structured payloads (validation errors).
    #[error("{operation} failed with status {status}: {detail}")]
    Api {
        operation: &'static str,
        status: u16,
        detail: String,
    },

    /// Token store operation failed.
    #[error("Token store error: {0}")]
    Store(#[source] BoxError),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation declared in the client contract but not supported by
    /// the backend.
    #[error("{0} is not supported")]
    Unsupported(&'static str),
}

impl Error {
    /// HTTP status of an API rejection, if this is one.
    #[must_use]
    pub fn api_status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
