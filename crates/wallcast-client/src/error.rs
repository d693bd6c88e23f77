use thiserror::Error;

/// Errors from the record store client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connect, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server returned {status}")]
    Api { status: u16 },

    /// The response body did not match the expected shape.
    #[error("Unexpected response payload: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
