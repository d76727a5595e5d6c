//! Error handling for the homedash backend.

/// A specialized `Result` type for homedash operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// The main error type for dashboard operations.
///
/// Every upstream failure ends up here; the web layer maps all variants to a
/// structured `{"error": ...}` body at a single boundary point.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Outbound HTTP request failed at the transport level
    #[error("request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream service returned a non-success status
    #[error("upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Authorization failed (expired grant, token refresh rejected)
    #[error("authorization error: {0}")]
    Auth(String),

    /// Configuration error (missing variables, unreadable credential file)
    #[error("configuration error: {0}")]
    Config(String),

    /// Web server error
    #[error("web server error: {0}")]
    WebServer(String),
}

impl ServiceError {
    /// Create a new upstream error
    pub fn upstream_error(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Create a new authorization error
    pub fn auth_error(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }
}
