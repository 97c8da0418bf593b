//! Error types for Zendesk Guide API operations.

use thiserror::Error;

/// Errors that can occur when talking to the Zendesk Guide API.
#[derive(Debug, Error)]
pub enum ZendeskError {
    /// Missing or invalid identity parameters; raised before any request.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Transport-level failure (connection, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body was not the JSON we expected.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The client's cancellation token fired before the request completed.
    #[error("Request cancelled")]
    Cancelled,
}

impl ZendeskError {
    /// Whether the API rejected our credentials.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }
}

/// Get a short error message suitable for display.
pub fn short_error_message(err: &ZendeskError) -> String {
    match err {
        ZendeskError::Config(msg) => format!("Config: {}", msg),
        ZendeskError::Http(_) => "Network error".to_string(),
        ZendeskError::Json(_) => "JSON parse error".to_string(),
        ZendeskError::Api { status, message } => {
            if message.chars().count() > 50 {
                let truncated: String = message.chars().take(47).collect();
                format!("HTTP {}: {}...", status, truncated)
            } else {
                format!("HTTP {}: {}", status, message)
            }
        }
        ZendeskError::Cancelled => "Cancelled".to_string(),
    }
}
