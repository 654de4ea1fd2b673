use http::StatusCode;
use thiserror::Error;

/// Failure taxonomy for every client-core operation.
///
/// `Validation` is resolved locally and never reaches the network layer;
/// everything else surfaces to the presentation layer as a single
/// human-readable message via [`ClientError::user_message`].  The core never
/// retries on its own.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Rejected locally before any request was issued.
    #[error("{0}")]
    Validation(String),

    /// No bearer token in the session store.
    #[error("Authentication required")]
    AuthRequired,

    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Network(String),

    /// The server responded with a non-success status.
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("request failed"))]
    Http {
        status: StatusCode,
        /// Server-provided message, when the error body carried one.
        message: Option<String>,
    },

    /// Anything that fits none of the categories above (malformed bodies,
    /// request construction failures).
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ClientError {
    /// The one string shown in error banners and alerts.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::AuthRequired => "You need to be logged in to do that".to_string(),
            Self::Network(_) => "Could not reach the server. Please try again.".to_string(),
            Self::Http {
                message: Some(msg), ..
            } => msg.clone(),
            Self::Http { status, .. } => format!("Request failed with status {}", status.as_u16()),
            Self::Unexpected(_) => "An unexpected error occurred".to_string(),
        }
    }

    pub fn is_auth_required(&self) -> bool {
        matches!(self, Self::AuthRequired)
    }
}
