use serde::Deserialize;

/// Error envelope the backend attaches to non-2xx responses.
///
/// Parsed leniently: a missing body, a non-JSON body, or a JSON body without
/// a `message` key all degrade to `None` rather than failing the caller —
/// the HTTP status is the authoritative signal.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Best-effort extraction of the server-provided message.
    pub fn extract_message(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|e| e.message)
            .filter(|m| !m.is_empty())
    }
}
