use serde::{Deserialize, Serialize};

/// Body for `POST /register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationData {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Registration acknowledgement.  The backend only guarantees a 200 status;
/// both fields are best-effort.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationResponse {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
