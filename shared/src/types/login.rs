use serde::{Deserialize, Serialize};

use crate::types::user::SessionUser;

// ---------------------------------------------------------------------------
// Login wire types
// ---------------------------------------------------------------------------

/// Body for `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}

/// Successful login payload: the bearer token plus the profile to persist
/// in the session store.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: SessionUser,
}
