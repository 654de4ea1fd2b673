use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// The two roles the backend issues.
///
/// Wire casing is uneven (`"admin"` lowercase, `"User"` capitalised) and is
/// part of the compatibility surface — do not normalise it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "User")]
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "User"),
        }
    }
}

// ---------------------------------------------------------------------------
// User rows (admin listing)
// ---------------------------------------------------------------------------

/// A user row as returned by the admin user listing.
///
/// Read-only on this client except for delete.  `name` and `username` are
/// both optional on the wire; use [`User::display_name`] for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(rename = "profileImage", default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

impl User {
    /// Display fallback chain: name, then username, then a placeholder.
    /// Filtering checks all fields independently — this is rendering only.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("N/A")
    }
}

// ---------------------------------------------------------------------------
// Session profile
// ---------------------------------------------------------------------------

/// The profile persisted alongside the bearer token for the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(rename = "profileImage", default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}
