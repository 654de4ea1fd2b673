use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Backend base URL, e.g. `http://127.0.0.1:3000`.  No trailing slash —
    /// request paths already start with one.
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionConfig {
    /// When set, the session (token + profile) is written through to this
    /// file on login/logout and can be restored at startup.  Absent means
    /// in-memory only.
    #[serde(default)]
    pub persist_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Maximum accepted image size in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_bytes: usize,
    /// Accepted image MIME types.
    #[serde(default = "default_allowed_types")]
    pub allowed_types: HashSet<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_upload_bytes(),
            allowed_types: default_allowed_types(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewConfig {
    /// Rows per page in paginated task views.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

// ---------------------------------------------------------------------------
// Serde defaults
// ---------------------------------------------------------------------------

pub fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}

pub fn default_allowed_types() -> HashSet<String> {
    ["image/jpeg", "image/png", "image/gif"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn default_page_size() -> usize {
    5
}
