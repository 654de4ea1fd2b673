use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Task status
// ---------------------------------------------------------------------------

/// Task lifecycle status.
///
/// The canonical wire values are `"pending"`, `"inProgress"` and
/// `"completed"`.  Older records may still carry free-form strings such as
/// `"In Progress"`; those are preserved verbatim as [`TaskStatus::Legacy`]
/// so the admin views can display and filter on them without re-validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    /// Any other string observed on the wire — display-only.
    Legacy(String),
}

impl TaskStatus {
    /// The exact string this status serializes to.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "inProgress",
            Self::Completed => "completed",
            Self::Legacy(s) => s,
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => Self::Pending,
            "inProgress" => Self::InProgress,
            "completed" => Self::Completed,
            _ => Self::Legacy(s),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Task record
// ---------------------------------------------------------------------------

/// A task as stored by the backend.
///
/// `id` is server-assigned and immutable; the wire name is `_id` (Mongo
/// style) but plain `id` is accepted on input.  `username` identifies the
/// owning user and is set by the server from the auth context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    /// Completion percentage in `0..=100`.
    #[serde(default)]
    pub progress: u8,
    /// Server-side reference to an uploaded image, when one exists.
    #[serde(rename = "taskImage", default, skip_serializing_if = "Option::is_none")]
    pub task_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Drafts (client → server)
// ---------------------------------------------------------------------------

/// A new image selected for upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    /// MIME type as reported by the picker, e.g. `image/png`.
    pub content_type: String,
    pub bytes: Bytes,
}

/// The image field of a draft.
///
/// Replaces the ambiguous empty-string / URL / file sentinels with an
/// explicit variant per state.
#[derive(Debug, Clone, Default)]
pub enum TaskImage {
    /// No image attached and none ever was.
    #[default]
    None,
    /// Keep the image reference already stored on the server.
    Existing(String),
    /// Attach a freshly selected file.
    Upload(ImageUpload),
    /// Drop the previously stored image.
    Removed,
}

impl TaskImage {
    /// The upload payload, when this draft carries a new file.
    pub fn upload(&self) -> Option<&ImageUpload> {
        match self {
            Self::Upload(u) => Some(u),
            _ => None,
        }
    }
}

/// Client-side draft for creating or fully replacing a task.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub progress: u8,
    pub image: TaskImage,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }
}
