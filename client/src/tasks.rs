use std::sync::Arc;

use hyper::Method;
use serde_json::json;
use tracing::{info, warn};

use shared::types::client_config::UploadConfig;
use shared::types::{Task, TaskDraft, TaskImage};

use crate::error::ClientError;
use crate::gateway::{ApiGateway, Payload};
use crate::multipart::MultipartForm;
use crate::routes;
use crate::session::SessionStore;
use crate::uploads::validate_upload;
use crate::view::{self, TaskQuery, TaskView};

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// Which task set a manager owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    /// The signed-in user's own tasks (`/all-task`).
    Mine,
    /// Every task in the system — admin console (`/all-tasks`).
    All,
}

impl TaskScope {
    fn load_path(self) -> &'static str {
        match self {
            Self::Mine => routes::ALL_TASK,
            Self::All => routes::ALL_TASKS,
        }
    }
}

// ---------------------------------------------------------------------------
// Manager
// ---------------------------------------------------------------------------

/// Owns the base task list and every mutation against it.
///
/// Each task fetched here belongs to this manager alone; views are handed
/// out as recomputed projections, never as references into shared state.
/// All operations take `&mut self`, so two loads can never overlap on one
/// manager — wrap the manager in a lock before sharing it across tasks and
/// the same single-writer discipline carries over unchanged.
pub struct TaskManager {
    gateway: Arc<ApiGateway>,
    session: SessionStore,
    uploads: UploadConfig,
    scope: TaskScope,
    base: Vec<Task>,
    last_error: Option<String>,
}

impl TaskManager {
    pub fn new(
        gateway: Arc<ApiGateway>,
        session: SessionStore,
        uploads: UploadConfig,
        scope: TaskScope,
    ) -> Self {
        Self {
            gateway,
            session,
            uploads,
            scope,
            base: Vec::new(),
            last_error: None,
        }
    }

    /// The base list as of the last successful [`TaskManager::load`],
    /// including confirmed mutations since.
    pub fn tasks(&self) -> &[Task] {
        &self.base
    }

    /// Banner text from the last failed load, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Recompute a derived view from the full base list.
    pub fn view(&self, query: &TaskQuery) -> TaskView {
        view::apply_view(&self.base, query)
    }

    /// Wholesale refresh of the base list.
    ///
    /// On any failure the previous list stays exactly as it was — no
    /// partial merge — and the error is kept for the banner.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        match self.fetch_base().await {
            Ok(tasks) => {
                info!("Loaded {} tasks ({:?} scope)", tasks.len(), self.scope);
                self.base = tasks;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load tasks: {}", e);
                self.last_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    async fn fetch_base(&self) -> Result<Vec<Task>, ClientError> {
        let token = self.bearer()?;
        let response = self
            .gateway
            .call(
                Method::GET,
                self.scope.load_path(),
                Payload::Empty,
                Some(&token),
            )
            .await?;
        response.json()
    }

    /// Create a task.
    ///
    /// Validation failures never reach the network.  On success the
    /// server-returned record is appended to the base list (the server
    /// assigns the id, so there is nothing to insert optimistically); the
    /// new row finds its sorted position on the next view recomputation.
    pub async fn add(&mut self, draft: TaskDraft) -> Result<Task, ClientError> {
        self.validate_draft(&draft)?;
        let token = self.bearer()?;

        match self
            .gateway
            .call(
                Method::POST,
                routes::ADD_TASK,
                draft_payload(&draft),
                Some(&token),
            )
            .await
            .and_then(|r| r.json::<Task>())
        {
            Ok(task) => {
                info!("Task {} created", task.id);
                self.base.push(task.clone());
                Ok(task)
            }
            Err(e) => {
                warn!("Failed to add task: {}", e);
                Err(e)
            }
        }
    }

    /// Full-record replace of an existing task.
    ///
    /// Does not touch the base list; refresh via [`TaskManager::load`] or
    /// [`TaskManager::replace_local`] with the returned record.
    pub async fn update(&mut self, id: &str, draft: TaskDraft) -> Result<Task, ClientError> {
        self.validate_draft(&draft)?;
        let token = self.bearer()?;

        match self
            .gateway
            .call(
                Method::PUT,
                &routes::edit_task(id),
                draft_payload(&draft),
                Some(&token),
            )
            .await
            .and_then(|r| r.json::<Task>())
        {
            Ok(task) => {
                info!("Task {} updated", id);
                Ok(task)
            }
            Err(e) => {
                warn!("Failed to update task {}: {}", id, e);
                Err(e)
            }
        }
    }

    /// Swap the matching record in the base list.  No-op when the id is
    /// unknown (e.g. the list was refreshed in between).
    pub fn replace_local(&mut self, task: Task) {
        if let Some(slot) = self.base.iter_mut().find(|t| t.id == task.id) {
            *slot = task;
        }
    }

    /// Delete a task.  The record leaves the base list only after the
    /// backend confirms with a success status; on failure the list stays
    /// as fetched.
    pub async fn remove(&mut self, id: &str) -> Result<(), ClientError> {
        let token = self.bearer()?;

        match self
            .gateway
            .call(
                Method::DELETE,
                &routes::delete_task(id),
                Payload::Empty,
                Some(&token),
            )
            .await
        {
            Ok(_) => {
                self.base.retain(|t| t.id != id);
                info!("Task {} removed", id);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to remove task {}: {}", id, e);
                Err(e)
            }
        }
    }

    /// Fetch one record fresh from the backend (edit-page prefetch).
    pub async fn fetch_one(&self, id: &str) -> Result<Task, ClientError> {
        let token = self.bearer()?;
        let response = self
            .gateway
            .call(Method::GET, &routes::task(id), Payload::Empty, Some(&token))
            .await?;
        response.json()
    }

    fn bearer(&self) -> Result<String, ClientError> {
        self.session.token().ok_or(ClientError::AuthRequired)
    }

    fn validate_draft(&self, draft: &TaskDraft) -> Result<(), ClientError> {
        if draft.title.trim().is_empty() || draft.description.trim().is_empty() {
            return Err(ClientError::Validation(
                "Please fill the task name and description!".to_string(),
            ));
        }
        if draft.progress > 100 {
            return Err(ClientError::Validation(
                "Progress must be between 0 and 100".to_string(),
            ));
        }
        if let Some(upload) = draft.image.upload() {
            validate_upload(&self.uploads, upload)?;
        }
        Ok(())
    }
}

/// Encode a draft for the wire: multipart when a new file rides along,
/// JSON otherwise.  The image variants map onto the backend's sentinels in
/// exactly one place — `Existing` resends the stored reference, `Removed`
/// sends the empty string the backend treats as "clear".
fn draft_payload(draft: &TaskDraft) -> Payload {
    match &draft.image {
        TaskImage::Upload(upload) => Payload::Multipart(
            MultipartForm::new()
                .text("title", draft.title.trim())
                .text("description", draft.description.trim())
                .text("status", draft.status.as_str())
                .text("progress", &draft.progress.to_string())
                .file(
                    "taskImage",
                    &upload.file_name,
                    &upload.content_type,
                    &upload.bytes,
                ),
        ),
        image => {
            let mut body = json!({
                "title": draft.title.trim(),
                "description": draft.description.trim(),
                "status": draft.status.as_str(),
                "progress": draft.progress,
            });
            match image {
                TaskImage::Existing(reference) => body["taskImage"] = json!(reference),
                TaskImage::Removed => body["taskImage"] = json!(""),
                _ => {}
            }
            Payload::Json(body)
        }
    }
}
