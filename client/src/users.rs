use std::sync::Arc;

use hyper::Method;
use tracing::{info, warn};

use shared::types::User;

use crate::error::ClientError;
use crate::gateway::{ApiGateway, Payload};
use crate::routes;
use crate::session::SessionStore;

/// Admin-side user collection: read, search, delete.
///
/// Users are never created or edited through this client.  Same ownership
/// and failure contract as the task manager: the base list only changes on
/// confirmed success, and a failed load leaves the previous list intact.
pub struct UserManager {
    gateway: Arc<ApiGateway>,
    session: SessionStore,
    base: Vec<User>,
    last_error: Option<String>,
}

impl UserManager {
    pub fn new(gateway: Arc<ApiGateway>, session: SessionStore) -> Self {
        Self {
            gateway,
            session,
            base: Vec::new(),
            last_error: None,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.base
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Wholesale refresh; previous list untouched on failure.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        match self.fetch_base().await {
            Ok(users) => {
                info!("Loaded {} users", users.len());
                self.base = users;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load users: {}", e);
                self.last_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    async fn fetch_base(&self) -> Result<Vec<User>, ClientError> {
        let token = self.bearer()?;
        let response = self
            .gateway
            .call(Method::GET, routes::ALL_USERS, Payload::Empty, Some(&token))
            .await?;
        response.json()
    }

    /// Delete a user; the row is filtered out of the base list only after
    /// the backend confirms.
    pub async fn remove(&mut self, id: &str) -> Result<(), ClientError> {
        let token = self.bearer()?;

        match self
            .gateway
            .call(
                Method::DELETE,
                &routes::remove_user(id),
                Payload::Empty,
                Some(&token),
            )
            .await
        {
            Ok(_) => {
                self.base.retain(|u| u.id != id);
                info!("User {} removed", id);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to remove user {}: {}", id, e);
                Err(e)
            }
        }
    }

    /// Case-insensitive substring match against email, name and username.
    /// All three fields are checked — the display fallback chain is a
    /// rendering concern, not a filtering one.
    pub fn apply_filter(&self, term: &str) -> Vec<&User> {
        let needle = term.to_lowercase();
        self.base
            .iter()
            .filter(|user| {
                needle.is_empty()
                    || user.email.to_lowercase().contains(&needle)
                    || user
                        .name
                        .as_ref()
                        .is_some_and(|n| n.to_lowercase().contains(&needle))
                    || user
                        .username
                        .as_ref()
                        .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .collect()
    }

    fn bearer(&self) -> Result<String, ClientError> {
        self.session.token().ok_or(ClientError::AuthRequired)
    }
}
