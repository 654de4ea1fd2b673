use std::sync::Arc;

use hyper::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use shared::types::ImageUpload;
use shared::types::client_config::UploadConfig;

use crate::error::ClientError;
use crate::gateway::{ApiGateway, Payload};
use crate::multipart::MultipartForm;
use crate::routes;
use crate::session::SessionStore;
use crate::uploads::validate_upload;

/// Reply shape of `PUT /edit-user`.
#[derive(Debug, Default, Deserialize)]
struct ProfileUpdateResponse {
    #[serde(rename = "profileImage", default)]
    profile_image: Option<String>,
}

/// Profile-picture management for the signed-in user.
///
/// Successful changes are written through to the session store, so every
/// observer of the session sees the new image reference immediately.
pub struct ProfileManager {
    gateway: Arc<ApiGateway>,
    session: SessionStore,
    uploads: UploadConfig,
}

impl ProfileManager {
    pub fn new(gateway: Arc<ApiGateway>, session: SessionStore, uploads: UploadConfig) -> Self {
        Self {
            gateway,
            session,
            uploads,
        }
    }

    /// Upload a new profile picture.  Returns the server-side reference to
    /// the stored image.
    pub async fn upload_picture(&self, upload: ImageUpload) -> Result<Option<String>, ClientError> {
        validate_upload(&self.uploads, &upload)?;
        let token = self.session.token().ok_or(ClientError::AuthRequired)?;

        let form = MultipartForm::new().file(
            "profileImage",
            &upload.file_name,
            &upload.content_type,
            &upload.bytes,
        );

        let response = match self
            .gateway
            .call(
                Method::PUT,
                routes::EDIT_USER,
                Payload::Multipart(form),
                Some(&token),
            )
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Profile picture upload failed: {}", e);
                return Err(e);
            }
        };

        let updated: ProfileUpdateResponse = response.json().unwrap_or_default();
        info!(
            "Profile picture updated ({})",
            updated.profile_image.as_deref().unwrap_or("no reference")
        );

        let reference = updated.profile_image.clone();
        self.session
            .update_profile(|user| user.profile_image = reference);

        Ok(updated.profile_image)
    }

    /// Drop the stored profile picture, reverting to the default avatar.
    pub async fn remove_picture(&self) -> Result<(), ClientError> {
        let token = self.session.token().ok_or(ClientError::AuthRequired)?;

        match self
            .gateway
            .call(
                Method::PUT,
                routes::EDIT_USER,
                Payload::Json(json!({})),
                Some(&token),
            )
            .await
        {
            Ok(_) => {
                info!("Profile picture removed");
                self.session.update_profile(|user| user.profile_image = None);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to remove profile picture: {}", e);
                Err(e)
            }
        }
    }
}
