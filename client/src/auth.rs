use std::sync::Arc;

use hyper::Method;
use tracing::{info, warn};

use shared::types::{LoginData, LoginResponse, RegistrationData, RegistrationResponse, SessionUser};

use crate::error::ClientError;
use crate::gateway::{ApiGateway, Payload};
use crate::routes;
use crate::session::SessionStore;

/// Registration, login and logout.
///
/// This is the only writer of the session store; everything else reads.
pub struct AuthFlow {
    gateway: Arc<ApiGateway>,
    session: SessionStore,
}

impl AuthFlow {
    pub fn new(gateway: Arc<ApiGateway>, session: SessionStore) -> Self {
        Self { gateway, session }
    }

    /// Create an account.  Never touches the session — the user signs in
    /// afterwards.
    pub async fn register(
        &self,
        data: RegistrationData,
    ) -> Result<RegistrationResponse, ClientError> {
        if data.username.trim().is_empty()
            || data.email.trim().is_empty()
            || data.password.is_empty()
        {
            return Err(ClientError::Validation(
                "Please fill the form completely!".to_string(),
            ));
        }
        if !data.email.contains('@') {
            return Err(ClientError::Validation("Invalid email format".to_string()));
        }

        let body = serde_json::to_value(&data)
            .map_err(|e| ClientError::Unexpected(format!("Failed to encode registration: {e}")))?;
        let response = self
            .gateway
            .call(Method::POST, routes::REGISTER, Payload::Json(body), None)
            .await?;

        info!("Registered user {}", data.username);
        // The backend only guarantees the status; the body is best-effort.
        Ok(response.json().unwrap_or_default())
    }

    /// Sign in and persist the session.  Returns the profile the backend
    /// attached to the token.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser, ClientError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ClientError::Validation(
                "Please fill the form completely!".to_string(),
            ));
        }

        let body = serde_json::to_value(LoginData {
            email: email.to_string(),
            password: password.to_string(),
        })
        .map_err(|e| ClientError::Unexpected(format!("Failed to encode credentials: {e}")))?;

        let response = match self
            .gateway
            .call(Method::POST, routes::LOGIN, Payload::Json(body), None)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Login failed for {}: {}", email, e);
                return Err(e);
            }
        };

        let login: LoginResponse = response.json()?;
        self.session.login(login.token, login.user.clone());
        info!("Login succeeded for {}", email);
        Ok(login.user)
    }

    /// Drop the session.  Local only — the backend holds no revocable
    /// server-side session for this client.
    pub fn logout(&self) {
        self.session.logout();
    }
}
