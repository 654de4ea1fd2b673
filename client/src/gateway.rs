use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, StatusCode, header};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use shared::types::ErrorBody;

use crate::error::ClientError;
use crate::multipart::MultipartForm;

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// The request body, which decides the content type.
///
/// JSON is the default; multipart bodies carry their own boundary content
/// type and never get a JSON content type on top.
pub enum Payload {
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// The one place HTTP happens.
///
/// Both transport failures and HTTP error statuses come back through the
/// `Err` arm as a [`ClientError`] — callers never see a panic or a raw hyper
/// error, and an expected 4xx/5xx is never confused with a dead network.
/// No retries, no default headers beyond the content type.
pub struct ApiGateway {
    http: Client<HttpConnector, Full<Bytes>>,
    base_url: String,
}

impl ApiGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::builder(TokioExecutor::new()).build_http(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a single request and fold the outcome into a `Result`.
    ///
    /// `bearer` is attached as `Authorization: Bearer <token>` when present.
    /// Idempotency is the caller's concern.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        let uri = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, uri);

        let mut builder = Request::builder().method(method.clone()).uri(&uri);

        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match payload {
            Payload::Empty => builder.body(Full::new(Bytes::new())),
            Payload::Json(value) => {
                let body = serde_json::to_vec(&value).map_err(|e| {
                    ClientError::Unexpected(format!("Failed to serialize request body: {e}"))
                })?;
                builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Full::new(Bytes::from(body)))
            }
            Payload::Multipart(form) => {
                let content_type = form.content_type();
                builder
                    .header(header::CONTENT_TYPE, content_type)
                    .body(Full::new(form.into_body()))
            }
        }
        .map_err(|e| ClientError::Unexpected(format!("Failed to build request: {e}")))?;

        let response = match self.http.request(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("{} {} produced no response: {}", method, uri, e);
                return Err(ClientError::Network(e.to_string()));
            }
        };

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| ClientError::Unexpected(format!("Failed to read response body: {e}")))?
            .to_bytes();

        if status.is_success() {
            Ok(ApiResponse { status, body })
        } else {
            let message = ErrorBody::extract_message(&body);
            warn!(
                "{} {} -> {} ({})",
                method,
                uri,
                status,
                message.as_deref().unwrap_or("no server message")
            );
            Err(ClientError::Http { status, message })
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// A successful (2xx) response.
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl ApiResponse {
    /// Deserialize the body, mapping malformed payloads to
    /// [`ClientError::Unexpected`].
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ClientError::Unexpected(format!("Malformed response body: {e}")))
    }
}
