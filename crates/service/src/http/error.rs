use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use common::sync::SyncError;

/// The JSON shape of every failed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn new(error: &str, message: Option<String>) -> Self {
        Self {
            ok: false,
            error: error.to_string(),
            message,
        }
    }
}

/// A sync failure on its way out as an HTTP response
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub SyncError);

impl ApiError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self(SyncError::InvalidRequest(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        match self.0 {
            SyncError::MissingCredential => StatusCode::UNAUTHORIZED,
            SyncError::InvalidCredential | SyncError::Forbidden => StatusCode::FORBIDDEN,
            SyncError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            SyncError::NotFound(_) => StatusCode::NOT_FOUND,
            SyncError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self.0 {
            SyncError::MissingCredential => "missing_credential",
            SyncError::InvalidCredential => "invalid_credential",
            SyncError::Forbidden => "forbidden",
            SyncError::InvalidRequest(_) => "invalid_request",
            SyncError::NotFound(_) => "not_found",
            SyncError::Storage(_) => "server_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = match self.0 {
            SyncError::InvalidRequest(msg) | SyncError::NotFound(msg) => Some(msg),
            SyncError::Storage(detail) => {
                tracing::error!(error = %detail, "request failed on storage");
                None
            }
            _ => None,
        };

        (status, Json(ErrorBody::new(code, message))).into_response()
    }
}
