use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Request};
use http::header::AUTHORIZATION;
use http::request::Parts;
use serde_json::Value;

use common::identity::Identity;
use common::sync::bearer_credential;

use super::ApiError;
use crate::ServiceState;

/// The identity behind the request's bearer credential
///
/// Resolved fresh on every request; nothing about it is cached.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Identity);

#[async_trait]
impl FromRequestParts<ServiceState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        let credential = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_credential);

        let identity = state.sync().resolve(credential).await?;
        Ok(Authenticated(identity))
    }
}

/// A lenient JSON body
///
/// An empty body reads as `null`. Anything that is not valid JSON is an
/// `invalid_request`, never axum's own rejection text.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

impl JsonBody {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }
}

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = axum::response::Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        use axum::response::IntoResponse;

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(Value::Null));
        }

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| ApiError::invalid_request(format!("invalid json: {}", e)).into_response())
    }
}
