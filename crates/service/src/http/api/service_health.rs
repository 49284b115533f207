use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::http::api::client::{ApiRequest, ClientError};

pub const SERVICE_NAME: &str = "rollbook-sync";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
}

/// Unauthenticated probe used by clients before they try to sync
pub async fn handler() -> Response {
    Json(HealthResponse {
        ok: true,
        service: SERVICE_NAME.to_string(),
    })
    .into_response()
}

impl ApiRequest for HealthRequest {
    type Response = HealthResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ClientError> {
        Ok(client.get(base_url.join("/health")?))
    }
}
