use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use common::identity::Identity;
use common::policy::Permission;

use crate::http::api::client::{ApiRequest, ClientError};
use crate::http::{ApiError, Authenticated, JsonBody};
use crate::{ServiceState, SqliteSync};

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct CreateIdentityRequest {
    /// Display name for the new identity
    #[arg(long)]
    pub name: String,

    /// Either `staff` (the default) or `admin`
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIdentityResponse {
    pub ok: bool,
    /// Shown exactly once; only its digest is kept
    pub credential: String,
    pub identity: Identity,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Authenticated(caller): Authenticated,
    body: JsonBody,
) -> Result<Response, ApiError> {
    // a non-admin learns nothing about the body
    SqliteSync::require(&caller, Permission::Privileged)?;

    let name = body.field("name").and_then(Value::as_str).unwrap_or_default();
    let role = match body.field("role") {
        None => None,
        Some(Value::String(role)) => Some(role.as_str()),
        Some(_) => return Err(ApiError::invalid_request("invalid role")),
    };

    let created = state.sync().create_identity(&caller, name, role).await?;

    Ok(Json(CreateIdentityResponse {
        ok: true,
        credential: created.credential.into_inner(),
        identity: created.identity,
    })
    .into_response())
}

impl ApiRequest for CreateIdentityRequest {
    type Response = CreateIdentityResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ClientError> {
        Ok(client
            .post(base_url.join("/admin/identities/create")?)
            .json(&self))
    }
}
