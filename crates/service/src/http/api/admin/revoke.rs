use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::identity::IdentityId;
use common::sync::identity_id_from_json;

use crate::http::api::client::{ApiRequest, ClientError};
use crate::http::{ApiError, Authenticated, JsonBody};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
#[serde(rename_all = "camelCase")]
pub struct RevokeIdentityRequest {
    /// Id of the identity to deactivate
    #[arg(long)]
    pub identity_id: IdentityId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokeIdentityResponse {
    pub ok: bool,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Authenticated(caller): Authenticated,
    body: JsonBody,
) -> Result<Response, ApiError> {
    let id = identity_id_from_json(body.field("identityId"));
    state.sync().revoke_identity(&caller, id).await?;

    Ok(Json(RevokeIdentityResponse { ok: true }).into_response())
}

impl ApiRequest for RevokeIdentityRequest {
    type Response = RevokeIdentityResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ClientError> {
        Ok(client
            .post(base_url.join("/admin/identities/revoke")?)
            .json(&self))
    }
}
