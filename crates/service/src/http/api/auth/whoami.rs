use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use common::identity::{Identity, IdentityId, Role};

use crate::http::api::client::{ApiRequest, ClientError};
use crate::http::Authenticated;

#[derive(Debug, Clone, Default, Serialize, Deserialize, clap::Args)]
pub struct WhoamiRequest;

/// The caller's own identity, without the active flag (it is always true here)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoamiIdentity {
    pub id: IdentityId,
    pub name: String,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Identity> for WhoamiIdentity {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id,
            name: identity.name,
            role: identity.role,
            created_at: identity.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhoamiResponse {
    pub ok: bool,
    pub identity: WhoamiIdentity,
}

pub async fn handler(Authenticated(identity): Authenticated) -> Response {
    tracing::debug!(identity_id = identity.id, "whoami");
    Json(WhoamiResponse {
        ok: true,
        identity: identity.into(),
    })
    .into_response()
}

impl ApiRequest for WhoamiRequest {
    type Response = WhoamiResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ClientError> {
        Ok(client.get(base_url.join("/auth/whoami")?))
    }
}
