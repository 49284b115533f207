use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::op_log::{Cursor, Operation};

use crate::http::api::client::{ApiRequest, ClientError};
use crate::http::{ApiError, Authenticated};
use crate::ServiceState;

/// Query parameters as they arrive; parsing is lenient
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullQuery {
    pub since: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, clap::Args)]
pub struct PullRequest {
    /// Only return ops after this cursor
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long)]
    pub since: Option<Cursor>,

    /// Maximum number of ops to return
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullResponse {
    pub ok: bool,
    pub cursor: Cursor,
    pub ops: Vec<Operation>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Authenticated(identity): Authenticated,
    Query(query): Query<PullQuery>,
) -> Result<Response, ApiError> {
    let page = state
        .sync()
        .pull(query.since.as_deref(), query.limit.as_deref())
        .await?;

    tracing::debug!(
        identity_id = identity.id,
        cursor = page.cursor,
        count = page.operations.len(),
        "pull"
    );

    Ok(Json(PullResponse {
        ok: true,
        cursor: page.cursor,
        ops: page.operations,
    })
    .into_response())
}

impl ApiRequest for PullRequest {
    type Response = PullResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ClientError> {
        Ok(client.get(base_url.join("/sync/pull")?).query(&self))
    }
}
