use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::identity::Identity;

use crate::http::api::client::{ApiRequest, ClientError};
use crate::http::{ApiError, Authenticated};
use crate::ServiceState;

#[derive(Debug, Clone, Default, Serialize, Deserialize, clap::Args)]
pub struct ListIdentitiesRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListIdentitiesResponse {
    pub ok: bool,
    pub identities: Vec<Identity>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Authenticated(caller): Authenticated,
) -> Result<Response, ApiError> {
    let identities = state.sync().list_identities(&caller).await?;

    Ok(Json(ListIdentitiesResponse {
        ok: true,
        identities,
    })
    .into_response())
}

impl ApiRequest for ListIdentitiesRequest {
    type Response = ListIdentitiesResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ClientError> {
        Ok(client.get(base_url.join("/admin/identities/list")?))
    }
}
