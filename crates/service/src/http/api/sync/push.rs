use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::api::client::{ApiRequest, ClientError};
use crate::http::{ApiError, Authenticated, JsonBody};
use crate::ServiceState;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushRequest {
    pub ops: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushResponse {
    pub ok: bool,
    pub accepted: u64,
    pub rejected: u64,
}

/// Pull the `ops` list out of a push body
///
/// A missing body, a body without `ops`, or `ops: null` is an empty push.
fn ops_from_body(body: JsonBody) -> Result<Vec<Value>, ApiError> {
    match body.0 {
        Value::Object(mut fields) => match fields.remove("ops") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(ops)) => Ok(ops),
            Some(_) => Err(ApiError::invalid_request("ops must be a list")),
        },
        _ => Ok(Vec::new()),
    }
}

pub async fn handler(
    State(state): State<ServiceState>,
    Authenticated(identity): Authenticated,
    body: JsonBody,
) -> Result<Response, ApiError> {
    let ops = ops_from_body(body)?;
    let summary = state.sync().push(&identity, ops).await?;

    Ok(Json(PushResponse {
        ok: true,
        accepted: summary.accepted,
        rejected: summary.rejected,
    })
    .into_response())
}

impl ApiRequest for PushRequest {
    type Response = PushResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ClientError> {
        Ok(client.post(base_url.join("/sync/push")?).json(&self))
    }
}
