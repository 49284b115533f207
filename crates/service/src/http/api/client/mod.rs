//! Typed client for the sync API, used by the CLI and the tests

mod client;
mod error;

pub use client::ApiClient;
pub use error::ClientError;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

/// A request that knows how to build itself and what it returns
pub trait ApiRequest {
    type Response: DeserializeOwned;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ClientError>;
}
