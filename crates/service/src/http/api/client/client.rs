use reqwest::{header::HeaderMap, header::HeaderValue, Client};
use url::Url;

use super::error::ClientError;
use super::ApiRequest;
use crate::http::ErrorBody;

#[derive(Clone)]
pub struct ApiClient {
    pub remote: Url,
    client: Client,
    credential: Option<String>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("remote", &self.remote)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ApiClient {
    pub fn new(remote: &Url) -> Result<Self, ClientError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(default_headers).build()?;

        Ok(Self {
            remote: remote.clone(),
            client,
            credential: None,
        })
    }

    /// Send this bearer credential with every request
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub async fn call<T: ApiRequest>(&self, request: T) -> Result<T::Response, ClientError> {
        let mut request_builder = request.build_request(&self.remote, &self.client)?;
        if let Some(credential) = &self.credential {
            request_builder = request_builder.bearer_auth(credential);
        }
        let response = request_builder.send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T::Response>().await?);
        }

        let text = response.text().await?;
        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => Err(ClientError::Api {
                status,
                code: body.error,
                message: body.message,
            }),
            Err(_) => Err(ClientError::HttpStatus(status, text)),
        }
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }

    /// The underlying HTTP client, for probes outside the typed API
    pub fn http_client(&self) -> &Client {
        &self.client
    }
}
