use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    /// The server answered with its error body
    #[error("{status}: {code}")]
    Api {
        status: StatusCode,
        code: String,
        message: Option<String>,
    },
    /// The server answered with something that is not an error body
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
}

impl ClientError {
    /// The server's error code, if it sent one
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}
