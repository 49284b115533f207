use std::error::Error;
use std::path::PathBuf;

use url::Url;

use service::http::api::client::{ApiClient, ClientError};

use crate::state::AppState;

const FALLBACK_REMOTE: &str = "http://localhost:8787";

/// Resolve the remote URL for the API client.
///
/// Priority: explicit `--remote` flag > config file `listen_addr` port > 8787.
pub fn resolve_remote(explicit: Option<Url>, config_path: Option<PathBuf>) -> Result<Url, url::ParseError> {
    if let Some(url) = explicit {
        return Ok(url);
    }
    if let Ok(state) = AppState::load(config_path) {
        if let Ok(url) = Url::parse(&format!(
            "http://localhost:{}",
            state.config.listen_addr.port()
        )) {
            return Ok(url);
        }
    }
    Url::parse(FALLBACK_REMOTE)
}

#[derive(Clone, Debug)]
pub struct OpContext {
    /// API client, carrying the bearer credential when one was given
    pub client: ApiClient,
    /// Optional custom config path (defaults to ~/.rollbook)
    pub config_path: Option<PathBuf>,
}

impl OpContext {
    pub fn new(
        remote: Url,
        config_path: Option<PathBuf>,
        credential: Option<String>,
    ) -> Result<Self, ClientError> {
        let client = ApiClient::new(&remote)?;
        let client = match credential {
            Some(credential) => client.with_credential(credential),
            None => client,
        };

        Ok(Self {
            client,
            config_path,
        })
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_remote_explicit_wins() {
        let explicit = Url::parse("http://example.com:9999").unwrap();
        let result = resolve_remote(Some(explicit.clone()), None).unwrap();
        assert_eq!(result, explicit);
    }

    #[test]
    fn test_resolve_remote_falls_back_to_default() {
        let result = resolve_remote(None, Some(PathBuf::from("/nonexistent"))).unwrap();
        assert_eq!(result.as_str(), "http://localhost:8787/");
    }

    #[test]
    fn test_resolve_remote_uses_config_port() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = crate::state::AppConfig::default();
        config.listen_addr = "127.0.0.1:9100".parse().unwrap();
        let state = AppState::init(Some(dir.path().to_path_buf()), Some(config)).unwrap();
        std::fs::write(&state.db_path, "").unwrap();

        let result = resolve_remote(None, Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(result.port(), Some(9100));
    }
}
