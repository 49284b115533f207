use clap::Args;

use service::http::api::auth::whoami::{WhoamiRequest, WhoamiResponse};
use service::http::api::client::ClientError;

#[derive(Args, Debug, Clone)]
pub struct Whoami;

#[derive(Debug, thiserror::Error)]
pub enum WhoamiError {
    #[error("API error: {0}")]
    Api(#[from] ClientError),
}

#[async_trait::async_trait]
impl crate::op::Op for Whoami {
    type Error = WhoamiError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response: WhoamiResponse = ctx.client.call(WhoamiRequest).await?;
        let identity = response.identity;
        Ok(format!(
            "{} (id: {} | role: {} | since: {})",
            identity.name, identity.id, identity.role, identity.created_at
        ))
    }
}
