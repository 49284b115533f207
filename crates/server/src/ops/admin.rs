use clap::{Args, Subcommand};

use service::http::api::admin::create::CreateIdentityResponse;
use service::http::api::admin::list::ListIdentitiesResponse;
use service::http::api::admin::{
    CreateIdentityRequest, ListIdentitiesRequest, RevokeIdentityRequest,
};
use service::http::api::client::ClientError;

use crate::op::Op;

crate::command_enum! {
    (Create, CreateIdentityRequest),
    (List, ListIdentitiesRequest),
    (Revoke, RevokeIdentityRequest),
}

/// Identity administration against a running server, authenticated as an admin
pub type AdminCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Admin {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[async_trait::async_trait]
impl Op for Admin {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("API error: {0}")]
    Api(#[from] ClientError),
}

#[async_trait::async_trait]
impl Op for CreateIdentityRequest {
    type Error = AdminError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response: CreateIdentityResponse = ctx.client.call(self.clone()).await?;
        Ok(format!(
            "Created {} (id: {} | role: {})\ncredential (shown once): {}",
            response.identity.name, response.identity.id, response.identity.role, response.credential
        ))
    }
}

#[async_trait::async_trait]
impl Op for ListIdentitiesRequest {
    type Error = AdminError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response: ListIdentitiesResponse = ctx.client.call(self.clone()).await?;
        Ok(super::identity::render_identities(&response.identities))
    }
}

#[async_trait::async_trait]
impl Op for RevokeIdentityRequest {
    type Error = AdminError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        ctx.client.call(self.clone()).await?;
        Ok(format!("Revoked identity {}", self.identity_id))
    }
}
