use clap::Args;

use service::http::api::client::ClientError;
use service::http::api::sync::pull::{PullRequest, PullResponse};

#[derive(Args, Debug, Clone)]
pub struct Pull {
    #[command(flatten)]
    pub request: PullRequest,

    /// Print the raw JSON page instead of a summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum PullError {
    #[error("API error: {0}")]
    Api(#[from] ClientError),
    #[error("failed to render ops: {0}")]
    Render(#[from] serde_json::Error),
}

#[async_trait::async_trait]
impl crate::op::Op for Pull {
    type Error = PullError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let response: PullResponse = ctx.client.call(self.request.clone()).await?;

        if self.json {
            return Ok(serde_json::to_string_pretty(&response)?);
        }

        let mut lines = response
            .ops
            .iter()
            .map(|op| {
                format!(
                    "#{} {} {} (device: {} | identity: {} | at: {})",
                    op.seq, op.kind, op.client_op_id, op.device_id, op.submitted_by, op.submitted_at
                )
            })
            .collect::<Vec<_>>();
        lines.push(format!("cursor: {}", response.cursor));
        Ok(lines.join("\n"))
    }
}
