use std::convert::Infallible;

use clap::Args;

use service::http::api::service_health::HealthRequest;

use crate::state::AppState;

#[derive(Args, Debug, Clone)]
pub struct Health;

#[async_trait::async_trait]
impl crate::op::Op for Health {
    type Error = Infallible;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut lines = Vec::new();

        lines.push("Config:".to_string());
        match AppState::load(ctx.config_path.clone()) {
            Ok(state) => {
                lines.push(format!("  directory:    {}", state.rollbook_dir.display()));
                lines.push("  config.toml:  OK".to_string());
                lines.push("  db.sqlite:    OK".to_string());
                lines.push(format!("  listen_addr:  {}", state.config.listen_addr));
                let origins = if state.config.allowed_origins.is_empty() {
                    "any".to_string()
                } else {
                    state.config.allowed_origins.join(", ")
                };
                lines.push(format!("  origins:      {}", origins));
            }
            Err(e) => {
                lines.push(format!("  error: {}", e));
            }
        }

        let base = ctx.client.base_url();
        lines.push(String::new());
        lines.push(format!("Server ({}):", base));

        match ctx.client.call(HealthRequest).await {
            Ok(response) if response.ok => {
                lines.push(format!("  health: OK ({})", response.service));
            }
            Ok(_) => lines.push("  health: UNHEALTHY".to_string()),
            Err(_) => lines.push("  health: NOT REACHABLE".to_string()),
        }

        let client = ctx.client.http_client();
        for probe in ["livez", "readyz"] {
            let Ok(url) = base.join(&format!("/_status/{}", probe)) else {
                continue;
            };
            let status = match client.get(url).send().await {
                Ok(resp) if resp.status().is_success() => "OK".to_string(),
                Ok(resp) => format!("UNHEALTHY ({})", resp.status()),
                Err(_) => "NOT REACHABLE".to_string(),
            };
            lines.push(format!("  {}: {}", probe, status));
        }

        Ok(lines.join("\n"))
    }
}
