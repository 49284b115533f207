mod args;
mod op;
mod ops;
mod state;

use anyhow::Context;
use clap::{Parser, Subcommand};

use args::Args;
use op::Op;
use ops::{Admin, Health, Identity, Init, Pull, Serve, Version, Whoami};

command_enum! {
    (Init, Init),
    (Serve, Serve),
    (Identity, Identity),
    (Admin, Admin),
    (Whoami, Whoami),
    (Pull, Pull),
    (Health, Health),
    (Version, Version),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let remote = op::resolve_remote(args.remote, args.config_path.clone())
        .context("invalid remote URL")?;
    let ctx = op::OpContext::new(remote, args.config_path, args.credential)
        .context("failed to create API client")?;

    let output = args.command.execute(&ctx).await?;
    println!("{}", output);
    Ok(())
}
