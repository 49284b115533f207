pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "rollbook")]
#[command(about = "Run and administer the Rollbook sync service")]
pub struct Args {
    /// Base URL of a running sync server (defaults to the configured port on localhost)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Path to the rollbook config directory (defaults to ~/.rollbook)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Bearer credential for commands that talk to the server
    #[arg(long, global = true, env = "ROLLBOOK_CREDENTIAL", hide_env_values = true)]
    pub credential: Option<String>,

    #[command(subcommand)]
    pub command: crate::Command,
}
