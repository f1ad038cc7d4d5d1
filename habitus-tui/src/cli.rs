use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "habitus")]
#[command(about = "Terminal client for Habitus focus sessions and daily habits")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run against a real Habitus API server
    Run,
    /// Run in dev mode with local in-memory data
    Dev,
    /// Authenticate via browser OAuth login
    Login {
        /// Authorization code from the provider, if you already have one
        #[arg(long)]
        code: Option<String>,
    },
    /// Remove the local session
    Logout,
    /// Print config path and create default file if missing
    ConfigPath,
}
