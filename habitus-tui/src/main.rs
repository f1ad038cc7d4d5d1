mod api;
mod app;
mod bootstrap;
mod cli;
mod config;
mod logging;
mod login;
mod runtime;
mod session_store;
mod time_utils;
mod types;
mod ui;

use anyhow::{Context, Result};
use app::{App, ExitReason};
use clap::Parser;
use cli::{Cli, Commands};
use config::HabitusConfig;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    // Must happen while the process is still single-threaded.
    time_utils::init_local_offset();

    let cli = Cli::parse();
    logging::init(&HabitusConfig::log_path()?)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::ConfigPath => {
            let path = HabitusConfig::ensure_exists()?;
            println!("{}", path.display());
        }
        Commands::Login { code } => {
            let cfg = HabitusConfig::load()?;
            let session = bootstrap::file_session(&cfg)?;
            let client = api::ApiClient::new(&cfg.api_url, session)?;
            login::run_login(&client, cfg.callback_port, code).await?;
        }
        Commands::Logout => {
            let cfg = HabitusConfig::load()?;
            bootstrap::file_session(&cfg)?.logout()?;
            tracing::info!("logged out");
            println!("Logged out.");
        }
        Commands::Run => {
            let cfg = HabitusConfig::load()?;
            let client = bootstrap::live_client(&cfg)?;
            run_tui(&cfg, &client).await?;
        }
        Commands::Dev => {
            let cfg = HabitusConfig::load()?;
            let client = bootstrap::dev_client(&cfg)?;
            run_tui(&cfg, &client).await?;
        }
    }
    Ok(())
}

async fn run_tui(cfg: &HabitusConfig, client: &api::ApiClient) -> Result<()> {
    tracing::info!(api_url = %cfg.api_url, "starting habitus");
    let mut app = App::new(cfg, time_utils::today());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = runtime::run_app(&mut terminal, &mut app, client).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    if app.exit_reason == ExitReason::AuthExpired {
        println!("{}", api::ApiError::AuthExpired);
    }

    Ok(())
}
