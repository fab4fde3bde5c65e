//! Givebridge cli

use clap::{Parser, Subcommand};
use givebridge::{auth::password, start, AppState, Result};
use migration::{Migrator, MigratorTrait};
use std::path::PathBuf;
use tracing::info;

/// Cli
#[derive(Debug, Parser)]
#[command(name = "givebridge", about = "givebridge server.", version)]
pub struct Cli {
    /// config file path
    #[arg(short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// create an admin account
    CreateAdmin {
        username: String,
        email: String,
        password: String,
    },
}

#[actix_web::main]
async fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "INFO");
    }
    // try to load config from .env
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let args = Cli::parse();
    let state: AppState = AppState::create(args.config, Some("GIVEBRIDGE".to_string())).await?;
    Migrator::up(state.service.db(), None).await?;

    if let Some(Command::CreateAdmin {
        username,
        email,
        password,
    }) = args.command
    {
        let hash = password::hash(&password)?;
        let admin = state.service.create_admin(username, email, hash).await?;
        info!("Created admin {} (id {})", admin.username, admin.id);
        return Ok(());
    }

    info!("Start givebridge server");
    start(state).await?;
    info!("Server shutdown");
    Ok(())
}
