use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use commands::{MigrateArgs, ServeArgs};
use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "venturectl",
    author,
    version,
    about = "Startup catalog and mock-investment API server",
    long_about = "Browse, search, rank and compare startups, and record mock investments \
                  against them, over a JSON HTTP API backed by Postgres."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG still wins when set)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(ServeArgs),
    /// Create the catalog tables if they are missing
    Migrate(MigrateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load before parsing so clap's env fallbacks see .env values.
    // dotenvy never overwrites variables that are already set.
    let dotenv_path = dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&TracingConfig { debug: cli.debug }).ok();
    if let Some(path) = dotenv_path {
        tracing::debug!("Loaded .env from {}", path.display());
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Migrate(args) => commands::run_migrate(args).await?,
    }
    Ok(())
}
