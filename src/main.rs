use anyhow::Result;
use clap::{Parser, Subcommand};
use delivery_core::{config::Config, migration, server, telemetry};
use tracing::info;

#[derive(Parser)]
#[command(name = "delivery-core", version, about = "Food delivery backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run migrations, then start the HTTP server (default)
    Serve,
    /// Create the database, run migrations and seed the MASTER account
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let prometheus_handle = telemetry::init(&config.telemetry)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Init => {
            info!("Initializing database");
            migration::run_migrations(&config).await?;
            migration::seed_master(&config).await?;
            info!("Initialization complete");
            Ok(())
        }
        Command::Serve => {
            info!("Starting Delivery Core Service");
            migration::run_migrations(&config).await?;
            migration::seed_master(&config).await?;
            info!("HTTP server listening on {}", config.http_addr());
            server::run(config, prometheus_handle).await
        }
    }
}
