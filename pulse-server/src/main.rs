//! pulse-server - Survey platform HTTP service
//!
//! Serves survey authoring, campaign management, response submission, and
//! analytics over a SQLite database.

use anyhow::Result;
use clap::Parser;
use pulse_common::config::ServerConfig;
use pulse_server::{build_router, AppState};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "pulse-server", about = "Pulse survey platform server")]
struct Args {
    /// Bind address for the HTTP listener
    #[arg(long)]
    bind: Option<String>,

    /// Path to the SQLite database file
    #[arg(long)]
    database: Option<String>,

    /// Shared token for admin endpoints (empty disables admin auth)
    #[arg(long)]
    admin_token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting Pulse server v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = ServerConfig::resolve(
        args.bind.as_deref(),
        args.database.as_deref(),
        args.admin_token.as_deref(),
    );

    info!("Database path: {}", config.database.display());
    let pool = pulse_common::db::init_database(&config.database).await?;

    if config.admin_token.is_empty() {
        info!("Admin authentication disabled (no admin token configured)");
    } else {
        info!("Admin authentication enabled");
    }

    let state = AppState::new(pool, config.admin_token.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!("pulse-server listening on http://{}", config.bind);
    info!("Health check: http://{}/health", config.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
