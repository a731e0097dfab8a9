// crates/server/src/main.rs
//! Bioflow server binary.
//!
//! Opens the job database, then serves the status API until interrupted.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bioflow_db::Database;
use bioflow_server::create_app;

/// Default port for the server.
const DEFAULT_PORT: u16 = 47810;

#[derive(Debug, Parser)]
#[command(name = "bioflow", about = "Job status server for the bioflow recipes subsystem")]
struct Args {
    /// Port to listen on. Falls back to $BIOFLOW_PORT, then the default.
    #[arg(long)]
    port: Option<u16>,

    /// Database file. Defaults to ~/.cache/bioflow/bioflow.db.
    #[arg(long)]
    db: Option<PathBuf>,
}

impl Args {
    fn port(&self) -> u16 {
        self.port
            .or_else(|| {
                std::env::var("BIOFLOW_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
            })
            .unwrap_or(DEFAULT_PORT)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let db = match &args.db {
        Some(path) => Database::new(path).await?,
        None => Database::open_default().await?,
    };

    let app = create_app(db);
    let addr = SocketAddr::from(([127, 0, 0, 1], args.port()));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, "bioflow server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
