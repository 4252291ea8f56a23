//! Atlas registry server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, ValueEnum};

use atlas_api::{RegistryState, registry_router};
use atlas_core::observability::{LogFormat, init_logging};
use atlas_core::storage::MemoryStore;

/// Command-line arguments for the registry server.
#[derive(Debug, Parser)]
#[command(name = "atlas-server", about = "Atlas metadata registry server")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormatArg::Pretty)]
    log_format: LogFormatArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    /// Pretty-printed logs for development.
    Pretty,
    /// JSON structured logs for production.
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_format.into());

    let store = Arc::new(MemoryStore::new());
    let state = RegistryState::new(store);
    let app = registry_router(state);

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    tracing::info!(listen = %args.listen, "atlas registry listening");
    axum::serve(listener, app).await?;
    Ok(())
}
