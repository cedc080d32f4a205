use std::net::{IpAddr, SocketAddr};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notes_api::{api, config::Config, service::NoteService, SERVICE_NAME};

#[derive(Parser)]
#[command(name = "notes-api")]
#[command(about = "HTTP service for creating, reading, updating and deleting notes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Interface to bind (overrides SERVER_HOST)
        #[arg(long)]
        host: Option<IpAddr>,

        /// Port for HTTP API (overrides SERVER_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Initialize tracing. RUST_LOG wins over LOG_LEVEL when set.
fn init_tracing(config: &Config) {
    let level = config.log_level.as_str();
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| format!("notes_api={level},tower_http={level}")),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    // Default: serve with settings from the environment
    if let Some(Commands::Serve { host, port }) = cli.command {
        if let Some(host) = host {
            config.host = host;
        }
        if let Some(port) = port {
            config.port = port;
        }
    }

    init_tracing(&config);

    let notes = NoteService::in_memory();
    let app = api::create_router(notes, &config);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        "Running {} (v{}) on http://{}",
        SERVICE_NAME,
        env!("CARGO_PKG_VERSION"),
        addr
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}
