//! RAG search proxy.
//!
//! Forwards client queries to a managed RAG search backend (Cloudflare
//! AutoRAG) and relays the answer as JSON or as a server-sent-event stream,
//! with permissive CORS headers on every response.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                  RAG PROXY                   │
//!   Client Request     │  ┌─────────┐    ┌─────────┐    ┌──────────┐  │
//!   ───────────────────┼─▶│  http   │───▶│ handler │───▶│  search  │──┼──▶ AutoRAG
//!                      │  │ server  │    │validate │    │ backend  │  │    ai-search
//!                      │  └─────────┘    └─────────┘    └────┬─────┘  │
//!   Client Response    │  ┌──────────────────────────┐       │        │
//!   ◀──────────────────┼──│ response: SSE | JSON+CORS│◀──────┘        │
//!                      │  └──────────────────────────┘                │
//!                      │   config · observability · lifecycle         │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use rag_proxy::config::{load_config, RagProxyConfig};
use rag_proxy::observability::init_logging;
use rag_proxy::{AutoRagClient, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "rag-proxy")]
#[command(about = "CORS-enabled proxy in front of a managed RAG search backend", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RagProxyConfig::default(),
    };

    init_logging(&config.observability)?;

    tracing::info!("rag-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_file = ?args.config,
        bind_address = %config.listener.bind_address,
        rag = %config.search.rag_name,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let backend = AutoRagClient::from_env(&config.search, &config.timeouts)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config, Arc::new(backend));
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
