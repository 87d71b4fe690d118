//! gate-proxy binary entry point.
//!
//! ```text
//!                        ┌────────────────────────────────────────────┐
//!                        │                 GATE PROXY                  │
//!                        │                                             │
//!     Client Request     │  ┌────────┐   ┌──────────┐   ┌──────────┐  │
//!     ───────────────────┼─▶│  http  │──▶│ security │──▶│  http    │──┼──▶ Backend
//!                        │  │ server │   │   gate   │   │ rewrite  │  │
//!                        │  └────────┘   └────┬─────┘   └──────────┘  │
//!                        │                    │ rejected               │
//!                        │                    ▼                        │
//!     403 Forbidden  ◀───┼─────────────── fail closed                  │
//!                        │                                             │
//!                        │  ┌─────────────────────────────────────┐   │
//!                        │  │        Cross-Cutting Concerns        │   │
//!                        │  │  config · observability · lifecycle  │   │
//!                        │  └─────────────────────────────────────┘   │
//!                        └────────────────────────────────────────────┘
//! ```

use std::path::Path;

use clap::Parser;
use tokio::net::TcpListener;

use gate_proxy::config::load_config;
use gate_proxy::http::HttpServer;
use gate_proxy::lifecycle::Shutdown;
use gate_proxy::observability::init_logging;

#[derive(Parser)]
#[command(name = "gate-proxy")]
#[command(about = "Reverse proxy that gates requests on secret headers", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "gate-proxy.toml")]
    config: String,

    /// Validate the configuration and exit without serving.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(Path::new(&cli.config))?;

    init_logging(&config.observability);

    tracing::info!(
        config_path = %cli.config,
        bind_address = %config.listener.bind_address,
        public_endpoint = %config.upstream.public_endpoint,
        backend_endpoint = %config.upstream.backend_endpoint,
        required_headers = config.gate.header_names.len(),
        "Configuration loaded"
    );

    if cli.check {
        println!("configuration ok: {}", cli.config);
        return Ok(());
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
