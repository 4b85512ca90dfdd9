//! Caddyfile editor.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │              CADDYFILE EDITOR                │
//!   Browser / CLI        │  ┌─────────┐   ┌──────────┐                  │
//!   ─────────────────────┼─▶│  http   │──▶│ /api/*   │──┬──▶ store ─────┼──▶ Caddyfile
//!                        │  │ server  │   │ handlers │  │              │
//!                        │  └────┬────┘   └──────────┘  └──▶ control ──┼──▶ Caddy admin API
//!                        │       │                                      │    (/adapt, /load)
//!                        │       └──▶ ServeDir (static assets)          │
//!                        │                                              │
//!                        │  config · observability · lifecycle          │
//!                        └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use caddyfile_editor::config::load_config;
use caddyfile_editor::lifecycle::{signals, startup, Shutdown};
use caddyfile_editor::observability::logging;

#[derive(Parser)]
#[command(name = "caddyfile-editor")]
#[command(about = "Serve, validate and hot-reload a Caddyfile", long_about = None)]
struct Args {
    /// Optional TOML settings file. Environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("caddyfile-editor: {e}");
            std::process::exit(2);
        }
    };

    logging::init_logging(&config.observability);

    tracing::info!("caddyfile-editor v{} starting", env!("CARGO_PKG_VERSION"));

    let server = startup::prepare(config).await?;
    let listener = startup::bind(server.config()).await?;

    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(&shutdown);

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
