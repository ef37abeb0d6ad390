//! labnote form server
//!
//! Serves the research note form on a local address. Open the printed URL
//! in a browser to edit, save, load and print notes.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use labnote::config::ServerConfig;
use labnote::server::startup::start_server;

#[derive(Parser)]
#[command(name = "labnote_server")]
#[command(about = "Research note form server")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), ", courtesy of Kernelle Software"))]
struct Args {
  /// Server bind address (default 127.0.0.1:8501)
  #[arg(long, env = "LABNOTE_BIND")]
  bind: Option<SocketAddr>,

  /// Snapshot directory (defaults to ~/.labnote/snapshots)
  #[arg(long, env = "LABNOTE_SNAPSHOT_ROOT")]
  root: Option<PathBuf>,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let filter = if args.verbose {
    EnvFilter::new("labnote=debug,tower_http=debug,info")
  } else {
    EnvFilter::new("labnote=info,warn")
  };
  tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

  let config = ServerConfig::resolve(args.bind, args.root.as_deref())?;

  bentley::info!(&format!("Starting labnote server v{}", env!("CARGO_PKG_VERSION")));
  bentley::info!(&format!("Binding to address: {}", config.bind));

  start_server(config).await
}
