//! lifskill server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), layers
//! `LIFSKILL_*` environment variables on top, opens an in-process SQLite
//! store and serves the JSON API over HTTP.
//!
//! ```sh
//! LIFSKILL_PORT=9000 LIFSKILL_ADMIN_USER_IDS=1,2 lifskill-server --config config.toml
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use lifskill_server::ServerConfig;
use lifskill_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "lifskill moderation server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("invalid configuration in {:?}", cli.config))?;

  let store = SqliteStore::open_with_gate(&cfg.store_path, cfg.gate())
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;
  if !cfg.admin_user_ids.is_empty() {
    tracing::info!(admins = ?cfg.admin_user_ids, "admin override enabled");
  }

  let app = lifskill_server::router(Arc::new(store), cfg.admins());
  let address = cfg.address();
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  tracing::info!(%address, store = ?cfg.store_path, "serving lifskill API");
  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
