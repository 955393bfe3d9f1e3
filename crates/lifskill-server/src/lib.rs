//! HTTP server wiring for lifskill.
//!
//! Mounts the JSON API from [`lifskill_api`] under `/api` and wraps it in
//! request tracing. The binary in `main.rs` supplies configuration and the
//! store.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use config::{Config, ConfigError, Environment, File, Source};
use lifskill_core::{
  UserId,
  gate::{AdminOverride, ExpertRoster},
  store::ModerationStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

const ENV_PREFIX: &str = "LIFSKILL";

/// Runtime server configuration, deserialised from `config.toml` and
/// `LIFSKILL_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  pub store_path:     PathBuf,
  /// Users who may approve any item and manage other users' expertise.
  #[serde(default)]
  pub admin_user_ids: Vec<i64>,
}

impl ServerConfig {
  /// Read `path` (optional) with environment overrides on top. A leading
  /// `~/` in `store_path` is resolved against `$HOME`.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let mut cfg = Self::layered(File::from(path).required(false))?;
    let home = std::env::var_os("HOME").map(PathBuf::from);
    cfg.store_path = expand_home(&cfg.store_path, home.as_deref());
    Ok(cfg)
  }

  fn layered<F>(file: F) -> Result<Self, ConfigError>
  where
    F: Source + Send + Sync + 'static,
  {
    Config::builder()
      .add_source(file)
      .add_source(
        Environment::with_prefix(ENV_PREFIX)
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("admin_user_ids"),
      )
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn admins(&self) -> impl Iterator<Item = UserId> + '_ {
    self.admin_user_ids.iter().copied().map(UserId)
  }

  /// The approval policy: the expert roster, overridden for administrators.
  pub fn gate(&self) -> AdminOverride<ExpertRoster> {
    AdminOverride::new(self.admins(), ExpertRoster)
  }
}

/// Replace a leading `~/` with `home`; other paths pass through.
fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
  match (path.strip_prefix("~"), home) {
    (Ok(rest), Some(home)) => home.join(rest),
    _ => path.to_path_buf(),
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the top-level axum [`Router`] serving `store`.
pub fn router<S>(store: Arc<S>, admins: impl IntoIterator<Item = UserId>) -> Router
where
  S: ModerationStore + 'static,
{
  Router::new()
    .nest("/api", lifskill_api::api_router(store, admins))
    .layer(TraceLayer::new_for_http())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
