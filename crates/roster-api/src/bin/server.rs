//! Roster API server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `ROSTER_*`
//! environment variables, opens the SQLite store, and serves the JSON API.
//!
//! # Provisioning an admin
//!
//! An admin with its own password can be created without the configured
//! bootstrap pair:
//!
//! ```text
//! cargo run -p roster-api --bin server -- create-admin --email root@school.test --password s3cret
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use roster_api::{AppState, ServerConfig};
use roster_auth::Authenticator;
use roster_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Student roster API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Create an admin identity, or promote an existing one, and exit.
  CreateAdmin {
    #[arg(long, default_value = "Admin")]
    name:     String,
    #[arg(long)]
    email:    String,
    #[arg(long)]
    password: String,
  },
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

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("ROSTER"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let auth_config = server_cfg.auth_config()?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let store = Arc::new(store);

  if let Some(Command::CreateAdmin { name, email, password }) = cli.command {
    let auth = Authenticator::new(store, Arc::new(auth_config));
    let identity = auth
      .provision_admin(&name, &email, &password)
      .await
      .context("failed to provision admin")?;
    println!("{} <{}> is an admin ({})", identity.name, identity.email, identity.id);
    return Ok(());
  }

  let app = roster_api::router(AppState::new(store, auth_config));
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
