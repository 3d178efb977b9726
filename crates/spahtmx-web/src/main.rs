//! spahtmx server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) under environment
//! variables, opens the backend selected by `MONGODB_URL` / `DATABASE_URL`,
//! optionally seeds it, and serves the HTMX front end.
//!
//! # Password hash generation
//!
//! ```
//! cargo run -p spahtmx-web --bin server -- --hash-password
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use clap::Parser;
use spahtmx_core::{prize::PrizeList, seed, service::hash_password, store::Repository};
use spahtmx_store_mongo::MongoStore;
use spahtmx_store_postgres::PgStore;
use spahtmx_store_sqlite::SqliteStore;
use spahtmx_web::{AppState, ServerConfig, backend::Backend};
use tokio::{net::TcpListener, sync::watch};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, filter::Directive};

/// How long in-flight requests may run after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Extra directives enabled by `DEBUG_SQL`.
const SQL_DIRECTIVES: &[&str] = &[
  "spahtmx_store_sqlite=debug",
  "spahtmx_store_postgres=debug",
  "spahtmx_store_mongo=debug",
  "sqlx::query=debug",
];

#[derive(Parser)]
#[command(author, version, about = "spahtmx HTMX admin panel")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  // Helper mode: hash a password and exit.
  if cli.hash_password {
    let password = read_password()?;
    println!("{}", hash_password(&password)?);
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::default().try_parsing(true))
    .build()
    .context("failed to read configuration")?;

  let cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  init_tracing(cfg.debug_sql);

  let backend = Backend::from_config(&cfg);
  tracing::info!(%backend, "opening store");

  match backend {
    Backend::Sqlite(path) => {
      let store = SqliteStore::open(&path)
        .await
        .with_context(|| format!("failed to open sqlite store at {path:?}"))?;
      serve(store, cfg).await
    }
    Backend::SqliteMemory => {
      let store = SqliteStore::open_in_memory()
        .await
        .context("failed to open in-memory sqlite store")?;
      serve(store, cfg).await
    }
    Backend::Postgres(url) => {
      let store = PgStore::connect(&url)
        .await
        .context("failed to connect to postgres")?;
      serve(store, cfg).await
    }
    Backend::Mongo(url) => {
      let store = MongoStore::connect(&url)
        .await
        .context("failed to connect to mongodb")?;
      serve(store, cfg).await
    }
  }
}

fn init_tracing(debug_sql: bool) {
  let mut filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();

  if debug_sql {
    for directive in SQL_DIRECTIVES {
      if let Ok(directive) = directive.parse::<Directive>() {
        filter = filter.add_directive(directive);
      }
    }
  }

  tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Seed if asked to, then serve until SIGINT/SIGTERM.
async fn serve<R>(store: R, cfg: ServerConfig) -> anyhow::Result<()>
where
  R: Repository + 'static,
{
  if cfg.seed_db {
    seed_store(&store, &cfg.prize_seed_path).await?;
  }

  let address = format!("{}:{}", cfg.host, cfg.port);
  let app = spahtmx_web::router(AppState::new(Arc::new(store), cfg));

  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  tracing::info!("listening on http://{address}");

  let (stop_tx, mut stop_rx) = watch::channel(false);
  let mut server = tokio::spawn(async move {
    axum::serve(listener, app)
      .with_graceful_shutdown(async move {
        let _ = stop_rx.changed().await;
      })
      .await
  });

  tokio::select! {
    res = &mut server => {
      return res.context("server task panicked")?.context("server error");
    }
    () = shutdown_signal() => {}
  }

  tracing::info!("shutting down");
  let _ = stop_tx.send(true);

  match tokio::time::timeout(SHUTDOWN_GRACE, server).await {
    Ok(res) => res.context("server task panicked")?.context("server error")?,
    Err(_) => tracing::warn!(
      grace_secs = SHUTDOWN_GRACE.as_secs(),
      "requests still running after grace period; exiting"
    ),
  }

  tracing::info!("server exited");
  Ok(())
}

/// Write the fixture users and the prize dump. An unreadable dump only skips
/// the prizes; failing to write users is fatal.
async fn seed_store<R: Repository>(store: &R, prize_path: &Path) -> anyhow::Result<()> {
  let prizes = match load_prizes(prize_path) {
    Ok(list) => {
      tracing::info!(count = list.prizes.len(), path = %prize_path.display(), "loaded prizes");
      list.prizes
    }
    Err(e) => {
      tracing::error!(error = %format!("{e:#}"), "skipping prize seed");
      Vec::new()
    }
  };

  seed::seed(store, prizes)
    .await
    .context("failed to seed database")?;
  Ok(())
}

fn load_prizes(path: &Path) -> anyhow::Result<PrizeList> {
  let json = std::fs::read_to_string(path)
    .with_context(|| format!("failed to read {}", path.display()))?;
  PrizeList::from_json(&json).with_context(|| format!("failed to parse {}", path.display()))
}

async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!(error = %e, "failed to listen for ctrl-c");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to listen for SIGTERM");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c => {}
    () = terminate => {}
  }
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
