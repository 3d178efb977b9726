//! Choosing a storage backend from the configured URLs.

use std::{fmt, path::PathBuf};

use crate::ServerConfig;

pub const DEFAULT_DATABASE_URL: &str = "spahtmx.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
  Sqlite(PathBuf),
  SqliteMemory,
  Postgres(String),
  Mongo(String),
}

impl Backend {
  /// `MONGODB_URL` wins when set; otherwise `DATABASE_URL` decides, falling
  /// back to a local SQLite file.
  pub fn from_config(cfg: &ServerConfig) -> Self {
    let non_empty = |s: &Option<String>| {
      s.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned)
    };
    if let Some(url) = non_empty(&cfg.mongodb_url) {
      return Self::Mongo(url);
    }
    Self::from_url(non_empty(&cfg.database_url).as_deref().unwrap_or(DEFAULT_DATABASE_URL))
  }

  pub fn from_url(url: &str) -> Self {
    let url = url.trim();
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
      return Self::Postgres(url.to_owned());
    }
    if url.starts_with("mongodb://") || url.starts_with("mongodb+srv://") {
      return Self::Mongo(url.to_owned());
    }

    let path = url
      .strip_prefix("sqlite://")
      .or_else(|| url.strip_prefix("sqlite:"))
      .unwrap_or(url);
    if path == ":memory:" {
      Self::SqliteMemory
    } else {
      Self::Sqlite(PathBuf::from(path))
    }
  }

  pub fn name(&self) -> &'static str {
    match self {
      Self::Sqlite(_) | Self::SqliteMemory => "sqlite",
      Self::Postgres(_) => "postgres",
      Self::Mongo(_) => "mongodb",
    }
  }
}

/// Never prints connection URLs, which may carry credentials.
impl fmt::Display for Backend {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Sqlite(path) => write!(f, "sqlite file {}", path.display()),
      Self::SqliteMemory => f.write_str("in-memory sqlite"),
      other => f.write_str(other.name()),
    }
  }
}
