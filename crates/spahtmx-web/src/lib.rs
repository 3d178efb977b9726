//! HTMX web front end for spahtmx.
//!
//! Exposes an axum [`Router`] backed by any [`Repository`]. Every page is
//! rendered as a full document, or as a nav + content fragment when the
//! request comes from HTMX.

pub mod auth;
pub mod backend;
pub mod error;
pub mod handlers;
pub mod htmx;
pub mod render;

pub use error::WebError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use spahtmx_core::{
  service::{AuthService, PrizeService, UserService},
  store::Repository,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use handlers::{admin, assets, pages, prize, session, status};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime configuration, from an optional `config.toml` overlaid with
/// environment variables (`PORT`, `DATABASE_URL`, ...).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub database_url:         Option<String>,
  pub mongodb_url:          Option<String>,
  /// Log every statement the store runs.
  pub debug_sql:            bool,
  pub seed_db:              bool,
  pub prize_seed_path:      PathBuf,
  pub session_max_age_secs: u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                 "0.0.0.0".to_string(),
      port:                 8080,
      database_url:         None,
      mongodb_url:          None,
      debug_sql:            false,
      seed_db:              false,
      prize_seed_path:      PathBuf::from("nobel-prize.json"),
      session_max_age_secs: 60 * 60 * 24,
    }
  }
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers. Every service holds the
/// same store.
pub struct AppState<R> {
  pub users:  UserService<R>,
  pub prizes: PrizeService<R>,
  pub auth:   AuthService<R>,
  pub config: Arc<ServerConfig>,
}

impl<R> Clone for AppState<R> {
  fn clone(&self) -> Self {
    Self {
      users:  self.users.clone(),
      prizes: self.prizes.clone(),
      auth:   self.auth.clone(),
      config: Arc::clone(&self.config),
    }
  }
}

impl<R: Repository> AppState<R> {
  pub fn new(repo: Arc<R>, config: ServerConfig) -> Self {
    Self {
      users:  UserService::new(Arc::clone(&repo)),
      prizes: PrizeService::new(Arc::clone(&repo)),
      auth:   AuthService::new(repo),
      config: Arc::new(config),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

pub fn router<R>(state: AppState<R>) -> Router
where
  R: Repository + 'static,
{
  Router::new()
    .route("/",                get(pages::index))
    .route("/about",           get(pages::about))
    .route("/prize",           get(prize::page::<R>))
    .route("/admin",           get(admin::page::<R>))
    .route("/api/switch/{id}", post(admin::switch::<R>))
    .route("/login",           get(session::login_page).post(session::login::<R>))
    .route("/logout",          post(session::logout))
    .route("/status",          get(status::handler))
    .route("/static/{file}",   get(assets::handler))
    .layer(CompressionLayer::new())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod tests;
