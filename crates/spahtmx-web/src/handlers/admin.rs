//! The user list and its status switch. Both routes require a session.

use axum::{
  extract::{Path, State},
  response::Html,
};
use spahtmx_core::store::Repository;

use crate::{
  AppState,
  auth::{SignedIn, Visitor},
  error::Result,
  htmx::Htmx,
  render::{self, AdminPage, UserList},
};

pub async fn page<R: Repository>(
  State(state): State<AppState<R>>,
  hx: Htmx,
  SignedIn(username): SignedIn,
) -> Result<Html<String>> {
  let content = AdminPage {
    users:      state.users.get_users().await?,
    user_count: state.users.count_users().await?,
  };
  render::page(&hx, &Visitor(Some(username)), "/admin", "Admin", &content)
}

/// Flip a user's active flag and answer with the refreshed user list.
pub async fn switch<R: Repository>(
  State(state): State<AppState<R>>,
  SignedIn(username): SignedIn,
  Path(id): Path<String>,
) -> Result<Html<String>> {
  let user = state.users.update_user_status(&id).await?;
  tracing::info!(by = %username, user_id = %user.id, active = user.active, "status switched");

  let users = state.users.get_users().await?;
  render::fragment(&UserList { users })
}
