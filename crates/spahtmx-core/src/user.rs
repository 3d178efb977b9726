//! User records shown on the admin page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted user.
///
/// `id` is opaque to every layer above the store: a UUID for SQLite, a
/// decimal row id for PostgreSQL, an ObjectId hex string for MongoDB.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:            String,
  pub username:      String,
  /// argon2 PHC string; absent for accounts that cannot log in.
  #[serde(skip_serializing, default)]
  pub password_hash: Option<String>,
  pub email:         String,
  /// The status flag toggled from the admin page.
  pub active:        bool,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

/// Input to [`crate::store::Repository::create_user`].
/// The id and both timestamps are always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub password_hash: Option<String>,
  pub email:         String,
  pub active:        bool,
}

impl NewUser {
  pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
    Self {
      username:      username.into(),
      password_hash: None,
      email:         email.into(),
      active:        true,
    }
  }

  pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
    self.password_hash = Some(hash.into());
    self
  }

  pub fn inactive(mut self) -> Self {
    self.active = false;
    self
  }
}
