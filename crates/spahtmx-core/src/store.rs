//! The `Repository` trait.
//!
//! The trait is implemented by storage backends (`spahtmx-store-sqlite`,
//! `spahtmx-store-postgres`, `spahtmx-store-mongo`). The services and the web
//! layer depend on this abstraction, never on a concrete backend; which one
//! runs is decided once at startup.

use std::future::Future;

use crate::{
  prize::{NewPrize, Prize, PrizeQuery},
  user::{NewUser, User},
};

/// Abstraction over a spahtmx storage backend.
///
/// Lookups by id or username that find nothing return the backend's
/// not-found error rather than `None`; an id the backend cannot parse is
/// invalid input. Both survive the conversion into [`crate::Error`].
///
/// What parses depends on the backend. SQLite user ids are free-form text, so
/// a made-up id such as `"missing"` is simply not found. PostgreSQL expects an
/// integer and MongoDB a 24-digit hex `ObjectId`, so the same id is invalid
/// input there. Prize ids are integers in both SQL stores.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait Repository: Send + Sync {
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// All users, ordered by username.
  fn get_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  fn get_user<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + 'a;

  fn get_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + 'a;

  /// Persist a new user. Fails with invalid input if the username is taken.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Overwrite the mutable fields of an existing user and bump `updated_at`.
  fn update_user(
    &self,
    user: User,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Flip the `active` flag in a single statement and return the result.
  fn toggle_user_status<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + 'a;

  fn count_users(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Prizes ────────────────────────────────────────────────────────────

  /// Prizes matching `query`, newest year first, then by category.
  fn find_prizes<'a>(
    &'a self,
    query: &'a PrizeQuery,
  ) -> impl Future<Output = Result<Vec<Prize>, Self::Error>> + Send + 'a;

  fn get_prize<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Prize, Self::Error>> + Send + 'a;

  /// Persist a prize together with its laureates.
  fn insert_prize(
    &self,
    input: NewPrize,
  ) -> impl Future<Output = Result<Prize, Self::Error>> + Send + '_;

  /// Delete a prize; its laureates go with it.
  fn delete_prize<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Distinct categories, ascending.
  fn categories(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// Distinct years, newest first.
  fn years(&self) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  fn count_prizes(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
