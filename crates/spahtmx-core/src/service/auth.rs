//! Password login against stored argon2 hashes.

use std::sync::Arc;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;

use crate::{Error, Result, store::Repository, user::User};

pub struct AuthService<R> {
  repo: Arc<R>,
}

impl<R> Clone for AuthService<R> {
  fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo) } }
}

impl<R: Repository> AuthService<R> {
  pub fn new(repo: Arc<R>) -> Self { Self { repo } }

  /// Check `password` against the stored hash for `username`.
  ///
  /// An unknown user and a wrong password both yield
  /// [`Error::Unauthorized`]; other store failures pass through.
  pub async fn login(&self, username: &str, password: &str) -> Result<User> {
    let found: Result<User> =
      self.repo.get_by_username(username).await.map_err(Into::into);
    let user = match found {
      Ok(user) => user,
      Err(Error::NotFound(_)) => return Err(Error::Unauthorized),
      Err(e) => return Err(e),
    };

    let verified = user
      .password_hash
      .as_deref()
      .is_some_and(|hash| verify_password(password, hash));

    if !verified {
      tracing::debug!(%username, "login rejected");
      return Err(Error::Unauthorized);
    }
    Ok(user)
  }
}

/// Produce an argon2id PHC string for `password` with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::Internal(format!("argon2 error: {e}").into()))
}

/// Whether `password` matches the PHC string `hash`. A malformed hash never
/// matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}
