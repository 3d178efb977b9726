use std::sync::Arc;

use crate::{
  Error, Result,
  store::Repository,
  user::{NewUser, User},
};

pub struct UserService<R> {
  repo: Arc<R>,
}

impl<R> Clone for UserService<R> {
  fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo) } }
}

impl<R: Repository> UserService<R> {
  pub fn new(repo: Arc<R>) -> Self { Self { repo } }

  pub async fn get_users(&self) -> Result<Vec<User>> {
    self.repo.get_users().await.map_err(Into::into)
  }

  pub async fn get_user(&self, id: &str) -> Result<User> {
    self.repo.get_user(id).await.map_err(Into::into)
  }

  pub async fn count_users(&self) -> Result<u64> {
    self.repo.count_users().await.map_err(Into::into)
  }

  pub async fn create_user(&self, input: NewUser) -> Result<User> {
    if input.username.trim().is_empty() {
      return Err(Error::InvalidInput("username must not be empty".into()));
    }
    self.repo.create_user(input).await.map_err(Into::into)
  }

  /// Flip the user's active flag and return the updated record.
  ///
  /// The flip happens in the store as one statement, so two concurrent
  /// toggles always cancel out.
  pub async fn update_user_status(&self, id: &str) -> Result<User> {
    let id = id.trim();
    if id.is_empty() {
      return Err(Error::InvalidInput("user id must not be empty".into()));
    }

    let user = self.repo.toggle_user_status(id).await.map_err(Into::<Error>::into)?;
    tracing::info!(user_id = %user.id, active = user.active, "user status toggled");
    Ok(user)
  }
}
