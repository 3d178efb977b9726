//! Error type for `spahtmx-store-mongo`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] mongodb::error::Error),

  #[error("timestamp out of range: {0} ms")]
  Timestamp(i64),

  #[error("user not found: {0}")]
  UserNotFound(String),

  #[error("username already taken: {0}")]
  UsernameTaken(String),

  #[error("prize not found: {0}")]
  PrizeNotFound(String),

  /// Ids must be 24-character ObjectId hex strings.
  #[error("invalid id: {0:?}")]
  InvalidId(String),
}

impl From<Error> for spahtmx_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::UserNotFound(id) => Self::NotFound(format!("user {id}")),
      Error::PrizeNotFound(id) => Self::NotFound(format!("prize {id}")),
      Error::UsernameTaken(_) | Error::InvalidId(_) => Self::InvalidInput(e.to_string()),
      other => Self::internal(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
