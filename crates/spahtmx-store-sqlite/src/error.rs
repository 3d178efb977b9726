//! Error type for `spahtmx-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("user not found: {0}")]
  UserNotFound(String),

  #[error("username already taken: {0}")]
  UsernameTaken(String),

  #[error("prize not found: {0}")]
  PrizeNotFound(String),

  /// Prize ids are integers in this backend.
  #[error("invalid prize id: {0:?}")]
  InvalidPrizeId(String),
}

impl From<Error> for spahtmx_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::UserNotFound(id) => Self::NotFound(format!("user {id}")),
      Error::PrizeNotFound(id) => Self::NotFound(format!("prize {id}")),
      Error::UsernameTaken(_) | Error::InvalidPrizeId(_) => {
        Self::InvalidInput(e.to_string())
      }
      other => Self::internal(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
