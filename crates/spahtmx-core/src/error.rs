//! Error taxonomy shared by every layer.
//!
//! Store crates keep their own error types and convert into this one at the
//! service boundary; the web layer maps each variant to an HTTP status.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("unauthorized")]
  Unauthorized,

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap any backend error as [`Error::Internal`].
  pub fn internal(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Internal(Box::new(e))
  }
}

impl From<serde_json::Error> for Error {
  fn from(e: serde_json::Error) -> Self { Self::InvalidInput(e.to_string()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
