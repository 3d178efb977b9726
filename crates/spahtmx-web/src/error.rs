//! Error type for handlers and its axum `IntoResponse` implementation.
//!
//! Clients only ever see a generic status message; the underlying error is
//! logged here.

use axum::{
  http::{StatusCode, header::InvalidHeaderValue},
  response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebError {
  #[error(transparent)]
  Core(#[from] spahtmx_core::Error),

  #[error("template error: {0}")]
  Render(#[from] askama::Error),

  #[error("invalid header value: {0}")]
  Header(#[from] InvalidHeaderValue),
}

impl WebError {
  pub fn status(&self) -> StatusCode {
    use spahtmx_core::Error as Core;
    match self {
      WebError::Core(Core::NotFound(_)) => StatusCode::NOT_FOUND,
      WebError::Core(Core::InvalidInput(_)) => StatusCode::BAD_REQUEST,
      WebError::Core(Core::Unauthorized) => StatusCode::UNAUTHORIZED,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for WebError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    } else {
      tracing::debug!(error = %self, %status, "request rejected");
    }
    let message = status.canonical_reason().unwrap_or("Error");
    (status, message).into_response()
  }
}

pub type Result<T, E = WebError> = std::result::Result<T, E>;
