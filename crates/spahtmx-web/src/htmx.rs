//! HTMX request headers.

use std::convert::Infallible;

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, HeaderValue, StatusCode, request::Parts},
  response::{IntoResponse, Redirect, Response},
};

pub const HX_REQUEST: &str = "hx-request";
pub const HX_TARGET: &str = "hx-target";
pub const HX_BOOSTED: &str = "hx-boosted";
pub const HX_REDIRECT: &str = "hx-redirect";

/// What HTMX told us about the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Htmx {
  pub request: bool,
  pub boosted: bool,
  /// Id of the element the response will be swapped into.
  pub target:  Option<String>,
}

impl Htmx {
  pub fn from_headers(headers: &HeaderMap) -> Self {
    let text = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    Self {
      request: text(HX_REQUEST) == Some("true"),
      boosted: text(HX_BOOSTED) == Some("true"),
      target:  text(HX_TARGET).map(str::to_owned),
    }
  }

  /// Whether to answer with the nav + content fragment instead of a full page.
  /// Boosted requests swap the whole body, so they still get the full page.
  pub fn wants_fragment(&self) -> bool { self.request && !self.boosted }

  pub fn targets(&self, id: &str) -> bool {
    self.request && self.target.as_deref() == Some(id)
  }

  /// Redirect that works for both plain and HTMX requests: a 303 for the
  /// former, an `HX-Redirect` header for the latter.
  pub fn redirect(&self, to: &'static str) -> Response {
    if self.request {
      let mut resp = StatusCode::OK.into_response();
      resp
        .headers_mut()
        .insert(HX_REDIRECT, HeaderValue::from_static(to));
      resp
    } else {
      Redirect::to(to).into_response()
    }
  }
}

impl<S: Send + Sync> FromRequestParts<S> for Htmx {
  type Rejection = Infallible;

  async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
    Ok(Self::from_headers(&parts.headers))
  }
}
