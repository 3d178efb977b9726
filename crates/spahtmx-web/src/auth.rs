//! Cookie session extractors.
//!
//! A successful login sets an unsigned `session=<username>` cookie. There is
//! no server-side session store; the cookie's presence is the whole check.

use std::convert::Infallible;

use axum::{
  extract::FromRequestParts,
  http::{
    HeaderMap, HeaderValue,
    header::{self, InvalidHeaderValue},
    request::Parts,
  },
  response::Response,
};

use crate::htmx::Htmx;

pub const SESSION_COOKIE: &str = "session";
pub const LOGIN_PATH: &str = "/login";

/// The username carried by the `session` cookie, if any.
pub fn session_username(headers: &HeaderMap) -> Option<String> {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .find(|(name, _)| *name == SESSION_COOKIE)
    .map(|(_, value)| value.trim().to_owned())
    .filter(|value| !value.is_empty())
}

pub fn session_cookie(username: &str, max_age_secs: u64) -> Result<HeaderValue, InvalidHeaderValue> {
  HeaderValue::from_str(&format!(
    "{SESSION_COOKIE}={username}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}"
  ))
}

pub fn cleared_session_cookie() -> HeaderValue {
  HeaderValue::from_static("session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

// ─── Extractors ──────────────────────────────────────────────────────────────

/// Whoever is making the request, signed in or not. Never rejects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visitor(pub Option<String>);

impl Visitor {
  pub fn signed_in(&self) -> bool { self.0.is_some() }

  /// The username, or `""` for anonymous visitors.
  pub fn username(&self) -> &str { self.0.as_deref().unwrap_or_default() }
}

impl<S: Send + Sync> FromRequestParts<S> for Visitor {
  type Rejection = Infallible;

  async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
    Ok(Self(session_username(&parts.headers)))
  }
}

/// Present in a handler means the request carried a session cookie.
/// Anonymous requests are sent to the login page instead.
#[derive(Debug, Clone)]
pub struct SignedIn(pub String);

impl<S: Send + Sync> FromRequestParts<S> for SignedIn {
  type Rejection = Response;

  async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
    match session_username(&parts.headers) {
      Some(username) => Ok(Self(username)),
      None => {
        tracing::debug!(path = %parts.uri.path(), "anonymous request to gated route");
        Err(Htmx::from_headers(&parts.headers).redirect(LOGIN_PATH))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn with_cookie(value: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_static(value));
    headers
  }

  #[test]
  fn finds_session_among_other_cookies() {
    let headers = with_cookie("theme=dark; session=alice; lang=fr");
    assert_eq!(session_username(&headers).as_deref(), Some("alice"));
  }

  #[test]
  fn empty_or_missing_session_is_anonymous() {
    assert_eq!(session_username(&with_cookie("session=")), None);
    assert_eq!(session_username(&with_cookie("sessionid=alice")), None);
    assert_eq!(session_username(&HeaderMap::new()), None);
  }

  #[test]
  fn cookie_attributes() {
    let cookie = session_cookie("alice", 3600).unwrap();
    let cookie = cookie.to_str().unwrap();
    assert!(cookie.starts_with("session=alice;"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Max-Age=3600"));

    assert!(cleared_session_cookie().to_str().unwrap().contains("Max-Age=0"));
  }

  #[test]
  fn visitor_username_defaults_to_empty() {
    assert_eq!(Visitor::default().username(), "");
    assert!(Visitor(Some("bob".into())).signed_in());
  }
}
