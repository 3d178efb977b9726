//! Login and logout.

use axum::{
  Form,
  extract::State,
  http::header,
  response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use spahtmx_core::{Error as CoreError, store::Repository};

use crate::{
  AppState,
  auth::{Visitor, cleared_session_cookie, session_cookie},
  error::Result,
  htmx::Htmx,
  render::{self, LoginPage},
};

const LOGIN_FAILED: &str = "Invalid username or password.";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
  pub username: String,
  pub password: String,
}

pub async fn login_page(hx: Htmx, visitor: Visitor) -> Result<Html<String>> {
  render::page(&hx, &visitor, "/login", "Login", &LoginPage { error: String::new() })
}

pub async fn login<R: Repository>(
  State(state): State<AppState<R>>,
  hx: Htmx,
  Form(form): Form<LoginForm>,
) -> Result<Response> {
  match state.auth.login(form.username.trim(), &form.password).await {
    Ok(user) => {
      let cookie = session_cookie(&user.username, state.config.session_max_age_secs)?;
      tracing::info!(username = %user.username, "logged in");

      let mut resp = hx.redirect("/");
      resp.headers_mut().insert(header::SET_COOKIE, cookie);
      Ok(resp)
    }
    Err(CoreError::Unauthorized) => {
      let content = LoginPage { error: LOGIN_FAILED.to_string() };
      Ok(render::page(&hx, &Visitor::default(), "/login", "Login", &content)?.into_response())
    }
    Err(e) => Err(e.into()),
  }
}

pub async fn logout(hx: Htmx) -> Response {
  let mut resp = hx.redirect("/");
  resp
    .headers_mut()
    .insert(header::SET_COOKIE, cleared_session_cookie());
  resp
}
