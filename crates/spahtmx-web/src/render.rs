//! askama templates and the full-page / fragment switch.

use askama::Template;
use axum::response::Html;
use spahtmx_core::{prize::Prize, user::User};

use crate::{auth::Visitor, error::Result, htmx::Htmx};

/// Element id the prize filter form swaps its results into.
pub const PRIZE_LIST_ID: &str = "prize-list";

// ─── Chrome ──────────────────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "nav.html")]
struct Nav<'a> {
  path:      &'a str,
  signed_in: bool,
  username:  &'a str,
}

/// The whole document: head, nav, content and footer.
#[derive(Template)]
#[template(path = "base.html")]
struct Shell<'a> {
  title:   &'a str,
  nav:     &'a str,
  content: &'a str,
}

/// What an HTMX navigation swaps into `#app`.
#[derive(Template)]
#[template(path = "fragment.html")]
struct Fragment<'a> {
  title:   &'a str,
  nav:     &'a str,
  content: &'a str,
}

/// Render `content` as a full page, or as nav + content for HTMX requests.
pub fn page<T: Template>(
  hx: &Htmx,
  visitor: &Visitor,
  path: &str,
  title: &str,
  content: &T,
) -> Result<Html<String>> {
  let nav = Nav {
    path,
    signed_in: visitor.signed_in(),
    username: visitor.username(),
  }
  .render()?;
  let content = content.render()?;

  let html = if hx.wants_fragment() {
    Fragment { title, nav: &nav, content: &content }.render()?
  } else {
    Shell { title, nav: &nav, content: &content }.render()?
  };
  Ok(Html(html))
}

/// Render a template on its own, for in-place swaps.
pub fn fragment<T: Template>(content: &T) -> Result<Html<String>> {
  Ok(Html(content.render()?))
}

// ─── Pages ───────────────────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage<'a> {
  pub signed_in: bool,
  pub username:  &'a str,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutPage {
  pub version: &'static str,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
  /// Shown above the form when non-empty.
  pub error: String,
}

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminPage {
  pub users:      Vec<User>,
  pub user_count: u64,
}

#[derive(Template)]
#[template(path = "user_list.html")]
pub struct UserList {
  pub users: Vec<User>,
}

#[derive(Template)]
#[template(path = "prize.html")]
pub struct PrizePage {
  pub prizes:            Vec<Prize>,
  pub categories:        Vec<String>,
  pub years:             Vec<String>,
  pub selected_category: String,
  pub selected_year:     String,
}

#[derive(Template)]
#[template(path = "prize_list.html")]
pub struct PrizeList {
  pub prizes: Vec<Prize>,
}
