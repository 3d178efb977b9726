//! Static content pages.

use axum::response::Html;

use crate::{
  auth::Visitor,
  error::Result,
  htmx::Htmx,
  render::{self, AboutPage, IndexPage},
};

pub async fn index(hx: Htmx, visitor: Visitor) -> Result<Html<String>> {
  let content = IndexPage {
    signed_in: visitor.signed_in(),
    username:  visitor.username(),
  };
  render::page(&hx, &visitor, "/", "Home", &content)
}

pub async fn about(hx: Htmx, visitor: Visitor) -> Result<Html<String>> {
  let content = AboutPage { version: env!("CARGO_PKG_VERSION") };
  render::page(&hx, &visitor, "/about", "About", &content)
}
