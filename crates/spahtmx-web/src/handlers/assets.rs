//! Stylesheet and script, compiled into the binary.

use axum::{
  extract::Path,
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};

const STYLE_CSS: &[u8] = include_bytes!("../../static/style.css");
const APP_JS: &[u8] = include_bytes!("../../static/app.js");

pub async fn handler(Path(file): Path<String>) -> Response {
  let (content_type, body) = match file.as_str() {
    "style.css" => ("text/css; charset=utf-8", STYLE_CSS),
    "app.js" => ("text/javascript; charset=utf-8", APP_JS),
    _ => return StatusCode::NOT_FOUND.into_response(),
  };
  (
    [
      (header::CONTENT_TYPE, content_type),
      (header::CACHE_CONTROL, "public, max-age=3600"),
    ],
    body,
  )
    .into_response()
}
