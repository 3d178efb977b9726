//! Router tests against a seeded in-memory SQLite store.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use spahtmx_core::{
  prize::{NewLaureate, NewPrize},
  seed::{SEED_PASSWORD, seed},
  store::Repository,
};
use spahtmx_store_sqlite::SqliteStore;
use tower::ServiceExt as _;

use crate::{AppState, ServerConfig, router};

fn prize(year: &str, category: &str, laureate: &str) -> NewPrize {
  NewPrize {
    year:               year.into(),
    category:           category.into(),
    overall_motivation: String::new(),
    laureates:          vec![NewLaureate {
      firstname:  laureate.into(),
      surname:    String::new(),
      motivation: "\"for outstanding work\"".into(),
      share:      "1".into(),
    }],
  }
}

async fn make_state() -> (AppState<SqliteStore>, Arc<SqliteStore>) {
  let store = SqliteStore::open_in_memory().await.unwrap();
  seed(&store, vec![
    prize("2019", "physics", "James Peebles"),
    prize("2020", "physics", "Roger Penrose"),
    prize("2020", "peace", "World Food Programme"),
  ])
  .await
  .unwrap();

  let store = Arc::new(store);
  (AppState::new(Arc::clone(&store), ServerConfig::default()), store)
}

async fn send(
  state: AppState<SqliteStore>,
  method: &str,
  uri: &str,
  headers: &[(&str, &str)],
  body: &str,
) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  for &(k, v) in headers {
    builder = builder.header(k, v);
  }
  let req = builder.body(Body::from(body.to_string())).unwrap();
  router(state).oneshot(req).await.unwrap()
}

async fn get(state: AppState<SqliteStore>, uri: &str, headers: &[(&str, &str)]) -> Response {
  send(state, "GET", uri, headers, "").await
}

async fn body_text(resp: Response) -> String {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  String::from_utf8(bytes.to_vec()).unwrap()
}

const HX: (&str, &str) = ("hx-request", "true");
const SIGNED_IN: (&str, &str) = ("cookie", "session=alice");

// ─── Pages ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn plain_request_gets_full_page() {
  let (state, _) = make_state().await;
  let resp = get(state, "/about", &[]).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let html = body_text(resp).await;
  assert!(html.starts_with("<!DOCTYPE html>"), "{html}");
  assert!(html.contains("<footer>"));
  assert!(html.contains("<nav class=\"top\">"));
}

#[tokio::test]
async fn htmx_request_gets_fragment() {
  let (state, _) = make_state().await;
  for path in ["/", "/about", "/login", "/prize"] {
    let html = body_text(get(state.clone(), path, &[HX]).await).await;
    assert!(!html.contains("<!DOCTYPE html>"), "{path}: {html}");
    assert!(!html.contains("<footer>"), "{path}");
    assert!(html.contains("<nav class=\"top\">"), "{path}");
    assert!(html.contains("<main id=\"content\">"), "{path}");
  }
}

#[tokio::test]
async fn status_reports_ok() {
  let (state, _) = make_state().await;
  let resp = get(state, "/status", &[]).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
  assert_eq!(json, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn static_assets_are_embedded() {
  let (state, _) = make_state().await;
  let css = get(state.clone(), "/static/style.css", &[]).await;
  assert_eq!(css.status(), StatusCode::OK);
  assert!(css.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/css"));

  let missing = get(state, "/static/nope.txt", &[]).await;
  assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

// ─── Prizes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn prize_page_filters_by_year() {
  let (state, _) = make_state().await;
  let html = body_text(get(state, "/prize?year=2020&category=", &[]).await).await;
  assert!(html.contains("Roger Penrose"));
  assert!(html.contains("World Food Programme"));
  assert!(!html.contains("James Peebles"));
  assert!(html.contains("<option value=\"2020\" selected>"));
}

#[tokio::test]
async fn prize_list_target_gets_only_the_list() {
  let (state, _) = make_state().await;
  let html = body_text(
    get(state, "/prize?category=peace", &[HX, ("hx-target", "prize-list")]).await,
  )
  .await;
  assert!(html.trim_start().starts_with("<div id=\"prize-list\">"), "{html}");
  assert!(!html.contains("<nav"));
  assert!(html.contains("World Food Programme"));
  assert!(!html.contains("Roger Penrose"));
}

#[tokio::test]
async fn unknown_filter_renders_empty_list() {
  let (state, _) = make_state().await;
  let resp = get(state, "/prize?year=1800", &[]).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert!(body_text(resp).await.contains("No prizes match."));
}

// ─── Auth gate ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn admin_redirects_anonymous_visitors() {
  let (state, _) = make_state().await;
  let resp = get(state, "/admin", &[]).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(resp.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn admin_htmx_redirect_uses_header() {
  let (state, _) = make_state().await;
  let resp = get(state, "/admin", &[HX]).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(resp.headers()["hx-redirect"], "/login");
}

#[tokio::test]
async fn admin_lists_users_when_signed_in() {
  let (state, _) = make_state().await;
  let resp = get(state, "/admin", &[SIGNED_IN]).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let html = body_text(resp).await;
  for name in ["alice", "bob", "charlie"] {
    assert!(html.contains(name), "missing {name}");
  }
  assert!(html.contains("Log out alice"));
}

#[tokio::test]
async fn switch_requires_session() {
  let (state, store) = make_state().await;
  let bob = store.get_by_username("bob").await.unwrap();

  let resp = send(state, "POST", &format!("/api/switch/{}", bob.id), &[HX], "").await;
  assert_eq!(resp.headers()["hx-redirect"], "/login");
  assert!(!store.get_user(&bob.id).await.unwrap().active);
}

#[tokio::test]
async fn switch_toggles_and_returns_user_list() {
  let (state, store) = make_state().await;
  let bob = store.get_by_username("bob").await.unwrap();
  assert!(!bob.active);

  let uri = format!("/api/switch/{}", bob.id);
  let resp = send(state.clone(), "POST", &uri, &[HX, SIGNED_IN], "").await;
  assert_eq!(resp.status(), StatusCode::OK);

  let html = body_text(resp).await;
  assert!(html.trim_start().starts_with("<table id=\"user-list\""), "{html}");
  assert!(store.get_user(&bob.id).await.unwrap().active);

  send(state, "POST", &uri, &[HX, SIGNED_IN], "").await;
  assert!(!store.get_user(&bob.id).await.unwrap().active);
}

// SQLite ids are free text, so an unknown id is a 404 rather than a 400.
#[tokio::test]
async fn switch_unknown_user_is_not_found() {
  let (state, _) = make_state().await;
  let resp = send(state, "POST", "/api/switch/missing", &[SIGNED_IN], "").await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn switch_blank_id_is_bad_request() {
  let (state, _) = make_state().await;
  let resp = send(state, "POST", "/api/switch/%20", &[SIGNED_IN], "").await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ─── Login / logout ──────────────────────────────────────────────────────────

const FORM: (&str, &str) = ("content-type", "application/x-www-form-urlencoded");

#[tokio::test]
async fn login_sets_session_cookie() {
  let (state, _) = make_state().await;
  let body = format!("username=alice&password={SEED_PASSWORD}");
  let resp = send(state, "POST", "/login", &[FORM], &body).await;

  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(resp.headers()[header::LOCATION], "/");
  let cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap();
  assert!(cookie.starts_with("session=alice;"), "{cookie}");
}

#[tokio::test]
async fn htmx_login_redirects_with_header() {
  let (state, _) = make_state().await;
  let body = format!("username=alice&password={SEED_PASSWORD}");
  let resp = send(state, "POST", "/login", &[FORM, HX], &body).await;

  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(resp.headers()["hx-redirect"], "/");
  assert!(resp.headers().contains_key(header::SET_COOKIE));
}

#[tokio::test]
async fn wrong_password_rerenders_form() {
  let (state, _) = make_state().await;
  let resp = send(state, "POST", "/login", &[FORM], "username=alice&password=nope").await;

  assert_eq!(resp.status(), StatusCode::OK);
  assert!(!resp.headers().contains_key(header::SET_COOKIE));
  assert!(body_text(resp).await.contains("Invalid username or password."));
}

#[tokio::test]
async fn logout_clears_cookie() {
  let (state, _) = make_state().await;
  let resp = send(state, "POST", "/logout", &[SIGNED_IN], "").await;

  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  let cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap();
  assert!(cookie.contains("Max-Age=0"));
}
