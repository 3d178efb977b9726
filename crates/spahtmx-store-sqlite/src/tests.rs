//! Integration tests for `SqliteStore` against an in-memory database.

use std::sync::Arc;

use spahtmx_core::{
  Error as CoreError,
  prize::{NewLaureate, NewPrize, PrizeQuery},
  seed::{SEED_PASSWORD, seed},
  service::{AuthService, PrizeService, UserService, hash_password},
  store::Repository,
  user::NewUser,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn prize(year: &str, category: &str, laureates: &[(&str, &str)]) -> NewPrize {
  NewPrize {
    year:               year.into(),
    category:           category.into(),
    overall_motivation: String::new(),
    laureates:          laureates
      .iter()
      .map(|&(first, last)| NewLaureate {
        firstname:  first.into(),
        surname:    last.into(),
        motivation: "\"for services\"".into(),
        share:      laureates.len().to_string(),
      })
      .collect(),
  }
}

fn sample_prizes() -> Vec<NewPrize> {
  vec![
    prize("2019", "physics", &[("James", "Peebles")]),
    prize("2020", "physics", &[("Roger", "Penrose"), ("Reinhard", "Genzel")]),
    prize("2020", "chemistry", &[
      ("Emmanuelle", "Charpentier"),
      ("Jennifer A.", "Doudna"),
    ]),
    prize("2020", "peace", &[("World Food Programme", "")]),
  ]
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_user() {
  let s = store().await;

  let user = s
    .create_user(NewUser::new("dora", "dora@fake.com"))
    .await
    .unwrap();
  assert!(user.active);
  assert_eq!(user.created_at, user.updated_at);

  let fetched = s.get_user(&user.id).await.unwrap();
  assert_eq!(fetched, user);

  let by_name = s.get_by_username("dora").await.unwrap();
  assert_eq!(by_name.id, user.id);
}

#[tokio::test]
async fn get_user_missing_is_not_found() {
  let s = store().await;
  let err = s.get_user("no-such-id").await.unwrap_err();
  assert!(matches!(err, Error::UserNotFound(_)));

  let core: CoreError = err.into();
  assert!(matches!(core, CoreError::NotFound(_)));
}

#[tokio::test]
async fn duplicate_username_is_invalid_input() {
  let s = store().await;
  s.create_user(NewUser::new("dora", "a@fake.com")).await.unwrap();

  let err = s
    .create_user(NewUser::new("dora", "b@fake.com"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::UsernameTaken(_)));
  assert!(matches!(CoreError::from(err), CoreError::InvalidInput(_)));
  assert_eq!(s.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn users_are_listed_by_username() {
  let s = store().await;
  for name in ["carol", "alice", "bob"] {
    s.create_user(NewUser::new(name, format!("{name}@fake.com")))
      .await
      .unwrap();
  }

  let names: Vec<_> = s
    .get_users()
    .await
    .unwrap()
    .into_iter()
    .map(|u| u.username)
    .collect();
  assert_eq!(names, ["alice", "bob", "carol"]);
}

#[tokio::test]
async fn update_user_overwrites_fields() {
  let s = store().await;
  let mut user = s
    .create_user(NewUser::new("dora", "dora@fake.com"))
    .await
    .unwrap();

  user.email = "dora@real.com".into();
  user.active = false;
  s.update_user(user.clone()).await.unwrap();

  let fetched = s.get_user(&user.id).await.unwrap();
  assert_eq!(fetched.email, "dora@real.com");
  assert!(!fetched.active);
  assert!(fetched.updated_at >= fetched.created_at);

  user.id = "missing".into();
  assert!(matches!(
    s.update_user(user).await.unwrap_err(),
    Error::UserNotFound(_)
  ));
}

#[tokio::test]
async fn toggle_twice_restores_status() {
  let s = store().await;
  let user = s
    .create_user(NewUser::new("dora", "dora@fake.com"))
    .await
    .unwrap();

  let once = s.toggle_user_status(&user.id).await.unwrap();
  assert!(!once.active);
  assert!(!s.get_user(&user.id).await.unwrap().active);

  let twice = s.toggle_user_status(&user.id).await.unwrap();
  assert!(twice.active);
}

#[tokio::test]
async fn toggle_missing_user_is_not_found() {
  let s = store().await;
  let err = s.toggle_user_status("nobody").await.unwrap_err();
  assert!(matches!(err, Error::UserNotFound(_)));
}

#[tokio::test]
async fn concurrent_toggles_cancel_out() {
  let s = Arc::new(store().await);
  let user = s
    .create_user(NewUser::new("dora", "dora@fake.com"))
    .await
    .unwrap();

  let handles: Vec<_> = (0..10)
    .map(|_| {
      let s = Arc::clone(&s);
      let id = user.id.clone();
      tokio::spawn(async move { s.toggle_user_status(&id).await.unwrap() })
    })
    .collect();
  for h in handles {
    h.await.unwrap();
  }

  assert!(s.get_user(&user.id).await.unwrap().active);
}

// ─── Services ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn blank_id_is_rejected_before_the_store() {
  let users = UserService::new(Arc::new(store().await));
  let err = users.update_user_status("  ").await.unwrap_err();
  assert!(matches!(err, CoreError::InvalidInput(_)));
}

#[tokio::test]
async fn blank_username_is_rejected_before_the_store() {
  let repo = Arc::new(store().await);
  let users = UserService::new(Arc::clone(&repo));

  let err = users
    .create_user(NewUser::new("   ", "ghost@fake.com"))
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::InvalidInput(_)));
  assert_eq!(repo.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn login_checks_password() {
  let repo = Arc::new(store().await);
  let hash = hash_password("hunter2").unwrap();
  repo
    .create_user(NewUser::new("dora", "dora@fake.com").with_password_hash(hash))
    .await
    .unwrap();
  repo
    .create_user(NewUser::new("nopass", "nopass@fake.com"))
    .await
    .unwrap();

  let auth = AuthService::new(repo);
  assert_eq!(auth.login("dora", "hunter2").await.unwrap().username, "dora");
  assert!(matches!(
    auth.login("dora", "wrong").await,
    Err(CoreError::Unauthorized)
  ));
  assert!(matches!(
    auth.login("ghost", "hunter2").await,
    Err(CoreError::Unauthorized)
  ));
  assert!(matches!(
    auth.login("nopass", "").await,
    Err(CoreError::Unauthorized)
  ));
}

// ─── Prizes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_prize_keeps_laureate_order() {
  let s = store().await;
  let inserted = s
    .insert_prize(prize("2020", "chemistry", &[
      ("Emmanuelle", "Charpentier"),
      ("Jennifer A.", "Doudna"),
    ]))
    .await
    .unwrap();

  let fetched = s.get_prize(&inserted.id).await.unwrap();
  assert_eq!(fetched, inserted);
  assert_eq!(fetched.laureates[0].surname, "Charpentier");
  assert_eq!(fetched.laureates[1].full_name(), "Jennifer A. Doudna");
}

#[tokio::test]
async fn get_prize_bad_ids() {
  let s = store().await;
  assert!(matches!(
    s.get_prize("abc").await.unwrap_err(),
    Error::InvalidPrizeId(_)
  ));
  assert!(matches!(
    s.get_prize("999").await.unwrap_err(),
    Error::PrizeNotFound(_)
  ));
}

#[tokio::test]
async fn find_prizes_filters_and_orders() {
  let s = store().await;
  for p in sample_prizes() {
    s.insert_prize(p).await.unwrap();
  }

  let all = s.find_prizes(&PrizeQuery::all()).await.unwrap();
  let keys: Vec<_> = all
    .iter()
    .map(|p| (p.year.as_str(), p.category.as_str()))
    .collect();
  assert_eq!(keys, [
    ("2020", "chemistry"),
    ("2020", "peace"),
    ("2020", "physics"),
    ("2019", "physics"),
  ]);

  let y2020 = s.find_prizes(&PrizeQuery::by_year("2020")).await.unwrap();
  assert_eq!(y2020.len(), 3);
  assert!(y2020.iter().all(|p| p.year == "2020"));

  let physics = s
    .find_prizes(&PrizeQuery::by_category_and_year("physics", "2020"))
    .await
    .unwrap();
  assert_eq!(physics.len(), 1);
  assert_eq!(physics[0].laureates.len(), 2);

  let limited = s
    .find_prizes(&PrizeQuery { limit: Some(2), ..PrizeQuery::all() })
    .await
    .unwrap();
  assert_eq!(limited.len(), 2);

  let none = s.find_prizes(&PrizeQuery::by_year("1800")).await.unwrap();
  assert!(none.is_empty());
}

#[tokio::test]
async fn delete_prize_cascades_to_laureates() {
  let s = store().await;
  let p = s
    .insert_prize(prize("2020", "physics", &[("Roger", "Penrose")]))
    .await
    .unwrap();

  s.delete_prize(&p.id).await.unwrap();
  assert!(matches!(
    s.get_prize(&p.id).await.unwrap_err(),
    Error::PrizeNotFound(_)
  ));
  assert!(matches!(
    s.delete_prize(&p.id).await.unwrap_err(),
    Error::PrizeNotFound(_)
  ));

  let orphans: i64 = s
    .conn
    .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM laureates", [], |r| r.get(0))?))
    .await
    .unwrap();
  assert_eq!(orphans, 0);
}

#[tokio::test]
async fn categories_and_years_are_distinct() {
  let s = store().await;
  for p in sample_prizes() {
    s.insert_prize(p).await.unwrap();
  }

  let prizes = PrizeService::new(Arc::new(s));
  assert_eq!(prizes.get_categories().await.unwrap(), [
    "chemistry", "peace", "physics"
  ]);
  assert_eq!(prizes.get_years().await.unwrap(), ["2020", "2019"]);
  assert_eq!(prizes.search("", "2019").await.unwrap().len(), 1);
}

// ─── Seeding ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn seeding_twice_does_not_duplicate() {
  let s = store().await;

  let first = seed(&s, sample_prizes()).await.unwrap();
  assert_eq!(first.users, 3);
  assert_eq!(first.prizes, 4);

  let second = seed(&s, sample_prizes()).await.unwrap();
  assert_eq!(second.users, 0);
  assert_eq!(second.prizes, 0);

  assert_eq!(s.count_users().await.unwrap(), 3);
  assert_eq!(s.count_prizes().await.unwrap(), 4);

  let bob = s.get_by_username("bob").await.unwrap();
  assert!(!bob.active);

  let auth = AuthService::new(Arc::new(s));
  assert!(auth.login("alice", SEED_PASSWORD).await.is_ok());
}
