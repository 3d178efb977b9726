//! Fixture data written to an empty store when seeding is enabled.
//!
//! Seeding is idempotent: users are only inserted into an empty user table and
//! prizes only into an empty prize table, so restarting with seeding still on
//! never duplicates records.

use crate::{
  Error, Result,
  prize::NewPrize,
  service::hash_password,
  store::Repository,
  user::NewUser,
};

/// Password shared by every seeded account.
pub const SEED_PASSWORD: &str = "password";

/// `(username, active)` pairs for the seeded accounts.
const SEED_USERS: &[(&str, bool)] =
  &[("alice", true), ("bob", false), ("charlie", true)];

/// How many records a seeding pass wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
  pub users:  usize,
  pub prizes: usize,
}

/// The fixture accounts, each with a freshly hashed [`SEED_PASSWORD`].
pub fn seed_users() -> Result<Vec<NewUser>> {
  let hash = hash_password(SEED_PASSWORD)?;
  Ok(
    SEED_USERS
      .iter()
      .map(|&(name, active)| {
        let user =
          NewUser::new(name, format!("{name}@fake.com")).with_password_hash(&hash);
        if active { user } else { user.inactive() }
      })
      .collect(),
  )
}

/// Seed `repo` with the fixture users and `prizes`.
///
/// A prize that fails to insert is logged and skipped; a user that fails to
/// insert aborts the pass.
pub async fn seed<R: Repository>(repo: &R, prizes: Vec<NewPrize>) -> Result<SeedReport> {
  let mut report = SeedReport::default();

  if repo.count_users().await.map_err(Into::<Error>::into)? == 0 {
    for user in seed_users()? {
      repo.create_user(user).await.map_err(Into::<Error>::into)?;
      report.users += 1;
    }
  } else {
    tracing::info!("users already present; skipping user seed");
  }

  if repo.count_prizes().await.map_err(Into::<Error>::into)? == 0 {
    for prize in prizes {
      let label = format!("{} {}", prize.year, prize.category);
      match repo.insert_prize(prize).await {
        Ok(_) => report.prizes += 1,
        Err(e) => tracing::error!(error = %e, prize = %label, "failed to insert prize"),
      }
    }
  } else {
    tracing::info!("prizes already present; skipping prize seed");
  }

  tracing::info!(users = report.users, prizes = report.prizes, "database seeded");
  Ok(report)
}
