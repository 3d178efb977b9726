//! [`MongoStore`], the MongoDB implementation of [`Repository`].

use chrono::Utc;
use futures::TryStreamExt as _;
use mongodb::{
  Client, Collection, IndexModel,
  bson::{Bson, Document, doc},
  error::{ErrorKind, WriteFailure},
  options::{IndexOptions, ReturnDocument},
};

use spahtmx_core::{
  prize::{NewPrize, Prize, PrizeQuery},
  store::Repository,
  user::{NewUser, User},
};

use crate::{
  Error, Result,
  docs::{PrizeDoc, UserDoc, parse_id},
};

const DEFAULT_DATABASE: &str = "spahtmx";
const DUPLICATE_KEY: i32 = 11000;

/// A spahtmx repository backed by a MongoDB database.
#[derive(Clone)]
pub struct MongoStore {
  users:  Collection<UserDoc>,
  prizes: Collection<PrizeDoc>,
}

impl MongoStore {
  /// Connect to `url`. The database named in the URL path is used, or
  /// `spahtmx` when there is none.
  pub async fn connect(url: &str) -> Result<Self> {
    let client = Client::with_uri_str(url).await?;
    let db = client
      .default_database()
      .unwrap_or_else(|| client.database(DEFAULT_DATABASE));

    let store = Self {
      users:  db.collection("users"),
      prizes: db.collection("prize"),
    };
    store.init_indexes().await?;
    tracing::debug!(database = %db.name(), "connected to mongodb");
    Ok(store)
  }

  async fn init_indexes(&self) -> Result<()> {
    let unique = IndexOptions::builder().unique(true).build();
    self
      .users
      .create_index(
        IndexModel::builder()
          .keys(doc! { "username": 1 })
          .options(unique)
          .build(),
      )
      .await?;
    self
      .prizes
      .create_index(IndexModel::builder().keys(doc! { "year": -1, "category": 1 }).build())
      .await?;
    Ok(())
  }

  async fn find_user(&self, filter: Document) -> Result<Option<User>> {
    self
      .users
      .find_one(filter)
      .await?
      .map(User::try_from)
      .transpose()
  }

  async fn distinct_strings(&self, field: &str, descending: bool) -> Result<Vec<String>> {
    let mut values: Vec<String> = self
      .prizes
      .distinct(field, doc! {})
      .await?
      .into_iter()
      .filter_map(|b| match b {
        Bson::String(s) => Some(s),
        _ => None,
      })
      .collect();
    values.sort();
    if descending {
      values.reverse();
    }
    Ok(values)
  }
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
  matches!(
    e.kind.as_ref(),
    ErrorKind::Write(WriteFailure::WriteError(w)) if w.code == DUPLICATE_KEY
  )
}

impl Repository for MongoStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn get_users(&self) -> Result<Vec<User>> {
    let docs: Vec<UserDoc> = self
      .users
      .find(doc! {})
      .sort(doc! { "username": 1 })
      .await?
      .try_collect()
      .await?;
    docs.into_iter().map(User::try_from).collect()
  }

  async fn get_user(&self, id: &str) -> Result<User> {
    let oid = parse_id(id)?;
    self
      .find_user(doc! { "_id": oid })
      .await?
      .ok_or_else(|| Error::UserNotFound(id.to_owned()))
  }

  async fn get_by_username(&self, username: &str) -> Result<User> {
    self
      .find_user(doc! { "username": username })
      .await?
      .ok_or_else(|| Error::UserNotFound(username.to_owned()))
  }

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let doc = UserDoc::new(input, Utc::now());
    match self.users.insert_one(&doc).await {
      Ok(_) => {}
      Err(e) if is_duplicate_key(&e) => return Err(Error::UsernameTaken(doc.username)),
      Err(e) => return Err(e.into()),
    }
    tracing::debug!(id = %doc.id, username = %doc.username, "inserted user");
    User::try_from(doc)
  }

  async fn update_user(&self, user: User) -> Result<()> {
    let id = user.id.clone();
    let doc = UserDoc::from_user(user, Utc::now())?;
    let done = self.users.replace_one(doc! { "_id": doc.id }, &doc).await?;
    if done.matched_count == 0 {
      return Err(Error::UserNotFound(id));
    }
    Ok(())
  }

  async fn toggle_user_status(&self, id: &str) -> Result<User> {
    let oid = parse_id(id)?;
    // A pipeline update flips the flag server-side in one operation.
    let flip = vec![doc! {
      "$set": { "status": { "$not": "$status" }, "updated_at": "$$NOW" }
    }];

    let user = self
      .users
      .find_one_and_update(doc! { "_id": oid }, flip)
      .return_document(ReturnDocument::After)
      .await?
      .ok_or_else(|| Error::UserNotFound(id.to_owned()))?;

    let user = User::try_from(user)?;
    tracing::debug!(id = %user.id, active = user.active, "toggled user status");
    Ok(user)
  }

  async fn count_users(&self) -> Result<u64> {
    Ok(self.users.count_documents(doc! {}).await?)
  }

  // ── Prizes ────────────────────────────────────────────────────────────────

  async fn find_prizes(&self, query: &PrizeQuery) -> Result<Vec<Prize>> {
    let mut filter = Document::new();
    if let Some(year) = &query.year {
      filter.insert("year", year.as_str());
    }
    if let Some(category) = &query.category {
      filter.insert("category", category.as_str());
    }

    let mut find = self
      .prizes
      .find(filter)
      .sort(doc! { "year": -1, "category": 1, "_id": 1 });
    if let Some(limit) = query.limit {
      find = find.limit(limit as i64);
    }

    let docs: Vec<PrizeDoc> = find.await?.try_collect().await?;
    Ok(docs.into_iter().map(Prize::from).collect())
  }

  async fn get_prize(&self, id: &str) -> Result<Prize> {
    let oid = parse_id(id)?;
    self
      .prizes
      .find_one(doc! { "_id": oid })
      .await?
      .map(Prize::from)
      .ok_or_else(|| Error::PrizeNotFound(id.to_owned()))
  }

  async fn insert_prize(&self, input: NewPrize) -> Result<Prize> {
    let doc = PrizeDoc::from(input);
    self.prizes.insert_one(&doc).await?;
    tracing::debug!(id = %doc.id, year = %doc.year, category = %doc.category, "inserted prize");
    Ok(doc.into())
  }

  async fn delete_prize(&self, id: &str) -> Result<()> {
    let oid = parse_id(id)?;
    let done = self.prizes.delete_one(doc! { "_id": oid }).await?;
    if done.deleted_count == 0 {
      return Err(Error::PrizeNotFound(id.to_owned()));
    }
    Ok(())
  }

  async fn categories(&self) -> Result<Vec<String>> {
    self.distinct_strings("category", false).await
  }

  async fn years(&self) -> Result<Vec<String>> {
    self.distinct_strings("year", true).await
  }

  async fn count_prizes(&self) -> Result<u64> {
    Ok(self.prizes.count_documents(doc! {}).await?)
  }
}
