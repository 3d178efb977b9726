//! BSON document shapes and their conversion into domain records.

use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

use spahtmx_core::{
  prize::{Laureate, NewLaureate, NewPrize, Prize},
  user::{NewUser, User},
};

use crate::{Error, Result};

pub fn parse_id(s: &str) -> Result<ObjectId> {
  ObjectId::parse_str(s.trim()).map_err(|_| Error::InvalidId(s.to_owned()))
}

pub fn to_bson_dt(dt: DateTime<Utc>) -> bson::DateTime {
  bson::DateTime::from_millis(dt.timestamp_millis())
}

pub fn from_bson_dt(dt: bson::DateTime) -> Result<DateTime<Utc>> {
  let ms = dt.timestamp_millis();
  DateTime::from_timestamp_millis(ms).ok_or(Error::Timestamp(ms))
}

// ─── Users ───────────────────────────────────────────────────────────────────

/// Also reads user documents written without audit timestamps or with the
/// hash stored under `password`; missing timestamps fall back to the moment
/// encoded in the `ObjectId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDoc {
  #[serde(rename = "_id")]
  pub id:            ObjectId,
  pub username:      String,
  #[serde(default, alias = "password", skip_serializing_if = "Option::is_none")]
  pub password_hash: Option<String>,
  #[serde(default)]
  pub email:         String,
  #[serde(default)]
  pub status:        bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at:    Option<bson::DateTime>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at:    Option<bson::DateTime>,
}

impl UserDoc {
  pub fn new(input: NewUser, now: DateTime<Utc>) -> Self {
    Self {
      id:            ObjectId::new(),
      username:      input.username,
      password_hash: input.password_hash,
      email:         input.email,
      status:        input.active,
      created_at:    Some(to_bson_dt(now)),
      updated_at:    Some(to_bson_dt(now)),
    }
  }

  /// Rebuild a document from a domain user, keeping its id.
  pub fn from_user(user: User, now: DateTime<Utc>) -> Result<Self> {
    Ok(Self {
      id:            parse_id(&user.id)?,
      username:      user.username,
      password_hash: user.password_hash,
      email:         user.email,
      status:        user.active,
      created_at:    Some(to_bson_dt(user.created_at)),
      updated_at:    Some(to_bson_dt(now)),
    })
  }
}

impl TryFrom<UserDoc> for User {
  type Error = Error;

  fn try_from(d: UserDoc) -> Result<Self> {
    let created_at = d.created_at.unwrap_or_else(|| d.id.timestamp());
    let updated_at = d.updated_at.unwrap_or(created_at);
    Ok(Self {
      id:            d.id.to_hex(),
      username:      d.username,
      password_hash: d.password_hash,
      email:         d.email,
      active:        d.status,
      created_at:    from_bson_dt(created_at)?,
      updated_at:    from_bson_dt(updated_at)?,
    })
  }
}

// ─── Prizes ──────────────────────────────────────────────────────────────────

/// Field names follow the Nobel Prize dump so imported collections load as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrizeDoc {
  #[serde(rename = "_id")]
  pub id:                 ObjectId,
  pub year:               String,
  pub category:           String,
  #[serde(rename = "overallMotivation", default)]
  pub overall_motivation: String,
  #[serde(default)]
  pub laureates:          Vec<LaureateDoc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaureateDoc {
  #[serde(default)]
  pub firstname:  String,
  #[serde(default)]
  pub surname:    String,
  #[serde(default)]
  pub motivation: String,
  #[serde(default)]
  pub share:      String,
}

impl From<NewLaureate> for LaureateDoc {
  fn from(l: NewLaureate) -> Self {
    Self {
      firstname:  l.firstname,
      surname:    l.surname,
      motivation: l.motivation,
      share:      l.share,
    }
  }
}

impl From<LaureateDoc> for Laureate {
  fn from(l: LaureateDoc) -> Self {
    Self {
      firstname:  l.firstname,
      surname:    l.surname,
      motivation: l.motivation,
      share:      l.share,
    }
  }
}

impl From<NewPrize> for PrizeDoc {
  fn from(p: NewPrize) -> Self {
    Self {
      id:                 ObjectId::new(),
      year:               p.year,
      category:           p.category,
      overall_motivation: p.overall_motivation,
      laureates:          p.laureates.into_iter().map(Into::into).collect(),
    }
  }
}

impl From<PrizeDoc> for Prize {
  fn from(p: PrizeDoc) -> Self {
    Self {
      id:                 p.id.to_hex(),
      year:               p.year,
      category:           p.category,
      overall_motivation: p.overall_motivation,
      laureates:          p.laureates.into_iter().map(Into::into).collect(),
    }
  }
}
