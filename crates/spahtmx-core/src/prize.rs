//! Nobel Prize records.
//!
//! The insert shapes ([`NewPrize`], [`NewLaureate`]) deserialise directly from
//! the Nobel Prize API JSON dump used for seeding, so field names follow that
//! format (`overallMotivation`, `firstname`, ...).

use serde::{Deserialize, Serialize};

use crate::Result;

// ─── Stored records ──────────────────────────────────────────────────────────

/// A prize awarded in one category for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prize {
  pub id:                 String,
  pub year:               String,
  pub category:           String,
  /// Empty when the prize has no overall motivation.
  pub overall_motivation: String,
  /// In insertion order; owned by this prize.
  pub laureates:          Vec<Laureate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Laureate {
  pub firstname:  String,
  pub surname:    String,
  pub motivation: String,
  /// Denominator of the laureate's share of the prize, e.g. `"2"` for half.
  pub share:      String,
}

impl Laureate {
  pub fn full_name(&self) -> String {
    if self.surname.is_empty() {
      self.firstname.clone()
    } else {
      format!("{} {}", self.firstname, self.surname)
    }
  }
}

// ─── Insert shapes ───────────────────────────────────────────────────────────

/// Input to [`crate::store::Repository::insert_prize`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPrize {
  pub year:               String,
  pub category:           String,
  #[serde(default)]
  pub overall_motivation: String,
  #[serde(default)]
  pub laureates:          Vec<NewLaureate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewLaureate {
  #[serde(default)]
  pub firstname:  String,
  #[serde(default)]
  pub surname:    String,
  #[serde(default)]
  pub motivation: String,
  #[serde(default)]
  pub share:      String,
}

impl From<NewLaureate> for Laureate {
  fn from(l: NewLaureate) -> Self {
    Self {
      firstname:  l.firstname,
      surname:    l.surname,
      motivation: l.motivation,
      share:      l.share,
    }
  }
}

/// The top-level shape of a Nobel Prize JSON dump.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrizeList {
  pub prizes: Vec<NewPrize>,
}

impl PrizeList {
  pub fn from_json(json: &str) -> Result<Self> { Ok(serde_json::from_str(json)?) }
}

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`crate::store::Repository::find_prizes`].
///
/// Both filters are exact matches; `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrizeQuery {
  pub year:     Option<String>,
  pub category: Option<String>,
  pub limit:    Option<usize>,
}

impl PrizeQuery {
  pub fn all() -> Self { Self::default() }

  pub fn by_year(year: impl Into<String>) -> Self {
    Self { year: Some(year.into()), ..Self::default() }
  }

  pub fn by_category(category: impl Into<String>) -> Self {
    Self { category: Some(category.into()), ..Self::default() }
  }

  pub fn by_category_and_year(
    category: impl Into<String>,
    year: impl Into<String>,
  ) -> Self {
    Self {
      year:     Some(year.into()),
      category: Some(category.into()),
      limit:    None,
    }
  }

  /// Build a query from two form values where an empty string means "any".
  pub fn from_form(category: &str, year: &str) -> Self {
    let non_empty = |s: &str| {
      let s = s.trim();
      (!s.is_empty()).then(|| s.to_owned())
    };
    Self {
      year:     non_empty(year),
      category: non_empty(category),
      limit:    None,
    }
  }
}
