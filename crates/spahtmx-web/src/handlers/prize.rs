//! The Nobel Prize browser.

use axum::{
  extract::{Query, State},
  response::Html,
};
use serde::Deserialize;
use spahtmx_core::store::Repository;

use crate::{
  AppState,
  auth::Visitor,
  error::Result,
  htmx::Htmx,
  render::{self, PRIZE_LIST_ID, PrizeList, PrizePage},
};

/// Values of the filter form; blank means "any".
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PrizeFilter {
  pub category: String,
  pub year:     String,
}

pub async fn page<R: Repository>(
  State(state): State<AppState<R>>,
  hx: Htmx,
  visitor: Visitor,
  Query(filter): Query<PrizeFilter>,
) -> Result<Html<String>> {
  let prizes = state.prizes.search(&filter.category, &filter.year).await?;

  // The filter form only needs fresh results.
  if hx.targets(PRIZE_LIST_ID) {
    return render::fragment(&PrizeList { prizes });
  }

  let content = PrizePage {
    prizes,
    categories: state.prizes.get_categories().await?,
    years: state.prizes.get_years().await?,
    selected_category: filter.category,
    selected_year: filter.year,
  };
  render::page(&hx, &visitor, "/prize", "Nobel Prizes", &content)
}
