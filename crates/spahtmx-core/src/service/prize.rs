use std::sync::Arc;

use crate::{
  Result,
  prize::{Prize, PrizeQuery},
  store::Repository,
};

pub struct PrizeService<R> {
  repo: Arc<R>,
}

impl<R> Clone for PrizeService<R> {
  fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo) } }
}

impl<R: Repository> PrizeService<R> {
  pub fn new(repo: Arc<R>) -> Self { Self { repo } }

  pub async fn get_prizes(&self) -> Result<Vec<Prize>> {
    self.find(&PrizeQuery::all()).await
  }

  pub async fn get_prize(&self, id: &str) -> Result<Prize> {
    self.repo.get_prize(id).await.map_err(Into::into)
  }

  pub async fn get_prizes_by_year(&self, year: &str) -> Result<Vec<Prize>> {
    self.find(&PrizeQuery::by_year(year)).await
  }

  pub async fn get_prizes_by_category(&self, category: &str) -> Result<Vec<Prize>> {
    self.find(&PrizeQuery::by_category(category)).await
  }

  pub async fn get_prizes_by_category_and_year(
    &self,
    category: &str,
    year: &str,
  ) -> Result<Vec<Prize>> {
    self.find(&PrizeQuery::by_category_and_year(category, year)).await
  }

  /// Filter by the raw values of the prize page form; blank means "any".
  pub async fn search(&self, category: &str, year: &str) -> Result<Vec<Prize>> {
    self.find(&PrizeQuery::from_form(category, year)).await
  }

  pub async fn get_categories(&self) -> Result<Vec<String>> {
    self.repo.categories().await.map_err(Into::into)
  }

  pub async fn get_years(&self) -> Result<Vec<String>> {
    self.repo.years().await.map_err(Into::into)
  }

  async fn find(&self, query: &PrizeQuery) -> Result<Vec<Prize>> {
    self.repo.find_prizes(query).await.map_err(Into::into)
  }
}
