//! PostgreSQL backend for the spahtmx repository, built on a `sqlx` pool.

mod rows;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::PgStore;
