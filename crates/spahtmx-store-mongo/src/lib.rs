//! MongoDB backend for the spahtmx repository.
//!
//! Users live in the `users` collection. Prizes live in `prize` with their
//! laureates embedded, so deleting a prize removes them with it.

mod docs;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::MongoStore;
