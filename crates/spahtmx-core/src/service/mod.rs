//! Services sit between the web handlers and a [`Repository`].
//!
//! They are thin: most calls forward to the store and convert the backend
//! error into [`crate::Error`]. Each service holds an `Arc` of the same store,
//! so cloning one is cheap.
//!
//! [`Repository`]: crate::store::Repository

mod auth;
mod prize;
mod user;

pub use auth::{AuthService, hash_password, verify_password};
pub use prize::PrizeService;
pub use user::UserService;
