//! Core types and trait definitions for the spahtmx admin panel.
//!
//! No HTTP or database dependencies live here. Storage backends implement
//! [`store::Repository`]; the web layer talks to them only through the
//! services in [`service`].

pub mod error;
pub mod prize;
pub mod seed;
pub mod service;
pub mod store;
pub mod user;

pub use error::{Error, Result};
