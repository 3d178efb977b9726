//! Route handlers, one module per page or endpoint group.

pub mod admin;
pub mod assets;
pub mod pages;
pub mod prize;
pub mod session;
pub mod status;
