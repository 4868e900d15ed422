//! Sitekit Core - Domain entities, services, and traits.
//!
//! This crate contains the account and authentication logic of the site.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` and `identity` crates.

pub mod auth;
pub mod constants;
pub mod documents;
pub mod errors;
pub mod records;
pub mod users;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
