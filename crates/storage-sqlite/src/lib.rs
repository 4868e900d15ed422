//! SQLite storage implementation for sitekit.
//!
//! This crate provides the document store behind the core repositories using
//! Diesel ORM with SQLite. It contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - A single writer actor that serializes writes
//! - `SqliteDocumentCollection`, the `DocumentStoreTrait` implementation
//!
//! # Architecture
//!
//! ```text
//! core (records, users, auth)
//!            │
//!            ▼  DocumentStoreTrait
//!   storage-sqlite (this crate)
//!            │
//!            ▼
//!        SQLite DB
//! ```
//!
//! Every collection shares one `documents` table; rows are scoped by a
//! `<database>.<collection>` namespace.

pub mod db;
pub mod documents;
pub mod errors;
pub mod schema;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, DbConnection, DbPool, WriteHandle};

pub use documents::{DocumentDatabase, SqliteDocumentCollection};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from sitekit-core for convenience
pub use sitekit_core::errors::{DatabaseError, Error, Result};
