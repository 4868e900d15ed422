//! Document store contract.
//!
//! This trait is the only seam between the domain and persistence. It speaks
//! plain JSON documents and carries no business rules, so any backing store
//! (SQLite, in-memory) can implement it.

use async_trait::async_trait;

use super::documents_model::{Document, Filter};
use crate::errors::Result;

/// Operations against one named document collection.
///
/// Every document returned by an implementation carries its identity under
/// `_id`. Each call is independently consistent; no cross-call transaction is
/// provided.
#[async_trait]
pub trait DocumentStoreTrait: Send + Sync {
    /// Name of the collection this handle operates on.
    fn collection_name(&self) -> &str;

    /// Returns the first document (in insertion order) matching `filter`.
    async fn find_one(&self, filter: &Filter) -> Result<Option<Document>>;

    /// Returns matching documents in insertion order, windowed by `skip`/`limit`.
    ///
    /// A negative `skip` is treated as zero; a non-positive `limit` means no limit.
    async fn find(&self, filter: &Filter, skip: i64, limit: i64) -> Result<Vec<Document>>;

    /// Counts all documents matching `filter`.
    async fn count(&self, filter: &Filter) -> Result<u64>;

    /// Persists a new document and returns the identity generated for it.
    ///
    /// Any `_id` present on the input is ignored.
    async fn insert_one(&self, document: Document) -> Result<String>;

    /// Merges `set` into the first matching document and returns the post-update image.
    async fn find_one_and_update(&self, filter: &Filter, set: Document)
        -> Result<Option<Document>>;

    /// Removes the first matching document. Returns the number removed (0 or 1).
    async fn delete_one(&self, filter: &Filter) -> Result<u64>;
}
