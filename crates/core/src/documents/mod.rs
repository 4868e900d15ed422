//! Documents module - the record store adapter contract and an in-memory store.

mod documents_model;
mod documents_traits;
mod memory_store;

pub use documents_model::{apply_set, normalize_window, Document, Filter, ID_FIELD};
pub use documents_traits::DocumentStoreTrait;
pub use memory_store::InMemoryDocumentStore;
