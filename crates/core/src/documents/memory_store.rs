//! Process-local document collection.

use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use super::documents_model::{apply_set, normalize_window, Document, Filter, ID_FIELD};
use super::documents_traits::DocumentStoreTrait;
use crate::errors::{DatabaseError, Result};

/// A [`DocumentStoreTrait`] backed by a vector in memory.
///
/// Documents keep insertion order. Contents are lost when the value is dropped.
pub struct InMemoryDocumentStore {
    name: String,
    documents: RwLock<Vec<Document>>,
}

impl InMemoryDocumentStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored documents, regardless of any filter.
    pub fn len(&self) -> usize {
        self.documents.read().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> DatabaseError {
    DatabaseError::Internal("in-memory collection lock poisoned".to_string())
}

#[async_trait]
impl DocumentStoreTrait for InMemoryDocumentStore {
    fn collection_name(&self) -> &str {
        &self.name
    }

    async fn find_one(&self, filter: &Filter) -> Result<Option<Document>> {
        let docs = self.documents.read().map_err(|_| poisoned())?;
        Ok(docs.iter().find(|d| filter.matches(d)).cloned())
    }

    async fn find(&self, filter: &Filter, skip: i64, limit: i64) -> Result<Vec<Document>> {
        let (skip, limit) = normalize_window(skip, limit);
        let docs = self.documents.read().map_err(|_| poisoned())?;
        let matching = docs
            .iter()
            .filter(|d| filter.matches(d))
            .skip(skip as usize)
            .cloned();
        Ok(match limit {
            Some(limit) => matching.take(limit as usize).collect(),
            None => matching.collect(),
        })
    }

    async fn count(&self, filter: &Filter) -> Result<u64> {
        let docs = self.documents.read().map_err(|_| poisoned())?;
        Ok(docs.iter().filter(|d| filter.matches(d)).count() as u64)
    }

    async fn insert_one(&self, mut document: Document) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        self.documents
            .write()
            .map_err(|_| poisoned())?
            .push(document);
        Ok(id)
    }

    async fn find_one_and_update(
        &self,
        filter: &Filter,
        set: Document,
    ) -> Result<Option<Document>> {
        let mut docs = self.documents.write().map_err(|_| poisoned())?;
        Ok(docs.iter_mut().find(|d| filter.matches(d)).map(|doc| {
            apply_set(doc, set);
            doc.clone()
        }))
    }

    async fn delete_one(&self, filter: &Filter) -> Result<u64> {
        let mut docs = self.documents.write().map_err(|_| poisoned())?;
        match docs.iter().position(|d| filter.matches(d)) {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
