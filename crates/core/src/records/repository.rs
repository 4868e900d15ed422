use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use log::debug;
use serde::Serialize;
use serde_json::Value;

use super::records_model::{Page, PageRequest, Record, CREATED_AT_FIELD, UPDATED_AT_FIELD};
use crate::documents::{Document, DocumentStoreTrait, Filter, ID_FIELD};
use crate::errors::{Error, Result};

/// Create/read/update/delete/paginate over any [`Record`] type.
///
/// The repository owns identity propagation and timestamp bookkeeping so that
/// concrete repositories only add their own lookups on top of it.
pub struct Repository<T: Record> {
    store: Arc<dyn DocumentStoreTrait>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Record> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStoreTrait>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    /// Returns `None` when no record has this id.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<T>> {
        self.find_one(&Filter::by_id(id)).await
    }

    pub async fn find_one(&self, filter: &Filter) -> Result<Option<T>> {
        self.store
            .find_one(filter)
            .await?
            .map(decode::<T>)
            .transpose()
    }

    /// Fetches one window of matching records together with the full match count.
    ///
    /// The window and the count are two independent store calls, so under
    /// concurrent writes they may disagree.
    pub async fn find(&self, filter: &Filter, request: PageRequest) -> Result<Page<T>> {
        let (documents, total) = futures::try_join!(
            self.store.find(filter, request.skip(), request.limit),
            self.store.count(filter)
        )?;
        let items = documents
            .into_iter()
            .map(decode::<T>)
            .collect::<Result<Vec<_>>>()?;
        Ok(Page { items, total })
    }

    /// Persists a new record with `createdAt == updatedAt == now`.
    pub async fn create(&self, data: T::New) -> Result<T> {
        let now = timestamp_value()?;
        let mut document = encode(&data)?;
        for reserved in [ID_FIELD, CREATED_AT_FIELD, UPDATED_AT_FIELD] {
            document.remove(reserved);
        }
        document.insert(CREATED_AT_FIELD.to_string(), now.clone());
        document.insert(UPDATED_AT_FIELD.to_string(), now);

        let id = self.store.insert_one(document.clone()).await?;
        debug!("Created {} record {}", self.store.collection_name(), id);

        document.insert(ID_FIELD.to_string(), Value::String(id));
        decode(document)
    }

    /// Merges `patch` into the stored record and stamps `updatedAt`.
    ///
    /// Returns `None` when no record has this id.
    pub async fn update(&self, id: &str, patch: T::Patch) -> Result<Option<T>> {
        let mut set = encode(&patch)?;
        set.remove(ID_FIELD);
        set.remove(CREATED_AT_FIELD);
        set.insert(UPDATED_AT_FIELD.to_string(), timestamp_value()?);

        self.store
            .find_one_and_update(&Filter::by_id(id), set)
            .await?
            .map(decode::<T>)
            .transpose()
    }

    /// Returns true iff exactly one record was removed.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let deleted = self.store.delete_one(&Filter::by_id(id)).await?;
        Ok(deleted == 1)
    }
}

fn timestamp_value() -> Result<Value> {
    Ok(serde_json::to_value(Utc::now())?)
}

fn encode<S: Serialize>(value: &S) -> Result<Document> {
    match serde_json::to_value(value)? {
        Value::Object(document) => Ok(document),
        other => Err(Error::Unexpected(format!(
            "record data must serialize to an object, got {}",
            other
        ))),
    }
}

fn decode<T: Record>(document: Document) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}
