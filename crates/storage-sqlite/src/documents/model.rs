//! Database models for stored documents.

use diesel::prelude::*;
use serde_json::Value;
use sitekit_core::documents::{Document, ID_FIELD};
use sitekit_core::errors::{DatabaseError, Result};

/// One stored document. The identity lives in `id`; `body` holds every
/// other field as a JSON object.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::documents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DocumentDB {
    pub seq: i32,
    pub namespace: String,
    pub id: String,
    pub body: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::documents)]
pub struct NewDocumentDB {
    pub namespace: String,
    pub id: String,
    pub body: String,
}

impl DocumentDB {
    /// Decodes the body and puts the identity back under `_id`.
    pub fn into_document(self) -> Result<Document> {
        let mut document = match serde_json::from_str::<Value>(&self.body)? {
            Value::Object(map) => map,
            other => {
                return Err(DatabaseError::MalformedDocument(format!(
                    "document {} is not an object: {}",
                    self.id, other
                ))
                .into())
            }
        };
        document.insert(ID_FIELD.to_string(), Value::String(self.id));
        Ok(document)
    }
}

/// Serializes a document for the `body` column. The identity is stored in its
/// own column, so `_id` is left out.
pub fn encode_body(document: &Document) -> Result<String> {
    let mut body = document.clone();
    body.remove(ID_FIELD);
    Ok(serde_json::to_string(&body)?)
}
