use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use diesel::sqlite::Sqlite;
use log::debug;
use serde_json::Value;
use uuid::Uuid;

use sitekit_core::documents::{
    apply_set, normalize_window, Document, DocumentStoreTrait, Filter, ID_FIELD,
};
use sitekit_core::errors::{DatabaseError, Result};

use super::model::{encode_body, DocumentDB, NewDocumentDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::documents;

diesel::define_sql_function! {
    /// SQLite JSON1 `json_extract`.
    fn json_extract(document: Text, path: Text) -> Nullable<Text>;
}

diesel::define_sql_function! {
    /// SQLite JSON1 `json_type`.
    fn json_type(document: Text, path: Text) -> Nullable<Text>;
}

/// JSON path addressing a top-level field, quoted so any key is accepted.
fn field_path(field: &str) -> String {
    format!("$.\"{}\"", field.replace('"', "\\\""))
}

/// Restricts `query` to one namespace and to the equality conditions of `filter`.
///
/// A `null` condition matches documents where the field is null or absent.
/// Other conditions compare the JSON type as well, since `json_extract`
/// returns `true` as 1.
fn filtered<'a, ST: 'a>(
    query: documents::BoxedQuery<'a, Sqlite, ST>,
    namespace: &str,
    filter: &Filter,
) -> documents::BoxedQuery<'a, Sqlite, ST> {
    let mut query = query.filter(documents::namespace.eq(namespace.to_string()));
    for (field, value) in filter.conditions() {
        query = match (field, value) {
            (ID_FIELD, Value::String(id)) => query.filter(documents::id.eq(id.clone())),
            (ID_FIELD, other) => query.filter(documents::id.eq(other.to_string())),
            (_, Value::Null) => {
                query.filter(json_extract(documents::body, field_path(field)).is_null())
            }
            (_, value) => {
                let literal = value.to_string();
                query.filter(
                    json_extract(documents::body, field_path(field))
                        .eq(json_extract(literal.clone(), "$"))
                        .and(
                            json_type(documents::body, field_path(field))
                                .eq(json_type(literal, "$")),
                        ),
                )
            }
        };
    }
    query
}

fn to_sql_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// One collection of a [`DocumentDatabase`](super::DocumentDatabase).
///
/// Reads use pooled connections; writes go through the single writer actor.
pub struct SqliteDocumentCollection {
    name: String,
    namespace: String,
    pool: Arc<DbPool>,
    writer: WriteHandle,
    closed: Arc<AtomicBool>,
}

impl SqliteDocumentCollection {
    pub(crate) fn new(
        database: &str,
        name: &str,
        pool: Arc<DbPool>,
        writer: WriteHandle,
        closed: Arc<AtomicBool>,
    ) -> Self {
        Self {
            name: name.to_string(),
            namespace: format!("{}.{}", database, name),
            pool,
            writer,
            closed,
        }
    }

    /// `<database>.<collection>`, the key scoping this collection's rows.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(DatabaseError::Closed.into());
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStoreTrait for SqliteDocumentCollection {
    fn collection_name(&self) -> &str {
        &self.name
    }

    async fn find_one(&self, filter: &Filter) -> Result<Option<Document>> {
        self.ensure_open()?;
        let mut conn = get_connection(&self.pool)?;

        let row = filtered(
            documents::table.select(DocumentDB::as_select()).into_boxed(),
            &self.namespace,
            filter,
        )
        .order(documents::seq.asc())
        .first::<DocumentDB>(&mut conn)
        .optional()
        .map_err(StorageError::from)?;

        row.map(DocumentDB::into_document).transpose()
    }

    async fn find(&self, filter: &Filter, skip: i64, limit: i64) -> Result<Vec<Document>> {
        self.ensure_open()?;
        let (skip, limit) = normalize_window(skip, limit);
        let mut conn = get_connection(&self.pool)?;

        let mut query = filtered(
            documents::table.select(DocumentDB::as_select()).into_boxed(),
            &self.namespace,
            filter,
        )
        .order(documents::seq.asc())
        .offset(to_sql_count(skip));
        if let Some(limit) = limit {
            query = query.limit(to_sql_count(limit));
        }

        let rows = query
            .load::<DocumentDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(DocumentDB::into_document).collect()
    }

    async fn count(&self, filter: &Filter) -> Result<u64> {
        self.ensure_open()?;
        let mut conn = get_connection(&self.pool)?;

        let total = filtered(
            documents::table.select(count_star()).into_boxed(),
            &self.namespace,
            filter,
        )
        .get_result::<i64>(&mut conn)
        .map_err(StorageError::from)?;

        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn insert_one(&self, document: Document) -> Result<String> {
        self.ensure_open()?;
        let id = Uuid::new_v4().to_string();
        let row = NewDocumentDB {
            namespace: self.namespace.clone(),
            id: id.clone(),
            body: encode_body(&document)?,
        };

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_into(documents::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await?;

        debug!("Inserted document {} into {}", id, self.namespace);
        Ok(id)
    }

    async fn find_one_and_update(
        &self,
        filter: &Filter,
        set: Document,
    ) -> Result<Option<Document>> {
        self.ensure_open()?;
        let namespace = self.namespace.clone();
        let filter = filter.clone();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Option<Document>> {
                let row = filtered(
                    documents::table.select(DocumentDB::as_select()).into_boxed(),
                    &namespace,
                    &filter,
                )
                .order(documents::seq.asc())
                .first::<DocumentDB>(conn)
                .optional()
                .map_err(StorageError::from)?;

                let Some(row) = row else {
                    return Ok(None);
                };
                let seq = row.seq;
                let mut document = row.into_document()?;
                apply_set(&mut document, set);

                diesel::update(documents::table.filter(documents::seq.eq(seq)))
                    .set(documents::body.eq(encode_body(&document)?))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                Ok(Some(document))
            })
            .await
    }

    async fn delete_one(&self, filter: &Filter) -> Result<u64> {
        self.ensure_open()?;
        let namespace = self.namespace.clone();
        let filter = filter.clone();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<u64> {
                let seq = filtered(
                    documents::table.select(documents::seq).into_boxed(),
                    &namespace,
                    &filter,
                )
                .order(documents::seq.asc())
                .first::<i32>(conn)
                .optional()
                .map_err(StorageError::from)?;

                let Some(seq) = seq else {
                    return Ok(0);
                };
                let deleted = diesel::delete(documents::table.filter(documents::seq.eq(seq)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(deleted as u64)
            })
            .await
    }
}
