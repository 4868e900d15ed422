use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, error, info};
use sitekit_core::errors::{DatabaseError, Result};

use super::repository::SqliteDocumentCollection;
use crate::db::{self, spawn_writer, DbPool, WriteHandle};

/// Process-wide handle to the document database.
///
/// Opened once at startup with [`DocumentDatabase::initialize`] and closed once
/// with [`DocumentDatabase::shutdown`]. Collections handed out before shutdown
/// fail with `DatabaseError::Closed` afterwards.
pub struct DocumentDatabase {
    name: String,
    path: String,
    pool: Arc<DbPool>,
    writer: WriteHandle,
    closed: Arc<AtomicBool>,
}

/// Accepts a bare file path or a `sqlite://` URL.
fn database_path(url: &str) -> &str {
    url.strip_prefix("sqlite://").unwrap_or(url)
}

impl DocumentDatabase {
    /// Opens (creating if needed) the database at `url` and applies migrations.
    ///
    /// Must be called from within a Tokio runtime, which hosts the writer task.
    pub fn initialize(url: &str, name: &str) -> Result<Self> {
        let path = database_path(url.trim());
        if path.is_empty() {
            return Err(DatabaseError::ConnectionFailed(
                "a database connection string is required".to_string(),
            )
            .into());
        }
        if name.trim().is_empty() {
            return Err(DatabaseError::ConnectionFailed(
                "a database name is required".to_string(),
            )
            .into());
        }

        let path = db::init(path)?;
        let pool = db::create_pool(&path)?;
        db::run_migrations(&pool)?;
        let writer = spawn_writer(pool.as_ref().clone());

        info!("Opened document database '{}' at {}", name, path);
        Ok(Self {
            name: name.trim().to_string(),
            path,
            pool,
            writer,
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// A handle on the named collection of this database.
    pub fn collection(&self, name: &str) -> SqliteDocumentCollection {
        SqliteDocumentCollection::new(
            &self.name,
            name,
            self.pool.clone(),
            self.writer.clone(),
            self.closed.clone(),
        )
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Closes the database. Later calls are no-ops.
    ///
    /// Failures while flushing are logged and never returned.
    pub fn shutdown(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            debug!("Document database '{}' already closed", self.name);
            return;
        }

        match db::checkpoint(&self.pool) {
            Ok(()) => info!("Closed document database '{}'", self.name),
            Err(e) => error!("Failed to close document database '{}': {}", self.name, e),
        }
    }
}
