//! The record capability and pagination types shared by every repository.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE, DEFAULT_PAGE_LIMIT};

/// Stored field holding the creation timestamp.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Stored field holding the last-update timestamp.
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// A persisted entity with an identity and creation/update timestamps.
///
/// Implementors serialize their identity as `_id` and their timestamps as
/// `createdAt`/`updatedAt`. The identity is assigned by the store on creation
/// and never changes afterwards.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Creation input: the record without identity and timestamps.
    type New: Serialize + Send + Sync;

    /// Partial update: any subset of fields except identity and `createdAt`.
    type Patch: Serialize + Send + Sync;

    /// Collection the records live in.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;

    fn updated_at(&self) -> DateTime<Utc>;
}

/// One pagination window of a query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Size of the full matching set, independent of the window.
    pub total: u64,
}

/// 1-based page number and page size.
///
/// Values are caller-trusted: no bounds validation happens here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    /// Number of records before the window: `(page - 1) * limit`.
    pub fn skip(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}
