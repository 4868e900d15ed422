//! Records module - the record capability and the generic repository built on
//! top of a document store.

mod records_model;
mod repository;
#[cfg(test)]
mod repository_tests;

pub use records_model::{Page, PageRequest, Record, CREATED_AT_FIELD, UPDATED_AT_FIELD};
pub use repository::Repository;
