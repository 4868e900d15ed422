mod database;
mod model;
mod repository;

#[cfg(test)]
mod tests;

pub use database::DocumentDatabase;
pub use model::{DocumentDB, NewDocumentDB};
pub use repository::SqliteDocumentCollection;
