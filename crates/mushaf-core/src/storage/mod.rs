//! Storage layer
//!
//! SQLite-backed persistence for the corpus and the reading bookmark.
//!
//! ## Layout
//!
//! - `database`: the connection, its lock, and transactions
//! - `schema`: table definitions and schema versioning
//! - `corpus`: chapters, verses, and the volume index
//! - `bookmark`: the single reading position
//!
//! The store modules are plain functions over a `&Connection` so the access
//! layer can compose several of them inside one transaction.

pub mod bookmark;
pub mod corpus;
pub mod database;
pub mod error;
pub mod schema;

pub use corpus::CorpusCounts;
pub use database::{Database, StorageStats};
pub use error::{StorageError, StorageResult};
pub use schema::{init_schema, needs_init, SCHEMA_VERSION};
