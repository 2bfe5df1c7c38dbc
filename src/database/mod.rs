//! Bookmark store database layer.
//!
//! Provides SQLite connection management, schema migrations, the
//! [`BookmarkStore`] capability trait and its SQLite implementation.
//!
//! # Usage
//!
//! ```no_run
//! use bookmark_sync::database::SqliteStore;
//!
//! // Open a persistent store
//! let store = SqliteStore::open("bookmarks.db").expect("failed to open store");
//!
//! // Or use an in-memory store for testing
//! let store = SqliteStore::open_in_memory().expect("failed to open in-memory store");
//! ```

pub mod connection;
pub mod migrations;
pub mod sqlite_store;
pub mod store;

pub use connection::Database;
pub use sqlite_store::SqliteStore;
pub use store::{BookmarkStore, Field, FieldValue, Query};
