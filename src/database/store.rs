//! The capability surface the bookmark engine needs from a persistent store.
//!
//! A store offers point lookups, equality queries, insert, update and delete.
//! It is not expected to cascade deletes or to offer transactions; the
//! managers layer both hierarchy handling and batch semantics on top.

use async_trait::async_trait;

use crate::types::bookmark::{BookMark, BookmarkKind, BookmarkPatch};
use crate::types::errors::BookmarkError;

/// A queryable column of a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Kind,
    Address,
    Parent,
}

impl Field {
    pub fn column(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Kind => "type",
            Field::Address => "address",
            Field::Parent => "parent",
        }
    }
}

/// Right-hand side of an equality term.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    /// `None` matches records without a value (roots, for `Field::Parent`).
    Id(Option<i64>),
}

/// A conjunction of `field = value` terms. An empty query matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    terms: Vec<(Field, FieldValue)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: &str) -> Self {
        self.terms.push((Field::Title, FieldValue::Text(title.to_string())));
        self
    }

    pub fn kind(mut self, kind: BookmarkKind) -> Self {
        self.terms.push((Field::Kind, FieldValue::Text(kind.as_str().to_string())));
        self
    }

    pub fn address(mut self, address: &str) -> Self {
        self.terms.push((Field::Address, FieldValue::Text(address.to_string())));
        self
    }

    pub fn parent(mut self, parent: Option<i64>) -> Self {
        self.terms.push((Field::Parent, FieldValue::Id(parent)));
        self
    }

    pub fn terms(&self) -> &[(Field, FieldValue)] {
        &self.terms
    }
}

/// Persistent keyed store of bookmark records.
///
/// Futures are not required to be `Send`: the engine runs on a single
/// thread and interleaves only at store calls.
#[async_trait(?Send)]
pub trait BookmarkStore {
    /// Inserts `record` and returns the surrogate id the store assigned.
    async fn add(&self, record: &BookMark) -> Result<i64, BookmarkError>;

    async fn get(&self, id: i64) -> Result<Option<BookMark>, BookmarkError>;

    /// Applies `patch` to record `id`. Returns the number of affected rows.
    async fn update(&self, id: i64, patch: &BookmarkPatch) -> Result<usize, BookmarkError>;

    /// Removes record `id`. Deleting a missing id is not an error.
    async fn delete(&self, id: i64) -> Result<(), BookmarkError>;

    async fn find_first(&self, query: &Query) -> Result<Option<BookMark>, BookmarkError>;

    async fn find_all(&self, query: &Query) -> Result<Vec<BookMark>, BookmarkError>;

    async fn all(&self) -> Result<Vec<BookMark>, BookmarkError> {
        self.find_all(&Query::new()).await
    }
}
