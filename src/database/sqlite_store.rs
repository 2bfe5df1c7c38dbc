//! [`BookmarkStore`] backed by the SQLite `bookmarks` table.

use async_trait::async_trait;
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::connection::Database;
use super::store::{BookmarkStore, FieldValue, Query};
use crate::types::bookmark::{BookMark, BookmarkKind, BookmarkPatch};
use crate::types::errors::BookmarkError;

const COLUMNS: &str = "id, parent, type, title, description, address, tags, created, updated, icon";

/// SQLite bookmark store.
///
/// Every call takes the connection lock, runs its statement synchronously and
/// releases the lock before returning, so no lock is held across an await.
pub struct SqliteStore {
    db: Mutex<Database>,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    /// Opens (or creates) the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BookmarkError> {
        Ok(Self::new(Database::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self, BookmarkError> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Database>, BookmarkError> {
        self.db
            .lock()
            .map_err(|e| BookmarkError::Storage(format!("store lock poisoned: {}", e)))
    }

    fn row_to_bookmark(row: &Row) -> rusqlite::Result<BookMark> {
        let kind_text: String = row.get(2)?;
        let kind = BookmarkKind::parse(&kind_text).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                Type::Text,
                Box::new(BookmarkError::Storage(format!("unknown record type: {}", kind_text))),
            )
        })?;
        let tags_text: String = row.get(6)?;
        let tags: BTreeSet<String> = serde_json::from_str(&tags_text)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

        Ok(BookMark {
            id: Some(row.get(0)?),
            kind,
            title: row.get(3)?,
            parent: row.get(1)?,
            parents: Vec::new(),
            description: non_empty(row.get(4)?),
            address: non_empty(row.get(5)?),
            tags,
            created: row.get(7)?,
            updated: row.get(8)?,
            icon: non_empty(row.get(9)?),
            children: Vec::new(),
        })
    }

    fn where_clause(query: &Query) -> (String, Vec<Value>) {
        let mut clauses = Vec::new();
        let mut values = Vec::new();
        for (field, value) in query.terms() {
            match value {
                FieldValue::Id(None) => clauses.push(format!("{} IS NULL", field.column())),
                FieldValue::Id(Some(id)) => {
                    values.push(Value::Integer(*id));
                    clauses.push(format!("{} = ?{}", field.column(), values.len()));
                }
                FieldValue::Text(text) => {
                    values.push(Value::Text(text.clone()));
                    clauses.push(format!("{} = ?{}", field.column(), values.len()));
                }
            }
        }
        if clauses.is_empty() {
            (String::new(), values)
        } else {
            (format!(" WHERE {}", clauses.join(" AND ")), values)
        }
    }

    fn select(&self, query: &Query, limit: Option<usize>) -> Result<Vec<BookMark>, BookmarkError> {
        let (clause, values) = Self::where_clause(query);
        let mut sql = format!("SELECT {} FROM bookmarks{} ORDER BY id", COLUMNS, clause);
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let db = self.lock()?;
        let mut stmt = db.connection().prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values), Self::row_to_bookmark)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn encode_tags(tags: &BTreeSet<String>) -> Result<String, BookmarkError> {
    serde_json::to_string(tags).map_err(|e| BookmarkError::Storage(format!("tags: {}", e)))
}

#[async_trait(?Send)]
impl BookmarkStore for SqliteStore {
    async fn add(&self, record: &BookMark) -> Result<i64, BookmarkError> {
        let tags = encode_tags(&record.tags)?;
        let db = self.lock()?;
        let conn = db.connection();
        conn.execute(
            "INSERT INTO bookmarks (parent, type, title, description, address, tags, created, updated, icon) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.parent,
                record.kind.as_str(),
                record.title,
                record.description.as_deref().unwrap_or_default(),
                record.address.as_deref().unwrap_or_default(),
                tags,
                record.created,
                record.updated,
                record.icon.as_deref().unwrap_or_default(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn get(&self, id: i64) -> Result<Option<BookMark>, BookmarkError> {
        let db = self.lock()?;
        let record = db
            .connection()
            .query_row(
                &format!("SELECT {} FROM bookmarks WHERE id = ?1", COLUMNS),
                params![id],
                Self::row_to_bookmark,
            )
            .optional()?;
        Ok(record)
    }

    async fn update(&self, id: i64, patch: &BookmarkPatch) -> Result<usize, BookmarkError> {
        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(kind) = patch.kind {
            sets.push("type");
            values.push(Value::Text(kind.as_str().to_string()));
        }
        if let Some(title) = &patch.title {
            sets.push("title");
            values.push(Value::Text(title.clone()));
        }
        if let Some(parent) = patch.parent {
            sets.push("parent");
            values.push(parent.map(Value::Integer).unwrap_or(Value::Null));
        }
        if let Some(description) = &patch.description {
            sets.push("description");
            values.push(Value::Text(description.clone()));
        }
        if let Some(address) = &patch.address {
            sets.push("address");
            values.push(Value::Text(address.clone()));
        }
        if let Some(tags) = &patch.tags {
            sets.push("tags");
            values.push(Value::Text(encode_tags(tags)?));
        }
        if let Some(created) = &patch.created {
            sets.push("created");
            values.push(Value::Text(created.clone()));
        }
        if let Some(updated) = &patch.updated {
            sets.push("updated");
            values.push(Value::Text(updated.clone()));
        }
        if let Some(icon) = &patch.icon {
            sets.push("icon");
            values.push(Value::Text(icon.clone()));
        }

        // An empty patch still reports whether the row exists.
        let assignments = if sets.is_empty() {
            "id = id".to_string()
        } else {
            sets.iter()
                .enumerate()
                .map(|(i, column)| format!("{} = ?{}", column, i + 1))
                .collect::<Vec<_>>()
                .join(", ")
        };
        values.push(Value::Integer(id));
        let sql = format!("UPDATE bookmarks SET {} WHERE id = ?{}", assignments, values.len());

        let db = self.lock()?;
        let affected = db.connection().execute(&sql, params_from_iter(values))?;
        Ok(affected)
    }

    async fn delete(&self, id: i64) -> Result<(), BookmarkError> {
        let db = self.lock()?;
        db.connection()
            .execute("DELETE FROM bookmarks WHERE id = ?1", params![id])?;
        Ok(())
    }

    async fn find_first(&self, query: &Query) -> Result<Option<BookMark>, BookmarkError> {
        Ok(self.select(query, Some(1))?.into_iter().next())
    }

    async fn find_all(&self, query: &Query) -> Result<Vec<BookMark>, BookmarkError> {
        self.select(query, None)
    }
}
