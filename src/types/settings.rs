use serde::{Deserialize, Serialize};

/// How the reconciler decides that an incoming folder already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FolderScope {
    /// Match `(title, type = folder)` anywhere in the store.
    #[default]
    #[serde(alias = "legacy")]
    Global,
    /// Match `(title, type = folder)` only under the same parent.
    #[serde(alias = "strict")]
    Parent,
}

/// Top-level settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// SQLite file; `None` means `bookmarks.db` in the platform data dir.
    pub database_path: Option<String>,
    pub folder_scope: FolderScope,
    /// `tracing-subscriber` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: None,
            folder_scope: FolderScope::Global,
            log_filter: "info".to_string(),
        }
    }
}
