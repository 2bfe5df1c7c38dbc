//! App Core for bookmark sync.
//!
//! Holds the single store handle and the loaded settings. Everything that
//! touches the store borrows it from here; there is no global store.

use std::path::Path;

use crate::database::sqlite_store::SqliteStore;
use crate::managers::bookmark_manager::BookmarkManager;
use crate::types::errors::BookmarkError;
use crate::types::settings::Settings;

pub struct App {
    pub store: SqliteStore,
    pub settings: Settings,
}

impl App {
    /// Opens the store at `db_path`, creating parent directories as needed.
    pub fn open<P: AsRef<Path>>(settings: Settings, db_path: P) -> Result<Self, BookmarkError> {
        if let Some(parent) = db_path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                BookmarkError::Storage(format!("Failed to create data directory: {}", e))
            })?;
        }
        Ok(Self {
            store: SqliteStore::open(db_path)?,
            settings,
        })
    }

    pub fn open_in_memory(settings: Settings) -> Result<Self, BookmarkError> {
        Ok(Self {
            store: SqliteStore::open_in_memory()?,
            settings,
        })
    }

    /// A manager over this app's store, using the configured folder policy.
    pub fn bookmark_manager(&self) -> BookmarkManager<'_, SqliteStore> {
        BookmarkManager::with_folder_scope(&self.store, self.settings.folder_scope)
    }
}
