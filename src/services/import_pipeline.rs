// Import pipeline
// Raw export -> flat leaves -> nested forest -> reconciled store records.

use tracing::info;

use crate::database::store::BookmarkStore;
use crate::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use crate::services::html_importer::parse_bookmarks_html;
use crate::services::json_importer::parse_bookmarks_json;
use crate::services::tree_builder::build_nested_bookmarks;
use crate::types::bookmark::{BookMark, UpsertReport};
use crate::types::errors::ImportError;
use crate::types::settings::FolderScope;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Html,
    Json,
}

impl ExportFormat {
    /// Guesses the format from the first non-whitespace character.
    pub fn detect(content: &str) -> Self {
        match content.trim_start().chars().next() {
            Some('{') => ExportFormat::Json,
            _ => ExportFormat::Html,
        }
    }
}

/// Parses `content` and returns the forest, ready for the reconciler.
pub fn build_forest(content: &str, format: ExportFormat) -> Result<Vec<BookMark>, ImportError> {
    let leaves = match format {
        ExportFormat::Html => parse_bookmarks_html(content),
        ExportFormat::Json => parse_bookmarks_json(content)?,
    };
    Ok(build_nested_bookmarks(leaves))
}

/// Runs the whole pipeline against `store`.
///
/// # Errors
/// Only parse failures are returned; per-record store failures are reported
/// inside the [`UpsertReport`].
pub async fn import_bookmarks<S: BookmarkStore + ?Sized>(
    store: &S,
    folder_scope: FolderScope,
    content: &str,
    format: ExportFormat,
) -> Result<UpsertReport, ImportError> {
    let forest = build_forest(content, format)?;
    info!(format = ?format, roots = forest.len(), "importing bookmarks");

    let manager = BookmarkManager::with_folder_scope(store, folder_scope);
    Ok(manager.upsert_forest(&forest).await)
}

pub async fn import_html<S: BookmarkStore + ?Sized>(
    store: &S,
    folder_scope: FolderScope,
    html: &str,
) -> UpsertReport {
    let forest = build_nested_bookmarks(parse_bookmarks_html(html));
    BookmarkManager::with_folder_scope(store, folder_scope)
        .upsert_forest(&forest)
        .await
}

pub async fn import_json<S: BookmarkStore + ?Sized>(
    store: &S,
    folder_scope: FolderScope,
    json: &str,
) -> Result<UpsertReport, ImportError> {
    import_bookmarks(store, folder_scope, json, ExportFormat::Json).await
}
