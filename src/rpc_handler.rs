//! RPC method handler for the bookmark sync JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches a method call to the managers and the import
//! pipeline through the `App` struct.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::app::App;
use crate::managers::bookmark_manager::BookmarkManagerTrait;
use crate::services::import_pipeline::{import_html, import_json};
use crate::types::bookmark::{BookmarkPatch, OneOrMany};

fn param<T: DeserializeOwned>(params: &Value, key: &str) -> Result<T, String> {
    let value = params.get(key).ok_or_else(|| format!("missing {}", key))?;
    serde_json::from_value(value.clone()).map_err(|e| format!("invalid {}: {}", key, e))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| format!("serialization error: {}", e))
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &App, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Import ───
        "bookmark.import_html" => {
            let content: String = param(params, "content")?;
            let report = import_html(&app.store, app.settings.folder_scope, &content).await;
            to_json(&report)
        }
        "bookmark.import_json" => {
            let content: String = param(params, "content")?;
            let report = import_json(&app.store, app.settings.folder_scope, &content)
                .await
                .map_err(|e| e.to_string())?;
            to_json(&report)
        }

        // ─── Records ───
        "bookmark.update" => {
            let ids: OneOrMany<i64> = param(params, "ids")?;
            let data: OneOrMany<BookmarkPatch> = param(params, "data")?;
            let ok = app.bookmark_manager().update_bookmarks(ids, data).await;
            Ok(json!({"ok": ok}))
        }
        "bookmark.get" => {
            let ids: OneOrMany<i64> = param(params, "ids")?;
            match app.bookmark_manager().get_bookmarks_by_id(ids).await {
                Some(records) => Ok(json!({"items": records})),
                None => Ok(Value::Null),
            }
        }
        "bookmark.delete" => {
            let ids: OneOrMany<i64> = param(params, "ids")?;
            let report = app.bookmark_manager().delete_bookmarks_by_id(ids).await;
            let errors: Vec<String> = report.errors.iter().map(|e| e.to_string()).collect();
            Ok(json!({
                "ok": report.is_complete(),
                "removed": report.removed,
                "errors": errors,
            }))
        }
        "bookmark.list" => {
            let records = app.bookmark_manager().get_all_bookmarks().await;
            Ok(json!({"items": records}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
