//! Bookmark sync RPC server: JSON-RPC over stdin/stdout.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"bookmark.delete", "params":{"ids":[3,4]}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Logs go to stderr; stdout carries only protocol messages.

use std::io::{self, Write};
use std::path::PathBuf;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use bookmark_sync::app::App;
use bookmark_sync::rpc_handler::handle_method;
use bookmark_sync::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use bookmark_sync::types::settings::Settings;

fn emit(message: &Value) {
    println!("{}", message);
    let _ = io::stdout().flush();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let mut engine = SettingsEngine::new(std::env::var("BOOKMARK_SYNC_CONFIG").ok());
    let loaded = engine.load();
    let settings = loaded.as_ref().cloned().unwrap_or_else(|_| Settings::default());

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .init();

    if let Err(e) = &loaded {
        warn!(path = engine.get_config_path(), error = %e, "using default settings");
    }

    // BOOKMARK_SYNC_DATA_DIR wins over the configured database path
    let db_path = match std::env::var("BOOKMARK_SYNC_DATA_DIR") {
        Ok(dir) => PathBuf::from(dir).join("bookmarks.db"),
        Err(_) => engine.database_path(),
    };

    let app = match App::open(settings, &db_path) {
        Ok(app) => app,
        Err(e) => {
            error!(path = %db_path.display(), error = %e, "failed to open bookmark store");
            std::process::exit(1);
        }
    };
    info!(path = %db_path.display(), folder_scope = ?app.settings.folder_scope, "bookmark store ready");

    emit(&json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                emit(&json!({"id": null, "error": format!("parse error: {}", e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&app, method, &params).await {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        emit(&response);
    }
}
