//! Unit tests for the RPC handler, covering all JSON-RPC methods dispatched by `handle_method`.
//!
//! These tests exercise every RPC method through the same code path used by the
//! real `bookmark-sync-rpc` binary, using a temporary on-disk SQLite database.

use serde_json::{json, Value};
use tempfile::TempDir;

use bookmark_sync::app::App;
use bookmark_sync::managers::bookmark_manager::BookmarkManagerTrait;
use bookmark_sync::rpc_handler::handle_method;
use bookmark_sync::types::settings::Settings;

/// Create a fresh App backed by a temp directory DB.
fn setup() -> (App, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let db_path = tmp.path().join("nested").join("test.db");
    let app = App::open(Settings::default(), db_path).expect("Failed to init App");
    (app, tmp)
}

const HTML: &str = r#"<DL><p>
    <DT><H3>Bar</H3>
    <DL><p>
        <DT><H3>Work</H3>
        <DL><p>
            <DT><A HREF="http://a.com/">A</A>
            <DT><A HREF="http://b.com/">B</A>
        </DL><p>
    </DL><p>
</DL>"#;

fn ids_of(items: &Value) -> Vec<i64> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

// ─── Ping ───

#[tokio::test]
async fn test_ping() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "ping", &json!({})).await.unwrap();
    assert_eq!(res, json!({"pong": true}));
}

// ─── Unknown method ───

#[tokio::test]
async fn test_unknown_method_returns_error() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "nonexistent.method", &json!({})).await;
    assert!(res.is_err());
    assert!(res.unwrap_err().contains("unknown method"));
}

// ─── Import ───

#[tokio::test]
async fn test_import_html_and_list() {
    let (app, _tmp) = setup();

    let res = handle_method(&app, "bookmark.import_html", &json!({"content": HTML}))
        .await
        .unwrap();
    assert_eq!(res["folders_created"], 1);
    assert_eq!(res["entries"].as_array().unwrap().len(), 2);
    assert_eq!(res["entries"][0]["outcome"], "created");

    let list = handle_method(&app, "bookmark.list", &json!({})).await.unwrap();
    let items = list["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["type"], "folder");
    assert_eq!(items[0]["title"], "Work");
}

#[tokio::test]
async fn test_import_json_reports_parse_errors() {
    let (app, _tmp) = setup();

    let res = handle_method(&app, "bookmark.import_json", &json!({"content": "{ broken"})).await;
    assert!(res.unwrap_err().contains("Invalid bookmark JSON"));

    let res = handle_method(&app, "bookmark.import_json", &json!({})).await;
    assert!(res.unwrap_err().contains("missing content"));
}

// ─── Update / Get / Delete ───

#[tokio::test]
async fn test_update_and_get() {
    let (app, _tmp) = setup();
    handle_method(&app, "bookmark.import_html", &json!({"content": HTML}))
        .await
        .unwrap();
    let all = app.bookmark_manager().get_all_bookmarks().await;
    let a = all.iter().find(|b| b.title == "A").and_then(|b| b.id).unwrap();
    let b = all.iter().find(|b| b.title == "B").and_then(|b| b.id).unwrap();

    let res = handle_method(
        &app,
        "bookmark.update",
        &json!({"ids": [a, b], "data": {"tags": ["work"]}}),
    )
    .await
    .unwrap();
    assert_eq!(res, json!({"ok": true}));

    let res = handle_method(&app, "bookmark.get", &json!({"ids": [b, a]}))
        .await
        .unwrap();
    assert_eq!(ids_of(&res["items"]), vec![a, b]);
    assert_eq!(res["items"][0]["tags"], json!(["work"]));

    let res = handle_method(&app, "bookmark.get", &json!({"ids": a})).await.unwrap();
    assert_eq!(res["items"][0]["title"], "A");
}

#[tokio::test]
async fn test_update_length_mismatch_is_not_ok() {
    let (app, _tmp) = setup();
    handle_method(&app, "bookmark.import_html", &json!({"content": HTML}))
        .await
        .unwrap();

    let res = handle_method(
        &app,
        "bookmark.update",
        &json!({"ids": [1, 2], "data": [{"title": "x"}]}),
    )
    .await
    .unwrap();
    assert_eq!(res, json!({"ok": false}));

    let list = handle_method(&app, "bookmark.list", &json!({})).await.unwrap();
    assert!(list["items"]
        .as_array()
        .unwrap()
        .iter()
        .all(|item| item["title"] != "x"));
}

/// A payload with a misspelled key is rejected instead of applied as a no-op.
#[tokio::test]
async fn test_update_rejects_unknown_payload_keys() {
    let (app, _tmp) = setup();
    handle_method(&app, "bookmark.import_html", &json!({"content": HTML}))
        .await
        .unwrap();
    let all = app.bookmark_manager().get_all_bookmarks().await;
    let a = all.iter().find(|b| b.title == "A").and_then(|b| b.id).unwrap();

    let res = handle_method(
        &app,
        "bookmark.update",
        &json!({"ids": a, "data": {"name": "x"}}),
    )
    .await;
    assert!(res.unwrap_err().contains("invalid data"));

    let res = handle_method(&app, "bookmark.get", &json!({"ids": a})).await.unwrap();
    assert_eq!(res["items"][0]["title"], "A");
}

#[tokio::test]
async fn test_delete_folder_cascades() {
    let (app, _tmp) = setup();
    handle_method(&app, "bookmark.import_html", &json!({"content": HTML}))
        .await
        .unwrap();
    let all = app.bookmark_manager().get_all_bookmarks().await;
    let work = all.iter().find(|b| b.title == "Work").and_then(|b| b.id).unwrap();

    let res = handle_method(&app, "bookmark.delete", &json!({"ids": [work, 999]}))
        .await
        .unwrap();
    assert_eq!(res["ok"], false);
    assert_eq!(res["removed"].as_array().unwrap().len(), 3);
    assert_eq!(res["errors"], json!(["Bookmark not found: 999"]));

    let list = handle_method(&app, "bookmark.list", &json!({})).await.unwrap();
    assert_eq!(list["items"], json!([]));
}

#[tokio::test]
async fn test_missing_ids_param() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "bookmark.delete", &json!({})).await;
    assert!(res.unwrap_err().contains("missing ids"));
}
