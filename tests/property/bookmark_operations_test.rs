//! Property-based tests for bookmark reconciliation.
//!
//! These tests verify, for arbitrary addresses, titles and folder paths, that
//! an upserted leaf reads back with the same address, that re-importing the
//! same leaves never grows the store, and that the forest builder never
//! produces two same-titled folders in one scope.

use bookmark_sync::database::store::BookmarkStore;
use bookmark_sync::database::SqliteStore;
use bookmark_sync::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use bookmark_sync::services::tree_builder::build_nested_bookmarks;
use bookmark_sync::types::bookmark::{BookMark, OneOrMany};
use proptest::prelude::*;
use std::collections::HashSet;

/// Strategy for generating valid URL strings.
fn arb_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("https"), Just("http")],
        "[a-z][a-z0-9]{2,15}",
        prop_oneof![Just(".com"), Just(".org"), Just(".net"), Just(".io")],
        proptest::option::of("/[a-z0-9]{1,10}"),
    )
        .prop_map(|(scheme, host, tld, path)| {
            format!("{}://{}{}{}", scheme, host, tld, path.unwrap_or_default())
        })
}

fn arb_title() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 ]{1,30}"
}

/// Folder paths drawn from a small alphabet so that paths overlap often.
fn arb_path() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(
        prop_oneof![Just("Work"), Just("Home"), Just("Docs"), Just("Tools")].prop_map(String::from),
        0..4,
    )
}

fn arb_leaves() -> impl Strategy<Value = Vec<BookMark>> {
    proptest::collection::vec((arb_title(), arb_url(), arb_path()), 1..12).prop_map(|items| {
        items
            .into_iter()
            .map(|(title, url, path)| {
                BookMark::leaf(&title, &url)
                    .with_parents(path.iter().map(|t| BookMark::folder(t)).collect())
            })
            .collect()
    })
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to build runtime")
}

fn assert_unique_folders(scope: &[BookMark]) {
    let mut seen = HashSet::new();
    for node in scope.iter().filter(|n| n.is_folder()) {
        assert!(seen.insert(node.title.clone()), "duplicate folder {:?} in one scope", node.title);
        assert_unique_folders(&node.children);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Upserting a leaf and reading it back by the returned id keeps its address.
    #[test]
    fn upsert_then_get_keeps_address(url in arb_url(), title in arb_title()) {
        let found = runtime().block_on(async {
            let store = SqliteStore::open_in_memory().expect("Failed to open store");
            let mgr = BookmarkManager::new(&store);

            let report = mgr.upsert_bookmark(&BookMark::leaf(&title, &url), None).await;
            let id = report.entries[0].id.expect("upsert should return an id");
            mgr.get_bookmarks_by_id(OneOrMany::One(id)).await
        });

        let found = found.expect("lookup should succeed");
        prop_assert_eq!(found.len(), 1);
        prop_assert_eq!(found[0].address.as_deref(), Some(url.as_str()));
    }

    /// Importing the same leaves twice leaves the record count unchanged.
    #[test]
    fn reimport_does_not_grow_store(leaves in arb_leaves()) {
        let (first, second) = runtime().block_on(async {
            let store = SqliteStore::open_in_memory().expect("Failed to open store");
            let mgr = BookmarkManager::new(&store);
            let forest = build_nested_bookmarks(leaves);

            mgr.upsert_forest(&forest).await;
            let first = store.all().await.expect("list should succeed").len();
            mgr.upsert_forest(&forest).await;
            let second = store.all().await.expect("list should succeed").len();
            (first, second)
        });

        prop_assert_eq!(first, second);
    }

    /// No scope of a built forest holds two folders with the same title.
    #[test]
    fn built_forest_has_unique_folders_per_scope(leaves in arb_leaves()) {
        let count = leaves.len();
        let forest = build_nested_bookmarks(leaves);
        assert_unique_folders(&forest);

        fn count_leaves(scope: &[BookMark]) -> usize {
            scope
                .iter()
                .map(|n| if n.is_folder() { count_leaves(&n.children) } else { 1 })
                .sum()
        }
        prop_assert_eq!(count_leaves(&forest), count);
    }
}
