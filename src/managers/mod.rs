// Bookmark sync state managers
// Managers handle stateful operations against the bookmark store.

pub mod bookmark_manager;
