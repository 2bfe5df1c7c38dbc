// Bookmark sync shared types
// Data structures shared across the store, importers, managers and RPC layer.

pub mod bookmark;
pub mod errors;
pub mod settings;
