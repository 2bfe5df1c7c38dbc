//! Bookmark sync: imports browser bookmark exports and reconciles them into
//! a local SQLite bookmark store.
//!
//! This library crate exposes all modules for use by the RPC binary and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
