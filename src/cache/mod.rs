//! Persistent cache of downloaded modules
//!
//! Maps each remote URL to a randomly generated identifier and stores the
//! downloaded bytes under that identifier.
//!
//! # Layout
//!
//! | Path | Content |
//! |------|---------|
//! | `files.json` | JSON object, URL -> identifier |
//! | `files/<id>.wat` | raw downloaded bytes |
//!
//! There is no locking between processes: the database is read in full,
//! mutated and written back, so concurrent writers lose updates.

pub mod database;
pub mod store;

pub use database::CacheDatabase;
pub use store::{CacheEntry, CacheStore, BLOB_EXTENSION, DATABASE_FILE, FILES_DIR};
