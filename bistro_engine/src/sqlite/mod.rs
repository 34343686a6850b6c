//! SQLite backend for the Bistro engine.
//!
//! [`SqliteDatabase`] implements every backend trait the engine APIs need. Schema migrations live in `migrations/` and
//! are embedded in the binary.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
