//! Database module: SQLite session store.

pub mod repo;
pub mod schema;

pub use repo::Database;
