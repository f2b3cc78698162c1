//! # punchcard-core
//!
//! Core library for punchcard - a work session tracker.
//!
//! This library provides:
//! - Domain types for sessions and statistics periods
//! - Embedded SQLite session store
//! - Session lifecycle operations (start/finish/status)
//! - Period aggregation for the statistics dashboard
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use punchcard_core::{sessions, Config, Database};
//! use std::time::Duration;
//!
//! let config = Config::load().expect("failed to load config");
//! let db = Database::open(
//!     &config.database_path(),
//!     Duration::from_secs(config.database.busy_timeout_secs),
//! )
//! .expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let started = sessions::start_session(&db, "writing").expect("failed to start");
//! println!("session {} started at {}", started.id, started.start);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use stats::PeriodStats;
pub use types::{Period, Session};

// Public modules
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod sessions;
pub mod stats;
pub mod types;
