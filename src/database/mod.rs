//! Tabdesk database layer.
//!
//! Provides SQLite connection management and schema migrations for the
//! long-lived storage medium.
//!
//! # Usage
//!
//! ```no_run
//! use tabdesk::database::Database;
//!
//! // Open a persistent database
//! let db = Database::open("workspace.db").expect("failed to open database");
//!
//! // Or use an in-memory database for testing
//! let db = Database::open_in_memory().expect("failed to open in-memory database");
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
