//! Pure domain logic for the IT asset inventory.
//!
//! Nothing in this crate touches the database, async runtimes, or I/O.

pub mod datetime;
pub mod error;
pub mod expiration;
pub mod import_log;
pub mod lifecycle;
pub mod sorting;
pub mod types;
