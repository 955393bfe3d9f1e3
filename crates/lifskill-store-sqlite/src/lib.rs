//! SQLite backend for the Lifskill moderation store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every mutating operation runs inside a
//! single `BEGIN IMMEDIATE` transaction; the check-then-act sequences live in
//! the `ledger` module.

mod encode;
mod ledger;
mod queries;
mod roster;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
