//! Core types and trait definitions for the Lifskill moderation engine.
//!
//! Posts are approved by category experts once a quorum of distinct votes is
//! reached, and users accumulate per-category achievement scores by engaging
//! with posts. This crate holds the domain model and the seams between the
//! ledgers, and has no HTTP or database dependencies.

pub mod achievement;
pub mod approval;
pub mod category;
pub mod error;
pub mod gate;
pub mod id;
pub mod item;
pub mod store;
pub mod user;

pub use approval::QUORUM;
pub use error::{Classify, Error, ErrorKind, Result};
pub use id::{CategoryId, ItemId, UserId};
