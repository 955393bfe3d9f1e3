//! Error types for `lifskill-core`.

use serde::Serialize;
use thiserror::Error;

use crate::{CategoryId, ItemId, UserId};

/// The stable error taxonomy the boundary layer maps onto responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
  NotFound,
  Forbidden,
  Conflict,
  InvalidReference,
  InvalidInput,
  StorageFailure,
}

/// Anything that can report which [`ErrorKind`] it belongs to.
///
/// Store backends implement this for their own error type so that higher
/// layers can classify failures without knowing the backend.
pub trait Classify {
  fn kind(&self) -> ErrorKind;
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("item not found: {0}")]
  ItemNotFound(ItemId),

  #[error("category not found: {0}")]
  CategoryNotFound(CategoryId),

  #[error("user not found: {0}")]
  UserNotFound(UserId),

  #[error("user {user} is not an expert in any category of item {item}")]
  NotAnExpert { user: UserId, item: ItemId },

  #[error("user {user} has already approved item {item}")]
  AlreadyApproved { user: UserId, item: ItemId },

  #[error("username already taken: {0:?}")]
  UsernameTaken(String),

  #[error("unknown category: {0}")]
  UnknownCategory(CategoryId),

  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("score of user {user} in category {category} cannot grow further")]
  ScoreOverflow { user: UserId, category: CategoryId },
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::ItemNotFound(_) | Self::CategoryNotFound(_) | Self::UserNotFound(_) => {
        ErrorKind::NotFound
      }
      Self::NotAnExpert { .. } => ErrorKind::Forbidden,
      Self::AlreadyApproved { .. } | Self::UsernameTaken(_) => ErrorKind::Conflict,
      Self::UnknownCategory(_) => ErrorKind::InvalidReference,
      Self::InvalidInput(_) => ErrorKind::InvalidInput,
      Self::ScoreOverflow { .. } => ErrorKind::StorageFailure,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
