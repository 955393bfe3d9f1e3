//! Error type for `lifskill-store-sqlite`.

use lifskill_core::{Classify, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] lifskill_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A column held text that does not map onto any domain value.
  #[error("corrupt column {column}: {value:?}")]
  Corrupt { column: &'static str, value: String },
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::Core(e) => e.kind(),
      _ => ErrorKind::StorageFailure,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
