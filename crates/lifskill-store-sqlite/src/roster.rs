//! [`Roster`]: the expert roster as seen from one connection or transaction.

use lifskill_core::{CategoryId, UserId, gate::CategoryDirectory};
use rusqlite::{Connection, OptionalExtension as _};

/// Borrowed view of `category_experts`. When built from a transaction the
/// lookups see that transaction's snapshot, which is what lets the approval
/// gate be evaluated atomically with the vote insert.
pub struct Roster<'c>(pub &'c Connection);

impl CategoryDirectory for Roster<'_> {
  type Error = rusqlite::Error;

  fn is_expert(&self, user: UserId, category: CategoryId) -> rusqlite::Result<bool> {
    Ok(
      self
        .0
        .query_row(
          "SELECT 1 FROM category_experts WHERE user_id = ?1 AND category_id = ?2",
          rusqlite::params![user.0, category.0],
          |_| Ok(()),
        )
        .optional()?
        .is_some(),
    )
  }
}
