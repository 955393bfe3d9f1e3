//! Approval votes and the quorum rule.
//!
//! Quorum is a count of distinct voters and nothing else: vote order and
//! timestamps play no part. Votes are never retracted, so an item that has
//! reached quorum stays approved even if its voters later lose expertise.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ItemId, UserId, item::ItemStatus};

/// Distinct qualifying approvals required to move an item to `Approved`.
pub const QUORUM: u32 = 3;

/// Whether `approval_count` distinct votes are enough to approve an item.
pub fn reaches_quorum(approval_count: u32) -> bool { approval_count >= QUORUM }

/// One expert's approval of one item. At most one exists per pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalVote {
  pub item_id:  ItemId,
  pub voter_id: UserId,
  pub voted_at: DateTime<Utc>,
}

/// Result of a successful [`crate::store::ModerationStore::cast_approval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalOutcome {
  pub approval_count: u32,
  pub status:         ItemStatus,
  /// True only for the vote whose write moved the item to `Approved`.
  pub transitioned:   bool,
}
