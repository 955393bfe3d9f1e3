//! Per-user, per-category achievement scores and bookmarks.
//!
//! A score row is created lazily by the first increment and never deleted.
//! Reads of a missing row yield zero without creating it.

use serde::{Deserialize, Serialize};

use crate::{CategoryId, ItemId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementEntry {
  pub user_id:     UserId,
  pub category_id: CategoryId,
  pub score:       u32,
}

/// A score row joined with its category's name, for listing a user's scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
  pub category_id:   CategoryId,
  pub category_name: String,
  pub score:         u32,
}

/// A unit adjustment applied to every category of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreDelta {
  Increment,
  /// Floors at zero; a decrement with no prior increment is discarded.
  Decrement,
}

impl ScoreDelta {
  /// The adjusted score, or `None` if an increment would overflow.
  pub fn apply(self, score: u32) -> Option<u32> {
    match self {
      Self::Increment => score.checked_add(1),
      Self::Decrement => Some(score.saturating_sub(1)),
    }
  }
}

/// Result of [`crate::store::ModerationStore::toggle_bookmark`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkToggle {
  pub item_id:    ItemId,
  /// Whether the bookmark exists after the toggle.
  pub bookmarked: bool,
  /// Score rows for the item's categories after the adjustment.
  pub entries:    Vec<AchievementEntry>,
}
