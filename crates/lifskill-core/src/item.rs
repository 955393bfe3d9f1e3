//! Content items, the aggregate both ledgers act upon.
//!
//! An item's category set is fixed at creation. Its status only ever moves
//! forward: `Pending -> Approved`, and `Approved` is terminal.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CategoryId, Error, ItemId, Result, UserId};

// ─── Kind ────────────────────────────────────────────────────────────────────

/// What sort of item this is. Both kinds share one approval state machine.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  strum::IntoStaticStr,
  strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ItemKind {
  /// A knowledge post submitted for publication.
  #[default]
  Post,
  /// A request for content on a topic, vetted the same way as posts.
  Request,
}

impl ItemKind {
  pub fn as_str(self) -> &'static str { self.into() }
}

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::IntoStaticStr,
  strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ItemStatus {
  Pending,
  Approved,
}

impl ItemStatus {
  pub fn as_str(self) -> &'static str { self.into() }

  pub fn is_approved(self) -> bool { matches!(self, Self::Approved) }
}

// ─── ContentItem ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
  pub item_id:     ItemId,
  pub owner_id:    UserId,
  pub kind:        ItemKind,
  pub title:       String,
  pub body:        String,
  pub categories:  BTreeSet<CategoryId>,
  pub status:      ItemStatus,
  pub created_at:  DateTime<Utc>,
  /// Set by the single write that moved the item to `Approved`.
  pub approved_at: Option<DateTime<Utc>>,
}

// ─── NewItem ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::ModerationStore::create_item`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
  #[serde(default)]
  pub kind:       ItemKind,
  pub title:      String,
  pub body:       String,
  pub categories: BTreeSet<CategoryId>,
}

impl NewItem {
  pub fn post(
    title: impl Into<String>,
    body: impl Into<String>,
    categories: impl IntoIterator<Item = CategoryId>,
  ) -> Self {
    Self {
      kind:       ItemKind::Post,
      title:      title.into(),
      body:       body.into(),
      categories: categories.into_iter().collect(),
    }
  }

  /// Shape checks that need no store access. Whether the categories exist is
  /// decided by the store.
  pub fn validate(&self) -> Result<()> {
    if self.title.trim().is_empty() {
      return Err(Error::InvalidInput("title must not be blank".into()));
    }
    if self.body.trim().is_empty() {
      return Err(Error::InvalidInput("body must not be blank".into()));
    }
    if self.categories.is_empty() {
      return Err(Error::InvalidInput(
        "an item needs at least one category".into(),
      ));
    }
    Ok(())
  }
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// Parameters for [`crate::store::ModerationStore::list_items`].
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ItemFilter {
  pub status: Option<ItemStatus>,
  pub kind:   Option<ItemKind>,
  pub owner:  Option<UserId>,
}
