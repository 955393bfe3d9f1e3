//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Identifiers are stored as `INTEGER`. Timestamps are stored as RFC 3339
//! strings. Enumerations are stored as their lowercase names.

use std::{collections::BTreeSet, str::FromStr};

use chrono::{DateTime, Utc};
use lifskill_core::{
  CategoryId, ItemId, UserId,
  approval::ApprovalVote,
  category::Category,
  item::{ContentItem, ItemKind, ItemStatus},
  user::User,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enumerations ────────────────────────────────────────────────────────────

pub fn decode_status(s: &str) -> Result<ItemStatus> {
  ItemStatus::from_str(s).map_err(|_| Error::Corrupt {
    column: "items.status",
    value:  s.to_owned(),
  })
}

pub fn decode_kind(s: &str) -> Result<ItemKind> {
  ItemKind::from_str(s).map_err(|_| Error::Corrupt {
    column: "items.kind",
    value:  s.to_owned(),
  })
}

/// Scores are stored as `INTEGER` with a `CHECK (score >= 0)`.
pub fn decode_score(v: i64) -> Result<u32> {
  u32::try_from(v).map_err(|_| Error::Corrupt {
    column: "achievements.score",
    value:  v.to_string(),
  })
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "user_id, username, created_at";

pub struct RawUser {
  pub user_id:    i64,
  pub username:   String,
  pub created_at: String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(0)?,
      username:   row.get(1)?,
      created_at: row.get(2)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    UserId(self.user_id),
      username:   self.username,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const CATEGORY_COLUMNS: &str = "category_id, name, created_at";

pub struct RawCategory {
  pub category_id: i64,
  pub name:        String,
  pub created_at:  String,
}

impl RawCategory {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      category_id: row.get(0)?,
      name:        row.get(1)?,
      created_at:  row.get(2)?,
    })
  }

  pub fn into_category(self) -> Result<Category> {
    Ok(Category {
      category_id: CategoryId(self.category_id),
      name:        self.name,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Item columns, qualified so they can be used in joins aliased as `i`.
pub const ITEM_COLUMNS: &str =
  "i.item_id, i.owner_id, i.kind, i.title, i.body, i.status, i.created_at, i.approved_at";

pub struct RawItem {
  pub item_id:     i64,
  pub owner_id:    i64,
  pub kind:        String,
  pub title:       String,
  pub body:        String,
  pub status:      String,
  pub created_at:  String,
  pub approved_at: Option<String>,
}

impl RawItem {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      item_id:     row.get(0)?,
      owner_id:    row.get(1)?,
      kind:        row.get(2)?,
      title:       row.get(3)?,
      body:        row.get(4)?,
      status:      row.get(5)?,
      created_at:  row.get(6)?,
      approved_at: row.get(7)?,
    })
  }

  pub fn into_item(self, categories: BTreeSet<CategoryId>) -> Result<ContentItem> {
    Ok(ContentItem {
      item_id:     ItemId(self.item_id),
      owner_id:    UserId(self.owner_id),
      kind:        decode_kind(&self.kind)?,
      title:       self.title,
      body:        self.body,
      categories,
      status:      decode_status(&self.status)?,
      created_at:  decode_dt(&self.created_at)?,
      approved_at: self.approved_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

pub struct RawVote {
  pub item_id:  i64,
  pub voter_id: i64,
  pub voted_at: String,
}

impl RawVote {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      item_id:  row.get(0)?,
      voter_id: row.get(1)?,
      voted_at: row.get(2)?,
    })
  }

  pub fn into_vote(self) -> Result<ApprovalVote> {
    Ok(ApprovalVote {
      item_id:  ItemId(self.item_id),
      voter_id: UserId(self.voter_id),
      voted_at: decode_dt(&self.voted_at)?,
    })
  }
}
