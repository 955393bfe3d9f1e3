//! Write-side operations. Each public function opens one `BEGIN IMMEDIATE`
//! transaction, so the reads it bases its decision on and the writes it makes
//! are serialised against every other writer. Returning early with an error
//! drops the transaction, which rolls it back.

use std::collections::BTreeSet;

use chrono::Utc;
use lifskill_core::{
  CategoryId, Error as CoreError, ItemId, UserId,
  achievement::{AchievementEntry, BookmarkToggle, ScoreDelta},
  approval::{ApprovalOutcome, reaches_quorum},
  category::Category,
  gate::ExpertiseGate,
  item::{ContentItem, ItemStatus, NewItem},
  user::User,
};
use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
  Result,
  encode::encode_dt,
  queries::{self, require_category, require_item_categories, require_user},
  roster::Roster,
};

fn begin(conn: &mut Connection) -> rusqlite::Result<Transaction<'_>> {
  conn.transaction_with_behavior(TransactionBehavior::Immediate)
}

// ─── Users and categories ────────────────────────────────────────────────────

pub fn add_user(conn: &mut Connection, username: String) -> Result<User> {
  if username.trim().is_empty() {
    return Err(CoreError::InvalidInput("username must not be blank".into()).into());
  }
  let created_at = Utc::now();

  let tx = begin(conn)?;
  let inserted = tx.execute(
    "INSERT INTO users (username, created_at) VALUES (?1, ?2)
     ON CONFLICT (username) DO NOTHING",
    rusqlite::params![username, encode_dt(created_at)],
  )?;
  if inserted == 0 {
    return Err(CoreError::UsernameTaken(username).into());
  }
  let user_id = UserId(tx.last_insert_rowid());
  tx.commit()?;

  Ok(User { user_id, username, created_at })
}

pub fn add_category(conn: &mut Connection, name: String) -> Result<Category> {
  if name.trim().is_empty() {
    return Err(CoreError::InvalidInput("category name must not be blank".into()).into());
  }
  let created_at = Utc::now();

  let tx = begin(conn)?;
  tx.execute(
    "INSERT INTO categories (name, created_at) VALUES (?1, ?2)",
    rusqlite::params![name, encode_dt(created_at)],
  )?;
  let category_id = CategoryId(tx.last_insert_rowid());
  tx.commit()?;

  Ok(Category { category_id, name, created_at })
}

// ─── Expert roster ───────────────────────────────────────────────────────────

pub fn assign_expert(
  conn: &mut Connection,
  user: UserId,
  category: CategoryId,
) -> Result<bool> {
  let tx = begin(conn)?;
  require_user(&tx, user)?;
  require_category(&tx, category)?;
  let inserted = tx.execute(
    "INSERT INTO category_experts (user_id, category_id) VALUES (?1, ?2)
     ON CONFLICT (user_id, category_id) DO NOTHING",
    rusqlite::params![user.0, category.0],
  )?;
  tx.commit()?;
  Ok(inserted == 1)
}

pub fn revoke_expert(
  conn: &mut Connection,
  user: UserId,
  category: CategoryId,
) -> Result<bool> {
  let tx = begin(conn)?;
  let removed = tx.execute(
    "DELETE FROM category_experts WHERE user_id = ?1 AND category_id = ?2",
    rusqlite::params![user.0, category.0],
  )?;
  tx.commit()?;
  Ok(removed == 1)
}

pub fn replace_expertise(
  conn: &mut Connection,
  user: UserId,
  categories: &BTreeSet<CategoryId>,
) -> Result<()> {
  let tx = begin(conn)?;
  require_user(&tx, user)?;
  for &category in categories {
    if !queries::category_exists(&tx, category)? {
      return Err(CoreError::UnknownCategory(category).into());
    }
  }

  tx.execute(
    "DELETE FROM category_experts WHERE user_id = ?1",
    rusqlite::params![user.0],
  )?;
  {
    let mut stmt = tx.prepare(
      "INSERT INTO category_experts (user_id, category_id) VALUES (?1, ?2)",
    )?;
    for category in categories {
      stmt.execute(rusqlite::params![user.0, category.0])?;
    }
  }
  tx.commit()?;
  Ok(())
}

// ─── Items ───────────────────────────────────────────────────────────────────

pub fn create_item(
  conn: &mut Connection,
  owner: UserId,
  input: NewItem,
) -> Result<ContentItem> {
  input.validate()?;
  let created_at = Utc::now();

  let tx = begin(conn)?;
  require_user(&tx, owner)?;
  for &category in &input.categories {
    if !queries::category_exists(&tx, category)? {
      return Err(CoreError::UnknownCategory(category).into());
    }
  }

  tx.execute(
    "INSERT INTO items (owner_id, kind, title, body, status, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    rusqlite::params![
      owner.0,
      input.kind.as_str(),
      input.title,
      input.body,
      ItemStatus::Pending.as_str(),
      encode_dt(created_at),
    ],
  )?;
  let item_id = ItemId(tx.last_insert_rowid());
  {
    let mut stmt = tx.prepare(
      "INSERT INTO item_categories (item_id, category_id) VALUES (?1, ?2)",
    )?;
    for category in &input.categories {
      stmt.execute(rusqlite::params![item_id.0, category.0])?;
    }
  }
  tx.commit()?;

  tracing::debug!(%item_id, %owner, categories = input.categories.len(), "item created");

  Ok(ContentItem {
    item_id,
    owner_id: owner,
    kind: input.kind,
    title: input.title,
    body: input.body,
    categories: input.categories,
    status: ItemStatus::Pending,
    created_at,
    approved_at: None,
  })
}

// ─── Approval ledger ─────────────────────────────────────────────────────────

/// Gate check shared by [`can_approve`] and [`cast_approval`]. Users that do
/// not exist are never experts, whatever the policy says.
fn gate_allows<G: ExpertiseGate>(
  conn: &Connection,
  gate: &G,
  voter: UserId,
  categories: &BTreeSet<CategoryId>,
) -> Result<bool> {
  if !queries::user_exists(conn, voter)? {
    return Ok(false);
  }
  Ok(gate.can_approve(&Roster(conn), voter, categories)?)
}

pub fn can_approve<G: ExpertiseGate>(
  conn: &Connection,
  gate: &G,
  user: UserId,
  item: ItemId,
) -> Result<bool> {
  let categories = require_item_categories(conn, item)?;
  gate_allows(conn, gate, user, &categories)
}

pub fn cast_approval<G: ExpertiseGate>(
  conn: &mut Connection,
  gate: &G,
  voter: UserId,
  item: ItemId,
) -> Result<ApprovalOutcome> {
  let tx = begin(conn)?;

  let categories = require_item_categories(&tx, item)?;
  if !gate_allows(&tx, gate, voter, &categories)? {
    tracing::warn!(%voter, %item, "approval rejected: not an expert");
    return Err(CoreError::NotAnExpert { user: voter, item }.into());
  }

  let now = Utc::now();
  let inserted = tx.execute(
    "INSERT INTO approvals (item_id, voter_id, voted_at) VALUES (?1, ?2, ?3)
     ON CONFLICT (item_id, voter_id) DO NOTHING",
    rusqlite::params![item.0, voter.0, encode_dt(now)],
  )?;
  if inserted == 0 {
    tracing::warn!(%voter, %item, "approval rejected: duplicate vote");
    return Err(CoreError::AlreadyApproved { user: voter, item }.into());
  }

  let approval_count = queries::count_votes(&tx, item)?;

  // Conditioned on the persisted status, so only one caller ever sees a row
  // change here.
  let transitioned = reaches_quorum(approval_count)
    && tx.execute(
      "UPDATE items SET status = ?2, approved_at = ?3
       WHERE item_id = ?1 AND status = ?4",
      rusqlite::params![
        item.0,
        ItemStatus::Approved.as_str(),
        encode_dt(now),
        ItemStatus::Pending.as_str(),
      ],
    )? == 1;

  let status = queries::status_of(&tx, item)?.ok_or(CoreError::ItemNotFound(item))?;
  tx.commit()?;

  tracing::debug!(%voter, %item, approval_count, "approval recorded");
  if transitioned {
    tracing::info!(%item, approval_count, "item approved");
  }

  Ok(ApprovalOutcome { approval_count, status, transitioned })
}

pub fn approval_count(conn: &Connection, item: ItemId) -> Result<u32> {
  if queries::status_of(conn, item)?.is_none() {
    return Err(CoreError::ItemNotFound(item).into());
  }
  queries::count_votes(conn, item)
}

// ─── Achievement ledger ──────────────────────────────────────────────────────

/// Apply `delta` to the user's score in every category. A decrement against
/// a missing row is discarded and does not create one; an increment past
/// `u32::MAX` fails the whole operation.
fn adjust_scores(
  tx: &Transaction<'_>,
  user: UserId,
  categories: &BTreeSet<CategoryId>,
  delta: ScoreDelta,
) -> Result<Vec<AchievementEntry>> {
  let mut entries = Vec::with_capacity(categories.len());

  for &category in categories {
    let current = queries::stored_score(tx, user, category)?;
    let score = match (current, delta) {
      (None, ScoreDelta::Decrement) => 0,
      (current, delta) => {
        let next = delta
          .apply(current.unwrap_or(0))
          .ok_or(CoreError::ScoreOverflow { user, category })?;
        tx.execute(
          "INSERT INTO achievements (user_id, category_id, score) VALUES (?1, ?2, ?3)
           ON CONFLICT (user_id, category_id) DO UPDATE SET score = excluded.score",
          rusqlite::params![user.0, category.0, next],
        )?;
        next
      }
    };
    entries.push(AchievementEntry { user_id: user, category_id: category, score });
  }

  Ok(entries)
}

pub fn claim_achievement(
  conn: &mut Connection,
  user: UserId,
  item: ItemId,
) -> Result<Vec<AchievementEntry>> {
  let tx = begin(conn)?;
  require_user(&tx, user)?;
  let categories = require_item_categories(&tx, item)?;
  let entries = adjust_scores(&tx, user, &categories, ScoreDelta::Increment)?;
  tx.commit()?;

  tracing::debug!(%user, %item, "achievement claimed");
  Ok(entries)
}

pub fn toggle_bookmark(
  conn: &mut Connection,
  user: UserId,
  item: ItemId,
) -> Result<BookmarkToggle> {
  let tx = begin(conn)?;
  require_user(&tx, user)?;
  let categories = require_item_categories(&tx, item)?;

  let removed = tx.execute(
    "DELETE FROM bookmarks WHERE user_id = ?1 AND item_id = ?2",
    rusqlite::params![user.0, item.0],
  )? == 1;

  let (bookmarked, delta) = if removed {
    (false, ScoreDelta::Decrement)
  } else {
    tx.execute(
      "INSERT INTO bookmarks (user_id, item_id, created_at) VALUES (?1, ?2, ?3)",
      rusqlite::params![user.0, item.0, encode_dt(Utc::now())],
    )?;
    (true, ScoreDelta::Increment)
  };

  let entries = adjust_scores(&tx, user, &categories, delta)?;
  tx.commit()?;

  tracing::debug!(%user, %item, bookmarked, "bookmark toggled");
  Ok(BookmarkToggle { item_id: item, bookmarked, entries })
}
