//! Read-side queries. All functions take a plain `&Connection` so they can be
//! called either directly or from inside a ledger transaction (which derefs to
//! one).

use std::collections::BTreeSet;

use lifskill_core::{
  CategoryId, Error as CoreError, ItemId, UserId,
  achievement::CategoryScore,
  approval::ApprovalVote,
  category::Category,
  item::{ContentItem, ItemFilter, ItemKind, ItemStatus},
  user::User,
};
use rusqlite::{Connection, OptionalExtension as _, ToSql};

use crate::{
  Result,
  encode::{
    CATEGORY_COLUMNS, ITEM_COLUMNS, RawCategory, RawItem, RawUser, RawVote,
    USER_COLUMNS, decode_score, decode_status,
  },
};

// ─── Existence ───────────────────────────────────────────────────────────────

pub fn user_exists(conn: &Connection, user: UserId) -> Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM users WHERE user_id = ?1",
        rusqlite::params![user.0],
        |_| Ok(()),
      )
      .optional()?
      .is_some(),
  )
}

pub fn category_exists(conn: &Connection, category: CategoryId) -> Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM categories WHERE category_id = ?1",
        rusqlite::params![category.0],
        |_| Ok(()),
      )
      .optional()?
      .is_some(),
  )
}

pub fn require_user(conn: &Connection, user: UserId) -> Result<()> {
  if user_exists(conn, user)? {
    Ok(())
  } else {
    Err(CoreError::UserNotFound(user).into())
  }
}

pub fn require_category(conn: &Connection, category: CategoryId) -> Result<()> {
  if category_exists(conn, category)? {
    Ok(())
  } else {
    Err(CoreError::CategoryNotFound(category).into())
  }
}

// ─── Users and categories ────────────────────────────────────────────────────

pub fn get_user(conn: &Connection, user: UserId) -> Result<Option<User>> {
  let raw = conn
    .query_row(
      &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
      rusqlite::params![user.0],
      RawUser::from_row,
    )
    .optional()?;
  raw.map(RawUser::into_user).transpose()
}

pub fn get_category(conn: &Connection, category: CategoryId) -> Result<Option<Category>> {
  let raw = conn
    .query_row(
      &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE category_id = ?1"),
      rusqlite::params![category.0],
      RawCategory::from_row,
    )
    .optional()?;
  raw.map(RawCategory::into_category).transpose()
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY category_id"
  ))?;
  let raws = stmt
    .query_map([], RawCategory::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawCategory::into_category).collect()
}

pub fn experts(conn: &Connection, category: CategoryId) -> Result<Vec<UserId>> {
  require_category(conn, category)?;
  let mut stmt = conn.prepare(
    "SELECT user_id FROM category_experts WHERE category_id = ?1 ORDER BY user_id",
  )?;
  let ids = stmt
    .query_map(rusqlite::params![category.0], |row| row.get(0).map(UserId))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(ids)
}

pub fn expert_categories(conn: &Connection, user: UserId) -> Result<Vec<CategoryId>> {
  let mut stmt = conn.prepare(
    "SELECT category_id FROM category_experts WHERE user_id = ?1 ORDER BY category_id",
  )?;
  let ids = stmt
    .query_map(rusqlite::params![user.0], |row| row.get(0).map(CategoryId))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(ids)
}

// ─── Items ───────────────────────────────────────────────────────────────────

pub fn categories_of(conn: &Connection, item: ItemId) -> Result<BTreeSet<CategoryId>> {
  let mut stmt =
    conn.prepare("SELECT category_id FROM item_categories WHERE item_id = ?1")?;
  let ids = stmt
    .query_map(rusqlite::params![item.0], |row| row.get(0).map(CategoryId))?
    .collect::<rusqlite::Result<BTreeSet<_>>>()?;
  Ok(ids)
}

/// The item's status, or `None` if it does not exist.
pub fn status_of(conn: &Connection, item: ItemId) -> Result<Option<ItemStatus>> {
  let raw: Option<String> = conn
    .query_row(
      "SELECT status FROM items WHERE item_id = ?1",
      rusqlite::params![item.0],
      |row| row.get(0),
    )
    .optional()?;
  raw.as_deref().map(decode_status).transpose()
}

/// Resolve an item to its category set, failing if it does not exist.
pub fn require_item_categories(
  conn: &Connection,
  item: ItemId,
) -> Result<BTreeSet<CategoryId>> {
  if status_of(conn, item)?.is_none() {
    return Err(CoreError::ItemNotFound(item).into());
  }
  categories_of(conn, item)
}

/// Run an item query whose select list is [`ITEM_COLUMNS`] and attach each
/// item's categories.
fn query_items(
  conn: &Connection,
  sql: &str,
  params: &[&dyn ToSql],
) -> Result<Vec<ContentItem>> {
  let mut stmt = conn.prepare(sql)?;
  let raws = stmt
    .query_map(params, RawItem::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  raws
    .into_iter()
    .map(|raw| {
      let categories = categories_of(conn, ItemId(raw.item_id))?;
      raw.into_item(categories)
    })
    .collect()
}

pub fn get_item(conn: &Connection, item: ItemId) -> Result<Option<ContentItem>> {
  let sql = format!("SELECT {ITEM_COLUMNS} FROM items i WHERE i.item_id = ?1");
  Ok(query_items(conn, &sql, &[&item.0])?.into_iter().next())
}

pub fn list_items(conn: &Connection, filter: ItemFilter) -> Result<Vec<ContentItem>> {
  let status = filter.status.map(ItemStatus::as_str);
  let kind = filter.kind.map(ItemKind::as_str);
  let owner = filter.owner.map(|id| id.0);

  let sql = format!(
    "SELECT {ITEM_COLUMNS} FROM items i
     WHERE (?1 IS NULL OR i.status = ?1)
       AND (?2 IS NULL OR i.kind = ?2)
       AND (?3 IS NULL OR i.owner_id = ?3)
     ORDER BY i.item_id DESC"
  );
  query_items(conn, &sql, &[&status, &kind, &owner])
}

pub fn pending_for_expert(conn: &Connection, user: UserId) -> Result<Vec<ContentItem>> {
  let sql = format!(
    "SELECT DISTINCT {ITEM_COLUMNS} FROM items i
     JOIN item_categories ic   ON ic.item_id = i.item_id
     JOIN category_experts ce  ON ce.category_id = ic.category_id
     WHERE i.status = 'pending' AND ce.user_id = ?1
     ORDER BY i.item_id DESC"
  );
  query_items(conn, &sql, &[&user.0])
}

pub fn achieved_items(conn: &Connection, user: UserId) -> Result<Vec<ContentItem>> {
  let sql = format!(
    "SELECT DISTINCT {ITEM_COLUMNS} FROM items i
     JOIN item_categories ic ON ic.item_id = i.item_id
     JOIN achievements a     ON a.category_id = ic.category_id
     WHERE a.user_id = ?1 AND a.score > 0
     ORDER BY i.item_id DESC"
  );
  query_items(conn, &sql, &[&user.0])
}

// ─── Approvals ───────────────────────────────────────────────────────────────

/// Distinct voters on `item`; the primary key makes every row distinct.
pub fn count_votes(conn: &Connection, item: ItemId) -> Result<u32> {
  let n: u32 = conn.query_row(
    "SELECT COUNT(*) FROM approvals WHERE item_id = ?1",
    rusqlite::params![item.0],
    |row| row.get(0),
  )?;
  Ok(n)
}

pub fn approvals(conn: &Connection, item: ItemId) -> Result<Vec<ApprovalVote>> {
  let mut stmt = conn.prepare(
    "SELECT item_id, voter_id, voted_at FROM approvals
     WHERE item_id = ?1 ORDER BY rowid",
  )?;
  let raws = stmt
    .query_map(rusqlite::params![item.0], RawVote::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawVote::into_vote).collect()
}

// ─── Achievements ────────────────────────────────────────────────────────────

/// The stored score, or `None` if no row exists yet.
pub fn stored_score(
  conn: &Connection,
  user: UserId,
  category: CategoryId,
) -> Result<Option<u32>> {
  let raw: Option<i64> = conn
    .query_row(
      "SELECT score FROM achievements WHERE user_id = ?1 AND category_id = ?2",
      rusqlite::params![user.0, category.0],
      |row| row.get(0),
    )
    .optional()?;
  raw.map(decode_score).transpose()
}

pub fn achievements(conn: &Connection, user: UserId) -> Result<Vec<CategoryScore>> {
  let mut stmt = conn.prepare(
    "SELECT a.category_id, c.name, a.score FROM achievements a
     JOIN categories c ON c.category_id = a.category_id
     WHERE a.user_id = ?1 ORDER BY a.category_id",
  )?;
  let rows = stmt
    .query_map(rusqlite::params![user.0], |row| {
      Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, i64>(2)?))
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  rows
    .into_iter()
    .map(|(category, category_name, score)| {
      Ok(CategoryScore {
        category_id: CategoryId(category),
        category_name,
        score: decode_score(score)?,
      })
    })
    .collect()
}

pub fn bookmarks(conn: &Connection, user: UserId) -> Result<Vec<ItemId>> {
  let mut stmt = conn
    .prepare("SELECT item_id FROM bookmarks WHERE user_id = ?1 ORDER BY rowid")?;
  let ids = stmt
    .query_map(rusqlite::params![user.0], |row| row.get(0).map(ItemId))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(ids)
}

pub fn is_bookmarked(conn: &Connection, user: UserId, item: ItemId) -> Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM bookmarks WHERE user_id = ?1 AND item_id = ?2",
        rusqlite::params![user.0, item.0],
        |_| Ok(()),
      )
      .optional()?
      .is_some(),
  )
}
