//! [`SqliteStore`]: the SQLite implementation of [`ModerationStore`].

use std::{collections::BTreeSet, path::Path, sync::Arc};

use lifskill_core::{
  CategoryId, ItemId, UserId,
  achievement::{AchievementEntry, BookmarkToggle, CategoryScore},
  approval::{ApprovalOutcome, ApprovalVote},
  category::Category,
  gate::{ExpertRoster, ExpertiseGate},
  item::{ContentItem, ItemFilter, ItemStatus, NewItem},
  store::ModerationStore,
  user::User,
};
use rusqlite::Connection;

use crate::{Error, Result, ledger, queries, roster::Roster, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A moderation store backed by a single SQLite file.
///
/// All statements run on the one connection owned by [`tokio_rusqlite`], and
/// every write opens a `BEGIN IMMEDIATE` transaction, so concurrent callers
/// (including other processes sharing the file) are serialised per operation.
///
/// Cloning is cheap; the inner connection and gate are reference-counted.
pub struct SqliteStore<G = ExpertRoster> {
  conn: tokio_rusqlite::Connection,
  gate: Arc<G>,
}

impl<G> Clone for SqliteStore<G> {
  fn clone(&self) -> Self {
    Self { conn: self.conn.clone(), gate: Arc::clone(&self.gate) }
  }
}

impl SqliteStore {
  /// Open (or create) a store at `path` using the default expertise policy.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::open_with_gate(path, ExpertRoster).await
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    Self::open_in_memory_with_gate(ExpertRoster).await
  }
}

impl<G: ExpertiseGate + 'static> SqliteStore<G> {
  pub async fn open_with_gate(path: impl AsRef<Path>, gate: G) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, gate: Arc::new(gate) };
    store.init_schema().await?;
    Ok(store)
  }

  pub async fn open_in_memory_with_gate(gate: G) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, gate: Arc::new(gate) };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` on the connection thread, flattening its domain result.
  async fn with_conn<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }
}

// ─── ModerationStore impl ────────────────────────────────────────────────────

impl<G: ExpertiseGate + 'static> ModerationStore for SqliteStore<G> {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, username: String) -> Result<User> {
    self.with_conn(move |conn| ledger::add_user(conn, username)).await
  }

  async fn get_user(&self, id: UserId) -> Result<Option<User>> {
    self.with_conn(move |conn| queries::get_user(conn, id)).await
  }

  // ── Category directory ────────────────────────────────────────────────────

  async fn add_category(&self, name: String) -> Result<Category> {
    self.with_conn(move |conn| ledger::add_category(conn, name)).await
  }

  async fn get_category(&self, id: CategoryId) -> Result<Option<Category>> {
    self.with_conn(move |conn| queries::get_category(conn, id)).await
  }

  async fn list_categories(&self) -> Result<Vec<Category>> {
    self.with_conn(|conn| queries::list_categories(conn)).await
  }

  async fn assign_expert(&self, user: UserId, category: CategoryId) -> Result<bool> {
    self
      .with_conn(move |conn| ledger::assign_expert(conn, user, category))
      .await
  }

  async fn revoke_expert(&self, user: UserId, category: CategoryId) -> Result<bool> {
    self
      .with_conn(move |conn| ledger::revoke_expert(conn, user, category))
      .await
  }

  async fn replace_expertise(
    &self,
    user:       UserId,
    categories: BTreeSet<CategoryId>,
  ) -> Result<()> {
    self
      .with_conn(move |conn| ledger::replace_expertise(conn, user, &categories))
      .await
  }

  async fn is_expert(&self, user: UserId, category: CategoryId) -> Result<bool> {
    use lifskill_core::gate::CategoryDirectory as _;
    self
      .with_conn(move |conn| Ok(Roster(conn).is_expert(user, category)?))
      .await
  }

  async fn experts(&self, category: CategoryId) -> Result<Vec<UserId>> {
    self.with_conn(move |conn| queries::experts(conn, category)).await
  }

  async fn expert_categories(&self, user: UserId) -> Result<Vec<CategoryId>> {
    self
      .with_conn(move |conn| queries::expert_categories(conn, user))
      .await
  }

  // ── Content item registry ─────────────────────────────────────────────────

  async fn create_item(&self, owner: UserId, input: NewItem) -> Result<ContentItem> {
    self
      .with_conn(move |conn| ledger::create_item(conn, owner, input))
      .await
  }

  async fn get_item(&self, id: ItemId) -> Result<Option<ContentItem>> {
    self.with_conn(move |conn| queries::get_item(conn, id)).await
  }

  async fn item_categories(&self, id: ItemId) -> Result<BTreeSet<CategoryId>> {
    self
      .with_conn(move |conn| queries::require_item_categories(conn, id))
      .await
  }

  async fn item_status(&self, id: ItemId) -> Result<ItemStatus> {
    self
      .with_conn(move |conn| {
        queries::status_of(conn, id)?
          .ok_or_else(|| lifskill_core::Error::ItemNotFound(id).into())
      })
      .await
  }

  async fn list_items(&self, filter: ItemFilter) -> Result<Vec<ContentItem>> {
    self.with_conn(move |conn| queries::list_items(conn, filter)).await
  }

  async fn pending_for_expert(&self, user: UserId) -> Result<Vec<ContentItem>> {
    self
      .with_conn(move |conn| queries::pending_for_expert(conn, user))
      .await
  }

  // ── Approval ledger ───────────────────────────────────────────────────────

  async fn can_approve(&self, user: UserId, item: ItemId) -> Result<bool> {
    let gate = Arc::clone(&self.gate);
    self
      .with_conn(move |conn| ledger::can_approve(conn, &*gate, user, item))
      .await
  }

  async fn cast_approval(&self, voter: UserId, item: ItemId) -> Result<ApprovalOutcome> {
    let gate = Arc::clone(&self.gate);
    self
      .with_conn(move |conn| ledger::cast_approval(conn, &*gate, voter, item))
      .await
  }

  async fn approval_count(&self, item: ItemId) -> Result<u32> {
    self
      .with_conn(move |conn| ledger::approval_count(conn, item))
      .await
  }

  async fn approvals(&self, item: ItemId) -> Result<Vec<ApprovalVote>> {
    self
      .with_conn(move |conn| {
        if queries::status_of(conn, item)?.is_none() {
          return Err(lifskill_core::Error::ItemNotFound(item).into());
        }
        queries::approvals(conn, item)
      })
      .await
  }

  // ── Achievement ledger ────────────────────────────────────────────────────

  async fn claim_achievement(
    &self,
    user: UserId,
    item: ItemId,
  ) -> Result<Vec<AchievementEntry>> {
    self
      .with_conn(move |conn| ledger::claim_achievement(conn, user, item))
      .await
  }

  async fn toggle_bookmark(&self, user: UserId, item: ItemId) -> Result<BookmarkToggle> {
    self
      .with_conn(move |conn| ledger::toggle_bookmark(conn, user, item))
      .await
  }

  async fn score(&self, user: UserId, category: CategoryId) -> Result<u32> {
    self
      .with_conn(move |conn| {
        Ok(queries::stored_score(conn, user, category)?.unwrap_or(0))
      })
      .await
  }

  async fn achievements(&self, user: UserId) -> Result<Vec<CategoryScore>> {
    self.with_conn(move |conn| queries::achievements(conn, user)).await
  }

  async fn bookmarks(&self, user: UserId) -> Result<Vec<ItemId>> {
    self.with_conn(move |conn| queries::bookmarks(conn, user)).await
  }

  async fn is_bookmarked(&self, user: UserId, item: ItemId) -> Result<bool> {
    self
      .with_conn(move |conn| queries::is_bookmarked(conn, user, item))
      .await
  }

  async fn achieved_items(&self, user: UserId) -> Result<Vec<ContentItem>> {
    self
      .with_conn(move |conn| queries::achieved_items(conn, user))
      .await
  }
}
