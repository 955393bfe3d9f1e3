//! The `ModerationStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `lifskill-store-sqlite`).
//! Higher layers (`lifskill-api`, `lifskill-server`) depend on this
//! abstraction, not on any concrete backend.

use std::{collections::BTreeSet, future::Future};

use crate::{
  CategoryId, Classify, ItemId, UserId,
  achievement::{AchievementEntry, BookmarkToggle, CategoryScore},
  approval::{ApprovalOutcome, ApprovalVote},
  category::Category,
  item::{ContentItem, ItemFilter, ItemStatus, NewItem},
  user::User,
};

/// Abstraction over a transactional moderation store.
///
/// Every mutating operation behaves as one atomic transaction: a failed call
/// leaves no partial effect behind, so callers may simply retry the whole
/// operation. The store never retries on its own.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ModerationStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Register a user identity. Fails with a conflict if the name is taken.
  fn add_user(
    &self,
    username: String,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Category directory ────────────────────────────────────────────────

  fn add_category(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Category, Self::Error>> + Send + '_;

  fn get_category(
    &self,
    id: CategoryId,
  ) -> impl Future<Output = Result<Option<Category>, Self::Error>> + Send + '_;

  fn list_categories(
    &self,
  ) -> impl Future<Output = Result<Vec<Category>, Self::Error>> + Send + '_;

  /// Add `user` to the roster of `category`. Returns `false` if they were
  /// already on it.
  fn assign_expert(
    &self,
    user: UserId,
    category: CategoryId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Remove `user` from the roster of `category`. Existing votes are kept.
  fn revoke_expert(
    &self,
    user: UserId,
    category: CategoryId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Atomically replace every roster entry of `user` with `categories`.
  fn replace_expertise(
    &self,
    user: UserId,
    categories: BTreeSet<CategoryId>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Pure roster lookup; unknown identities resolve to `false`.
  fn is_expert(
    &self,
    user: UserId,
    category: CategoryId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn experts(
    &self,
    category: CategoryId,
  ) -> impl Future<Output = Result<Vec<UserId>, Self::Error>> + Send + '_;

  fn expert_categories(
    &self,
    user: UserId,
  ) -> impl Future<Output = Result<Vec<CategoryId>, Self::Error>> + Send + '_;

  // ── Content item registry ─────────────────────────────────────────────

  /// Validate and persist a new item in `Pending` status.
  fn create_item(
    &self,
    owner: UserId,
    input: NewItem,
  ) -> impl Future<Output = Result<ContentItem, Self::Error>> + Send + '_;

  fn get_item(
    &self,
    id: ItemId,
  ) -> impl Future<Output = Result<Option<ContentItem>, Self::Error>> + Send + '_;

  fn item_categories(
    &self,
    id: ItemId,
  ) -> impl Future<Output = Result<BTreeSet<CategoryId>, Self::Error>> + Send + '_;

  fn item_status(
    &self,
    id: ItemId,
  ) -> impl Future<Output = Result<ItemStatus, Self::Error>> + Send + '_;

  /// Items matching `filter`, newest first.
  fn list_items(
    &self,
    filter: ItemFilter,
  ) -> impl Future<Output = Result<Vec<ContentItem>, Self::Error>> + Send + '_;

  /// Pending items `user` is currently allowed to vote on, newest first.
  fn pending_for_expert(
    &self,
    user: UserId,
  ) -> impl Future<Output = Result<Vec<ContentItem>, Self::Error>> + Send + '_;

  // ── Approval ledger ───────────────────────────────────────────────────

  fn can_approve(
    &self,
    user: UserId,
    item: ItemId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Record `voter`'s approval of `item` and approve the item once quorum is
  /// reached. A repeated vote is rejected with a conflict.
  fn cast_approval(
    &self,
    voter: UserId,
    item: ItemId,
  ) -> impl Future<Output = Result<ApprovalOutcome, Self::Error>> + Send + '_;

  fn approval_count(
    &self,
    item: ItemId,
  ) -> impl Future<Output = Result<u32, Self::Error>> + Send + '_;

  /// Votes on `item`, oldest first.
  fn approvals(
    &self,
    item: ItemId,
  ) -> impl Future<Output = Result<Vec<ApprovalVote>, Self::Error>> + Send + '_;

  // ── Achievement ledger ────────────────────────────────────────────────

  /// Add one point in every category of `item`. Repeatable.
  fn claim_achievement(
    &self,
    user: UserId,
    item: ItemId,
  ) -> impl Future<Output = Result<Vec<AchievementEntry>, Self::Error>> + Send + '_;

  /// Flip the bookmark on `item` and adjust scores in every category of the
  /// item by one point in the matching direction.
  fn toggle_bookmark(
    &self,
    user: UserId,
    item: ItemId,
  ) -> impl Future<Output = Result<BookmarkToggle, Self::Error>> + Send + '_;

  /// Zero when no row exists; never creates one.
  fn score(
    &self,
    user: UserId,
    category: CategoryId,
  ) -> impl Future<Output = Result<u32, Self::Error>> + Send + '_;

  /// Existing score rows with their category names, ordered by category.
  fn achievements(
    &self,
    user: UserId,
  ) -> impl Future<Output = Result<Vec<CategoryScore>, Self::Error>> + Send + '_;

  fn bookmarks(
    &self,
    user: UserId,
  ) -> impl Future<Output = Result<Vec<ItemId>, Self::Error>> + Send + '_;

  fn is_bookmarked(
    &self,
    user: UserId,
    item: ItemId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Items sharing a category in which `user` holds a positive score.
  fn achieved_items(
    &self,
    user: UserId,
  ) -> impl Future<Output = Result<Vec<ContentItem>, Self::Error>> + Send + '_;
}
